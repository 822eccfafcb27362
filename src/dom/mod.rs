//! Document access behind a trait.
//!
//! Every component in this crate reads and writes the page through [`Dom`].
//! ARIA attributes and state classes on the real elements are the source of
//! truth; controllers keep only what the markup cannot express (the viewer's
//! index, the installed focus trap, pending deferred work).
//!
//! | Implementation | Where |
//! |---|---|
//! | [`MemoryDom`] | headless document for tests and the CLI |
//! | `WebDom` | `web-sys` document, `wasm32` only |

pub mod contract;
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use memory::{MemoryDom, NodeId};

use std::fmt;

/// Elements that take part in tab order.
///
/// Links with a target, enabled form controls, and anything with an explicit
/// `tabindex` other than exactly `-1`.
pub const FOCUSABLE_SELECTOR: &str = "a[href], button:not([disabled]), \
    textarea:not([disabled]), input:not([disabled]), select:not([disabled]), \
    [tabindex]:not([tabindex=\"-1\"])";

/// Minimal DOM surface the interaction layer needs.
///
/// Mutating calls on a node that no longer exists are silently ignored, the
/// same way the browser ignores writes to detached elements.
pub trait Dom {
    /// Handle to an element. Cheap to clone, compared by identity.
    type Node: Clone + PartialEq + fmt::Debug;

    fn document_body(&self) -> Option<Self::Node>;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Descendants of `root` carrying `class`, in document order.
    fn descendants_with_class(&self, root: &Self::Node, class: &str) -> Vec<Self::Node>;

    /// First descendant of `root` with the given tag name.
    fn first_descendant_with_tag(&self, root: &Self::Node, tag: &str) -> Option<Self::Node>;

    /// Descendants of `container` matching [`FOCUSABLE_SELECTOR`], in document order.
    fn focusable_descendants(&self, container: &Self::Node) -> Vec<Self::Node>;

    /// Inclusive containment: a node contains itself.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn active_element(&self) -> Option<Self::Node>;
    fn focus(&mut self, node: &Self::Node);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Current value of an input, select or textarea. Empty for anything else.
    fn value(&self, node: &Self::Node) -> String;

    /// Restore every control inside `form` to its initial value.
    fn reset_form(&mut self, form: &Self::Node);

    /// Lock or unlock page scrolling (body overflow).
    fn set_scroll_locked(&mut self, locked: bool);

    fn first_descendant_with_class(&self, root: &Self::Node, class: &str) -> Option<Self::Node> {
        self.descendants_with_class(root, class).into_iter().next()
    }
}

/// Keys the interaction layer reacts to. Everything else is [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Escape,
    Enter,
    Space,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Tab" => Key::Tab,
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// A keydown as seen by the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// Whether a handler consumed an event and cancelled its default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    PassThrough,
}

impl KeyOutcome {
    pub fn is_consumed(self) -> bool {
        self == KeyOutcome::Consumed
    }
}
