//! Keyboard focus containment for modal containers.
//!
//! A trap snapshots the container's focusable elements when installed and
//! from then on wraps Tab at both ends: Tab on the last element focuses the
//! first, Shift+Tab on the first focuses the last. Every other key, and Tab
//! anywhere in the middle of the cycle, is left to the browser.
//!
//! The snapshot is taken once per install. Controllers reinstall on every
//! open, so markup changed while a modal is closed is picked up next time.

use crate::dom::{Dom, Key, KeyOutcome, KeyPress};

pub struct FocusTrap<D: Dom> {
    container: D::Node,
    focusables: Vec<D::Node>,
    active: bool,
}

impl<D: Dom> FocusTrap<D> {
    /// Compute the focusable set of `container` and start intercepting.
    pub fn install(dom: &D, container: D::Node) -> Self {
        let focusables = dom.focusable_descendants(&container);
        tracing::debug!(count = focusables.len(), "focus trap installed");
        Self {
            container,
            focusables,
            active: true,
        }
    }

    pub fn container(&self) -> &D::Node {
        &self.container
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn focusables(&self) -> &[D::Node] {
        &self.focusables
    }

    /// Handle a keydown that originated inside the container.
    ///
    /// Returns [`KeyOutcome::Consumed`] when focus was wrapped and the default
    /// tab movement must be cancelled.
    pub fn handle_key(&self, dom: &mut D, key: &KeyPress) -> KeyOutcome {
        if !self.active || key.key != Key::Tab {
            return KeyOutcome::PassThrough;
        }
        let (Some(first), Some(last)) = (self.focusables.first(), self.focusables.last()) else {
            return KeyOutcome::PassThrough;
        };
        let Some(current) = dom.active_element() else {
            return KeyOutcome::PassThrough;
        };

        let target = if key.shift {
            (current == *first).then_some(last)
        } else {
            (current == *last).then_some(first)
        };
        match target {
            Some(node) => {
                let node = node.clone();
                dom.focus(&node);
                KeyOutcome::Consumed
            }
            None => KeyOutcome::PassThrough,
        }
    }

    /// Stop intercepting. Calling it again does nothing.
    pub fn release(&mut self) {
        if self.active {
            self.active = false;
            tracing::debug!("focus trap released");
        }
    }
}
