//! Open/close lifecycle shared by the navigation drawer and the image viewer.
//!
//! ```text
//! Closed ──open()──▶ Opening ──FocusModal task──▶ Open
//!    ▲                  │                           │
//!    └──────close()─────┴───────────close()─────────┘
//! ```
//!
//! `Opening` covers the window between the synchronous attribute changes and
//! the deferred focus move. Focus is moved on a later tick so it does not
//! fight the browser's own focus handling for the event that opened the
//! modal. Each open bumps a generation counter; a focus task from an earlier
//! generation, or one that arrives after the modal closed, is dropped.

use crate::dom::{Dom, contract};
use crate::focus_trap::FocusTrap;
use crate::host::{Host, Task};
use std::time::Duration;

/// Which modal a deferred task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    Drawer,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Opening,
    Open,
}

/// Element that receives focus once the modal has opened.
#[derive(Debug, Clone)]
pub enum InitialFocus<N> {
    Node(N),
    /// First descendant with this class, looked up when the focus task runs.
    FirstWithClass(&'static str),
}

/// Where focus goes when the modal closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnFocus {
    /// The trigger element (drawer toggle).
    Trigger,
    /// Whatever had focus when the modal opened.
    Opener,
}

/// Static wiring of a modal to its markup.
#[derive(Debug, Clone)]
pub struct ModalSpec<N> {
    pub kind: ModalKind,
    pub container: N,
    /// Receives `aria-expanded` while the modal is open.
    pub trigger: Option<N>,
    /// Mirror visibility into `aria-hidden` on the container.
    pub toggles_aria_hidden: bool,
    pub initial_focus: InitialFocus<N>,
    pub return_focus: ReturnFocus,
    pub focus_delay: Duration,
}

pub struct ModalController<D: Dom> {
    spec: ModalSpec<D::Node>,
    state: ModalState,
    trap: Option<FocusTrap<D>>,
    opener: Option<D::Node>,
    generation: u64,
}

impl<D: Dom> ModalController<D> {
    pub fn new(spec: ModalSpec<D::Node>) -> Self {
        Self {
            spec,
            state: ModalState::Closed,
            trap: None,
            opener: None,
            generation: 0,
        }
    }

    pub fn kind(&self) -> ModalKind {
        self.spec.kind
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn container(&self) -> &D::Node {
        &self.spec.container
    }

    pub fn trigger(&self) -> Option<&D::Node> {
        self.spec.trigger.as_ref()
    }

    pub fn trap(&self) -> Option<&FocusTrap<D>> {
        self.trap.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Show the modal, lock scrolling, trap focus and schedule the initial
    /// focus move. Opening an already-open modal does nothing.
    pub fn open<H: Host + ?Sized>(&mut self, dom: &mut D, host: &mut H) {
        if self.is_open() {
            return;
        }
        let container = self.spec.container.clone();

        self.opener = dom.active_element();
        dom.add_class(&container, contract::OPEN_CLASS);
        if self.spec.toggles_aria_hidden {
            dom.set_attribute(&container, contract::ARIA_HIDDEN, "false");
        }
        if let Some(trigger) = &self.spec.trigger {
            dom.set_attribute(trigger, contract::ARIA_EXPANDED, "true");
        }
        dom.set_scroll_locked(true);
        self.trap = Some(FocusTrap::install(dom, container));

        self.generation += 1;
        self.state = ModalState::Opening;
        host.schedule(
            self.spec.focus_delay,
            Task::FocusModal {
                modal: self.spec.kind,
                generation: self.generation,
            },
        );
        tracing::debug!(modal = ?self.spec.kind, generation = self.generation, "modal opening");
    }

    /// Run the deferred focus move. Returns `false` if the task was stale.
    pub fn complete_open(&mut self, dom: &mut D, generation: u64) -> bool {
        if self.state != ModalState::Opening || generation != self.generation {
            tracing::debug!(
                modal = ?self.spec.kind,
                generation,
                current = self.generation,
                "stale focus task dropped"
            );
            return false;
        }
        let target = match &self.spec.initial_focus {
            InitialFocus::Node(node) => Some(node.clone()),
            InitialFocus::FirstWithClass(class) => {
                dom.first_descendant_with_class(&self.spec.container, class)
            }
        };
        if let Some(target) = target {
            dom.focus(&target);
        }
        self.state = ModalState::Open;
        true
    }

    /// Undo everything [`open`](Self::open) did and hand focus back.
    /// Closing a closed modal does nothing.
    pub fn close(&mut self, dom: &mut D) {
        if !self.is_open() {
            return;
        }
        let container = self.spec.container.clone();

        dom.remove_class(&container, contract::OPEN_CLASS);
        if self.spec.toggles_aria_hidden {
            dom.set_attribute(&container, contract::ARIA_HIDDEN, "true");
        }
        if let Some(trigger) = &self.spec.trigger {
            dom.set_attribute(trigger, contract::ARIA_EXPANDED, "false");
        }
        dom.set_scroll_locked(false);
        if let Some(mut trap) = self.trap.take() {
            trap.release();
        }
        self.state = ModalState::Closed;

        let opener = self.opener.take();
        let back = match self.spec.return_focus {
            ReturnFocus::Trigger => self.spec.trigger.clone(),
            ReturnFocus::Opener => opener,
        };
        if let Some(node) = back {
            dom.focus(&node);
        }
        tracing::debug!(modal = ?self.spec.kind, "modal closed");
    }

    /// Whether a keydown on `target` should be routed to this modal's trap.
    pub fn owns(&self, dom: &D, target: &D::Node) -> bool {
        dom.contains(&self.spec.container, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Key, KeyOutcome, KeyPress, MemoryDom, NodeId};
    use crate::host::MemoryHost;

    struct Fixture {
        dom: MemoryDom,
        host: MemoryHost,
        toggle: NodeId,
        panel: NodeId,
        links: Vec<NodeId>,
    }

    fn fixture(return_focus: ReturnFocus) -> (Fixture, ModalController<MemoryDom>) {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let toggle = dom
            .append(body, "button")
            .attr(contract::ARIA_EXPANDED, "false")
            .node();
        let panel = dom.append(body, "nav").node();
        let links = (0..3)
            .map(|i| {
                dom.append(panel, "a")
                    .class("link")
                    .attr("href", &format!("#s{i}"))
                    .node()
            })
            .collect();
        let modal = ModalController::new(ModalSpec {
            kind: ModalKind::Drawer,
            container: panel,
            trigger: Some(toggle),
            toggles_aria_hidden: true,
            initial_focus: InitialFocus::FirstWithClass("link"),
            return_focus,
            focus_delay: Duration::from_millis(100),
        });
        (
            Fixture {
                dom,
                host: MemoryHost::new(),
                toggle,
                panel,
                links,
            },
            modal,
        )
    }

    fn run_due(f: &mut Fixture, modal: &mut ModalController<MemoryDom>, ms: u64) {
        for task in f.host.advance(Duration::from_millis(ms)) {
            if let Task::FocusModal { generation, .. } = task {
                modal.complete_open(&mut f.dom, generation);
            }
        }
    }

    #[test]
    fn open_applies_all_visible_state() {
        let (mut f, mut modal) = fixture(ReturnFocus::Trigger);
        modal.open(&mut f.dom, &mut f.host);

        assert_eq!(modal.state(), ModalState::Opening);
        assert!(f.dom.has_class(&f.panel, contract::OPEN_CLASS));
        assert_eq!(
            f.dom.attribute(&f.panel, contract::ARIA_HIDDEN).as_deref(),
            Some("false")
        );
        assert_eq!(
            f.dom.attribute(&f.toggle, contract::ARIA_EXPANDED).as_deref(),
            Some("true")
        );
        assert!(f.dom.is_scroll_locked());
        assert!(modal.trap().is_some_and(|t| t.is_active()));
    }

    #[test]
    fn focus_moves_after_delay() {
        let (mut f, mut modal) = fixture(ReturnFocus::Trigger);
        modal.open(&mut f.dom, &mut f.host);
        assert_eq!(f.dom.active_element(), None);

        run_due(&mut f, &mut modal, 99);
        assert_eq!(f.dom.active_element(), None);

        run_due(&mut f, &mut modal, 1);
        assert_eq!(f.dom.active_element(), Some(f.links[0]));
        assert_eq!(modal.state(), ModalState::Open);
    }

    #[test]
    fn close_reverses_open_and_returns_focus_to_trigger() {
        let (mut f, mut modal) = fixture(ReturnFocus::Trigger);
        modal.open(&mut f.dom, &mut f.host);
        run_due(&mut f, &mut modal, 100);
        modal.close(&mut f.dom);

        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!f.dom.has_class(&f.panel, contract::OPEN_CLASS));
        assert_eq!(
            f.dom.attribute(&f.panel, contract::ARIA_HIDDEN).as_deref(),
            Some("true")
        );
        assert_eq!(
            f.dom.attribute(&f.toggle, contract::ARIA_EXPANDED).as_deref(),
            Some("false")
        );
        assert!(!f.dom.is_scroll_locked());
        assert!(modal.trap().is_none());
        assert_eq!(f.dom.active_element(), Some(f.toggle));
    }

    #[test]
    fn close_returns_focus_to_opener() {
        let (mut f, mut modal) = fixture(ReturnFocus::Opener);
        let body = f.dom.body();
        let origin = f.dom.append(body, "button").node();
        f.dom.place_focus(Some(origin));

        modal.open(&mut f.dom, &mut f.host);
        run_due(&mut f, &mut modal, 100);
        modal.close(&mut f.dom);

        assert_eq!(f.dom.active_element(), Some(origin));
    }

    #[test]
    fn close_when_closed_is_a_noop() {
        let (mut f, mut modal) = fixture(ReturnFocus::Trigger);
        modal.close(&mut f.dom);
        assert!(f.dom.focus_history().is_empty());

        modal.open(&mut f.dom, &mut f.host);
        modal.close(&mut f.dom);
        let history = f.dom.focus_history().len();
        modal.close(&mut f.dom);
        assert_eq!(f.dom.focus_history().len(), history);
        assert_eq!(modal.state(), ModalState::Closed);
    }

    #[test]
    fn open_when_open_does_not_reinstall() {
        let (mut f, mut modal) = fixture(ReturnFocus::Trigger);
        modal.open(&mut f.dom, &mut f.host);
        let generation = modal.generation();
        modal.open(&mut f.dom, &mut f.host);
        assert_eq!(modal.generation(), generation);
        assert_eq!(f.host.pending_tasks().len(), 1);
    }

    #[test]
    fn focus_task_after_close_is_dropped() {
        let (mut f, mut modal) = fixture(ReturnFocus::Trigger);
        modal.open(&mut f.dom, &mut f.host);
        modal.close(&mut f.dom);

        run_due(&mut f, &mut modal, 100);

        assert_eq!(f.dom.active_element(), Some(f.toggle));
        assert_eq!(modal.state(), ModalState::Closed);
    }

    #[test]
    fn stale_generation_is_dropped_after_reopen() {
        let (mut f, mut modal) = fixture(ReturnFocus::Trigger);
        modal.open(&mut f.dom, &mut f.host);
        modal.close(&mut f.dom);
        f.host.advance(Duration::from_millis(50));
        modal.open(&mut f.dom, &mut f.host);

        assert!(!modal.complete_open(&mut f.dom, 1));
        assert_eq!(modal.state(), ModalState::Opening);
        assert!(modal.complete_open(&mut f.dom, 2));
        assert_eq!(modal.state(), ModalState::Open);
    }

    #[test]
    fn trap_is_active_while_open() {
        let (mut f, mut modal) = fixture(ReturnFocus::Trigger);
        modal.open(&mut f.dom, &mut f.host);
        run_due(&mut f, &mut modal, 100);
        f.dom.place_focus(Some(f.links[2]));

        let outcome = modal
            .trap()
            .map(|t| t.handle_key(&mut f.dom, &KeyPress::new(Key::Tab)));
        assert_eq!(outcome, Some(KeyOutcome::Consumed));
        assert_eq!(f.dom.active_element(), Some(f.links[0]));
    }
}
