//! Page-level wiring: mounts every component against a document and routes
//! UI events and deferred tasks to them.
//!
//! [`Site::dispatch`] plays the part of the page's event listeners. Every
//! component sees every event it cares about; the drawer's outside-click
//! check, for instance, runs even when the click also opens an image.

use crate::config::SiteConfig;
use crate::disclosure::{COLLAPSED_LABEL, DisclosureGroup, EXPANDED_LABEL, GroupKind};
use crate::dom::{Dom, Key, KeyPress, contract};
use crate::host::{ClipboardError, Host, Task};
use crate::modal::{InitialFocus, ModalController, ModalKind, ModalSpec, ReturnFocus};
use crate::submit::ContactForm;
use crate::validate::FieldId;
use crate::viewer::ImageViewer;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// The page has part of a component's markup but not all of it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    #[error("missing element #{0}")]
    MissingElement(&'static str),
    #[error("missing element .{0}")]
    MissingClass(&'static str),
}

/// A discrete UI event, already reduced to the parts the handlers read.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent<N> {
    Click { target: N },
    /// `target` is the focused element, `None` when focus is on the body.
    KeyDown { target: Option<N>, key: KeyPress },
    Blur { target: N },
    Input { target: N },
    Submit { form: N },
    /// The window scrolled; `offset_y` is the new vertical scroll offset.
    Scroll { offset_y: f64 },
}

/// Whether the event's default action must be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Continue,
    PreventDefault,
}

// ============================================================================
// Navigation drawer
// ============================================================================

pub struct NavDrawer<D: Dom> {
    modal: ModalController<D>,
    toggle: D::Node,
    menu: D::Node,
    links: Vec<D::Node>,
}

impl<D: Dom> NavDrawer<D> {
    /// Returns `Ok(None)` when the page has neither toggle nor menu.
    pub fn mount(dom: &D, focus_delay: Duration) -> Result<Option<Self>, MountError> {
        let toggle = dom.element_by_id(contract::NAV_TOGGLE);
        let menu = dom.element_by_id(contract::NAV_MENU);
        let (toggle, menu) = match (toggle, menu) {
            (None, None) => return Ok(None),
            (Some(t), Some(m)) => (t, m),
            (None, Some(_)) => return Err(MountError::MissingElement(contract::NAV_TOGGLE)),
            (Some(_), None) => return Err(MountError::MissingElement(contract::NAV_MENU)),
        };
        let links = dom.descendants_with_class(&menu, contract::NAV_LINK_CLASS);
        let modal = ModalController::new(ModalSpec {
            kind: ModalKind::Drawer,
            container: menu.clone(),
            trigger: Some(toggle.clone()),
            toggles_aria_hidden: false,
            initial_focus: InitialFocus::FirstWithClass(contract::NAV_LINK_CLASS),
            return_focus: ReturnFocus::Trigger,
            focus_delay,
        });
        Ok(Some(Self {
            modal,
            toggle,
            menu,
            links,
        }))
    }

    pub fn modal(&self) -> &ModalController<D> {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut ModalController<D> {
        &mut self.modal
    }

    pub fn links(&self) -> &[D::Node] {
        &self.links
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    /// Open or close according to the toggle's `aria-expanded`.
    pub fn toggle<H: Host + ?Sized>(&mut self, dom: &mut D, host: &mut H) {
        let expanded = dom
            .attribute(&self.toggle, contract::ARIA_EXPANDED)
            .is_some_and(|v| v == "true");
        if expanded {
            self.modal.close(dom);
        } else {
            self.modal.open(dom, host);
        }
    }

    pub fn handle_click<H: Host + ?Sized>(&mut self, dom: &mut D, host: &mut H, target: &D::Node) {
        if dom.contains(&self.toggle, target) {
            self.toggle(dom, host);
            return;
        }
        if self.links.iter().any(|link| dom.contains(link, target)) {
            self.modal.close(dom);
            return;
        }
        if self.is_open() && !dom.contains(&self.menu, target) {
            self.modal.close(dom);
        }
    }

    pub fn handle_escape(&mut self, dom: &mut D) {
        if self.is_open() {
            self.modal.close(dom);
        }
    }
}

// ============================================================================
// Site
// ============================================================================

/// Which components found their markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MountSummary {
    /// Number of drawer links, if the drawer mounted.
    pub drawer_links: Option<usize>,
    /// Number of gallery items, if the viewer mounted.
    pub gallery_items: Option<usize>,
    /// Fields bound to the contact form, if it mounted.
    pub contact_fields: Option<Vec<FieldId>>,
    pub service_cards: usize,
    pub faq_items: usize,
}

pub struct Site<D: Dom> {
    drawer: Option<NavDrawer<D>>,
    viewer: Option<ImageViewer<D>>,
    contact: Option<ContactForm<D>>,
    services: DisclosureGroup<D>,
    faq: DisclosureGroup<D>,
    header: Option<D::Node>,
}

impl<D: Dom> Site<D> {
    /// Mount every component whose markup is on the page.
    pub fn mount(dom: &mut D, config: &SiteConfig) -> Result<Self, MountError> {
        let focus_delay = config.timing.focus_delay();
        let drawer = NavDrawer::mount(dom, focus_delay)?;
        let viewer = ImageViewer::mount(dom, focus_delay)?;
        let contact = ContactForm::mount(dom, config.contact.clone(), &config.timing)?;

        let services = DisclosureGroup::mount(
            dom,
            contract::SERVICE_TOGGLE_CLASS,
            GroupKind::Independent {
                collapsed: COLLAPSED_LABEL,
                expanded: EXPANDED_LABEL,
            },
        );
        let faq = DisclosureGroup::mount(dom, contract::FAQ_QUESTION_CLASS, GroupKind::Exclusive);

        let site = Self {
            drawer,
            viewer,
            contact,
            services,
            faq,
            header: dom.element_by_id(contract::HEADER),
        };
        let summary = site.summary();
        tracing::info!(
            drawer = ?summary.drawer_links,
            gallery = ?summary.gallery_items,
            contact = summary.contact_fields.is_some(),
            services = summary.service_cards,
            faq = summary.faq_items,
            "site interactions initialized"
        );
        Ok(site)
    }

    pub fn summary(&self) -> MountSummary {
        MountSummary {
            drawer_links: self.drawer.as_ref().map(|d| d.links().len()),
            gallery_items: self.viewer.as_ref().map(|v| v.items().len()),
            contact_fields: self.contact.as_ref().map(|c| {
                FieldId::ALL
                    .into_iter()
                    .filter(|id| c.fields().input(*id).is_some())
                    .collect()
            }),
            service_cards: self.services.len(),
            faq_items: self.faq.len(),
        }
    }

    pub fn drawer(&self) -> Option<&NavDrawer<D>> {
        self.drawer.as_ref()
    }

    pub fn viewer(&self) -> Option<&ImageViewer<D>> {
        self.viewer.as_ref()
    }

    pub fn contact(&self) -> Option<&ContactForm<D>> {
        self.contact.as_ref()
    }

    pub fn services(&self) -> &DisclosureGroup<D> {
        &self.services
    }

    pub fn faq(&self) -> &DisclosureGroup<D> {
        &self.faq
    }

    pub fn dispatch<H: Host + ?Sized>(
        &mut self,
        dom: &mut D,
        host: &mut H,
        event: UiEvent<D::Node>,
    ) -> EventOutcome {
        match event {
            UiEvent::Click { target } => {
                self.click(dom, host, &target);
                EventOutcome::Continue
            }
            UiEvent::KeyDown { target, key } => self.key_down(dom, host, target.as_ref(), &key),
            UiEvent::Blur { target } => {
                if let Some(form) = &self.contact
                    && let Some(id) = form.fields().field_for(&target)
                {
                    form.fields().on_blur(dom, id);
                }
                EventOutcome::Continue
            }
            UiEvent::Input { target } => {
                if let Some(form) = &self.contact
                    && let Some(id) = form.fields().field_for(&target)
                {
                    form.fields().on_input(dom, id);
                }
                EventOutcome::Continue
            }
            UiEvent::Submit { form } => match &mut self.contact {
                Some(contact) if *contact.form() == form => {
                    contact.submit(dom, host);
                    EventOutcome::PreventDefault
                }
                _ => EventOutcome::Continue,
            },
            UiEvent::Scroll { offset_y } => {
                self.scrolled(dom, offset_y);
                EventOutcome::Continue
            }
        }
    }

    /// The header carries `scrolled` once the page is past the threshold.
    fn scrolled(&self, dom: &mut D, offset_y: f64) {
        let Some(header) = &self.header else {
            return;
        };
        if offset_y > contract::SCROLL_THRESHOLD {
            dom.add_class(header, contract::SCROLLED_CLASS);
        } else {
            dom.remove_class(header, contract::SCROLLED_CLASS);
        }
    }

    fn click<H: Host + ?Sized>(&mut self, dom: &mut D, host: &mut H, target: &D::Node) {
        if let Some(drawer) = &mut self.drawer {
            drawer.handle_click(dom, host, target);
        }
        if let Some(viewer) = &mut self.viewer {
            viewer.handle_click(dom, host, target);
        }
        if let Some(contact) = &mut self.contact
            && contact
                .copy_button()
                .is_some_and(|button| dom.contains(button, target))
        {
            contact.begin_copy(dom, host);
        }
        if !self.services.handle_click(dom, target) {
            self.faq.handle_click(dom, target);
        }
    }

    fn key_down<H: Host + ?Sized>(
        &mut self,
        dom: &mut D,
        host: &mut H,
        target: Option<&D::Node>,
        key: &KeyPress,
    ) -> EventOutcome {
        match key.key {
            Key::Tab => {
                let Some(target) = target else {
                    return EventOutcome::Continue;
                };
                let modals = [
                    self.drawer.as_ref().map(NavDrawer::modal),
                    self.viewer.as_ref().map(ImageViewer::modal),
                ];
                for modal in modals.into_iter().flatten() {
                    if let Some(trap) = modal.trap()
                        && modal.owns(dom, target)
                        && trap.handle_key(dom, key).is_consumed()
                    {
                        return EventOutcome::PreventDefault;
                    }
                }
                EventOutcome::Continue
            }
            Key::Escape => {
                if let Some(drawer) = &mut self.drawer {
                    drawer.handle_escape(dom);
                }
                if let Some(viewer) = &mut self.viewer {
                    viewer.handle_key(dom, key);
                }
                EventOutcome::Continue
            }
            Key::ArrowLeft | Key::ArrowRight => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.handle_key(dom, key);
                }
                EventOutcome::Continue
            }
            Key::Enter | Key::Space => {
                if let (Some(viewer), Some(target)) = (&mut self.viewer, target)
                    && viewer.handle_item_key(dom, host, target, key).is_consumed()
                {
                    return EventOutcome::PreventDefault;
                }
                EventOutcome::Continue
            }
            Key::Other => EventOutcome::Continue,
        }
    }

    /// Run a task the host scheduled earlier.
    pub fn run_task<H: Host + ?Sized>(&mut self, dom: &mut D, host: &H, task: Task) {
        match task {
            Task::FocusModal {
                modal: ModalKind::Drawer,
                generation,
            } => {
                if let Some(drawer) = &mut self.drawer {
                    drawer.modal_mut().complete_open(dom, generation);
                }
            }
            Task::FocusModal {
                modal: ModalKind::Viewer,
                generation,
            } => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.modal_mut().complete_open(dom, generation);
                }
            }
            Task::EvaluateDispatch { attempt } => {
                if let Some(contact) = &mut self.contact {
                    contact.evaluate_dispatch(dom, host, attempt);
                }
            }
        }
    }

    /// Deliver the result of a [`Host::write_clipboard`] call.
    pub fn clipboard_result(&mut self, dom: &mut D, result: Result<(), ClipboardError>) {
        if let Some(contact) = &mut self.contact {
            contact.finish_copy(dom, result);
        }
    }
}
