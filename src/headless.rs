//! A whole site running without a browser.
//!
//! [`HeadlessSite`] bundles a [`MemoryDom`], a [`MemoryHost`] and the mounted
//! [`Site`], and gives tests and the CLI short verbs for what a visitor does:
//! click, press a key, type, submit, wait.

use crate::config::SiteConfig;
use crate::dom::{Dom, KeyPress, MemoryDom, NodeId, contract};
use crate::host::{ComposeBehavior, MemoryHost};
use crate::site::{EventOutcome, MountError, Site, UiEvent};
use crate::validate::FieldId;
use std::time::Duration;

pub struct HeadlessSite {
    pub dom: MemoryDom,
    pub host: MemoryHost,
    pub site: Site<MemoryDom>,
}

impl HeadlessSite {
    /// Build the page for `config` and mount the site on it.
    pub fn new(config: &SiteConfig) -> Result<Self, MountError> {
        Self::with_host(config, MemoryHost::new())
    }

    pub fn with_compose(config: &SiteConfig, compose: ComposeBehavior) -> Result<Self, MountError> {
        Self::with_host(config, MemoryHost::with_compose(compose))
    }

    pub fn with_host(config: &SiteConfig, host: MemoryHost) -> Result<Self, MountError> {
        let mut dom = MemoryDom::from_config(config);
        let site = Site::mount(&mut dom, config)?;
        Ok(Self { dom, host, site })
    }

    pub fn id(&self, id: &str) -> Option<NodeId> {
        self.dom.element_by_id(id)
    }

    pub fn click(&mut self, target: NodeId) -> EventOutcome {
        self.site
            .dispatch(&mut self.dom, &mut self.host, UiEvent::Click { target })
    }

    /// Click the element with `id`. `None` if there is no such element.
    pub fn click_id(&mut self, id: &str) -> Option<EventOutcome> {
        let target = self.id(id)?;
        Some(self.click(target))
    }

    /// Press a key with focus wherever it currently is.
    pub fn press(&mut self, key: KeyPress) -> EventOutcome {
        let target = self.dom.active_element();
        self.site
            .dispatch(&mut self.dom, &mut self.host, UiEvent::KeyDown { target, key })
    }

    pub fn press_on(&mut self, target: NodeId, key: KeyPress) -> EventOutcome {
        self.site.dispatch(
            &mut self.dom,
            &mut self.host,
            UiEvent::KeyDown {
                target: Some(target),
                key,
            },
        )
    }

    /// Scroll the window to `offset_y`.
    pub fn scroll(&mut self, offset_y: f64) -> EventOutcome {
        self.site
            .dispatch(&mut self.dom, &mut self.host, UiEvent::Scroll { offset_y })
    }

    /// Type into a field and fire its input event.
    pub fn type_into(&mut self, field: FieldId, value: &str) {
        if let Some(target) = self.id(field.dom_id()) {
            self.dom.set_value(target, value);
            self.site
                .dispatch(&mut self.dom, &mut self.host, UiEvent::Input { target });
        }
    }

    /// Fire a field's blur event.
    pub fn blur(&mut self, field: FieldId) {
        if let Some(target) = self.id(field.dom_id()) {
            self.site
                .dispatch(&mut self.dom, &mut self.host, UiEvent::Blur { target });
        }
    }

    /// Fill a field without firing events.
    pub fn fill(&mut self, field: FieldId, value: &str) {
        self.dom.fill(field.dom_id(), value);
    }

    pub fn submit(&mut self) -> EventOutcome {
        match self.id(contract::CONTACT_FORM) {
            Some(form) => self
                .site
                .dispatch(&mut self.dom, &mut self.host, UiEvent::Submit { form }),
            None => EventOutcome::Continue,
        }
    }

    /// Let `ms` milliseconds pass, running every task that falls due and
    /// delivering clipboard results.
    pub fn advance(&mut self, ms: u64) {
        for task in self.host.advance(Duration::from_millis(ms)) {
            self.site.run_task(&mut self.dom, &self.host, task);
        }
        self.flush_clipboard();
    }

    pub fn flush_clipboard(&mut self) {
        for result in self.host.take_clipboard_results() {
            self.site.clipboard_result(&mut self.dom, result);
        }
    }

    /// Text of the status line.
    pub fn status(&self) -> &str {
        self.id(contract::FORM_MESSAGE)
            .map(|node| self.dom.text(node))
            .unwrap_or_default()
    }

    pub fn status_has_class(&self, class: &str) -> bool {
        self.id(contract::FORM_MESSAGE)
            .is_some_and(|node| self.dom.has_class(&node, class))
    }

    /// Text of a field's error element.
    pub fn error_text(&self, field: FieldId) -> &str {
        self.id(field.error_id())
            .map(|node| self.dom.text(node))
            .unwrap_or_default()
    }

    pub fn gallery_items(&self) -> Vec<NodeId> {
        self.dom
            .descendants_with_class(&self.dom.body(), contract::GALLERY_ITEM_CLASS)
    }
}
