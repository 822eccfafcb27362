//! Headless in-memory document.
//!
//! A small element tree with attributes, classes, text, form values and a
//! focus cursor. It implements [`Dom`] with the same semantics the browser
//! gives the interaction layer, which lets the whole site run without a
//! browser: unit and integration tests drive it, and the CLI mounts it to
//! check a config against the markup contract.

use super::Dom;
use super::contract;
use crate::config::SiteConfig;
use crate::disclosure;
use crate::validate::FieldId;
use std::collections::BTreeMap;

/// Index of an element in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    value: String,
    initial_value: String,
}

#[derive(Debug, Clone)]
pub struct MemoryDom {
    elements: Vec<Element>,
    focused: Option<NodeId>,
    focus_history: Vec<NodeId>,
    scroll_locked: bool,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty document containing only `<body>`.
    pub fn new() -> Self {
        Self {
            elements: vec![Element {
                tag: "body".to_string(),
                ..Element::default()
            }],
            focused: None,
            focus_history: Vec::new(),
            scroll_locked: false,
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new `<tag>` under `parent` and return a builder for it.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> ElementBuilder<'_> {
        let node = NodeId(self.elements.len());
        self.elements.push(Element {
            tag: tag.to_string(),
            parent: Some(parent),
            ..Element::default()
        });
        if let Some(p) = self.elements.get_mut(parent.0) {
            p.children.push(node);
        }
        ElementBuilder { dom: self, node }
    }

    /// Simulate the user typing into a control.
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(el) = self.elements.get_mut(node.0) {
            el.value = value.to_string();
        }
    }

    /// Set a control's value by element id. Returns `false` if no such element.
    pub fn fill(&mut self, id: &str, value: &str) -> bool {
        match self.element_by_id(id) {
            Some(node) => {
                self.set_value(node, value);
                true
            }
            None => false,
        }
    }

    pub fn text(&self, node: NodeId) -> &str {
        self.elements
            .get(node.0)
            .map(|el| el.text.as_str())
            .unwrap_or_default()
    }

    pub fn tag(&self, node: NodeId) -> &str {
        self.elements
            .get(node.0)
            .map(|el| el.tag.as_str())
            .unwrap_or_default()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Every element that received focus, oldest first.
    pub fn focus_history(&self) -> &[NodeId] {
        &self.focus_history
    }

    /// Move focus without going through [`Dom::focus`] bookkeeping, as a
    /// mouse click or the browser's own tab handling would.
    pub fn place_focus(&mut self, node: Option<NodeId>) {
        self.focused = node;
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0)
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.elements.get_mut(node.0)
    }

    /// Pre-order walk of the descendants of `root`, excluding `root`.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.element(root) {
            Some(el) => el.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(node) = stack.pop() {
            out.push(node);
            if let Some(el) = self.element(node) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    fn is_focusable(el: &Element) -> bool {
        let disabled = el.attributes.contains_key("disabled");
        let tag_focusable = match el.tag.as_str() {
            "a" => el.attributes.contains_key("href"),
            "button" | "input" | "select" | "textarea" => !disabled,
            _ => false,
        };
        // Same test as `FOCUSABLE_SELECTOR`: the attribute value is compared
        // as text, not parsed.
        let tabindex_focusable = el
            .attributes
            .get("tabindex")
            .is_some_and(|t| t != "-1");
        tag_focusable || tabindex_focusable
    }

    /// Build the document that [`crate::markup::render_page`] renders for
    /// `config`.
    pub fn from_config(config: &SiteConfig) -> Self {
        let mut dom = Self::new();
        let body = dom.body();
        dom.set_attribute(
            &body,
            contract::DATA_FOCUS_DELAY,
            &config.timing.focus_delay_ms.to_string(),
        );
        dom.set_attribute(
            &body,
            contract::DATA_DISPATCH_CHECK,
            &config.timing.dispatch_check_ms.to_string(),
        );

        let header = dom.append(body, "header").id(contract::HEADER).node();
        dom.append(header, "button")
            .id(contract::NAV_TOGGLE)
            .class("nav__toggle")
            .attr("type", "button")
            .attr(contract::ARIA_EXPANDED, "false")
            .attr(contract::ARIA_CONTROLS, contract::NAV_MENU)
            .node();
        let menu = dom
            .append(header, "nav")
            .id(contract::NAV_MENU)
            .class("nav")
            .node();
        let list = dom.append(menu, "ul").class("nav__list").node();
        for link in &config.nav {
            let item = dom.append(list, "li").class("nav__item").node();
            dom.append(item, "a")
                .class(contract::NAV_LINK_CLASS)
                .attr("href", &link.href)
                .text(&link.label)
                .node();
        }

        if !config.service_cards.is_empty() {
            let section = dom.append(body, "section").id("services").node();
            for (i, card) in config.service_cards.iter().enumerate() {
                let panel = disclosure::service_detail_id(i);
                let article = dom.append(section, "article").class("services__card").node();
                dom.append(article, "h3").text(&card.title).node();
                dom.append(article, "button")
                    .class(contract::SERVICE_TOGGLE_CLASS)
                    .attr("type", "button")
                    .attr(contract::ARIA_EXPANDED, "false")
                    .attr(contract::ARIA_CONTROLS, &panel)
                    .text(disclosure::COLLAPSED_LABEL)
                    .node();
                dom.append(article, "div")
                    .id(&panel)
                    .class("services__card-detail")
                    .attr(contract::HIDDEN, "")
                    .text(&card.detail)
                    .node();
            }
        }

        let gallery = dom.append(body, "div").class("gallery").node();
        for image in &config.gallery {
            let item = dom
                .append(gallery, "figure")
                .class(contract::GALLERY_ITEM_CLASS)
                .node();
            dom.append(item, "img")
                .attr("src", &image.src)
                .attr("alt", &image.alt)
                .node();
        }

        if !config.faq.is_empty() {
            let section = dom.append(body, "section").id("faq").node();
            for (i, entry) in config.faq.iter().enumerate() {
                let panel = disclosure::faq_answer_id(i);
                let item = dom.append(section, "div").class("faq__item").node();
                dom.append(item, "button")
                    .class(contract::FAQ_QUESTION_CLASS)
                    .attr("type", "button")
                    .attr(contract::ARIA_EXPANDED, "false")
                    .attr(contract::ARIA_CONTROLS, &panel)
                    .text(&entry.question)
                    .node();
                dom.append(item, "div")
                    .id(&panel)
                    .class("faq__answer")
                    .attr(contract::HIDDEN, "")
                    .text(&entry.answer)
                    .node();
            }
        }

        let lightbox = dom
            .append(body, "div")
            .id(contract::LIGHTBOX)
            .class("lightbox")
            .attr("role", "dialog")
            .attr("aria-modal", "true")
            .attr(contract::ARIA_HIDDEN, "true")
            .node();
        let panel = dom.append(lightbox, "div").class("lightbox__content").node();
        dom.append(panel, "button")
            .class(contract::LIGHTBOX_CLOSE_CLASS)
            .attr("type", "button")
            .attr("aria-label", "Close image viewer")
            .node();
        dom.append(panel, "button")
            .class(contract::LIGHTBOX_PREV_CLASS)
            .attr("type", "button")
            .attr("aria-label", "Previous image")
            .node();
        dom.append(panel, "img")
            .class(contract::LIGHTBOX_IMAGE_CLASS)
            .attr("src", "")
            .attr("alt", "")
            .node();
        dom.append(panel, "button")
            .class(contract::LIGHTBOX_NEXT_CLASS)
            .attr("type", "button")
            .attr("aria-label", "Next image")
            .node();

        let form = dom
            .append(body, "form")
            .id(contract::CONTACT_FORM)
            .attr("novalidate", "")
            .attr(contract::DATA_RECIPIENT, &config.contact.recipient)
            .attr(contract::DATA_SUBJECT, &config.contact.subject)
            .attr(contract::DATA_SITE, &config.contact.site)
            .node();
        for field in FieldId::ALL {
            let tag = match field {
                FieldId::Service | FieldId::Budget => "select",
                FieldId::Message => "textarea",
                _ => "input",
            };
            dom.append(form, tag)
                .id(field.dom_id())
                .attr("name", field.dom_id())
                .node();
            if field.is_required() {
                dom.append(form, "span")
                    .id(field.error_id())
                    .class("contact__error")
                    .attr("role", "alert")
                    .node();
            }
        }
        dom.append(form, "button").attr("type", "submit").node();
        dom.append(form, "div")
            .id(contract::FORM_MESSAGE)
            .class("contact__form-message")
            .attr("role", "status")
            .node();
        dom.append(form, "button")
            .id(contract::COPY_BUTTON)
            .class("btn")
            .class("btn--primary")
            .attr("type", "button")
            .attr(contract::HIDDEN, "")
            .text("Copy email content")
            .node();

        dom
    }
}

/// Fluent setter chain returned by [`MemoryDom::append`].
pub struct ElementBuilder<'a> {
    dom: &'a mut MemoryDom,
    node: NodeId,
}

impl ElementBuilder<'_> {
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: &str) -> Self {
        self.dom.add_class(&self.node, class);
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.dom.set_attribute(&self.node, name, value);
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.dom.set_text(&self.node, text);
        self
    }

    /// Initial value, restored by [`Dom::reset_form`].
    pub fn value(self, value: &str) -> Self {
        if let Some(el) = self.dom.element_mut(self.node) {
            el.value = value.to_string();
            el.initial_value = value.to_string();
        }
        self
    }

    pub fn node(self) -> NodeId {
        self.node
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn document_body(&self) -> Option<NodeId> {
        Some(self.body())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .position(|el| el.attributes.get("id").is_some_and(|v| v == id))
            .map(NodeId)
    }

    fn descendants_with_class(&self, root: &NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(*root)
            .into_iter()
            .filter(|n| self.has_class(n, class))
            .collect()
    }

    fn first_descendant_with_tag(&self, root: &NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(*root)
            .into_iter()
            .find(|n| self.element(*n).is_some_and(|el| el.tag == tag))
    }

    fn focusable_descendants(&self, container: &NodeId) -> Vec<NodeId> {
        self.descendants(*container)
            .into_iter()
            .filter(|n| self.element(*n).is_some_and(Self::is_focusable))
            .collect()
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut cursor = Some(*node);
        while let Some(current) = cursor {
            if current == *ancestor {
                return true;
            }
            cursor = self.element(current).and_then(|el| el.parent);
        }
        false
    }

    fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    fn focus(&mut self, node: &NodeId) {
        if self.element(*node).is_some() {
            self.focused = Some(*node);
            self.focus_history.push(*node);
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.element(*node)
            .and_then(|el| el.attributes.get(name).cloned())
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(*node) {
            el.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        if let Some(el) = self.element_mut(*node) {
            el.attributes.remove(name);
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.element(*node)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if let Some(el) = self.element_mut(*node)
            && !el.classes.iter().any(|c| c == class)
        {
            el.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        if let Some(el) = self.element_mut(*node) {
            el.classes.retain(|c| c != class);
        }
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        if let Some(el) = self.element_mut(*node) {
            el.text = text.to_string();
        }
    }

    fn value(&self, node: &NodeId) -> String {
        self.element(*node)
            .filter(|el| matches!(el.tag.as_str(), "input" | "select" | "textarea"))
            .map(|el| el.value.clone())
            .unwrap_or_default()
    }

    fn reset_form(&mut self, form: &NodeId) {
        for node in self.descendants(*form) {
            if let Some(el) = self.element_mut(node)
                && matches!(el.tag.as_str(), "input" | "select" | "textarea")
            {
                el.value = el.initial_value.clone();
            }
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focusable_predicate_matches_selector_semantics() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let link = dom.append(body, "a").attr("href", "#top").node();
        dom.append(body, "a").node(); // no href
        let button = dom.append(body, "button").node();
        dom.append(body, "button").attr("disabled", "").node();
        let div = dom.append(body, "div").attr("tabindex", "0").node();
        dom.append(body, "div").attr("tabindex", "-1").node();
        let input = dom.append(body, "input").node();

        assert_eq!(
            dom.focusable_descendants(&body),
            vec![link, button, div, input]
        );
    }

    #[test]
    fn tabindex_compared_as_text_like_the_selector() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let odd = dom.append(body, "span").attr("tabindex", "x").node();
        let minus_two = dom.append(body, "span").attr("tabindex", "-2").node();
        dom.append(body, "span").attr("tabindex", "-1").node();

        assert_eq!(dom.focusable_descendants(&body), vec![odd, minus_two]);
        assert!(crate::dom::FOCUSABLE_SELECTOR.ends_with(r#"[tabindex]:not([tabindex="-1"])"#));
    }

    #[test]
    fn descendants_are_in_document_order() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let outer = dom.append(body, "div").class("x").node();
        let inner = dom.append(outer, "span").class("x").node();
        let sibling = dom.append(body, "p").class("x").node();

        assert_eq!(
            dom.descendants_with_class(&body, "x"),
            vec![outer, inner, sibling]
        );
    }

    #[test]
    fn contains_is_inclusive() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let outer = dom.append(body, "div").node();
        let inner = dom.append(outer, "span").node();
        let other = dom.append(body, "div").node();

        assert!(dom.contains(&outer, &outer));
        assert!(dom.contains(&outer, &inner));
        assert!(!dom.contains(&outer, &other));
        assert!(!dom.contains(&inner, &outer));
    }

    #[test]
    fn reset_form_restores_initial_values() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let form = dom.append(body, "form").node();
        let input = dom.append(form, "input").value("preset").node();
        let area = dom.append(form, "textarea").node();

        dom.set_value(input, "typed");
        dom.set_value(area, "typed too");
        dom.reset_form(&form);

        assert_eq!(dom.value(&input), "preset");
        assert_eq!(dom.value(&area), "");
    }

    #[test]
    fn value_is_empty_for_non_controls() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let div = dom.append(body, "div").node();
        dom.set_value(div, "ignored");
        assert_eq!(dom.value(&div), "");
    }

    #[test]
    fn class_add_is_deduplicated() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let div = dom.append(body, "div").class("a").node();
        dom.add_class(&div, "a");
        dom.remove_class(&div, "a");
        assert!(!dom.has_class(&div, "a"));
    }

    #[test]
    fn from_config_builds_contract_elements() {
        let dom = MemoryDom::from_config(&SiteConfig::default());
        for id in [
            contract::NAV_TOGGLE,
            contract::NAV_MENU,
            contract::LIGHTBOX,
            contract::CONTACT_FORM,
            contract::FORM_MESSAGE,
            contract::COPY_BUTTON,
        ] {
            assert!(dom.element_by_id(id).is_some(), "missing #{id}");
        }
        for field in FieldId::REQUIRED {
            assert!(dom.element_by_id(field.dom_id()).is_some());
            assert!(dom.element_by_id(field.error_id()).is_some());
        }
    }
}
