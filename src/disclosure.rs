//! Show/hide panels driven by a toggle button.
//!
//! A toggle names its panel through `aria-controls`. Its `aria-expanded`
//! and the panel's `hidden` attribute are the whole state; nothing is
//! mirrored here. Two flavours are mounted by [`crate::site::Site`]:
//!
//! - service cards: each toggle independent, label swaps between
//!   "Learn more" and "Show less";
//! - the FAQ: an accordion where expanding one question collapses the rest.

use crate::dom::{Dom, contract};

pub const COLLAPSED_LABEL: &str = "Learn more";
pub const EXPANDED_LABEL: &str = "Show less";

/// Id of the detail panel of the `index`th service card.
pub fn service_detail_id(index: usize) -> String {
    format!("service-detail-{index}")
}

/// Id of the answer panel of the `index`th FAQ entry.
pub fn faq_answer_id(index: usize) -> String {
    format!("faq-answer-{index}")
}

/// How toggles in one group relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Each toggle is independent and relabels itself.
    Independent {
        collapsed: &'static str,
        expanded: &'static str,
    },
    /// At most one panel is expanded at a time.
    Exclusive,
}

struct Panel<N> {
    toggle: N,
    target: N,
}

pub struct DisclosureGroup<D: Dom> {
    kind: GroupKind,
    panels: Vec<Panel<D::Node>>,
}

impl<D: Dom> DisclosureGroup<D> {
    /// Bind every element with `toggle_class` to the panel its
    /// `aria-controls` names. Toggles whose panel is missing are skipped.
    pub fn mount(dom: &D, toggle_class: &'static str, kind: GroupKind) -> Self {
        let toggles = match dom.document_body() {
            Some(body) => dom.descendants_with_class(&body, toggle_class),
            None => Vec::new(),
        };
        let panels = toggles
            .into_iter()
            .filter_map(|toggle| {
                let Some(id) = dom.attribute(&toggle, contract::ARIA_CONTROLS) else {
                    tracing::warn!(class = toggle_class, "toggle without aria-controls skipped");
                    return None;
                };
                match dom.element_by_id(&id) {
                    Some(target) => Some(Panel { toggle, target }),
                    None => {
                        tracing::warn!(id = %id, "toggle controls a missing element, skipped");
                        None
                    }
                }
            })
            .collect();
        Self { kind, panels }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn toggle(&self, index: usize) -> Option<&D::Node> {
        self.panels.get(index).map(|p| &p.toggle)
    }

    pub fn is_expanded(&self, dom: &D, index: usize) -> bool {
        self.panels.get(index).is_some_and(|p| {
            dom.attribute(&p.toggle, contract::ARIA_EXPANDED)
                .is_some_and(|v| v == "true")
        })
    }

    fn set_expanded(&self, dom: &mut D, index: usize, expanded: bool) {
        let Some(panel) = self.panels.get(index) else {
            return;
        };
        dom.set_attribute(
            &panel.toggle,
            contract::ARIA_EXPANDED,
            if expanded { "true" } else { "false" },
        );
        if expanded {
            dom.remove_attribute(&panel.target, contract::HIDDEN);
        } else {
            dom.set_attribute(&panel.target, contract::HIDDEN, "");
        }
        if let GroupKind::Independent { collapsed, expanded: open } = self.kind {
            dom.set_text(&panel.toggle, if expanded { open } else { collapsed });
        }
    }

    /// Flip panel `index`, collapsing its siblings first in an exclusive
    /// group.
    pub fn flip(&self, dom: &mut D, index: usize) {
        let expand = !self.is_expanded(dom, index);
        if self.kind == GroupKind::Exclusive {
            for other in (0..self.panels.len()).filter(|i| *i != index) {
                self.set_expanded(dom, other, false);
            }
        }
        self.set_expanded(dom, index, expand);
    }

    /// Route a click. Returns `true` if it landed on one of the toggles.
    pub fn handle_click(&self, dom: &mut D, target: &D::Node) -> bool {
        let Some(index) = self
            .panels
            .iter()
            .position(|p| dom.contains(&p.toggle, target))
        else {
            return false;
        };
        self.flip(dom, index);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDom, NodeId};

    const CLASS: &str = "toggle";

    fn page(n: usize, expanded_at: Option<usize>) -> (MemoryDom, Vec<NodeId>, Vec<NodeId>) {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let mut toggles = Vec::new();
        let mut panels = Vec::new();
        for i in 0..n {
            let open = expanded_at == Some(i);
            toggles.push(
                dom.append(body, "button")
                    .class(CLASS)
                    .attr(contract::ARIA_EXPANDED, if open { "true" } else { "false" })
                    .attr(contract::ARIA_CONTROLS, &format!("panel-{i}"))
                    .text(COLLAPSED_LABEL)
                    .node(),
            );
            let panel = dom.append(body, "div").id(&format!("panel-{i}"));
            let panel = if open { panel } else { panel.attr(contract::HIDDEN, "") };
            panels.push(panel.node());
        }
        (dom, toggles, panels)
    }

    fn independent() -> GroupKind {
        GroupKind::Independent {
            collapsed: COLLAPSED_LABEL,
            expanded: EXPANDED_LABEL,
        }
    }

    fn hidden(dom: &MemoryDom, node: NodeId) -> bool {
        dom.attribute(&node, contract::HIDDEN).is_some()
    }

    #[test]
    fn independent_toggle_expands_and_relabels() {
        let (mut dom, toggles, panels) = page(2, None);
        let group = DisclosureGroup::mount(&dom, CLASS, independent());

        assert!(group.handle_click(&mut dom, &toggles[0]));
        assert!(group.is_expanded(&dom, 0));
        assert!(!hidden(&dom, panels[0]));
        assert_eq!(dom.text(toggles[0]), EXPANDED_LABEL);

        group.handle_click(&mut dom, &toggles[1]);
        assert!(group.is_expanded(&dom, 0), "siblings stay open");

        group.handle_click(&mut dom, &toggles[0]);
        assert!(!group.is_expanded(&dom, 0));
        assert!(hidden(&dom, panels[0]));
        assert_eq!(dom.text(toggles[0]), COLLAPSED_LABEL);
    }

    #[test]
    fn exclusive_group_collapses_the_others() {
        let (mut dom, toggles, panels) = page(3, Some(0));
        let group = DisclosureGroup::mount(&dom, CLASS, GroupKind::Exclusive);

        group.handle_click(&mut dom, &toggles[2]);
        assert!(!group.is_expanded(&dom, 0));
        assert!(hidden(&dom, panels[0]));
        assert!(group.is_expanded(&dom, 2));
        assert!(!hidden(&dom, panels[2]));
        // accordion questions keep their own text
        assert_eq!(dom.text(toggles[2]), COLLAPSED_LABEL);

        group.handle_click(&mut dom, &toggles[2]);
        assert!((0..3).all(|i| !group.is_expanded(&dom, i)));
    }

    #[test]
    fn reads_state_from_markup() {
        let (mut dom, toggles, panels) = page(1, None);
        let group = DisclosureGroup::mount(&dom, CLASS, GroupKind::Exclusive);

        // Changed behind the group's back.
        dom.set_attribute(&toggles[0], contract::ARIA_EXPANDED, "true");
        dom.remove_attribute(&panels[0], contract::HIDDEN);
        group.handle_click(&mut dom, &toggles[0]);
        assert!(hidden(&dom, panels[0]));
    }

    #[test]
    fn toggles_without_panels_are_skipped() {
        let (mut dom, _, _) = page(1, None);
        let body = dom.body();
        dom.append(body, "button").class(CLASS).node();
        dom.append(body, "button")
            .class(CLASS)
            .attr(contract::ARIA_CONTROLS, "nowhere")
            .node();
        let group = DisclosureGroup::<MemoryDom>::mount(&dom, CLASS, GroupKind::Exclusive);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn clicks_elsewhere_are_ignored() {
        let (mut dom, _, panels) = page(2, None);
        let group = DisclosureGroup::mount(&dom, CLASS, GroupKind::Exclusive);
        assert!(!group.handle_click(&mut dom, &panels[1]));
        assert!(hidden(&dom, panels[1]));
    }
}
