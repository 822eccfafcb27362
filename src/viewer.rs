//! Gallery lightbox: a modal with an ordered image list and a wrapping cursor.

use crate::dom::{Dom, Key, KeyOutcome, KeyPress, contract};
use crate::host::Host;
use crate::modal::{InitialFocus, ModalController, ModalKind, ModalSpec, ReturnFocus};
use crate::site::MountError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One gallery entry, as read from the markup or declared in config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
}

/// `(i + 1) mod n`, or `None` for an empty list.
pub fn next_index(current: usize, len: usize) -> Option<usize> {
    (len > 0).then(|| (current + 1) % len)
}

/// `(i - 1 + n) mod n`, or `None` for an empty list.
pub fn prev_index(current: usize, len: usize) -> Option<usize> {
    (len > 0).then(|| (current % len + len - 1) % len)
}

pub struct ImageViewer<D: Dom> {
    modal: ModalController<D>,
    items: Vec<GalleryImage>,
    item_nodes: Vec<D::Node>,
    current: usize,
    image: D::Node,
    close_button: D::Node,
    prev_button: Option<D::Node>,
    next_button: Option<D::Node>,
}

impl<D: Dom> ImageViewer<D> {
    /// Wire the lightbox to the gallery items on the page.
    ///
    /// Returns `Ok(None)` when the page has no lightbox. Gallery items are
    /// made keyboard reachable (`tabindex`, `role`, `aria-label`).
    pub fn mount(dom: &mut D, focus_delay: Duration) -> Result<Option<Self>, MountError> {
        let Some(lightbox) = dom.element_by_id(contract::LIGHTBOX) else {
            return Ok(None);
        };
        let image = dom
            .first_descendant_with_class(&lightbox, contract::LIGHTBOX_IMAGE_CLASS)
            .ok_or(MountError::MissingClass(contract::LIGHTBOX_IMAGE_CLASS))?;
        let close_button = dom
            .first_descendant_with_class(&lightbox, contract::LIGHTBOX_CLOSE_CLASS)
            .ok_or(MountError::MissingClass(contract::LIGHTBOX_CLOSE_CLASS))?;
        let prev_button = dom.first_descendant_with_class(&lightbox, contract::LIGHTBOX_PREV_CLASS);
        let next_button = dom.first_descendant_with_class(&lightbox, contract::LIGHTBOX_NEXT_CLASS);

        let roots: Vec<D::Node> = match dom.document_body() {
            Some(body) => dom
                .descendants_with_class(&body, contract::GALLERY_ITEM_CLASS)
                .into_iter()
                .filter(|node| !dom.contains(&lightbox, node))
                .collect(),
            None => Vec::new(),
        };

        let mut items = Vec::new();
        let mut item_nodes = Vec::new();
        for node in roots {
            let Some(img) = dom.first_descendant_with_tag(&node, "img") else {
                tracing::warn!("gallery item without an image skipped");
                continue;
            };
            let entry = GalleryImage {
                src: dom.attribute(&img, "src").unwrap_or_default(),
                alt: dom.attribute(&img, "alt").unwrap_or_default(),
            };
            dom.set_attribute(&node, "tabindex", "0");
            dom.set_attribute(&node, "role", "button");
            dom.set_attribute(&node, "aria-label", &format!("View image: {}", entry.alt));
            items.push(entry);
            item_nodes.push(node);
        }

        let modal = ModalController::new(ModalSpec {
            kind: ModalKind::Viewer,
            container: lightbox,
            trigger: None,
            toggles_aria_hidden: true,
            initial_focus: InitialFocus::Node(close_button.clone()),
            return_focus: ReturnFocus::Opener,
            focus_delay,
        });

        Ok(Some(Self {
            modal,
            items,
            item_nodes,
            current: 0,
            image,
            close_button,
            prev_button,
            next_button,
        }))
    }

    pub fn items(&self) -> &[GalleryImage] {
        &self.items
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&GalleryImage> {
        self.items.get(self.current)
    }

    pub fn modal(&self) -> &ModalController<D> {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut ModalController<D> {
        &mut self.modal
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    /// Index of the gallery item containing `target`.
    pub fn item_index(&self, dom: &D, target: &D::Node) -> Option<usize> {
        self.item_nodes
            .iter()
            .position(|node| dom.contains(node, target))
    }

    /// Show image `index` and open the modal. Out-of-range indices are ignored.
    pub fn open<H: Host + ?Sized>(&mut self, dom: &mut D, host: &mut H, index: usize) {
        if index >= self.items.len() {
            tracing::warn!(index, len = self.items.len(), "viewer index out of range");
            return;
        }
        self.current = index;
        self.show(dom);
        self.modal.open(dom, host);
    }

    pub fn close(&mut self, dom: &mut D) {
        self.modal.close(dom);
    }

    pub fn next(&mut self, dom: &mut D) {
        if let Some(i) = next_index(self.current, self.items.len()) {
            self.current = i;
            self.show(dom);
        }
    }

    pub fn prev(&mut self, dom: &mut D) {
        if let Some(i) = prev_index(self.current, self.items.len()) {
            self.current = i;
            self.show(dom);
        }
    }

    fn show(&self, dom: &mut D) {
        if let Some(item) = self.items.get(self.current) {
            dom.set_attribute(&self.image, "src", &item.src);
            dom.set_attribute(&self.image, "alt", &item.alt);
        }
    }

    /// Arrow keys and Escape while open. The trap handles Tab separately.
    pub fn handle_key(&mut self, dom: &mut D, key: &KeyPress) -> KeyOutcome {
        if !self.is_open() {
            return KeyOutcome::PassThrough;
        }
        match key.key {
            Key::Escape => self.close(dom),
            Key::ArrowLeft => self.prev(dom),
            Key::ArrowRight => self.next(dom),
            _ => return KeyOutcome::PassThrough,
        }
        KeyOutcome::Consumed
    }

    /// `Enter` or `Space` on a gallery item opens it.
    pub fn handle_item_key<H: Host + ?Sized>(
        &mut self,
        dom: &mut D,
        host: &mut H,
        target: &D::Node,
        key: &KeyPress,
    ) -> KeyOutcome {
        if !matches!(key.key, Key::Enter | Key::Space) {
            return KeyOutcome::PassThrough;
        }
        match self.item_index(dom, target) {
            Some(index) => {
                self.open(dom, host, index);
                KeyOutcome::Consumed
            }
            None => KeyOutcome::PassThrough,
        }
    }

    /// Route a click. Returns `true` if the viewer acted on it.
    pub fn handle_click<H: Host + ?Sized>(&mut self, dom: &mut D, host: &mut H, target: &D::Node) -> bool {
        if let Some(index) = self.item_index(dom, target) {
            self.open(dom, host, index);
            return true;
        }
        if !self.is_open() {
            return false;
        }
        if dom.contains(&self.close_button, target) {
            self.close(dom);
        } else if self.prev_button.as_ref().is_some_and(|b| dom.contains(b, target)) {
            self.prev(dom);
        } else if self.next_button.as_ref().is_some_and(|b| dom.contains(b, target)) {
            self.next(dom);
        } else if target == self.modal.container() {
            // backdrop
            self.close(dom);
        } else {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wraparound_at_both_ends() {
        assert_eq!(next_index(2, 3), Some(0));
        assert_eq!(prev_index(0, 3), Some(2));
        assert_eq!(next_index(0, 1), Some(0));
        assert_eq!(prev_index(0, 1), Some(0));
    }

    #[test]
    fn empty_list_has_no_neighbours() {
        assert_eq!(next_index(0, 0), None);
        assert_eq!(prev_index(0, 0), None);
    }

    proptest! {
        #[test]
        fn next_and_prev_are_inverse(len in 1usize..64, seed in 0usize..64) {
            let i = seed % len;
            let n = next_index(i, len).unwrap();
            let p = prev_index(i, len).unwrap();
            prop_assert!(n < len && p < len);
            prop_assert_eq!(prev_index(n, len), Some(i));
            prop_assert_eq!(next_index(p, len), Some(i));
        }
    }
}
