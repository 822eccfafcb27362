//! Element ids, classes and attribute names the page markup must provide.
//!
//! [`crate::markup`] renders exactly this contract and
//! [`MemoryDom::from_config`](super::MemoryDom::from_config) builds the same
//! tree headlessly.

pub const HEADER: &str = "header";
/// Added to the header once the page has scrolled past [`SCROLL_THRESHOLD`].
pub const SCROLLED_CLASS: &str = "scrolled";
/// Vertical scroll offset, in CSS pixels.
pub const SCROLL_THRESHOLD: f64 = 50.0;

pub const NAV_TOGGLE: &str = "navToggle";
pub const NAV_MENU: &str = "navMenu";
pub const NAV_LINK_CLASS: &str = "nav__link";

pub const GALLERY_ITEM_CLASS: &str = "gallery__item";
pub const LIGHTBOX: &str = "lightbox";
pub const LIGHTBOX_IMAGE_CLASS: &str = "lightbox__image";
pub const LIGHTBOX_CLOSE_CLASS: &str = "lightbox__close";
pub const LIGHTBOX_PREV_CLASS: &str = "lightbox__prev";
pub const LIGHTBOX_NEXT_CLASS: &str = "lightbox__next";

pub const SERVICE_TOGGLE_CLASS: &str = "services__card-toggle";
pub const FAQ_QUESTION_CLASS: &str = "faq__question";

pub const CONTACT_FORM: &str = "contactForm";
pub const FORM_MESSAGE: &str = "formMessage";
pub const COPY_BUTTON: &str = "copyEmail";

/// Visible state of a modal container.
pub const OPEN_CLASS: &str = "is-open";
/// Shared by invalid inputs and the error-toned status message.
pub const ERROR_CLASS: &str = "error";
pub const SUCCESS_CLASS: &str = "success";

pub const ARIA_EXPANDED: &str = "aria-expanded";
pub const ARIA_CONTROLS: &str = "aria-controls";
pub const ARIA_HIDDEN: &str = "aria-hidden";
pub const ARIA_INVALID: &str = "aria-invalid";
pub const HIDDEN: &str = "hidden";

/// Suffix appended to a field id to find its error text element.
pub const ERROR_SUFFIX: &str = "Error";

// Settings the browser build reads back from the rendered page.
pub const DATA_RECIPIENT: &str = "data-recipient";
pub const DATA_SUBJECT: &str = "data-subject";
pub const DATA_SITE: &str = "data-site";
pub const DATA_FOCUS_DELAY: &str = "data-focus-delay-ms";
pub const DATA_DISPATCH_CHECK: &str = "data-dispatch-check-ms";
