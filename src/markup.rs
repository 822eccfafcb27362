//! HTML for the interactive parts of the page.
//!
//! Every element the interaction layer looks up by id or class is rendered
//! here, so a page built from these fragments always satisfies the markup
//! contract in [`crate::dom::contract`]. All interpolated text is escaped by
//! Maud.
//!
//! ## Page Structure
//!
//! ```text
//! header#header
//! ├── button#navToggle            aria-expanded, aria-controls
//! └── nav#navMenu
//!     └── a.nav__link ...
//! main
//! ├── section#services            only with service cards
//! │   └── article.services__card
//! │       ├── button.services__card-toggle   aria-controls
//! │       └── div#service-detail-{n}         hidden
//! ├── section#gallery
//! │   └── figure.gallery__item > img ...
//! ├── section#faq                 only with FAQ entries
//! │   └── div.faq__item
//! │       ├── button.faq__question           aria-controls
//! │       └── div#faq-answer-{n}             hidden
//! └── section#contact
//!     └── form#contactForm
//!         ├── {field} + span#{field}Error ...
//!         ├── div#formMessage     role=status
//!         └── button#copyEmail    hidden until the fallback is offered
//! div#lightbox                    role=dialog, aria-hidden
//! ```

use crate::config::{ContactConfig, FaqEntry, FormConfig, NavLink, ServiceCard, SiteConfig};
use crate::disclosure::{self, COLLAPSED_LABEL};
use crate::dom::contract;
use crate::validate::FieldId;
use crate::viewer::GalleryImage;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Loads the `wasm-pack --target web` bundle and starts it.
const BOOTSTRAP: &str = "import init from './pkg/site_interactions.js';\ninit();";

pub fn render_page(config: &SiteConfig) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.contact.site) }
            }
            body data-focus-delay-ms=(config.timing.focus_delay_ms)
                data-dispatch-check-ms=(config.timing.dispatch_check_ms) {
                header .header id=(contract::HEADER) {
                    (render_nav(&config.nav))
                }
                main {
                    @if !config.service_cards.is_empty() {
                        section #services .section {
                            (render_service_cards(&config.service_cards))
                        }
                    }
                    section #gallery .section {
                        (render_gallery(&config.gallery))
                    }
                    @if !config.faq.is_empty() {
                        section #faq .section {
                            (render_faq(&config.faq))
                        }
                    }
                    section #contact .section {
                        (render_contact_form(&config.contact, &config.form))
                    }
                }
                (render_lightbox())
                script type="module" { (PreEscaped(BOOTSTRAP)) }
            }
        }
    }
}

/// Drawer toggle plus the drawer itself.
pub fn render_nav(links: &[NavLink]) -> Markup {
    html! {
        button .nav__toggle id=(contract::NAV_TOGGLE) type="button"
            aria-expanded="false" aria-controls=(contract::NAV_MENU) aria-label="Open menu" {
            span .nav__toggle-bar {}
            span .nav__toggle-bar {}
            span .nav__toggle-bar {}
        }
        nav .nav id=(contract::NAV_MENU) aria-label="Main navigation" {
            ul .nav__list {
                @for link in links {
                    li .nav__item {
                        a class=(contract::NAV_LINK_CLASS) href=(link.href) { (link.label) }
                    }
                }
            }
        }
    }
}

pub fn render_gallery(images: &[GalleryImage]) -> Markup {
    html! {
        div .gallery {
            @for image in images {
                figure class=(contract::GALLERY_ITEM_CLASS) {
                    img src=(image.src) alt=(image.alt) loading="lazy";
                }
            }
        }
    }
}

pub fn render_service_cards(cards: &[ServiceCard]) -> Markup {
    html! {
        div .services__grid {
            @for (i, card) in cards.iter().enumerate() {
                @let panel = disclosure::service_detail_id(i);
                article .services__card {
                    h3 .services__card-title { (card.title) }
                    p .services__card-summary { (card.summary) }
                    button class=(contract::SERVICE_TOGGLE_CLASS) type="button"
                        aria-expanded="false" aria-controls=(panel) { (COLLAPSED_LABEL) }
                    div .services__card-detail id=(panel) hidden {
                        p { (card.detail) }
                    }
                }
            }
        }
    }
}

/// Accordion of questions; every answer starts collapsed.
pub fn render_faq(entries: &[FaqEntry]) -> Markup {
    html! {
        div .faq {
            @for (i, entry) in entries.iter().enumerate() {
                @let panel = disclosure::faq_answer_id(i);
                div .faq__item {
                    button class=(contract::FAQ_QUESTION_CLASS) type="button"
                        aria-expanded="false" aria-controls=(panel) { (entry.question) }
                    div .faq__answer id=(panel) hidden {
                        p { (entry.answer) }
                    }
                }
            }
        }
    }
}

/// The image viewer, hidden until a gallery item opens it.
pub fn render_lightbox() -> Markup {
    html! {
        div .lightbox id=(contract::LIGHTBOX) role="dialog" aria-modal="true"
            aria-label="Image viewer" aria-hidden="true" {
            div .lightbox__content {
                button class=(contract::LIGHTBOX_CLOSE_CLASS) type="button" aria-label="Close image viewer" {
                    (PreEscaped("&times;"))
                }
                button class=(contract::LIGHTBOX_PREV_CLASS) type="button" aria-label="Previous image" {
                    (PreEscaped("&#8249;"))
                }
                img class=(contract::LIGHTBOX_IMAGE_CLASS) src="" alt="";
                button class=(contract::LIGHTBOX_NEXT_CLASS) type="button" aria-label="Next image" {
                    (PreEscaped("&#8250;"))
                }
            }
        }
    }
}

pub fn render_contact_form(contact: &ContactConfig, form: &FormConfig) -> Markup {
    html! {
        form .contact__form id=(contract::CONTACT_FORM) novalidate
            data-recipient=(contact.recipient) data-subject=(contact.subject) data-site=(contact.site) {
            @for field in FieldId::ALL {
                (render_field(field, form))
            }
            button class="btn btn--primary" type="submit" { "Request a quote" }
            div .contact__form-message id=(contract::FORM_MESSAGE) role="status" aria-live="polite" {}
            button id=(contract::COPY_BUTTON) class="btn btn--primary" type="button" hidden {
                "Copy email content"
            }
        }
    }
}

fn render_field(field: FieldId, form: &FormConfig) -> Markup {
    let id = field.dom_id();
    let required = field.is_required();
    let control = match field {
        FieldId::Service => render_select(id, required, "Select a service", &form.services),
        FieldId::Budget => render_select(id, required, "Select a range", &form.budgets),
        FieldId::Message => html! {
            textarea id=(id) name=(id) rows="5" required[required]
                aria-describedby=[required.then(|| field.error_id())] {}
        },
        _ => {
            let kind = match field {
                FieldId::Phone => "tel",
                FieldId::Email => "email",
                FieldId::StartMonth => "month",
                _ => "text",
            };
            html! {
                input id=(id) name=(id) type=(kind) required[required]
                    aria-describedby=[required.then(|| field.error_id())];
            }
        }
    };
    html! {
        div .contact__field {
            label for=(id) {
                (field.label())
                @if required { " *" }
            }
            (control)
            @if required {
                span .contact__error id=(field.error_id()) role="alert" {}
            }
        }
    }
}

fn render_select(id: &str, required: bool, placeholder: &str, options: &[String]) -> Markup {
    html! {
        select id=(id) name=(id) required[required]
            aria-describedby=[required.then(|| format!("{id}{}", contract::ERROR_SUFFIX))] {
            option value="" { (placeholder) }
            @for choice in options {
                option value=(choice) { (choice) }
            }
        }
    }
}
