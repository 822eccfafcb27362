//! Shared test utilities for the unit test suite.
//!
//! Provides a stock site config with a populated gallery, a known-good
//! submission draft, and a helper that types a draft into a mounted form.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let config = sample_config();
//! let mut dom = MemoryDom::from_config(&config);
//! fill_draft(&mut dom, &complete_draft());
//! ```

use crate::config::{ContactConfig, FaqEntry, ServiceCard, SiteConfig};
use crate::dom::MemoryDom;
use crate::message::SubmissionDraft;
use crate::validate::FieldId;
use crate::viewer::GalleryImage;

// =========================================================================
// Fixtures
// =========================================================================

pub fn contact() -> ContactConfig {
    ContactConfig::default()
}

/// Stock config plus three gallery images.
pub fn sample_config() -> SiteConfig {
    SiteConfig {
        gallery: ["kitchen", "bath", "deck"]
            .iter()
            .map(|name| GalleryImage {
                src: format!("images/{name}.jpg"),
                alt: format!("Finished {name}"),
            })
            .collect(),
        ..SiteConfig::default()
    }
}

/// Sample config plus two service cards and a three-question FAQ.
pub fn disclosure_config() -> SiteConfig {
    SiteConfig {
        service_cards: ["Kitchens", "Baths"]
            .iter()
            .map(|title| ServiceCard {
                title: (*title).into(),
                summary: format!("{title} done right."),
                detail: format!("Everything about {title}."),
            })
            .collect(),
        faq: ["Insured?", "Permits?", "Warranty?"]
            .iter()
            .map(|question| FaqEntry {
                question: (*question).into(),
                answer: format!("Answer to {question}"),
            })
            .collect(),
        ..sample_config()
    }
}

/// A draft that passes every validator, with no optional fields.
pub fn complete_draft() -> SubmissionDraft {
    SubmissionDraft {
        name: "Alice Smith".into(),
        phone: "555-123-4567".into(),
        email: "alice@example.com".into(),
        address: None,
        service: "Kitchen Remodeling".into(),
        budget: None,
        start_month: None,
        message: "New cabinets and countertops please.".into(),
    }
}

// =========================================================================
// Form input
// =========================================================================

/// Type every field of `draft` into the form, as a visitor would.
pub fn fill_draft(dom: &mut MemoryDom, draft: &SubmissionDraft) {
    for id in FieldId::ALL {
        assert!(
            dom.fill(id.dom_id(), draft.value(id)),
            "no control for {id:?}"
        );
    }
}
