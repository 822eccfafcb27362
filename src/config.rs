//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user `config.toml` in the site root overrides them
//! key by key.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [contact]
//! recipient = "quotes@example.com"  # Address the mailto: handoff targets
//! subject = "New Quote Request"     # Subject line of the composed message
//! site = "example.com"              # Shown in the "Submitted from" footer
//!
//! [timing]
//! focus_delay_ms = 100              # Delay before focus moves into a modal
//! dispatch_check_ms = 500           # Delay before the compose context is probed
//!
//! [form]
//! services = ["Kitchen Remodeling", "Bathroom Remodeling", ...]
//! budgets = ["Under $10,000", ...]
//!
//! [[nav]]
//! label = "Services"
//! href = "#services"
//!
//! [[gallery]]
//! src = "images/kitchen.jpg"
//! alt = "Remodeled kitchen"
//!
//! [[service_cards]]
//! title = "Kitchen Remodeling"
//! summary = "Cabinets, counters, layout."
//! detail = "Shown after 'Learn more'."
//!
//! [[faq]]
//! question = "Do you offer free estimates?"
//! answer = "Yes."
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [contact]
//! recipient = "hello@myreno.com"
//! ```
//!
//! Arrays (`services`, `nav`, `gallery`, `service_cards`, `faq`) replace the default list as a whole.
//! Unknown keys are rejected to catch typos early.

use crate::dom::{Dom, contract};
use crate::viewer::GalleryImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Where composed messages go and how they are labelled.
    pub contact: ContactConfig,
    /// Deferred-work delays.
    pub timing: TimingConfig,
    /// Options offered by the contact form's selects.
    pub form: FormConfig,
    /// Drawer links, in order.
    pub nav: Vec<NavLink>,
    /// Gallery images, in order.
    pub gallery: Vec<GalleryImage>,
    /// Service cards with an expandable detail panel.
    pub service_cards: Vec<ServiceCard>,
    /// Questions of the FAQ accordion.
    pub faq: Vec<FaqEntry>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            contact: ContactConfig::default(),
            timing: TimingConfig::default(),
            form: FormConfig::default(),
            nav: default_nav(),
            gallery: Vec::new(),
            service_cards: Vec::new(),
            faq: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.contact.recipient.contains('@') {
            return Err(ConfigError::Validation(format!(
                "contact.recipient must be an email address, got {:?}",
                self.contact.recipient
            )));
        }
        if self.timing.dispatch_check_ms == 0 {
            return Err(ConfigError::Validation(
                "timing.dispatch_check_ms must be greater than 0".into(),
            ));
        }
        if self.form.services.is_empty() {
            return Err(ConfigError::Validation(
                "form.services must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    pub recipient: String,
    pub subject: String,
    pub site: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: "quotes@example.com".to_string(),
            subject: "New Quote Request".to_string(),
            site: "example.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Delay between opening a modal and moving focus into it.
    pub focus_delay_ms: u64,
    /// Delay between the mail-client handoff and probing its context.
    pub dispatch_check_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            focus_delay_ms: 100,
            dispatch_check_ms: 500,
        }
    }
}

impl TimingConfig {
    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    pub fn dispatch_check(&self) -> Duration {
        Duration::from_millis(self.dispatch_check_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    pub services: Vec<String>,
    pub budgets: Vec<String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            services: [
                "Kitchen Remodeling",
                "Bathroom Remodeling",
                "Basement Finishing",
                "Decks & Outdoor",
                "General Repairs",
                "Other",
            ]
            .map(String::from)
            .to_vec(),
            budgets: [
                "Under $10,000",
                "$10,000 - $25,000",
                "$25,000 - $50,000",
                "$50,000+",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// One drawer link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

/// A service card; `detail` stays hidden until the card is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceCard {
    pub title: String,
    pub summary: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Links used when the config names none.
pub fn default_nav() -> Vec<NavLink> {
    vec![
        NavLink::new("Services", "#services"),
        NavLink::new("Gallery", "#gallery"),
        NavLink::new("About", "#about"),
        NavLink::new("Contact", "#contact"),
    ]
}

// =============================================================================
// Settings carried on the page
// =============================================================================

/// Read back the contact and timing settings the page was rendered with.
///
/// The browser build has no filesystem; [`crate::markup`] writes these as
/// `data-*` attributes and this picks them up. Anything missing or
/// unparsable keeps its default.
pub fn page_settings<D: Dom>(dom: &D) -> SiteConfig {
    let mut config = SiteConfig::default();
    if let Some(form) = dom.element_by_id(contract::CONTACT_FORM) {
        let contact = &mut config.contact;
        for (attr, slot) in [
            (contract::DATA_RECIPIENT, &mut contact.recipient),
            (contract::DATA_SUBJECT, &mut contact.subject),
            (contract::DATA_SITE, &mut contact.site),
        ] {
            if let Some(value) = dom.attribute(&form, attr) {
                *slot = value;
            }
        }
    }
    if let Some(body) = dom.document_body() {
        let timing = &mut config.timing;
        for (attr, slot) in [
            (contract::DATA_FOCUS_DELAY, &mut timing.focus_delay_ms),
            (contract::DATA_DISPATCH_CHECK, &mut timing.dispatch_check_ms),
        ] {
            let Some(raw) = dom.attribute(&body, attr) else {
                continue;
            };
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 || attr == contract::DATA_FOCUS_DELAY => *slot = ms,
                _ => tracing::warn!(attr, value = %raw, "ignoring invalid timing attribute"),
            }
        }
    }
    config
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    let config = resolve_config(base, overlay)?;
    tracing::debug!(
        root = %root.display(),
        nav = config.nav.len(),
        gallery = config.gallery.len(),
        "config loaded"
    );
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Site Interactions Configuration
# ===============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Contact form delivery
# ---------------------------------------------------------------------------
[contact]
# Address the composed quote request is addressed to.
recipient = "quotes@example.com"

# Subject line of the composed message.
subject = "New Quote Request"

# Shown in the "Submitted from ..." footer of every message.
site = "example.com"

# ---------------------------------------------------------------------------
# Timing
# ---------------------------------------------------------------------------
[timing]
# Milliseconds between opening the drawer or lightbox and moving focus into it.
focus_delay_ms = 100

# Milliseconds between opening the mail client and checking whether it
# actually opened. If it did not, the visitor is offered a clipboard copy.
dispatch_check_ms = 500

# ---------------------------------------------------------------------------
# Contact form options
# ---------------------------------------------------------------------------
[form]
# Choices for the required "Service needed" select. Must not be empty.
services = [
    "Kitchen Remodeling",
    "Bathroom Remodeling",
    "Basement Finishing",
    "Decks & Outdoor",
    "General Repairs",
    "Other",
]

# Choices for the optional "Budget range" select.
budgets = [
    "Under $10,000",
    "$10,000 - $25,000",
    "$25,000 - $50,000",
    "$50,000+",
]

# ---------------------------------------------------------------------------
# Navigation drawer links, in order
# ---------------------------------------------------------------------------
[[nav]]
label = "Services"
href = "#services"

[[nav]]
label = "Gallery"
href = "#gallery"

[[nav]]
label = "About"
href = "#about"

[[nav]]
label = "Contact"
href = "#contact"

# ---------------------------------------------------------------------------
# Gallery images, in order. Each one opens in the lightbox.
# ---------------------------------------------------------------------------
# [[gallery]]
# src = "images/kitchen.jpg"
# alt = "Remodeled kitchen with white cabinets"

# ---------------------------------------------------------------------------
# Service cards. "Learn more" reveals the detail text.
# ---------------------------------------------------------------------------
# [[service_cards]]
# title = "Kitchen Remodeling"
# summary = "Cabinets, counters and full layout changes."
# detail = "We handle permits, demolition, plumbing and finish work."

# ---------------------------------------------------------------------------
# FAQ accordion. Opening one answer closes the others.
# ---------------------------------------------------------------------------
# [[faq]]
# question = "Do you offer free estimates?"
# answer = "Yes. We visit, measure and send a written estimate."
"##
}
