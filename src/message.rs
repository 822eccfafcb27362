//! Outbound message composition.
//!
//! A [`SubmissionDraft`] is rendered twice from one body template: once as a
//! `mailto:` URI for the mail-client handoff, once as plain text (with `To:`
//! and `Subject:` headers) for the clipboard fallback.

use crate::config::ContactConfig;
use crate::validate::FieldId;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;

/// Characters `encodeURIComponent` escapes: everything except ASCII
/// alphanumerics and `- _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Field values captured at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmissionDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub service: String,
    pub budget: Option<String>,
    #[serde(alias = "startMonth")]
    pub start_month: Option<String>,
    pub message: String,
}

fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

impl SubmissionDraft {
    /// Assemble a draft from raw field values. Blank optional fields are
    /// dropped.
    pub fn from_values<F>(mut value_of: F) -> Self
    where
        F: FnMut(FieldId) -> String,
    {
        Self {
            name: value_of(FieldId::Name),
            phone: value_of(FieldId::Phone),
            email: value_of(FieldId::Email),
            address: non_blank(value_of(FieldId::Address)),
            service: value_of(FieldId::Service),
            budget: non_blank(value_of(FieldId::Budget)),
            start_month: non_blank(value_of(FieldId::StartMonth)),
            message: value_of(FieldId::Message),
        }
    }

    /// Read a draft from a TOML file. Blank optional fields are dropped.
    pub fn load(path: &Path) -> Result<Self, ComposeError> {
        let content = std::fs::read_to_string(path)?;
        let draft: SubmissionDraft = toml::from_str(&content)?;
        Ok(draft.normalized())
    }

    fn normalized(self) -> Self {
        Self {
            address: self.address.and_then(non_blank),
            budget: self.budget.and_then(non_blank),
            start_month: self.start_month.and_then(non_blank),
            ..self
        }
    }

    /// Raw value of a field, empty for an absent optional one.
    pub fn value(&self, id: FieldId) -> &str {
        match id {
            FieldId::Name => &self.name,
            FieldId::Phone => &self.phone,
            FieldId::Email => &self.email,
            FieldId::Address => self.address.as_deref().unwrap_or_default(),
            FieldId::Service => &self.service,
            FieldId::Budget => self.budget.as_deref().unwrap_or_default(),
            FieldId::StartMonth => self.start_month.as_deref().unwrap_or_default(),
            FieldId::Message => &self.message,
        }
    }
}

/// Both renderings of one draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedMessage {
    pub mailto: String,
    pub plain_text: String,
}

pub fn render_body(draft: &SubmissionDraft, contact: &ContactConfig) -> String {
    let mut body = String::new();
    // Writing to a String cannot fail.
    let _ = write!(
        body,
        "New quote request from {name}\n\n\
         Contact Information:\n\
         Name: {name}\n\
         Phone: {phone}\n\
         Email: {email}\n",
        name = draft.name,
        phone = draft.phone,
        email = draft.email,
    );
    if let Some(address) = &draft.address {
        let _ = writeln!(body, "Address/City: {address}");
    }
    let _ = write!(
        body,
        "\nProject Details:\nService Needed: {}\n",
        draft.service
    );
    if let Some(budget) = &draft.budget {
        let _ = writeln!(body, "Budget Range: {budget}");
    }
    if let Some(start) = &draft.start_month {
        let _ = writeln!(body, "Preferred Start: {start}");
    }
    let _ = write!(
        body,
        "\nMessage:\n{}\n\n---\nSubmitted from {}",
        draft.message, contact.site
    );
    body
}

/// Percent-encode with the `encodeURIComponent` character set.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

pub fn mailto_uri(contact: &ContactConfig, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        contact.recipient,
        encode_component(&contact.subject),
        encode_component(body)
    )
}

pub fn plain_text(contact: &ContactConfig, body: &str) -> String {
    format!(
        "To: {}\nSubject: {}\n\n{}",
        contact.recipient, contact.subject, body
    )
}

pub fn compose(draft: &SubmissionDraft, contact: &ContactConfig) -> ComposedMessage {
    let body = render_body(draft, contact);
    ComposedMessage {
        mailto: mailto_uri(contact, &body),
        plain_text: plain_text(contact, &body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{complete_draft, contact};

    #[test]
    fn body_omits_absent_optional_lines() {
        let body = render_body(&complete_draft(), &contact());
        assert_eq!(
            body,
            "New quote request from Alice Smith\n\n\
             Contact Information:\n\
             Name: Alice Smith\n\
             Phone: 555-123-4567\n\
             Email: alice@example.com\n\
             \n\
             Project Details:\n\
             Service Needed: Kitchen Remodeling\n\
             \n\
             Message:\n\
             New cabinets and countertops please.\n\n\
             ---\n\
             Submitted from example.com"
        );
    }

    #[test]
    fn body_includes_present_optional_lines() {
        let draft = SubmissionDraft {
            address: Some("Springfield".into()),
            budget: Some("$10,000 - $25,000".into()),
            start_month: Some("June".into()),
            ..complete_draft()
        };
        let body = render_body(&draft, &contact());
        assert!(body.contains("Email: alice@example.com\nAddress/City: Springfield\n\nProject"));
        assert!(body.contains(
            "Service Needed: Kitchen Remodeling\nBudget Range: $10,000 - $25,000\nPreferred Start: June\n\nMessage:"
        ));
    }

    #[test]
    fn from_values_drops_blank_optionals() {
        let draft = SubmissionDraft::from_values(|id| match id {
            FieldId::Address => "   ".to_string(),
            FieldId::Budget => "Under $10,000".to_string(),
            _ => String::new(),
        });
        assert_eq!(draft.address, None);
        assert_eq!(draft.budget.as_deref(), Some("Under $10,000"));
        assert_eq!(draft.start_month, None);
    }

    #[test]
    fn encoding_matches_encode_uri_component() {
        assert_eq!(encode_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_component("line\nbreak"), "line%0Abreak");
        assert_eq!(encode_component("$1,000"), "%241%2C000");
        assert_eq!(encode_component("Quote – Reno"), "Quote%20%E2%80%93%20Reno");
    }

    #[test]
    fn mailto_has_recipient_and_encoded_parts() {
        let composed = compose(&complete_draft(), &contact());
        assert!(composed.mailto.starts_with(
            "mailto:quotes@example.com?subject=New%20Quote%20Request&body=New%20quote%20request%20from%20Alice%20Smith%0A%0A"
        ));
        assert!(!composed.mailto.contains(' '));
        assert!(!composed.mailto.contains('\n'));
    }

    #[test]
    fn plain_text_has_headers_then_body() {
        let composed = compose(&complete_draft(), &contact());
        assert!(composed.plain_text.starts_with(
            "To: quotes@example.com\nSubject: New Quote Request\n\nNew quote request from Alice Smith\n"
        ));
        assert!(composed.plain_text.ends_with("Submitted from example.com"));
    }

    #[test]
    fn load_accepts_camel_case_start_month() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("draft.toml");
        std::fs::write(
            &path,
            r#"
name = "Bob"
phone = "5551234567"
email = "bob@example.com"
service = "Decks"
startMonth = "May"
budget = ""
message = "Build me a deck please"
"#,
        )
        .unwrap();

        let draft = SubmissionDraft::load(&path).unwrap();
        assert_eq!(draft.start_month.as_deref(), Some("May"));
        assert_eq!(draft.budget, None);
        assert_eq!(draft.value(FieldId::Budget), "");
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("draft.toml");
        std::fs::write(&path, "nmae = \"typo\"\n").unwrap();
        assert!(matches!(
            SubmissionDraft::load(&path),
            Err(ComposeError::Toml(_))
        ));
    }
}
