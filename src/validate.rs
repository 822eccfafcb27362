//! Contact-form field rules and their on-page error annotations.
//!
//! Validators are pure: raw value in, `None` for valid or `Some(message)`
//! out. [`Fields`] binds them to the live form. An error is always shown in
//! three places at once (the `error` class on the input, the text of
//! `{id}Error`, and `aria-invalid`) and always cleared from all three.

use crate::dom::{Dom, contract};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Validation result: `None` when the value is acceptable.
pub type Validator = fn(&str) -> Option<&'static str>;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s()\-+.]{10,}$").expect("phone regex should compile"));

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex should compile"));

/// Every control of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    Name,
    Phone,
    Email,
    Address,
    Service,
    Budget,
    StartMonth,
    Message,
}

impl FieldId {
    /// Form order.
    pub const ALL: [FieldId; 8] = [
        FieldId::Name,
        FieldId::Phone,
        FieldId::Email,
        FieldId::Address,
        FieldId::Service,
        FieldId::Budget,
        FieldId::StartMonth,
        FieldId::Message,
    ];

    /// Fields validated on submit, in validation order.
    pub const REQUIRED: [FieldId; 5] = [
        FieldId::Name,
        FieldId::Phone,
        FieldId::Email,
        FieldId::Service,
        FieldId::Message,
    ];

    pub fn dom_id(self) -> &'static str {
        match self {
            FieldId::Name => "name",
            FieldId::Phone => "phone",
            FieldId::Email => "email",
            FieldId::Address => "address",
            FieldId::Service => "service",
            FieldId::Budget => "budget",
            FieldId::StartMonth => "startMonth",
            FieldId::Message => "message",
        }
    }

    /// Id of the element holding this field's error text.
    pub fn error_id(self) -> &'static str {
        match self {
            FieldId::Name => "nameError",
            FieldId::Phone => "phoneError",
            FieldId::Email => "emailError",
            FieldId::Address => "addressError",
            FieldId::Service => "serviceError",
            FieldId::Budget => "budgetError",
            FieldId::StartMonth => "startMonthError",
            FieldId::Message => "messageError",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::Name => "Full name",
            FieldId::Phone => "Phone",
            FieldId::Email => "Email",
            FieldId::Address => "Address/City",
            FieldId::Service => "Service needed",
            FieldId::Budget => "Budget range",
            FieldId::StartMonth => "Preferred start",
            FieldId::Message => "Project details",
        }
    }

    pub fn is_required(self) -> bool {
        validator_for(self).is_some()
    }

    pub fn from_dom_id(id: &str) -> Option<FieldId> {
        FieldId::ALL.into_iter().find(|f| f.dom_id() == id)
    }
}

/// A field together with its rule.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub validate: Validator,
}

/// The static rule table.
pub const REGISTRY: [FieldDescriptor; 5] = [
    FieldDescriptor {
        id: FieldId::Name,
        validate: validate_name,
    },
    FieldDescriptor {
        id: FieldId::Phone,
        validate: validate_phone,
    },
    FieldDescriptor {
        id: FieldId::Email,
        validate: validate_email,
    },
    FieldDescriptor {
        id: FieldId::Service,
        validate: validate_service,
    },
    FieldDescriptor {
        id: FieldId::Message,
        validate: validate_message,
    },
];

pub fn validator_for(id: FieldId) -> Option<Validator> {
    REGISTRY.iter().find(|d| d.id == id).map(|d| d.validate)
}

/// Length as the browser reports it for a form value: UTF-16 code units.
fn input_length(value: &str) -> usize {
    value.encode_utf16().count()
}

pub fn validate_name(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some("Please enter your full name");
    }
    if input_length(trimmed) < 2 {
        return Some("Name must be at least 2 characters");
    }
    None
}

pub fn validate_phone(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        return Some("Please enter your phone number");
    }
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if !PHONE_PATTERN.is_match(&compact) {
        return Some("Please enter a valid phone number");
    }
    None
}

pub fn validate_email(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        return Some("Please enter your email address");
    }
    if !EMAIL_PATTERN.is_match(value) {
        return Some("Please enter a valid email address");
    }
    None
}

pub fn validate_service(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some("Please select a service");
    }
    None
}

pub fn validate_message(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some("Please enter project details");
    }
    if input_length(trimmed) < 10 {
        return Some("Please provide more details (at least 10 characters)");
    }
    None
}

/// Run every required rule against `value_of`. Returns the failures in
/// validation order.
pub fn validate_values<F>(mut value_of: F) -> Vec<(FieldId, &'static str)>
where
    F: FnMut(FieldId) -> String,
{
    REGISTRY
        .iter()
        .filter_map(|d| (d.validate)(&value_of(d.id)).map(|msg| (d.id, msg)))
        .collect()
}

// ============================================================================
// Live form binding
// ============================================================================

struct Binding<N> {
    id: FieldId,
    input: N,
    error: Option<N>,
}

/// The form's controls, looked up once at mount.
pub struct Fields<D: Dom> {
    bindings: Vec<Binding<D::Node>>,
}

impl<D: Dom> Fields<D> {
    /// Bind every field present on the page. Missing controls are skipped.
    pub fn mount(dom: &D) -> Self {
        let bindings = FieldId::ALL
            .into_iter()
            .filter_map(|id| {
                let input = dom.element_by_id(id.dom_id())?;
                let error = dom.element_by_id(id.error_id());
                Some(Binding { id, input, error })
            })
            .collect();
        Self { bindings }
    }

    fn binding(&self, id: FieldId) -> Option<&Binding<D::Node>> {
        self.bindings.iter().find(|b| b.id == id)
    }

    pub fn input(&self, id: FieldId) -> Option<&D::Node> {
        self.binding(id).map(|b| &b.input)
    }

    /// Which field `node` is the control of.
    pub fn field_for(&self, node: &D::Node) -> Option<FieldId> {
        self.bindings.iter().find(|b| b.input == *node).map(|b| b.id)
    }

    /// Live value of a field; empty when the control is missing.
    pub fn value(&self, dom: &D, id: FieldId) -> String {
        self.input(id).map(|n| dom.value(n)).unwrap_or_default()
    }

    /// Validate one field against its live value and update its annotations.
    ///
    /// Fields without a rule, or whose control is missing from the page,
    /// count as valid. A control without an error element still gets its
    /// verdict; only the annotations are skipped.
    pub fn validate(&self, dom: &mut D, id: FieldId) -> bool {
        let Some(binding) = self.binding(id) else {
            return true;
        };
        let Some(rule) = validator_for(id) else {
            return true;
        };
        let value = dom.value(&binding.input);
        match rule(&value) {
            Some(message) => {
                self.show_error(dom, id, message);
                false
            }
            None => {
                self.clear_error(dom, id);
                true
            }
        }
    }

    pub fn show_error(&self, dom: &mut D, id: FieldId, message: &str) {
        let Some(Binding {
            input,
            error: Some(error),
            ..
        }) = self.binding(id)
        else {
            return;
        };
        dom.add_class(input, contract::ERROR_CLASS);
        dom.set_text(error, message);
        dom.set_attribute(input, contract::ARIA_INVALID, "true");
    }

    pub fn clear_error(&self, dom: &mut D, id: FieldId) {
        let Some(Binding {
            input,
            error: Some(error),
            ..
        }) = self.binding(id)
        else {
            return;
        };
        dom.remove_class(input, contract::ERROR_CLASS);
        dom.set_text(error, "");
        dom.set_attribute(input, contract::ARIA_INVALID, "false");
    }

    pub fn is_marked_invalid(&self, dom: &D, id: FieldId) -> bool {
        self.input(id)
            .is_some_and(|n| dom.has_class(n, contract::ERROR_CLASS))
    }

    /// Validate every required field. All fields are checked so every
    /// error becomes visible at once.
    pub fn validate_all(&self, dom: &mut D) -> bool {
        FieldId::REQUIRED
            .into_iter()
            .fold(true, |ok, id| self.validate(dom, id) && ok)
    }

    pub fn clear_all(&self, dom: &mut D) {
        for id in FieldId::REQUIRED {
            self.clear_error(dom, id);
        }
    }

    /// Blur always validates.
    pub fn on_blur(&self, dom: &mut D, id: FieldId) {
        if id.is_required() {
            self.validate(dom, id);
        }
    }

    /// Typing only re-validates a field that is already flagged, so nobody
    /// is told off before they have left the field once.
    pub fn on_input(&self, dom: &mut D, id: FieldId) {
        if id.is_required() && self.is_marked_invalid(dom, id) {
            self.validate(dom, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDom, NodeId};

    #[test]
    fn name_boundaries() {
        assert_eq!(validate_name(""), Some("Please enter your full name"));
        assert_eq!(validate_name("   "), Some("Please enter your full name"));
        assert_eq!(
            validate_name("A"),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(
            validate_name("  A  "),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(validate_name("Al"), None);
    }

    #[test]
    fn lengths_count_utf16_units() {
        // One astral character is two code units, like `"😀".length` in a page.
        assert_eq!(validate_name("😀"), None);
        assert_eq!(
            validate_name("é"),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(validate_message("😀😀😀😀😀"), None);
        assert_eq!(
            validate_message("ééééééééé"),
            Some("Please provide more details (at least 10 characters)")
        );
    }

    #[test]
    fn phone_counts_characters_after_stripping_whitespace() {
        // 11 characters: 9 digits plus two hyphens.
        assert_eq!(validate_phone("123-456-789"), None);
        // 9 digits, spaces stripped.
        assert_eq!(
            validate_phone("123 456 789"),
            Some("Please enter a valid phone number")
        );
        assert_eq!(validate_phone("(555) 123-4567"), None);
        assert_eq!(validate_phone("+1.555.123.4567"), None);
        assert_eq!(validate_phone("5551234567"), None);
        assert_eq!(
            validate_phone("555123456"),
            Some("Please enter a valid phone number")
        );
    }

    #[test]
    fn phone_rejects_letters_and_blank() {
        assert_eq!(
            validate_phone("555-CALL-NOW"),
            Some("Please enter a valid phone number")
        );
        assert_eq!(validate_phone("  "), Some("Please enter your phone number"));
    }

    #[test]
    fn email_needs_a_dot_segment() {
        assert_eq!(validate_email("a@b.c"), None);
        assert_eq!(
            validate_email("a@b"),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            validate_email("a b@c.d"),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            validate_email("a@@b.c"),
            Some("Please enter a valid email address")
        );
        assert_eq!(validate_email(""), Some("Please enter your email address"));
    }

    #[test]
    fn email_checks_untrimmed_value() {
        assert_eq!(
            validate_email(" a@b.c"),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn service_needs_any_selection() {
        assert_eq!(validate_service(""), Some("Please select a service"));
        assert_eq!(validate_service("Kitchen"), None);
    }

    #[test]
    fn message_boundaries() {
        assert_eq!(validate_message("0123456789"), None);
        assert_eq!(validate_message("  0123456789  "), None);
        assert_eq!(
            validate_message("012345678"),
            Some("Please provide more details (at least 10 characters)")
        );
        assert_eq!(validate_message(""), Some("Please enter project details"));
    }

    #[test]
    fn registry_covers_required_fields_only() {
        let ids: Vec<FieldId> = REGISTRY.iter().map(|d| d.id).collect();
        assert_eq!(ids, FieldId::REQUIRED.to_vec());
        assert!(!FieldId::Address.is_required());
        assert!(!FieldId::Budget.is_required());
        assert!(!FieldId::StartMonth.is_required());
    }

    #[test]
    fn dom_ids_roundtrip() {
        for id in FieldId::ALL {
            assert_eq!(FieldId::from_dom_id(id.dom_id()), Some(id));
            assert_eq!(id.error_id(), format!("{}Error", id.dom_id()));
        }
    }

    #[test]
    fn validate_values_reports_in_order() {
        let failures = validate_values(|id| match id {
            FieldId::Name => "A".to_string(),
            FieldId::Email => "nope".to_string(),
            FieldId::Phone => "5551234567".to_string(),
            FieldId::Service => "Decks".to_string(),
            _ => String::new(),
        });
        let ids: Vec<FieldId> = failures.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![FieldId::Name, FieldId::Email, FieldId::Message]);
    }

    fn form() -> (MemoryDom, NodeId, NodeId) {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let input = dom.append(body, "input").id("name").node();
        let error = dom.append(body, "span").id("nameError").node();
        (dom, input, error)
    }

    #[test]
    fn error_annotations_set_together() {
        let (mut dom, input, error) = form();
        let fields = Fields::mount(&dom);

        assert!(!fields.validate(&mut dom, FieldId::Name));
        assert!(dom.has_class(&input, contract::ERROR_CLASS));
        assert_eq!(dom.text(error), "Please enter your full name");
        assert_eq!(
            dom.attribute(&input, contract::ARIA_INVALID).as_deref(),
            Some("true")
        );

        dom.set_value(input, "Alice");
        assert!(fields.validate(&mut dom, FieldId::Name));
        assert!(!dom.has_class(&input, contract::ERROR_CLASS));
        assert_eq!(dom.text(error), "");
        assert_eq!(
            dom.attribute(&input, contract::ARIA_INVALID).as_deref(),
            Some("false")
        );
    }

    #[test]
    fn input_revalidates_only_flagged_fields() {
        let (mut dom, input, error) = form();
        let fields = Fields::mount(&dom);

        dom.set_value(input, "A");
        fields.on_input(&mut dom, FieldId::Name);
        assert_eq!(dom.text(error), "");

        fields.on_blur(&mut dom, FieldId::Name);
        assert_eq!(dom.text(error), "Name must be at least 2 characters");

        dom.set_value(input, "Al");
        fields.on_input(&mut dom, FieldId::Name);
        assert_eq!(dom.text(error), "");
        assert!(!fields.is_marked_invalid(&dom, FieldId::Name));
    }

    #[test]
    fn missing_error_element_keeps_verdict_without_annotations() {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let phone = dom.append(body, "input").id("phone").node(); // no phoneError
        let fields = Fields::mount(&dom);

        assert!(!fields.validate(&mut dom, FieldId::Phone));
        assert_eq!(dom.attribute(&phone, contract::ARIA_INVALID), None);
        assert!(!fields.is_marked_invalid(&dom, FieldId::Phone));
    }

    #[test]
    fn missing_control_counts_as_valid() {
        let mut dom = MemoryDom::new();
        let fields = Fields::mount(&dom);
        assert!(fields.validate(&mut dom, FieldId::Email));
    }

    #[test]
    fn validate_all_checks_every_field() {
        let mut dom = MemoryDom::from_config(&crate::config::SiteConfig::default());
        let fields = Fields::mount(&dom);

        assert!(!fields.validate_all(&mut dom));
        for id in FieldId::REQUIRED {
            assert!(fields.is_marked_invalid(&dom, id), "{id:?} not flagged");
        }

        fields.clear_all(&mut dom);
        for id in FieldId::REQUIRED {
            assert!(!fields.is_marked_invalid(&dom, id));
        }
    }
}
