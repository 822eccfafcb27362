//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Config
//!     Recipient: quotes@example.com
//!     Timing: focus 100ms, dispatch check 500ms
//!
//! Components
//!     Navigation drawer: 4 links
//!     Image viewer: 3 images
//!     Contact form: 8 fields
//!     Service cards: 2 cards
//!     FAQ: 3 questions
//! ```
//!
//! ## Compose
//!
//! ```text
//! Rejected
//!     phone: Please enter a valid phone number
//!     message: Please enter project details
//! ```
//!
//! or the `mailto:` URI followed by the clipboard text.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::SiteConfig;
use crate::message::ComposedMessage;
use crate::site::MountSummary;
use crate::validate::FieldId;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// One component line: its name and what it found, or why it is absent.
fn component_line(name: &str, detail: Option<String>) -> String {
    match detail {
        Some(d) => format!("{}{}: {}", indent(1), name, d),
        None => format!("{}{}: not on page", indent(1), name),
    }
}

// ============================================================================
// check
// ============================================================================

pub fn format_check_output(config: &SiteConfig, summary: &MountSummary) -> Vec<String> {
    let mut lines = vec![
        "Config".to_string(),
        format!("{}Recipient: {}", indent(1), config.contact.recipient),
        format!(
            "{}Timing: focus {}ms, dispatch check {}ms",
            indent(1),
            config.timing.focus_delay_ms,
            config.timing.dispatch_check_ms
        ),
        String::new(),
        "Components".to_string(),
    ];
    lines.push(component_line(
        "Navigation drawer",
        summary.drawer_links.map(|n| plural(n, "link", "links")),
    ));
    lines.push(component_line(
        "Image viewer",
        summary.gallery_items.map(|n| plural(n, "image", "images")),
    ));
    lines.push(component_line(
        "Contact form",
        summary
            .contact_fields
            .as_ref()
            .map(|f| plural(f.len(), "field", "fields")),
    ));
    lines.push(component_line(
        "Service cards",
        (summary.service_cards > 0).then(|| plural(summary.service_cards, "card", "cards")),
    ));
    lines.push(component_line(
        "FAQ",
        (summary.faq_items > 0).then(|| plural(summary.faq_items, "question", "questions")),
    ));
    lines
}

pub fn print_check_output(config: &SiteConfig, summary: &MountSummary) {
    for line in format_check_output(config, summary) {
        println!("{}", line);
    }
}

// ============================================================================
// compose
// ============================================================================

pub fn format_field_errors(errors: &[(FieldId, &str)]) -> Vec<String> {
    let mut lines = vec!["Rejected".to_string()];
    for (id, message) in errors {
        lines.push(format!("{}{}: {}", indent(1), id.dom_id(), message));
    }
    lines
}

pub fn format_composed(message: &ComposedMessage) -> Vec<String> {
    let mut lines = vec![
        "Mail client URI".to_string(),
        format!("{}{}", indent(1), message.mailto),
        String::new(),
        "Clipboard text".to_string(),
    ];
    lines.extend(
        message
            .plain_text
            .lines()
            .map(|l| format!("{}{}", indent(1), l).trim_end().to_string()),
    );
    lines
}

pub fn print_field_errors(errors: &[(FieldId, &str)]) {
    for line in format_field_errors(errors) {
        println!("{}", line);
    }
}

pub fn print_composed(message: &ComposedMessage) {
    for line in format_composed(message) {
        println!("{}", line);
    }
}

// ============================================================================
// render
// ============================================================================

pub fn format_render_output(path: &Path, bytes: usize) -> Vec<String> {
    vec![format!("Wrote {} ({} bytes)", path.display(), bytes)]
}

pub fn print_render_output(path: &Path, bytes: usize) {
    for line in format_render_output(path, bytes) {
        println!("{}", line);
    }
}
