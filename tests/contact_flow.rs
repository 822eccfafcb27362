//! End-to-end contact form behavior on a headless page.

use site_interactions::config::SiteConfig;
use site_interactions::dom::{Dom, contract};
use site_interactions::headless::HeadlessSite;
use site_interactions::host::{ComposeBehavior, MemoryHost};
use site_interactions::site::EventOutcome;
use site_interactions::submit::{
    CONFIRMED_MESSAGE, FALLBACK_MESSAGE, REJECTED_MESSAGE, SubmissionState,
};
use site_interactions::validate::FieldId;

fn fill_valid(page: &mut HeadlessSite) {
    page.type_into(FieldId::Name, "Alice Smith");
    page.type_into(FieldId::Phone, "(555) 123-4567");
    page.type_into(FieldId::Email, "alice@example.com");
    page.type_into(FieldId::Service, "Kitchen Remodeling");
    page.type_into(FieldId::Message, "New cabinets and countertops please.");
}

fn state(page: &HeadlessSite) -> SubmissionState {
    page.site.contact().map(|c| c.state()).unwrap()
}

fn copy_hidden(page: &HeadlessSite) -> bool {
    let button = page.id(contract::COPY_BUTTON).unwrap();
    page.dom.attribute(&button, contract::HIDDEN).is_some()
}

#[test]
fn empty_submit_marks_every_required_field() {
    let mut page = HeadlessSite::new(&SiteConfig::default()).unwrap();

    assert_eq!(page.submit(), EventOutcome::PreventDefault);

    assert_eq!(state(&page), SubmissionState::Rejected);
    assert_eq!(page.status(), REJECTED_MESSAGE);
    assert!(page.status_has_class(contract::ERROR_CLASS));
    for id in FieldId::REQUIRED {
        assert!(!page.error_text(id).is_empty(), "{id:?} has no error");
        let input = page.id(id.dom_id()).unwrap();
        assert_eq!(page.dom.attribute(&input, contract::ARIA_INVALID).as_deref(), Some("true"));
    }
    assert!(page.host.opened().is_empty());
    assert!(page.host.pending_tasks().is_empty());
}

#[test]
fn valid_submit_opens_mail_client_and_confirms() {
    let mut page = HeadlessSite::new(&SiteConfig::default()).unwrap();
    fill_valid(&mut page);

    page.submit();
    assert_eq!(state(&page), SubmissionState::Dispatched { attempt: 1 });
    assert_eq!(page.host.opened().len(), 1);
    assert!(page.host.opened()[0].starts_with("mailto:quotes@example.com?subject=New%20Quote%20Request&body="));
    assert_eq!(page.status(), "");

    page.advance(499);
    assert_eq!(state(&page), SubmissionState::Dispatched { attempt: 1 });

    page.advance(1);
    assert_eq!(state(&page), SubmissionState::Confirmed);
    assert_eq!(page.status(), CONFIRMED_MESSAGE);
    assert!(page.status_has_class(contract::SUCCESS_CLASS));
    let name = page.id(FieldId::Name.dom_id()).unwrap();
    assert_eq!(page.dom.value(&name), "");
    assert!(copy_hidden(&page));
}

#[test]
fn blocked_handoff_offers_one_copy() {
    let mut page = HeadlessSite::with_compose(&SiteConfig::default(), ComposeBehavior::Blocked).unwrap();
    fill_valid(&mut page);
    page.submit();
    page.advance(500);

    assert_eq!(state(&page), SubmissionState::FallbackOffered);
    assert_eq!(page.status(), FALLBACK_MESSAGE);
    assert!(!copy_hidden(&page));

    page.click_id(contract::COPY_BUTTON);
    page.flush_clipboard();
    let copied = page.host.clipboard.contents().unwrap().to_string();
    assert!(copied.starts_with("To: quotes@example.com\nSubject: New Quote Request\n\n"));
    assert!(copied.contains("Phone: (555) 123-4567"));
    assert_eq!(
        page.status(),
        "Email content copied! Please paste into your email client and send to quotes@example.com"
    );
    assert!(copy_hidden(&page));

    // The copy is one-shot.
    page.host.clipboard = Default::default();
    page.click_id(contract::COPY_BUTTON);
    page.flush_clipboard();
    assert_eq!(page.host.clipboard.contents(), None);
}

#[test]
fn unreadable_context_counts_as_failure() {
    let mut page =
        HeadlessSite::with_compose(&SiteConfig::default(), ComposeBehavior::Unsupported).unwrap();
    fill_valid(&mut page);
    page.submit();
    page.advance(500);
    assert_eq!(state(&page), SubmissionState::FallbackOffered);
}

#[test]
fn legacy_copy_path_used_without_clipboard_api() {
    let mut host = MemoryHost::with_compose(ComposeBehavior::ClosesImmediately);
    host.clipboard.api_available = false;
    let mut page = HeadlessSite::with_host(&SiteConfig::default(), host).unwrap();
    fill_valid(&mut page);
    page.submit();
    page.advance(500);
    page.click_id(contract::COPY_BUTTON);
    page.flush_clipboard();
    assert!(page.host.clipboard.contents().is_some());
    assert!(page.status_has_class(contract::SUCCESS_CLASS));
}

#[test]
fn failed_copy_points_to_recipient() {
    let mut host = MemoryHost::with_compose(ComposeBehavior::Blocked);
    host.clipboard.api_rejects = true;
    let mut page = HeadlessSite::with_host(&SiteConfig::default(), host).unwrap();
    fill_valid(&mut page);
    page.submit();
    page.advance(500);
    page.click_id(contract::COPY_BUTTON);
    page.flush_clipboard();
    assert_eq!(page.status(), "Unable to copy. Please email quotes@example.com directly.");
    assert!(page.status_has_class(contract::ERROR_CLASS));
}

#[test]
fn resubmit_drops_stale_dispatch_check() {
    let mut page = HeadlessSite::with_compose(&SiteConfig::default(), ComposeBehavior::Blocked).unwrap();
    fill_valid(&mut page);
    page.submit();
    page.advance(300);
    page.submit();
    assert_eq!(state(&page), SubmissionState::Dispatched { attempt: 2 });

    // The first check falls due here and must not settle attempt 2.
    page.advance(200);
    assert_eq!(state(&page), SubmissionState::Dispatched { attempt: 2 });

    page.advance(300);
    assert_eq!(state(&page), SubmissionState::FallbackOffered);
}

#[test]
fn configured_recipient_reaches_the_message() {
    let mut config = SiteConfig::default();
    config.contact.recipient = "hello@myreno.com".into();
    config.contact.site = "myreno.com".into();
    config.timing.dispatch_check_ms = 50;
    let mut page = HeadlessSite::new(&config).unwrap();
    fill_valid(&mut page);
    page.submit();

    let uri = &page.host.opened()[0];
    assert!(uri.starts_with("mailto:hello@myreno.com?"));
    assert!(uri.ends_with("Submitted%20from%20myreno.com"));
    page.advance(50);
    assert_eq!(state(&page), SubmissionState::Confirmed);
}

#[test]
fn optional_fields_appear_only_when_filled() {
    let mut page = HeadlessSite::new(&SiteConfig::default()).unwrap();
    fill_valid(&mut page);
    page.fill(FieldId::Budget, "$10,000 - $25,000");
    page.submit();
    let uri = &page.host.opened()[0];
    assert!(uri.contains("Budget%20Range%3A%20%2410%2C000%20-%20%2425%2C000"));
    assert!(!uri.contains("Preferred%20Start"));
    assert!(!uri.contains("Address%2FCity"));
}
