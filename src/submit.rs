//! Contact-form submission pipeline.
//!
//! ```text
//! Idle ─submit─▶ Validating ─┬─▶ Rejected
//!                            └─▶ Composing ─▶ Dispatched ─EvaluateDispatch─┬─▶ Confirmed
//!                                                                          └─▶ FallbackOffered
//! ```
//!
//! Whether the mail client actually picked up the `mailto:` handoff cannot be
//! observed. After `dispatch_check` the opened context is probed once: a
//! context that is missing, closed or unreadable counts as a probable
//! failure and the clipboard copy is offered instead.

use crate::config::{ContactConfig, TimingConfig};
use crate::dom::{Dom, contract};
use crate::host::{ClipboardError, ComposeHandle, ComposeProbe, Host, Task};
use crate::message::{self, SubmissionDraft};
use crate::site::MountError;
use crate::validate::Fields;
use std::time::Duration;

pub const REJECTED_MESSAGE: &str = "Please fix the errors above and try again.";
pub const CONFIRMED_MESSAGE: &str =
    "Thanks! Your email draft has opened. Please review and send it to complete your quote request.";
pub const FALLBACK_MESSAGE: &str = "Your email client may have blocked the request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Rejected,
    Composing,
    Dispatched { attempt: u64 },
    Confirmed,
    FallbackOffered,
}

/// Best guess at whether the handoff reached a mail client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    ProbableSuccess,
    ProbableFailure,
}

impl DispatchOutcome {
    /// `None` is a context that never opened.
    pub fn from_probe(probe: Option<ComposeProbe>) -> Self {
        match probe {
            Some(ComposeProbe::Open) => DispatchOutcome::ProbableSuccess,
            Some(ComposeProbe::Closed | ComposeProbe::Unsupported) | None => {
                DispatchOutcome::ProbableFailure
            }
        }
    }
}

/// Colour of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Error,
    Success,
}

impl Tone {
    fn class(self) -> &'static str {
        match self {
            Tone::Error => contract::ERROR_CLASS,
            Tone::Success => contract::SUCCESS_CLASS,
        }
    }
}

pub struct ContactForm<D: Dom> {
    form: D::Node,
    status: D::Node,
    copy_button: Option<D::Node>,
    fields: Fields<D>,
    contact: ContactConfig,
    dispatch_check: Duration,
    state: SubmissionState,
    attempt: u64,
    handle: Option<ComposeHandle>,
    /// Plain-text rendering waiting for the copy action. Taken on use.
    pending_copy: Option<String>,
    copy_in_flight: bool,
}

impl<D: Dom> ContactForm<D> {
    /// Returns `Ok(None)` when the page has no contact form.
    pub fn mount(
        dom: &D,
        contact: ContactConfig,
        timing: &TimingConfig,
    ) -> Result<Option<Self>, MountError> {
        let Some(form) = dom.element_by_id(contract::CONTACT_FORM) else {
            return Ok(None);
        };
        let status = dom
            .element_by_id(contract::FORM_MESSAGE)
            .ok_or(MountError::MissingElement(contract::FORM_MESSAGE))?;
        let copy_button = dom.element_by_id(contract::COPY_BUTTON);
        if copy_button.is_none() {
            tracing::warn!(id = contract::COPY_BUTTON, "copy action missing, fallback will be text only");
        }
        Ok(Some(Self {
            form,
            status,
            copy_button,
            fields: Fields::mount(dom),
            contact,
            dispatch_check: timing.dispatch_check(),
            state: SubmissionState::Idle,
            attempt: 0,
            handle: None,
            pending_copy: None,
            copy_in_flight: false,
        }))
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn fields(&self) -> &Fields<D> {
        &self.fields
    }

    pub fn form(&self) -> &D::Node {
        &self.form
    }

    pub fn copy_button(&self) -> Option<&D::Node> {
        self.copy_button.as_ref()
    }

    pub fn copy_available(&self) -> bool {
        self.state == SubmissionState::FallbackOffered && self.pending_copy.is_some()
    }

    fn set_status(&self, dom: &mut D, text: &str, tone: Option<Tone>) {
        dom.set_text(&self.status, text);
        dom.remove_class(&self.status, contract::ERROR_CLASS);
        dom.remove_class(&self.status, contract::SUCCESS_CLASS);
        if let Some(tone) = tone {
            dom.add_class(&self.status, tone.class());
        }
    }

    fn set_copy_visible(&self, dom: &mut D, visible: bool) {
        if let Some(button) = &self.copy_button {
            if visible {
                dom.remove_attribute(button, contract::HIDDEN);
            } else {
                dom.set_attribute(button, contract::HIDDEN, "");
            }
        }
    }

    /// Handle a submit event. The caller cancels the browser's default
    /// navigation.
    pub fn submit<H: Host + ?Sized>(&mut self, dom: &mut D, host: &mut H) {
        self.set_status(dom, "", None);
        self.set_copy_visible(dom, false);
        self.pending_copy = None;
        self.copy_in_flight = false;
        self.handle = None;

        self.state = SubmissionState::Validating;
        if !self.fields.validate_all(dom) {
            self.state = SubmissionState::Rejected;
            self.set_status(dom, REJECTED_MESSAGE, Some(Tone::Error));
            tracing::debug!("submission rejected");
            return;
        }

        self.state = SubmissionState::Composing;
        let draft = SubmissionDraft::from_values(|id| self.fields.value(dom, id));
        let composed = message::compose(&draft, &self.contact);

        self.attempt += 1;
        self.handle = host.open_compose(&composed.mailto);
        self.pending_copy = Some(composed.plain_text);
        self.state = SubmissionState::Dispatched {
            attempt: self.attempt,
        };
        host.schedule(
            self.dispatch_check,
            Task::EvaluateDispatch {
                attempt: self.attempt,
            },
        );
        tracing::debug!(
            attempt = self.attempt,
            handle = self.handle.is_some(),
            "submission dispatched"
        );
    }

    /// Probe the compose context opened by `attempt` and settle the
    /// submission. Returns `None` for a stale evaluation.
    pub fn evaluate_dispatch<H: Host + ?Sized>(
        &mut self,
        dom: &mut D,
        host: &H,
        attempt: u64,
    ) -> Option<DispatchOutcome> {
        if self.state != (SubmissionState::Dispatched { attempt }) {
            tracing::debug!(attempt, current = self.attempt, "stale dispatch check dropped");
            return None;
        }
        let probe = self.handle.take().map(|h| host.probe_compose(h));
        let outcome = DispatchOutcome::from_probe(probe);
        match outcome {
            DispatchOutcome::ProbableSuccess => {
                self.state = SubmissionState::Confirmed;
                self.pending_copy = None;
                self.set_status(dom, CONFIRMED_MESSAGE, Some(Tone::Success));
                dom.reset_form(&self.form);
                self.fields.clear_all(dom);
            }
            DispatchOutcome::ProbableFailure => {
                self.state = SubmissionState::FallbackOffered;
                self.set_status(dom, FALLBACK_MESSAGE, Some(Tone::Error));
                self.set_copy_visible(dom, true);
            }
        }
        tracing::debug!(attempt, ?outcome, ?probe, "dispatch evaluated");
        Some(outcome)
    }

    /// Start the one-shot clipboard copy. Returns `false` if there is
    /// nothing to copy.
    pub fn begin_copy<H: Host + ?Sized>(&mut self, dom: &mut D, host: &mut H) -> bool {
        if self.state != SubmissionState::FallbackOffered {
            return false;
        }
        let Some(text) = self.pending_copy.take() else {
            return false;
        };
        self.set_copy_visible(dom, false);
        self.copy_in_flight = true;
        host.write_clipboard(text);
        true
    }

    /// Report the clipboard write started by [`begin_copy`](Self::begin_copy).
    pub fn finish_copy(&mut self, dom: &mut D, result: Result<(), ClipboardError>) {
        if !self.copy_in_flight {
            tracing::debug!("clipboard result without a pending copy ignored");
            return;
        }
        self.copy_in_flight = false;
        match result {
            Ok(()) => {
                let text = format!(
                    "Email content copied! Please paste into your email client and send to {}",
                    self.contact.recipient
                );
                self.set_status(dom, &text, Some(Tone::Success));
            }
            Err(e) => {
                tracing::warn!(error = %e, "clipboard copy failed");
                let text = format!(
                    "Unable to copy. Please email {} directly.",
                    self.contact.recipient
                );
                self.set_status(dom, &text, Some(Tone::Error));
            }
        }
    }
}
