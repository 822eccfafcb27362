//! Platform services the interaction layer asks for: timers, opening a
//! compose context, and the clipboard.
//!
//! Deferred work is plain data. A component calls [`Host::schedule`] with a
//! [`Task`]; when the delay elapses the host hands the task back to
//! [`Site::run_task`](crate::site::Site::run_task). The browser host does
//! this with `setTimeout`, [`MemoryHost`] with a virtual clock the caller
//! advances.

use crate::modal::ModalKind;
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;

/// Work scheduled for later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Move focus into a modal that was opened `generation` opens ago.
    FocusModal { modal: ModalKind, generation: u64 },
    /// Decide whether submission `attempt` reached a mail client.
    EvaluateDispatch { attempt: u64 },
}

/// Opaque reference to a browsing context opened for a `mailto:` URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComposeHandle(pub u32);

/// What the host can say about a compose context after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeProbe {
    Open,
    Closed,
    /// The environment cannot report on the context at all.
    Unsupported,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard API unavailable")]
    Unavailable,
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
    #[error("legacy copy command failed")]
    CommandFailed,
}

pub trait Host {
    fn schedule(&mut self, delay: Duration, task: Task);

    /// Ask the platform to open `uri` in a new browsing context.
    ///
    /// `None` means no reference came back (pop-up blocked, no handler).
    fn open_compose(&mut self, uri: &str) -> Option<ComposeHandle>;

    fn probe_compose(&self, handle: ComposeHandle) -> ComposeProbe;

    /// Start writing `text` to the system clipboard. The result is reported
    /// later through [`Site::clipboard_result`](crate::site::Site::clipboard_result).
    fn write_clipboard(&mut self, text: String);
}

/// Synchronous clipboard backends.
pub trait Clipboard {
    /// Asynchronous clipboard API. `Err(Unavailable)` when the API is missing.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Hidden selectable text field plus the legacy copy command.
    fn copy_via_selection(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Copy `text`, preferring the clipboard API and falling back to the legacy
/// selection path only when the API is missing.
///
/// A rejection from an available API is final; it is not retried through
/// the legacy path.
pub fn copy_text<C: Clipboard + ?Sized>(clipboard: &mut C, text: &str) -> Result<(), ClipboardError> {
    match clipboard.write_text(text) {
        Err(ClipboardError::Unavailable) => clipboard.copy_via_selection(text),
        other => other,
    }
}

// ============================================================================
// In-memory host
// ============================================================================

/// Clipboard with switchable capabilities.
#[derive(Debug, Clone)]
pub struct MemoryClipboard {
    pub api_available: bool,
    pub api_rejects: bool,
    pub legacy_works: bool,
    contents: Option<String>,
}

impl Default for MemoryClipboard {
    fn default() -> Self {
        Self {
            api_available: true,
            api_rejects: false,
            legacy_works: true,
            contents: None,
        }
    }
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if !self.api_available {
            return Err(ClipboardError::Unavailable);
        }
        if self.api_rejects {
            return Err(ClipboardError::Rejected("NotAllowedError".to_string()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }

    fn copy_via_selection(&mut self, text: &str) -> Result<(), ClipboardError> {
        if !self.legacy_works {
            return Err(ClipboardError::CommandFailed);
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// How [`MemoryHost`] answers a compose request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeBehavior {
    /// A context opens and stays open.
    #[default]
    Opens,
    /// No reference comes back.
    Blocked,
    /// A reference comes back but the context is already closed.
    ClosesImmediately,
    /// A reference comes back but its state cannot be read.
    Unsupported,
}

#[derive(Debug, Clone)]
struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

/// Host with a virtual clock, scripted compose behavior and an in-memory
/// clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    now: Duration,
    seq: u64,
    pending: Vec<Pending>,
    pub compose: ComposeBehavior,
    opened: Vec<String>,
    pub clipboard: MemoryClipboard,
    clipboard_results: VecDeque<Result<(), ClipboardError>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compose(compose: ComposeBehavior) -> Self {
        Self {
            compose,
            ..Self::default()
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// URIs passed to [`Host::open_compose`], oldest first.
    pub fn opened(&self) -> &[String] {
        &self.opened
    }

    pub fn pending_tasks(&self) -> Vec<Task> {
        self.pending.iter().map(|p| p.task).collect()
    }

    /// Move the clock forward and return the tasks that fell due, in due
    /// order (ties in scheduling order).
    pub fn advance(&mut self, by: Duration) -> Vec<Task> {
        self.now += by;
        let now = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by_key(|p| (p.due, p.seq));
        due.into_iter().map(|p| p.task).collect()
    }

    /// Clipboard outcomes not yet delivered to the site.
    pub fn take_clipboard_results(&mut self) -> Vec<Result<(), ClipboardError>> {
        self.clipboard_results.drain(..).collect()
    }
}

impl Host for MemoryHost {
    fn schedule(&mut self, delay: Duration, task: Task) {
        self.seq += 1;
        self.pending.push(Pending {
            due: self.now + delay,
            seq: self.seq,
            task,
        });
    }

    fn open_compose(&mut self, uri: &str) -> Option<ComposeHandle> {
        self.opened.push(uri.to_string());
        match self.compose {
            ComposeBehavior::Blocked => None,
            _ => Some(ComposeHandle(self.opened.len() as u32)),
        }
    }

    fn probe_compose(&self, _handle: ComposeHandle) -> ComposeProbe {
        match self.compose {
            ComposeBehavior::Opens => ComposeProbe::Open,
            ComposeBehavior::Blocked | ComposeBehavior::ClosesImmediately => ComposeProbe::Closed,
            ComposeBehavior::Unsupported => ComposeProbe::Unsupported,
        }
    }

    fn write_clipboard(&mut self, text: String) {
        let result = copy_text(&mut self.clipboard, &text);
        self.clipboard_results.push_back(result);
    }
}
