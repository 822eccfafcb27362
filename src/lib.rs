//! # Site Interactions
//!
//! The client-side interaction layer of a small marketing site: a navigation
//! drawer, an image lightbox, and a contact form that hands its message to
//! the visitor's mail client, with a clipboard copy as the fallback when
//! the handoff appears to fail. There is no backend; everything runs in one
//! browser tab.
//!
//! # Architecture: Core Behind Two Traits
//!
//! ```text
//!            UiEvent / Task / clipboard result
//!  browser ─────────────────────────────────▶ Site ──▶ NavDrawer    ─┐
//!  (web)                                         ├──▶ ImageViewer  ─┼─▶ Dom  (read/write the page)
//!  tests   ─────────────────────────────────▶    └──▶ ContactForm  ─┘   Host (timers, compose, clipboard)
//!  (headless)
//! ```
//!
//! Every page access goes through [`dom::Dom`] and every platform service
//! through [`host::Host`]. The browser build implements both over `web-sys`;
//! [`dom::MemoryDom`] and [`host::MemoryHost`] implement them in memory, so
//! the whole site, timers included, runs in ordinary `cargo test`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | `Dom` trait, markup contract ids, in-memory document |
//! | [`host`] | `Host` trait, deferred `Task`s, clipboard fallback chain |
//! | [`focus_trap`] | Tab wrapping inside a modal container |
//! | [`modal`] | Open/close lifecycle shared by the drawer and the lightbox |
//! | [`viewer`] | Lightbox with a wrapping image cursor |
//! | [`disclosure`] | Service card toggles and the FAQ accordion |
//! | [`validate`] | Field rules and their on-page error annotations |
//! | [`message`] | `mailto:` and clipboard renderings of a submission |
//! | [`submit`] | Submission state machine with the dispatch heuristic |
//! | [`site`] | Mounts the components and routes events and tasks |
//! | [`headless`] | A mounted site over the in-memory document and host |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`markup`] | Maud rendering of the markup contract |
//! | [`output`] | CLI output formatting |
//! | [`console`] | `tracing` subscriber for a console without stderr |
//! | `web` | Browser listeners and host, `wasm32` only |
//!
//! # Design Decisions
//!
//! ## Markup Is the State
//!
//! `is-open`, `aria-expanded`, `aria-hidden`, `aria-invalid` and the error
//! texts live on the elements, and the controllers read them back rather
//! than shadowing them. The drawer decides whether a toggle click opens or
//! closes by reading `aria-expanded`.
//!
//! ## Deferred Work Is Data
//!
//! The focus move after a modal opens and the mail-client check after a
//! submission are [`host::Task`] values, not closures. Each carries a
//! generation (modals) or attempt (submissions) number, so a task that
//! outlived the state it was scheduled for is recognised and dropped.
//!
//! ## The Dispatch Check Is a Heuristic
//!
//! A `mailto:` handoff reports nothing back. Half a second later the opened
//! context is probed once; missing, closed or unreadable means the visitor
//! is offered a clipboard copy of the same message.

pub mod config;
pub mod console;
pub mod disclosure;
pub mod dom;
pub mod focus_trap;
pub mod headless;
pub mod host;
pub mod markup;
pub mod message;
pub mod modal;
pub mod output;
pub mod site;
pub mod submit;
pub mod validate;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
