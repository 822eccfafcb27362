//! Browser entry point.
//!
//! Mounts a [`Site`] over the live document and installs one listener per
//! event type on `document`. Host requests made while handling an event
//! are queued in [`WebHost`] and drained once the handler has released the
//! site, so timer callbacks and clipboard promises never run re-entrantly.
//! `tracing` output goes to the browser console.

use crate::config;
use crate::console;
use crate::dom::web::WebDom;
use crate::dom::{Key, KeyPress};
use crate::host::{ClipboardError, ComposeHandle, ComposeProbe, Host, Task};
use crate::site::{EventOutcome, Site, UiEvent};
use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::Level;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, Element, Event, HtmlDocument, HtmlTextAreaElement, KeyboardEvent, Window};

// ============================================================================
// Host
// ============================================================================

enum Request {
    Schedule(Duration, Task),
    Copy(String),
}

pub struct WebHost {
    window: Window,
    contexts: HashMap<u32, Window>,
    next_handle: u32,
    requests: Vec<Request>,
}

impl WebHost {
    fn new(window: Window) -> Self {
        Self {
            window,
            contexts: HashMap::new(),
            next_handle: 0,
            requests: Vec::new(),
        }
    }
}

impl Host for WebHost {
    fn schedule(&mut self, delay: Duration, task: Task) {
        self.requests.push(Request::Schedule(delay, task));
    }

    fn open_compose(&mut self, uri: &str) -> Option<ComposeHandle> {
        match self.window.open_with_url_and_target(uri, "_blank") {
            Ok(Some(context)) => {
                self.next_handle += 1;
                self.contexts.insert(self.next_handle, context);
                Some(ComposeHandle(self.next_handle))
            }
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(error = ?e, "window.open threw");
                None
            }
        }
    }

    fn probe_compose(&self, handle: ComposeHandle) -> ComposeProbe {
        let Some(context) = self.contexts.get(&handle.0) else {
            return ComposeProbe::Closed;
        };
        match context.closed() {
            Ok(true) => ComposeProbe::Closed,
            Ok(false) => ComposeProbe::Open,
            Err(_) => ComposeProbe::Unsupported,
        }
    }

    fn write_clipboard(&mut self, text: String) {
        self.requests.push(Request::Copy(text));
    }
}

// ============================================================================
// Clipboard
// ============================================================================

fn describe(error: &JsValue) -> String {
    error
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.name()))
        .or_else(|| error.as_string())
        .unwrap_or_else(|| "unknown error".to_string())
}

/// Same order as [`crate::host::copy_text`]: the async API when the
/// navigator has one, otherwise a hidden textarea and `execCommand`.
async fn copy_to_clipboard(text: String) -> Result<(), ClipboardError> {
    let window = web_sys::window().ok_or(ClipboardError::Unavailable)?;
    let navigator = window.navigator();
    let has_api = js_sys::Reflect::has(&navigator, &JsValue::from_str("clipboard")).unwrap_or(false);
    if has_api {
        let promise = navigator.clipboard().write_text(&text);
        return JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| ClipboardError::Rejected(describe(&e)));
    }
    let document = window.document().ok_or(ClipboardError::Unavailable)?;
    copy_via_selection(&document, &text)
}

fn copy_via_selection(document: &Document, text: &str) -> Result<(), ClipboardError> {
    let body = document.body().ok_or(ClipboardError::CommandFailed)?;
    let area = document
        .create_element("textarea")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
        .ok_or(ClipboardError::CommandFailed)?;
    area.set_value(text);
    let _ = area.set_attribute("readonly", "");
    let style = area.style();
    let _ = style.set_property("position", "fixed");
    let _ = style.set_property("left", "-9999px");
    body.append_child(&area)
        .map_err(|_| ClipboardError::CommandFailed)?;
    area.select();
    let copied = document
        .dyn_ref::<HtmlDocument>()
        .map(|doc| doc.exec_command("copy"))
        .unwrap_or(Ok(false));
    area.remove();
    match copied {
        Ok(true) => Ok(()),
        _ => Err(ClipboardError::CommandFailed),
    }
}

// ============================================================================
// Logging
// ============================================================================

fn console_sink(level: Level, line: &str) {
    let line = JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&line),
        Level::WARN => web_sys::console::warn_1(&line),
        Level::INFO => web_sys::console::info_1(&line),
        _ => web_sys::console::debug_1(&line),
    }
}

// ============================================================================
// Event loop glue
// ============================================================================

struct App {
    dom: WebDom,
    host: WebHost,
    site: Site<WebDom>,
}

type Shared = Rc<RefCell<App>>;

/// Hand queued host requests to the browser.
fn drain(app: &Shared) {
    let requests = match app.try_borrow_mut() {
        Ok(mut app) => std::mem::take(&mut app.host.requests),
        Err(_) => return,
    };
    for request in requests {
        match request {
            Request::Schedule(delay, task) => {
                let app = Rc::clone(app);
                let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
                Timeout::new(millis, move || {
                    if let Ok(mut guard) = app.try_borrow_mut() {
                        let App { dom, host, site } = &mut *guard;
                        site.run_task(dom, &*host, task);
                    }
                    drain(&app);
                })
                .forget();
            }
            Request::Copy(text) => {
                let app = Rc::clone(app);
                spawn_local(async move {
                    let result = copy_to_clipboard(text).await;
                    if let Err(e) = &result {
                        tracing::warn!(error = %e, "clipboard copy failed");
                    }
                    if let Ok(mut guard) = app.try_borrow_mut() {
                        let App { dom, site, .. } = &mut *guard;
                        site.clipboard_result(dom, result);
                    }
                    drain(&app);
                });
            }
        }
    }
}

fn target_element(event: &Event) -> Option<Element> {
    event.target().and_then(|t| t.dyn_into::<Element>().ok())
}

fn to_ui_event(document: &Document, event: &Event) -> Option<UiEvent<Element>> {
    match event.type_().as_str() {
        "click" => target_element(event).map(|target| UiEvent::Click { target }),
        "keydown" => {
            let key_event = event.dyn_ref::<KeyboardEvent>()?;
            let key = KeyPress {
                key: Key::from_dom(&key_event.key()),
                shift: key_event.shift_key(),
            };
            let body = document.body().map(Element::from);
            let target = target_element(event).filter(|el| Some(el) != body.as_ref());
            Some(UiEvent::KeyDown { target, key })
        }
        "focusout" => target_element(event).map(|target| UiEvent::Blur { target }),
        "input" => target_element(event).map(|target| UiEvent::Input { target }),
        "submit" => target_element(event).map(|form| UiEvent::Submit { form }),
        "scroll" => web_sys::window().map(|window| UiEvent::Scroll {
            offset_y: window.scroll_y().unwrap_or(0.0),
        }),
        _ => None,
    }
}

fn handle(app: &Shared, event: &Event) {
    let outcome = {
        // Programmatic focus moves fire focusout while the site is busy.
        let Ok(mut guard) = app.try_borrow_mut() else {
            return;
        };
        let App { dom, host, site } = &mut *guard;
        let Some(ui_event) = to_ui_event(dom.document(), event) else {
            return;
        };
        site.dispatch(dom, host, ui_event)
    };
    if outcome == EventOutcome::PreventDefault {
        event.prevent_default();
    }
    drain(app);
}

fn listen(target: &web_sys::EventTarget, app: &Shared, event_type: &'static str, cancelable: bool) {
    let app = Rc::clone(app);
    let callback = move |event: &Event| handle(&app, event);
    let listener = if cancelable {
        EventListener::new_with_options(
            target,
            event_type,
            EventListenerOptions::enable_prevent_default(),
            callback,
        )
    } else {
        EventListener::new(target, event_type, callback)
    };
    listener.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // A second init (hot reload) keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(console::subscriber(console_sink, Level::INFO));

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let mut dom = WebDom::new(document.clone());
    let site_config = config::page_settings(&dom);
    let site = Site::mount(&mut dom, &site_config).map_err(|e| {
        tracing::error!(error = %e, "site interactions not mounted");
        JsValue::from_str(&e.to_string())
    })?;

    let app: Shared = Rc::new(RefCell::new(App {
        dom,
        host: WebHost::new(window.clone()),
        site,
    }));
    listen(&document, &app, "click", false);
    listen(&document, &app, "keydown", true);
    listen(&document, &app, "focusout", false);
    listen(&document, &app, "input", false);
    listen(&document, &app, "submit", true);
    // The class toggle is idempotent, so every scroll event is handled.
    listen(&window, &app, "scroll", false);
    Ok(())
}
