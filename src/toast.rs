//! Toast notifications.
//! `ToastStore` is the pure list kept in `AppState`; the DOM side renders it
//! into a `#toast-root` container created once per page and owns the timers
//! that expire each toast.

use std::cell::RefCell;
use std::collections::HashMap;

use gloo_timers::callback::Timeout;
use serde::Serialize;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, Event};

use crate::constants::DEFAULT_TOAST_TIMEOUT_MS;
use crate::messages::Message;
use crate::state::dispatch_global_message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Info,
    Warn,
    Alert,
}

impl ToastKind {
    /// Unknown names fall back to `info`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "warn" => ToastKind::Warn,
            "alert" => ToastKind::Alert,
            _ => ToastKind::Info,
        }
    }

    fn class(self) -> &'static str {
        match self {
            ToastKind::Info => "toast-info",
            ToastKind::Warn => "toast-warn",
            ToastKind::Alert => "toast-alert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub kind: ToastKind,
    /// Milliseconds until removal; 0 keeps the toast until closed.
    pub timeout_ms: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastStore {
    toasts: Vec<Toast>,
}

impl ToastStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a toast and return its id: one past the newest toast's id, or
    /// 0 for an empty store.
    pub fn add(&mut self, message: &str, kind: ToastKind, timeout_ms: u32) -> u32 {
        let id = self.toasts.last().map_or(0, |t| t.id + 1);
        self.toasts.push(Toast {
            id,
            message: message.to_string(),
            kind,
            timeout_ms,
        });
        id
    }

    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    pub fn get(&self, id: u32) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Convenience entry points
// ---------------------------------------------------------------------------

pub fn show(message: &str, kind: ToastKind, timeout_ms: u32) {
    dispatch_global_message(Message::AddToast {
        message: message.to_string(),
        kind,
        timeout_ms,
    });
}

pub fn info(message: &str) {
    show(message, ToastKind::Info, DEFAULT_TOAST_TIMEOUT_MS);
}

pub fn warn(message: &str) {
    show(message, ToastKind::Warn, DEFAULT_TOAST_TIMEOUT_MS);
}

pub fn alert(message: &str) {
    show(message, ToastKind::Alert, DEFAULT_TOAST_TIMEOUT_MS);
}

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

thread_local! {
    static TIMERS: RefCell<HashMap<u32, Timeout>> = RefCell::new(HashMap::new());
}

pub fn schedule_removal(id: u32, timeout_ms: u32) {
    if timeout_ms == 0 {
        return;
    }
    let timer = Timeout::new(timeout_ms, move || {
        dispatch_global_message(Message::RemoveToast(id));
    });
    TIMERS.with(|t| crate::mut_borrow!(t).insert(id, timer));
}

/// Dropping the `Timeout` clears it.
pub fn cancel_removal(id: u32) {
    let timer = TIMERS.with(|t| crate::mut_borrow!(t).remove(&id));
    drop(timer);
}

pub fn pending_timers() -> usize {
    TIMERS.with(|t| t.borrow().len())
}

// ---------------------------------------------------------------------------
// DOM
// ---------------------------------------------------------------------------

const TOAST_ROOT_ID: &str = "toast-root";
const TOAST_STYLES_ID: &str = "toast-styles";

/// Redraw `#toast-root` from the store, newest last.
pub fn render(document: &Document, store: &ToastStore) -> Result<(), JsValue> {
    ensure_styles(document)?;
    let root = ensure_root(document)?;
    root.set_inner_html("");

    for toast in store.iter() {
        let item = document.create_element("div")?;
        item.set_class_name("toast");
        item.class_list().add_1(toast.kind.class())?;
        item.set_attribute("data-toast-id", &toast.id.to_string())?;

        let text = document.create_element("span")?;
        text.set_text_content(Some(&toast.message));
        item.append_child(&text)?;

        let close = document.create_element("button")?;
        close.set_class_name("toast-close");
        close.set_attribute("type", "button")?;
        close.set_text_content(Some("×"));
        item.append_child(&close)?;

        root.append_child(&item)?;
    }

    Ok(())
}

fn ensure_root(document: &Document) -> Result<Element, JsValue> {
    if let Some(el) = document.get_element_by_id(TOAST_ROOT_ID) {
        return Ok(el);
    }

    let root = document.create_element("div")?;
    root.set_id(TOAST_ROOT_ID);
    root.set_class_name("toast-root");

    // One delegated listener for every close button.
    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        if !target.class_list().contains("toast-close") {
            return;
        }
        let id = target
            .closest("[data-toast-id]")
            .ok()
            .flatten()
            .and_then(|el| el.get_attribute("data-toast-id"))
            .and_then(|raw| raw.parse::<u32>().ok());
        if let Some(id) = id {
            dispatch_global_message(Message::RemoveToast(id));
        }
    });
    root.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    let body = document.body().ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.append_child(&root)?;
    Ok(root)
}

fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id(TOAST_STYLES_ID).is_some() {
        return Ok(());
    }

    let css = "
.toast-root{position:fixed;bottom:16px;right:16px;display:flex;flex-direction:column;gap:8px;z-index:9999;font-family:Arial,Helvetica,sans-serif}
.toast{display:flex;align-items:center;gap:12px;padding:10px 16px;border-radius:4px;color:#fff;box-shadow:0 2px 4px rgba(0,0,0,.1);opacity:0;animation:toast-in .2s forwards}
.toast-info{background:#2563eb}
.toast-warn{background:#d97706}
.toast-alert{background:#dc2626}
.toast-close{background:none;border:none;color:inherit;cursor:pointer;font-size:16px}
@keyframes toast-in{to{opacity:1}}
";

    let style = document.create_element("style")?;
    style.set_id(TOAST_STYLES_ID);
    style.set_text_content(Some(css));
    match document.query_selector("head")? {
        Some(head) => head.append_child(&style)?,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?
            .append_child(&style)?,
    };
    Ok(())
}
