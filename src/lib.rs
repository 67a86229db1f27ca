use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

#[macro_use]
pub mod macros;

pub mod auth;
pub mod canvas;
pub mod codec;
pub mod command_executors;
pub mod components;
pub mod constants;
pub mod drag;
pub mod error;
pub mod graph;
pub mod markdown;
pub mod messages;
pub mod models;
pub mod network;
pub mod router;
pub mod schema_validation;
pub mod state;
pub mod toast;
pub mod toc;
pub mod update;
pub mod utils;

#[cfg(all(test, target_arch = "wasm32"))]
mod tests;

use crate::constants::DEFAULT_TOAST_TIMEOUT_MS;
use crate::graph::Graph;
use crate::messages::Message;
use crate::models::{DrawflowExport, LoginRequest};
use crate::state::{dispatch_global_message, APP_STATE};
use crate::toast::ToastKind;

// Main entry point for the WASM application
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Initialize better panic messages
    console_error_panic_hook::set_once();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document on window"))?;

    // First render creates the canvas root, toolbar and editor panel.
    dispatch_global_message(Message::ImportGraph(Graph::new()));
    components::node_palette::render(&document)?;

    dispatch_global_message(Message::FetchInfo);
    Ok(())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

// ---------------------------------------------------------------------------
// Endpoint preview
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub fn view_endpoint(endpoint: String) {
    dispatch_global_message(Message::ViewEndpoint(endpoint));
}

#[wasm_bindgen]
pub fn view_endpoint_clear() {
    dispatch_global_message(Message::ViewEndpointClear);
}

// ---------------------------------------------------------------------------
// Graph import / export
// ---------------------------------------------------------------------------

/// The canvas as a Drawflow export object.
#[wasm_bindgen]
pub fn export_graph() -> Result<JsValue, JsValue> {
    let export = APP_STATE.with(|state| state.borrow().graph.export());
    to_js(&export)
}

/// Replace the canvas with a Drawflow export object.
#[wasm_bindgen]
pub fn import_graph(value: JsValue) -> Result<(), JsValue> {
    let json: serde_json::Value =
        serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    if !schema_validation::validate_workflow(&json) {
        return Err(JsValue::from_str("document does not match the workflow schema"));
    }
    let export: DrawflowExport = serde_json::from_value(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let graph = Graph::import(&export)?;
    dispatch_global_message(Message::ImportGraph(graph));
    Ok(())
}

/// Base64 `content` of the current canvas, as stored in a control.
#[wasm_bindgen]
pub fn export_content() -> Result<String, JsValue> {
    let export = APP_STATE.with(|state| state.borrow().graph.export());
    Ok(codec::encode_content(&export)?)
}

#[wasm_bindgen]
pub fn load_control(name: String) {
    dispatch_global_message(Message::LoadControl(name));
}

#[wasm_bindgen]
pub fn save_control(name: String) {
    dispatch_global_message(Message::SetControlName(name));
    dispatch_global_message(Message::SaveControl);
}

// ---------------------------------------------------------------------------
// Configuration, auth and navigation
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub fn init_api_config(url: &str) {
    network::set_api_config(network::ApiConfig::from_url(url));
}

#[wasm_bindgen]
pub async fn login(login: String, password: String) -> Result<JsValue, JsValue> {
    let claims = auth::login_and_store(&LoginRequest { login, password }).await?;
    to_js(&claims)
}

#[wasm_bindgen]
pub async fn renew() -> Result<JsValue, JsValue> {
    let claims = auth::renew_and_store().await?;
    to_js(&claims)
}

#[wasm_bindgen]
pub fn logout() {
    auth::logout();
}

/// Whether a valid login is cached; drops a stale one.
#[wasm_bindgen]
pub async fn token_condition() -> bool {
    auth::token_condition().await
}

#[wasm_bindgen]
pub fn push_redirect(querystring: &str) -> Result<(), JsValue> {
    router::push_redirect(querystring)
}

// ---------------------------------------------------------------------------
// UI helpers
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub fn add_toast(message: &str, kind: Option<String>, timeout: Option<u32>) {
    let kind = kind.as_deref().map_or(ToastKind::Info, ToastKind::from_name);
    toast::show(message, kind, timeout.unwrap_or(DEFAULT_TOAST_TIMEOUT_MS));
}

#[wasm_bindgen]
pub fn remove_toast(id: u32) {
    dispatch_global_message(Message::RemoveToast(id));
}

#[wasm_bindgen]
pub fn render_markdown(markdown: &str) -> String {
    markdown::render(markdown)
}

#[wasm_bindgen]
pub fn markdown_toc(markdown: &str) -> Result<JsValue, JsValue> {
    to_js(&toc::generate_toc(markdown))
}

/// Read a form into a plain object; `multi` folds header key/value rows.
#[wasm_bindgen]
pub fn form_to_object(form: web_sys::HtmlFormElement, multi: bool) -> Result<JsValue, JsValue> {
    let obj = if multi {
        codec::form_element_to_object_multi(&form)?
    } else {
        codec::form_element_to_object(&form)?
    };
    to_js(&obj)
}

/// Let JS drag a panel or divider; `on_move(dx, dy)` gets the deltas.
#[wasm_bindgen]
pub fn move_element(element: HtmlElement, x: bool, y: bool, on_move: js_sys::Function) -> Result<(), JsValue> {
    let handle = drag::move_element(
        &element,
        x,
        y,
        move |dx, dy| {
            if let Err(e) = on_move.call2(&JsValue::NULL, &dx.into(), &dy.into()) {
                web_sys::console::error_2(&"drag callback failed".into(), &e);
            }
        },
        || {},
    )?;
    handle.forget();
    Ok(())
}
