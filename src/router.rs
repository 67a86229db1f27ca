//! Hash-route redirects after login.

use wasm_bindgen::JsValue;

/// The `back` parameter of a query string, or `/`.
pub fn back_path(querystring: &str) -> String {
    let query = querystring.trim_start_matches('?');
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == "back" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| "/".to_string())
}

/// Navigate to the `back` route, e.g. after a successful login.
pub fn push_redirect(querystring: &str) -> Result<(), JsValue> {
    let path = back_path(querystring);
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window exists"))?;
    crate::debug_log!("redirect to #{}", path);
    window.location().set_hash(&path)
}
