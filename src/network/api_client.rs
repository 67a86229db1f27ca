use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use super::config::{api_config, ApiConfig};
use crate::auth::token::token_get;
use crate::constants::DEFAULT_LIST_LIMIT;
use crate::error::ApiError;
use crate::models::{
    ApiData, ApiDataMeta, ApiErrorBody, AuthItem, Control, ControlItem, LoginToken, RecordId, ServerInfo,
    TemplateItem, TokenCheck,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// Raw HTTP result; typed wrappers decode `body` themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Unwrap the backend's `{"data": ...}` envelope.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.json::<ApiData<T>>()?
            .data
            .ok_or_else(|| ApiError::Decode("response has no data".to_string()))
    }
}

/// `base/area?k=v&...`, with duplicate slashes collapsed and params
/// form-encoded. Empty param values are dropped.
pub fn build_url(config: &ApiConfig, area: &str, params: &[(&str, String)]) -> String {
    let url = config.url(area);
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params.iter().filter(|(_, v)| !v.is_empty()) {
        query.append_pair(key, value);
        any = true;
    }

    if any {
        format!("{}?{}", url, query.finish())
    } else {
        url
    }
}

/// Human-readable error for a failed response. Prefers the backend's
/// `{"error": ...}` field, then the raw body.
pub fn error_message(status: u16, body: &str) -> String {
    let from_body = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|e| match e {
            Value::String(s) => s,
            other => other.to_string(),
        });

    match from_body {
        Some(msg) if !msg.is_empty() => msg,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => format!("status {}", status),
    }
}

/// Send a request to the workflow backend.
///
/// With `use_token` the stored JWT is attached as a bearer token; a missing
/// token is only logged so public endpoints keep working.
pub async fn request_sender(
    area: &str,
    params: &[(&str, String)],
    method: Method,
    body: Option<&Value>,
    use_token: bool,
) -> Result<ApiResponse, ApiError> {
    let url = build_url(&api_config(), area, params);

    let opts = RequestInit::new();
    opts.set_method(method.as_str());
    opts.set_mode(RequestMode::SameOrigin);

    let headers = Headers::new()?;
    if use_token {
        match token_get() {
            Ok((token, _)) => headers.append("Authorization", &format!("Bearer {}", token))?,
            Err(e) => web_sys::console::warn_1(&format!("request without token: {}", e).into()),
        }
    }

    if let Some(data) = body {
        opts.set_body(&JsValue::from_str(&serde_json::to_string(data)?));
        headers.append("Content-Type", "application/json")?;
    }
    opts.set_headers(&headers);

    let request = Request::new_with_str_and_init(&url, &opts)?;
    let window = web_sys::window().ok_or_else(|| ApiError::Js("no global window exists".to_string()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    let status = resp.status();
    let text = JsFuture::from(resp.text()?).await?;
    let body = text.as_string().unwrap_or_default();

    crate::debug_log!("{} {} -> {}", method.as_str(), url, status);

    if !resp.ok() {
        return Err(ApiError::Status {
            status,
            message: error_message(status, &body),
        });
    }

    Ok(ApiResponse { status, body })
}

fn to_value<T: Serialize>(body: &T) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(body)?)
}

/// Method and body for a save. `content` goes out as given; the backend
/// base64-encodes it before storing.
pub fn save_request(control: &Control) -> Result<(Method, Value), ApiError> {
    Ok((Method::Put, to_value(control)?))
}

// REST API client for the workflow backend
pub struct ApiClient;

impl ApiClient {
    // ---------------- Public ----------------

    pub async fn info() -> Result<ServerInfo, ApiError> {
        request_sender("/info", &[], Method::Get, None, false).await?.json()
    }

    pub async fn ping() -> Result<(), ApiError> {
        request_sender("/ping", &[], Method::Get, None, false).await?;
        Ok(())
    }

    // ---------------- Token ----------------

    /// `POST /login`; the body is whatever the login form produced.
    pub async fn login(body: &Value, params: &[(&str, String)]) -> Result<String, ApiError> {
        let resp = request_sender("/login", params, Method::Post, Some(body), false).await?;
        Ok(resp.data::<LoginToken>()?.token)
    }

    pub async fn renew(params: &[(&str, String)]) -> Result<String, ApiError> {
        let resp = request_sender("/token/renew", params, Method::Get, None, true).await?;
        Ok(resp.data::<LoginToken>()?.token)
    }

    pub async fn token_check(token: &str) -> Result<(), ApiError> {
        let body = to_value(&TokenCheck { token: token.to_string() })?;
        request_sender("/token/check", &[], Method::Post, Some(&body), false).await?;
        Ok(())
    }

    // ---------------- Controls ----------------

    pub async fn list_controls(limit: Option<u32>, offset: u32) -> Result<ApiDataMeta<Vec<ControlItem>>, ApiError> {
        let params = [
            ("limit", limit.unwrap_or(DEFAULT_LIST_LIMIT).to_string()),
            ("offset", offset.to_string()),
        ];
        request_sender("/controls", &params, Method::Get, None, true).await?.json()
    }

    pub async fn get_control(name: &str) -> Result<Control, ApiError> {
        request_sender("/control", &[("name", name.to_string())], Method::Get, None, true)
            .await?
            .data()
    }

    /// Create a control and return its new id.
    pub async fn post_control(control: &Control) -> Result<String, ApiError> {
        let body = to_value(control)?;
        let resp = request_sender("/control", &[], Method::Post, Some(&body), true).await?;
        Ok(resp.data::<RecordId>()?.id)
    }

    pub async fn put_control(control: &Control) -> Result<(), ApiError> {
        let body = to_value(control)?;
        request_sender("/control", &[], Method::Put, Some(&body), true).await?;
        Ok(())
    }

    /// Partial update, e.g. only `content`.
    pub async fn patch_control(id: &str, fields: &Value) -> Result<(), ApiError> {
        let mut body = fields.clone();
        if let Value::Object(map) = &mut body {
            map.insert("id".to_string(), Value::String(id.to_string()));
        }
        request_sender("/control", &[], Method::Patch, Some(&body), true).await?;
        Ok(())
    }

    pub async fn delete_control(name: &str) -> Result<(), ApiError> {
        request_sender("/control", &[("name", name.to_string())], Method::Delete, None, true).await?;
        Ok(())
    }

    /// Save by name. `PUT /control` upserts on the control name, so this
    /// both creates and updates.
    pub async fn save_control(control: &Control) -> Result<(), ApiError> {
        let (method, body) = save_request(control)?;
        request_sender("/control", &[], method, Some(&body), true).await?;
        Ok(())
    }

    // ---------------- Lookups ----------------

    pub async fn list_templates(folder: &str) -> Result<Vec<TemplateItem>, ApiError> {
        let params = [("folder", folder.to_string()), ("limit", "0".to_string())];
        let resp: ApiDataMeta<Vec<TemplateItem>> =
            request_sender("/templates", &params, Method::Get, None, true).await?.json()?;
        Ok(resp.data.unwrap_or_default())
    }

    pub async fn list_auths() -> Result<Vec<AuthItem>, ApiError> {
        let params = [("limit", "0".to_string())];
        let resp: ApiDataMeta<Vec<AuthItem>> =
            request_sender("/auths", &params, Method::Get, None, true).await?.json()?;
        Ok(resp.data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_urls_with_query() {
        let config = ApiConfig::default();
        assert_eq!(build_url(&config, "/controls", &[]), "./api/v1/controls");
        assert_eq!(
            build_url(&config, "//controls", &[("limit", "20".into()), ("offset", "0".into())]),
            "./api/v1/controls?limit=20&offset=0"
        );
        assert_eq!(
            build_url(&config, "control", &[("name", "a b&c".into()), ("id", String::new())]),
            "./api/v1/control?name=a+b%26c"
        );
    }

    #[test]
    fn error_message_prefers_backend_field() {
        assert_eq!(error_message(404, r#"{"error":"not found"}"#), "not found");
        assert_eq!(error_message(400, r#"{"error":{"code":1}}"#), r#"{"code":1}"#);
        assert_eq!(error_message(502, "Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(500, ""), "status 500");
    }

    #[test]
    fn unwraps_data_envelope() {
        let resp = ApiResponse {
            status: 200,
            body: r#"{"data":{"token":"abc"}}"#.to_string(),
        };
        assert_eq!(resp.data::<LoginToken>().unwrap().token, "abc");

        let empty = ApiResponse { status: 200, body: "{}".to_string() };
        assert!(matches!(empty.data::<LoginToken>(), Err(ApiError::Decode(_))));
    }

    #[test]
    fn save_is_a_plain_put() {
        let control = Control {
            name: "orders".into(),
            content: r#"{"drawflow":{}}"#.into(),
            ..Control::default()
        };
        let (method, body) = save_request(&control).unwrap();
        assert_eq!(method, Method::Put);
        assert_eq!(body["name"], "orders");
        assert_eq!(body["content"], r#"{"drawflow":{}}"#);
    }

    #[test]
    fn method_names() {
        assert_eq!(Method::Patch.as_str(), "PATCH");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }
}
