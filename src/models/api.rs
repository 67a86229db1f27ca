// Wire models for the workflow backend's REST API (`/api/v1`).
// Responses are wrapped in `{"data": ..., "meta": ...}`; errors come back as
// `{"error": "..."}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApiData<T> {
    pub data: Option<T>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApiDataMeta<T> {
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub count: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<Value>,
}

/// `GET /info`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub build_date: String,
    #[serde(default)]
    pub build_commit: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub server_date: String,
    #[serde(default)]
    pub providers: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginToken {
    pub token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenCheck {
    pub token: String,
}

/// `{"id": ...}` returned after creating a record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordId {
    pub id: String,
}

/// Control listing entry (no content).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub groups: Option<Value>,
}

/// A stored workflow. `content` is the base64 encoded Drawflow export.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Control {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Value>,
}

/// Template folder entry, used to suggest names for template nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateItem {
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub name: String,
}

/// Named auth header set, used by request nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub headers: Option<Value>,
}
