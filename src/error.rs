//! Error types for the editor core and the REST layer.
//!
//! Everything browser-facing still speaks `Result<_, JsValue>`; the `From`
//! impls below are the single place where typed errors cross that boundary.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0} not found")]
    NodeNotFound(u32),
    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),
    #[error("node {node} has no {direction} port {port}")]
    PortOutOfRange {
        node: u32,
        direction: &'static str,
        port: usize,
    },
    #[error("node {0} cannot connect to itself")]
    SelfConnection(u32),
    #[error("connection {from}:{output} -> {to}:{input} already exists")]
    DuplicateConnection {
        from: u32,
        output: usize,
        to: u32,
        input: usize,
    },
    #[error("invalid node id '{0}'")]
    InvalidId(String),
    #[error("invalid port name '{0}'")]
    InvalidPort(String),
    #[error("module '{0}' missing from export")]
    MissingModule(String),
    #[error("no node ids left")]
    IdsExhausted,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("content is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("content is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("content is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("content does not match the workflow schema")]
    Schema,
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("token not found")]
    TokenNotFound,
    #[error("token not defined")]
    TokenNotDefined,
    #[error("stored token is not valid json: {0}")]
    TokenCorrupt(String),
    #[error("API request failed: {status} {message}")]
    Status { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("browser error: {0}")]
    Js(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<JsValue> for ApiError {
    fn from(value: JsValue) -> Self {
        ApiError::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<GraphError> for JsValue {
    fn from(e: GraphError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

impl From<CodecError> for JsValue {
    fn from(e: CodecError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

impl From<ApiError> for JsValue {
    fn from(e: ApiError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
