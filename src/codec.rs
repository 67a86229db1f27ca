//! Form serialization and the control `content` encoding.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Map, Value};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{FormData, HtmlFormElement};

use crate::error::CodecError;
use crate::graph::Graph;
use crate::models::DrawflowExport;
use crate::schema_validation::validate_workflow;

const HEADER_KEY_PREFIX: &str = "headers-key";
const HEADER_VALUE_PREFIX: &str = "headers-value";

/// Flatten form entries into an object; later keys win.
pub fn form_to_object(entries: &[(String, String)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// Like [`form_to_object`], but folds `headers-key<N>` / `headers-value<N>`
/// pairs into a nested `headers` object keyed by the entered header name.
pub fn form_to_object_multi(entries: &[(String, String)]) -> Map<String, Value> {
    let mut data = Map::new();
    let mut headers: Option<Map<String, Value>> = None;
    let mut remember: HashMap<&str, &str> = HashMap::new();

    for (key, value) in entries {
        if let Some(suffix) = key.strip_prefix(HEADER_KEY_PREFIX) {
            headers
                .get_or_insert_with(Map::new)
                .insert(value.clone(), Value::String(String::new()));
            remember.insert(suffix, value.as_str());
            continue;
        }

        if let Some(suffix) = key.strip_prefix(HEADER_VALUE_PREFIX) {
            let Some(header_key) = remember.get(suffix) else {
                continue;
            };
            headers
                .get_or_insert_with(Map::new)
                .insert(header_key.to_string(), Value::String(value.clone()));
            continue;
        }

        data.insert(key.clone(), Value::String(value.clone()));
    }

    if let Some(headers) = headers {
        data.insert("headers".to_string(), Value::Object(headers));
    }

    data
}

/// Read `(name, value)` pairs out of a form. File inputs are skipped.
pub fn form_entries(form: &HtmlFormElement) -> Result<Vec<(String, String)>, JsValue> {
    let form_data = FormData::new_with_form(form)?;
    let mut entries = Vec::new();

    let Some(iter) = js_sys::try_iter(form_data.as_ref())? else {
        return Ok(entries);
    };
    for item in iter {
        let pair: js_sys::Array = item?.dyn_into()?;
        let (Some(key), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) else {
            continue;
        };
        entries.push((key, value));
    }

    Ok(entries)
}

pub fn form_element_to_object(form: &HtmlFormElement) -> Result<Map<String, Value>, JsValue> {
    Ok(form_to_object(&form_entries(form)?))
}

pub fn form_element_to_object_multi(form: &HtmlFormElement) -> Result<Map<String, Value>, JsValue> {
    Ok(form_to_object_multi(&form_entries(form)?))
}

/// Plain JSON for the `content` field of a control write. The backend
/// base64-encodes it on POST, PUT and PATCH.
pub fn content_json(export: &DrawflowExport) -> Result<String, CodecError> {
    Ok(serde_json::to_string(export)?)
}

/// Base64 JSON, as stored in a control's `content` and returned by
/// `GET /control`.
pub fn encode_content(export: &DrawflowExport) -> Result<String, CodecError> {
    Ok(STANDARD.encode(content_json(export)?))
}

/// Decode and validate a control's `content`. An empty content is an empty
/// workflow.
pub fn decode_content(content: &str) -> Result<Graph, CodecError> {
    if content.trim().is_empty() {
        return Ok(Graph::new());
    }

    let bytes = STANDARD.decode(content.trim())?;
    let text = String::from_utf8(bytes)?;
    let value: Value = serde_json::from_str(&text)?;
    if !validate_workflow(&value) {
        return Err(CodecError::Schema);
    }

    let export: DrawflowExport = serde_json::from_value(value)?;
    Ok(Graph::import(&export)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeKind;

    fn entries(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn plain_form_last_key_wins() {
        let obj = form_to_object(&entries(&[("name", "a"), ("groups", "x"), ("name", "b")]));
        assert_eq!(obj["name"], "b");
        assert_eq!(obj["groups"], "x");
    }

    #[test]
    fn header_pairs_fold_into_object() {
        let obj = form_to_object_multi(&entries(&[
            ("name", "jira"),
            ("headers-key0", "Content-Type"),
            ("headers-value0", "application/json"),
            ("headers-key1", "X-Empty"),
            ("headers-value7", "orphan"),
        ]));

        assert_eq!(obj["name"], "jira");
        assert_eq!(obj["headers"]["Content-Type"], "application/json");
        assert_eq!(obj["headers"]["X-Empty"], "");
        assert_eq!(obj["headers"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn content_round_trips_through_base64() {
        let mut graph = Graph::new();
        let e = graph.add_node(NodeKind::Endpoint, 1.0, 2.0).unwrap();
        let r = graph.add_node(NodeKind::Respond, 3.0, 4.0).unwrap();
        graph.add_connection(e, 1, r, 1).unwrap();

        let content = encode_content(&graph.export()).unwrap();
        assert_eq!(decode_content(&content).unwrap(), graph);
    }

    #[test]
    fn written_json_decodes_once_stored() {
        let mut graph = Graph::new();
        graph.add_node(NodeKind::Hub, 1.0, 2.0).unwrap();

        let written = content_json(&graph.export()).unwrap();
        assert!(written.starts_with(r#"{"drawflow":"#));
        let stored = STANDARD.encode(&written);
        assert_eq!(stored, encode_content(&graph.export()).unwrap());
        assert_eq!(decode_content(&stored).unwrap(), graph);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_content("").unwrap().is_empty());
        assert!(matches!(decode_content("not base64!"), Err(CodecError::Base64(_))));
        let not_workflow = STANDARD.encode(r#"{"hello":"world"}"#);
        assert!(matches!(decode_content(&not_workflow), Err(CodecError::Schema)));
    }
}
