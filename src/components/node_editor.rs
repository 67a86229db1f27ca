//! Side panel for editing the selected node's data.

use serde_json::{Map, Number, Value};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlFormElement};

use crate::codec::form_element_to_object;
use crate::messages::Message;
use crate::models::{get_str, NodeData};
use crate::state::{dispatch_global_message, AppState};
use crate::utils::{escape_html, get_boolean};

const EDITOR_ID: &str = "node-editor";
const FORM_ID: &str = "node-editor-form";

/// Fields edited as multi-line text.
const TEXTAREA_FIELDS: [&str; 4] = ["script", "note", "headers", "inputs"];

/// Turn submitted form strings back into the node's data types. Keys the
/// form does not send (unchecked boxes) keep their type with a falsy value.
pub fn coerce_form(current: &NodeData, form: Map<String, Value>) -> NodeData {
    let mut data = NodeData::new();

    for (key, old) in current {
        let raw = form.get(key).and_then(Value::as_str);
        let value = match old {
            Value::Bool(_) => Value::Bool(get_boolean(raw)),
            Value::Number(n) => raw
                .and_then(|r| r.trim().parse::<f64>().ok())
                .and_then(Number::from_f64)
                .map(|parsed| match parsed.as_f64() {
                    Some(f) if f.fract() == 0.0 && n.is_i64() => Value::from(f as i64),
                    _ => Value::Number(parsed),
                })
                .unwrap_or_else(|| old.clone()),
            _ => raw.map_or_else(|| old.clone(), |r| Value::String(r.to_string())),
        };
        data.insert(key.clone(), value);
    }

    // New keys only arrive from custom node markup; keep them as strings.
    for (key, value) in form {
        data.entry(key).or_insert(value);
    }
    data
}

fn field_html(key: &str, value: &Value) -> String {
    let label = format!(r#"<label for="ne-{k}">{k}</label>"#, k = escape_html(key));
    let input = match value {
        Value::Bool(checked) => format!(
            r#"<input type="checkbox" id="ne-{k}" name="{k}" value="true"{c}>"#,
            k = escape_html(key),
            c = if *checked { " checked" } else { "" }
        ),
        _ if TEXTAREA_FIELDS.contains(&key) => format!(
            r#"<textarea id="ne-{k}" name="{k}">{v}</textarea>"#,
            k = escape_html(key),
            v = escape_html(&value_text(value))
        ),
        _ => format!(
            r#"<input type="text" id="ne-{k}" name="{k}" value="{v}">"#,
            k = escape_html(key),
            v = escape_html(&value_text(value))
        ),
    };
    format!(r#"<div class="field">{}{}</div>"#, label, input)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn form_html(id: u32, title: &str, data: &NodeData) -> String {
    let fields: String = data.iter().map(|(k, v)| field_html(k, v)).collect();
    format!(
        r#"<form id="{FORM_ID}" data-node-id="{id}"><div class="title-box">{}</div>{fields}<button type="submit">apply</button></form>"#,
        escape_html(title)
    )
}

fn ensure_panel(document: &Document) -> Result<Element, JsValue> {
    if let Some(el) = document.get_element_by_id(EDITOR_ID) {
        return Ok(el);
    }

    let panel = document.create_element("div")?;
    panel.set_id(EDITOR_ID);
    panel.set_class_name("node-editor hidden");

    let onsubmit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        let Some(form) = event.target().and_then(|t| t.dyn_into::<HtmlFormElement>().ok()) else {
            return;
        };
        let Some(id) = form.get_attribute("data-node-id").and_then(|v| v.parse::<u32>().ok()) else {
            return;
        };
        let submitted = match form_element_to_object(&form) {
            Ok(obj) => obj,
            Err(e) => {
                web_sys::console::error_2(&"failed to read node form".into(), &e);
                return;
            }
        };
        let current = crate::state::APP_STATE.with(|s| s.borrow().graph.node(id).map(|n| n.data.clone()));
        if let Some(current) = current {
            dispatch_global_message(Message::ReplaceNodeData {
                id,
                data: coerce_form(&current, submitted),
            });
        }
    });
    panel.add_event_listener_with_callback("submit", onsubmit.as_ref().unchecked_ref())?;
    onsubmit.forget();

    document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?
        .append_child(&panel)?;
    Ok(panel)
}

pub fn refresh(document: &Document, state: &AppState) -> Result<(), JsValue> {
    let panel = ensure_panel(document)?;

    let Some(node) = state.selected_node.and_then(|id| state.graph.node(id)) else {
        panel.set_inner_html("");
        panel.class_list().add_1("hidden")?;
        return Ok(());
    };

    let title = match get_str(&node.data, "endpoint") {
        e if !e.is_empty() => format!("{} {}", node.kind.spec().title, e),
        _ => node.kind.spec().title.to_string(),
    };
    panel.set_inner_html(&form_html(node.id, &title, &node.data));
    panel.class_list().remove_1("hidden")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeKind;
    use serde_json::json;

    fn form(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), json!(v))).collect()
    }

    #[test]
    fn keeps_types_of_existing_fields() {
        let current = NodeKind::Note.default_data();
        let data = coerce_form(&current, form(&[("note", "hi"), ("width", "300"), ("height", "x")]));
        assert_eq!(data["note"], "hi");
        assert_eq!(data["width"], json!(300));
        assert_eq!(data["height"], json!(32));
        assert_eq!(data["backgroundColor"], "#FEF9C3");
    }

    #[test]
    fn missing_checkbox_reads_false() {
        let mut current = NodeKind::Request.default_data();
        current.insert("skip_verify".into(), json!(true));
        let data = coerce_form(&current, form(&[("pool_client", "true"), ("url", "http://x")]));
        assert_eq!(data["skip_verify"], json!(false));
        assert_eq!(data["pool_client"], json!(true));
        assert_eq!(data["url"], "http://x");
    }

    #[test]
    fn form_html_escapes_values() {
        let mut data = NodeData::new();
        data.insert("if".into(), json!("a < \"b\""));
        data.insert("public".into(), json!(true));
        let html = form_html(4, "IF", &data);
        assert!(html.contains(r#"data-node-id="4""#));
        assert!(html.contains(r#"value="a &lt; &quot;b&quot;""#));
        assert!(html.contains(r#"name="public" value="true" checked"#));
    }
}
