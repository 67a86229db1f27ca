use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::constants::{
    DEFAULT_NOTE_BACKGROUND, DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_TEXT_COLOR, DEFAULT_NOTE_WIDTH,
    DEFAULT_SCRIPT,
};

/// Data payload of a node. Values are kept as JSON so exports round-trip
/// byte-for-byte with what the backend stores; the accessors below give the
/// string view the rest of the editor works with.
pub type NodeData = Map<String, Value>;

/// Every step type the workflow backend understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Endpoint,
    Template,
    Request,
    Script,
    For,
    If,
    Control,
    Respond,
    Log,
    Email,
    Note,
    Wait,
    Hub,
}

/// Static description of a node kind: what it looks like and how many
/// ports it exposes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub html: &'static str,
    pub input: usize,
    pub output: usize,
    pub optional_input: bool,
    pub class: &'static str,
}

impl NodeKind {
    /// Palette order.
    pub const ALL: [NodeKind; 13] = [
        NodeKind::Endpoint,
        NodeKind::Template,
        NodeKind::Request,
        NodeKind::Script,
        NodeKind::For,
        NodeKind::If,
        NodeKind::Control,
        NodeKind::Respond,
        NodeKind::Log,
        NodeKind::Email,
        NodeKind::Note,
        NodeKind::Wait,
        NodeKind::Hub,
    ];

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn from_name(name: &str) -> Option<NodeKind> {
        NodeKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    pub fn spec(self) -> NodeSpec {
        match self {
            NodeKind::Endpoint => NodeSpec {
                name: "endpoint",
                title: "Endpoint",
                html: r#"<div><div class="title-box">Endpoint</div><div class="box"><input type="text" placeholder="create" name="info" readonly disabled df-endpoint></div></div>"#,
                input: 0,
                output: 1,
                optional_input: false,
                class: "node-endpoint",
            },
            NodeKind::Template => NodeSpec {
                name: "template",
                title: "Template",
                html: r#"<div><div class="title-box">Template</div><div class="box"><input type="text" placeholder="deepcore/create-issue" name="template" readonly disabled df-template></div></div>"#,
                input: 1,
                output: 1,
                optional_input: false,
                class: "",
            },
            NodeKind::Request => NodeSpec {
                name: "request",
                title: "Request",
                html: r#"<div><div class="title-box">Request</div><div class="box"><input type="text" placeholder="info" name="info" readonly disabled df-info></div></div>"#,
                input: 2,
                output: 3,
                optional_input: false,
                class: "node-request",
            },
            NodeKind::Script => NodeSpec {
                name: "script",
                title: "Script",
                html: r#"<div><div class="title-box">Script</div><div class="box"><input type="text" placeholder="info" name="info" readonly disabled df-info></div></div>"#,
                input: 1,
                output: 3,
                optional_input: true,
                class: "node-script",
            },
            NodeKind::For => NodeSpec {
                name: "for",
                title: "For Loop",
                html: r#"<div><div class="title-box">For Loop</div><div class="box"><p>Expression</p><input type="text" placeholder="data" name="for" readonly disabled df-for></div></div>"#,
                input: 1,
                output: 1,
                optional_input: false,
                class: "node-for",
            },
            NodeKind::If => NodeSpec {
                name: "if",
                title: "IF",
                html: r#"<div><div class="title-box">IF</div><div class="box"><p>Expression</p><input type="text" placeholder="write expression" name="if" readonly disabled df-if></div></div>"#,
                input: 1,
                output: 2,
                optional_input: false,
                class: "node-if",
            },
            NodeKind::Control => NodeSpec {
                name: "control",
                title: "Control",
                html: r#"<div><div class="title-box">Control</div><div class="box"><input type="text" placeholder="info" name="info" readonly disabled df-info></div></div>"#,
                input: 1,
                output: 1,
                optional_input: false,
                class: "",
            },
            NodeKind::Respond => NodeSpec {
                name: "respond",
                title: "Respond",
                html: r#"<div><div class="title-box">Respond</div></div>"#,
                input: 1,
                output: 0,
                optional_input: false,
                class: "node-respond",
            },
            NodeKind::Log => NodeSpec {
                name: "log",
                title: "Log",
                html: r#"<div><div class="title-box">Log</div></div>"#,
                input: 1,
                output: 1,
                optional_input: false,
                class: "title-box-alone",
            },
            NodeKind::Email => NodeSpec {
                name: "email",
                title: "Email",
                html: r#"<div><div class="title-box">Email</div></div>"#,
                input: 2,
                output: 0,
                optional_input: false,
                class: "node-email title-box-alone",
            },
            NodeKind::Note => NodeSpec {
                name: "note",
                title: "Note",
                html: r#"<div><div class="box"><textarea df-note data-name="note"></textarea></div></div>"#,
                input: 0,
                output: 0,
                optional_input: false,
                class: "node-note",
            },
            NodeKind::Wait => NodeSpec {
                name: "wait",
                title: "Wait",
                html: r#"<div><div class="title-box">Wait</div></div>"#,
                input: 2,
                output: 1,
                optional_input: false,
                class: "node-wait",
            },
            NodeKind::Hub => NodeSpec {
                name: "hub",
                title: "Hub",
                html: r#"<div><div class="title-box">Hub</div></div>"#,
                input: 1,
                output: 1,
                optional_input: false,
                class: "node-hub title-box-alone",
            },
        }
    }

    /// Fresh data payload for a newly dropped node.
    pub fn default_data(self) -> NodeData {
        let value = match self {
            NodeKind::Endpoint => json!({
                "endpoint": "",
                "methods": "POST",
                "public": false,
                "tags": "",
            }),
            NodeKind::Template => json!({ "template": "", "tags": "" }),
            NodeKind::Request => json!({
                "info": "",
                "skip_verify": false,
                "payload_nil": false,
                "pool_client": false,
                "url": "",
                "method": "",
                "auth": "",
                "headers": "",
                "retry_codes": "",
                "retry_decodes": "",
                "tags": "",
            }),
            NodeKind::Script => json!({
                "info": "",
                "inputs": "",
                "script": DEFAULT_SCRIPT,
                "tags": "",
            }),
            NodeKind::For => json!({ "for": "data", "tags": "" }),
            NodeKind::If => json!({ "if": "data > 0", "tags": "" }),
            NodeKind::Control => json!({
                "info": "",
                "control": "",
                "endpoint": "",
                "method": "POST",
                "tags": "",
            }),
            NodeKind::Respond => json!({
                "status": "200",
                "headers": "",
                "get": false,
                "tags": "",
            }),
            NodeKind::Log => json!({
                "message": "",
                "level": "debug",
                "data": false,
                "tags": "",
            }),
            NodeKind::Email => json!({
                "from": "",
                "to": "",
                "cc": "",
                "bcc": "",
                "subject": "",
                "tags": "",
            }),
            NodeKind::Note => json!({
                "note": "",
                "backgroundColor": DEFAULT_NOTE_BACKGROUND,
                "textColor": DEFAULT_NOTE_TEXT_COLOR,
                "width": DEFAULT_NOTE_WIDTH,
                "height": DEFAULT_NOTE_HEIGHT,
            }),
            NodeKind::Wait | NodeKind::Hub => json!({ "tags": "" }),
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// String view of a data field. Missing keys and `null` read as `""`.
pub fn get_str(data: &NodeData, key: &str) -> String {
    match data.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Checkbox fields are stored either as JSON booleans or as `"true"`.
pub fn get_bool(data: &NodeData, key: &str) -> bool {
    match data.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

/// Comma/whitespace separated list field (methods, retry codes, tags).
pub fn get_list(data: &NodeData, key: &str) -> Vec<String> {
    get_str(data, key)
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_table_matches_backend() {
        let arity: Vec<(&str, usize, usize)> = NodeKind::ALL
            .iter()
            .map(|k| (k.name(), k.spec().input, k.spec().output))
            .collect();

        assert_eq!(
            arity,
            vec![
                ("endpoint", 0, 1),
                ("template", 1, 1),
                ("request", 2, 3),
                ("script", 1, 3),
                ("for", 1, 1),
                ("if", 1, 2),
                ("control", 1, 1),
                ("respond", 1, 0),
                ("log", 1, 1),
                ("email", 2, 0),
                ("note", 0, 0),
                ("wait", 2, 1),
                ("hub", 1, 1),
            ]
        );
        assert!(NodeKind::Script.spec().optional_input);
    }

    #[test]
    fn names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.name()), Some(kind));
            let serialized = serde_json::to_string(&kind).unwrap();
            assert_eq!(serialized, format!("\"{}\"", kind.name()));
        }
        assert_eq!(NodeKind::from_name("forLoop"), None);
    }

    #[test]
    fn every_step_carries_tags_except_note() {
        for kind in NodeKind::ALL {
            let data = kind.default_data();
            assert_eq!(data.contains_key("tags"), kind != NodeKind::Note, "{:?}", kind);
        }
    }

    #[test]
    fn accessors_coerce_values() {
        let mut data = NodeKind::Endpoint.default_data();
        assert_eq!(get_str(&data, "methods"), "POST");
        assert_eq!(get_str(&data, "missing"), "");
        assert!(!get_bool(&data, "public"));

        data.insert("public".into(), Value::String("true".into()));
        assert!(get_bool(&data, "public"));

        data.insert("methods".into(), Value::String("POST, GET  PUT".into()));
        assert_eq!(get_list(&data, "methods"), vec!["POST", "GET", "PUT"]);

        let note = NodeKind::Note.default_data();
        assert_eq!(get_str(&note, "width"), "262");
    }
}
