//! Serde mirror of the Drawflow export document.
//!
//! This is the format the backend stores (base64 encoded) as a control's
//! `content`, so field names and the odd `output`/`input` naming on
//! connections must stay exactly as Drawflow writes them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::node::NodeData;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawflowExport {
    pub drawflow: BTreeMap<String, DrawflowModule>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawflowModule {
    #[serde(default)]
    pub data: BTreeMap<String, DrawflowNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawflowNode {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub data: NodeData,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub typenode: bool,
    #[serde(default)]
    pub inputs: BTreeMap<String, InputPort>,
    #[serde(default)]
    pub outputs: BTreeMap<String, OutputPort>,
    #[serde(default)]
    pub pos_x: f64,
    #[serde(default)]
    pub pos_y: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputPort {
    #[serde(default)]
    pub connections: Vec<OutputConnection>,
}

/// Connection as seen from an output port: `output` names the *target's*
/// input port.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConnection {
    pub node: String,
    pub output: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputPort {
    #[serde(default)]
    pub connections: Vec<InputConnection>,
}

/// Connection as seen from an input port: `input` names the *source's*
/// output port.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConnection {
    pub node: String,
    pub input: String,
}

pub fn output_port_name(index: usize) -> String {
    format!("output_{}", index)
}

pub fn input_port_name(index: usize) -> String {
    format!("input_{}", index)
}

/// Parse `output_3` / `input_2` into the 1-based index.
pub fn parse_port(name: &str, prefix: &str) -> Option<usize> {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_drawflow_document() {
        let raw = r#"{
          "drawflow": {
            "Home": {
              "data": {
                "1": {
                  "id": 1, "name": "endpoint",
                  "data": {"endpoint": "create", "tags": ""},
                  "class": "node-endpoint", "html": "", "typenode": false,
                  "inputs": {},
                  "outputs": {"output_1": {"connections": [{"node": "2", "output": "input_1"}]}},
                  "pos_x": 10, "pos_y": 20
                },
                "2": {
                  "id": 2, "name": "respond",
                  "data": {"status": "200"},
                  "class": "", "html": "", "typenode": false,
                  "inputs": {"input_1": {"connections": [{"node": "1", "input": "output_1"}]}},
                  "outputs": {},
                  "pos_x": 200, "pos_y": 20
                }
              }
            }
          }
        }"#;

        let export: DrawflowExport = serde_json::from_str(raw).unwrap();
        let home = &export.drawflow["Home"];
        assert_eq!(home.data.len(), 2);
        assert_eq!(
            home.data["1"].outputs["output_1"].connections[0],
            OutputConnection { node: "2".into(), output: "input_1".into() }
        );
        assert_eq!(home.data["2"].inputs["input_1"].connections[0].input, "output_1");
    }

    #[test]
    fn port_names() {
        assert_eq!(parse_port("output_12", "output"), Some(12));
        assert_eq!(parse_port("input_1", "input"), Some(1));
        assert_eq!(parse_port("input_0", "input"), None);
        assert_eq!(parse_port("output_x", "output"), None);
        assert_eq!(parse_port("input_1", "output"), None);
        assert_eq!(output_port_name(2), "output_2");
    }
}
