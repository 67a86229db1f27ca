//! Schema validation for imported workflow documents – compiled into WASM.

use jsonschema::JSONSchema;
use lazy_static::lazy_static;
use serde_json::Value;

lazy_static! {
    static ref WORKFLOW_SCHEMA: JSONSchema = {
        let raw = include_str!("schema/workflow_schema.json");
        let parsed: Value = serde_json::from_str(raw)
            .expect("Workflow JSON schema must be valid JSON");
        JSONSchema::compile(&parsed).expect("valid workflow schema")
    };
}

/// Validate a value against the Drawflow export schema.
/// Returns `true` when valid, `false` otherwise.
pub fn validate_workflow(value: &Value) -> bool {
    WORKFLOW_SCHEMA.is_valid(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_export() {
        let doc = json!({"drawflow": {"Home": {"data": {
            "1": {"id": 1, "name": "endpoint", "data": {}, "inputs": {},
                  "outputs": {"output_1": {"connections": [{"node": "2", "output": "input_1"}]}}},
            "2": {"id": 2, "name": "respond"}
        }}}});
        assert!(validate_workflow(&doc));
    }

    #[test]
    fn rejects_malformed_exports() {
        assert!(!validate_workflow(&json!({})));
        assert!(!validate_workflow(&json!({"drawflow": {"Other": {}}})));
        assert!(!validate_workflow(&json!({"drawflow": {"Home": {"data": {"x": {"id": 1, "name": "hub"}}}}})));
        assert!(!validate_workflow(&json!({"drawflow": {"Home": {"data": {"1": {"id": 1, "name": "hub",
            "outputs": {"out": {"connections": []}}}}}}})));
    }
}
