//! Browser tests for reading forms through `FormData`.
#![cfg(target_arch = "wasm32")]

use chore_editor::codec::{form_element_to_object, form_element_to_object_multi, form_entries};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlFormElement;

wasm_bindgen_test_configure!(run_in_browser);

fn form(html: &str) -> HtmlFormElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let form = document.create_element("form").unwrap();
    form.set_inner_html(html);
    document.body().unwrap().append_child(&form).unwrap();
    form.dyn_into().unwrap()
}

#[wasm_bindgen_test]
fn reads_entries_in_document_order() {
    let f = form(
        r#"<input name="name" value="jira">
           <input type="checkbox" name="public" value="true" checked>
           <input type="checkbox" name="skip" value="true">
           <textarea name="script">return 1</textarea>"#,
    );
    let entries = form_entries(&f).unwrap();
    assert_eq!(
        entries,
        vec![
            ("name".to_string(), "jira".to_string()),
            ("public".to_string(), "true".to_string()),
            ("script".to_string(), "return 1".to_string()),
        ]
    );

    let obj = form_element_to_object(&f).unwrap();
    assert!(obj.get("skip").is_none());
    assert_eq!(obj["script"], "return 1");
}

#[wasm_bindgen_test]
fn folds_header_rows() {
    let f = form(
        r#"<input name="name" value="jira">
           <input name="headers-key0" value="Authorization">
           <input name="headers-value0" value="Basic abc">
           <input name="headers-key1" value="Accept">
           <input name="headers-value1" value="application/json">"#,
    );
    let obj = form_element_to_object_multi(&f).unwrap();
    assert_eq!(obj["headers"]["Authorization"], "Basic abc");
    assert_eq!(obj["headers"]["Accept"], "application/json");
    assert!(obj.get("headers-key0").is_none());
}
