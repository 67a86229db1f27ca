//! Palette markup in a real document.

use wasm_bindgen_test::*;

use crate::components::node_palette;
use crate::models::NodeKind;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn palette_lists_every_kind_once() {
    let document = web_sys::window().unwrap().document().unwrap();

    node_palette::render(&document).unwrap();
    node_palette::render(&document).unwrap();

    let palette = document.get_element_by_id("node-palette").unwrap();
    let items = palette.query_selector_all(".palette-node").unwrap();
    assert_eq!(items.length() as usize, NodeKind::ALL.len());

    let hub = palette.query_selector(r#"[data-node="hub"]"#).unwrap().unwrap();
    assert_eq!(hub.get_attribute("draggable").as_deref(), Some("true"));
    assert_eq!(hub.text_content().as_deref(), Some("Hub"));
}
