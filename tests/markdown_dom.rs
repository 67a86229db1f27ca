//! Rendered Markdown parsed back through `DOMParser` and scanned for a TOC.
#![cfg(target_arch = "wasm32")]

use chore_editor::markdown::{render, string_to_html};
use chore_editor::toc::{generate_toc, generate_toc_from_element};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn toc_from_dom_matches_toc_from_source() {
    let md = "# Chore\n\nIntro with https://example.com\n\n## Install\n\n### Docker\n\n#### Deep\n";
    let body = string_to_html(&render(md)).unwrap();

    let from_dom = generate_toc_from_element(&body).unwrap();
    let from_source = generate_toc(md);
    assert_eq!(from_dom.len(), 3);
    assert_eq!(from_dom.len(), from_source.len());

    for (dom, src) in from_dom.iter().zip(&from_source) {
        assert_eq!(dom.indent, src.indent);
        assert_eq!(dom.name, src.name);
        let href = dom.href.as_deref().unwrap();
        assert!(href.ends_with(src.href.as_deref().unwrap()), "{href}");
    }

    let link = body.query_selector("p a").unwrap().unwrap();
    assert_eq!(link.get_attribute("target").as_deref(), Some("_blank"));
}
