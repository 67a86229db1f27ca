//! Table of contents for rendered Markdown pages.

use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlAnchorElement};

use crate::markdown::headings;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub name: String,
    pub indent: u8,
}

const TOC_MAX_LEVEL: usize = 3;

/// h1–h3 headings of `markdown`, linked to the ids `markdown::render`
/// assigns.
pub fn generate_toc(markdown: &str) -> Vec<TocEntry> {
    headings(markdown)
        .into_iter()
        .filter(|h| h.level <= TOC_MAX_LEVEL)
        .map(|h| TocEntry {
            href: Some(format!("#{}", h.id)),
            name: h.text,
            indent: h.level as u8,
        })
        .collect()
}

/// Scan the direct children of an already rendered page.
pub fn generate_toc_from_element(root: &Element) -> Result<Vec<TocEntry>, JsValue> {
    let mut entries = Vec::new();
    let children = root.children();

    for i in 0..children.length() {
        let Some(child) = children.item(i) else { continue };
        let indent = match child.node_name().to_lowercase().as_str() {
            "h1" => 1,
            "h2" => 2,
            "h3" => 3,
            _ => continue,
        };

        let href = child
            .query_selector("a")?
            .and_then(|a| a.dyn_into::<HtmlAnchorElement>().ok())
            .map(|a| a.href());

        entries.push(TocEntry {
            href,
            name: child.text_content().unwrap_or_default(),
            indent,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_top_three_levels() {
        let toc = generate_toc("# Chore\n\ntext\n\n## Install\n\n#### Skip\n\n### `cfg` file\n\n## Install\n");
        assert_eq!(
            toc,
            vec![
                TocEntry { href: Some("#/info-chore".into()), name: "Chore".into(), indent: 1 },
                TocEntry { href: Some("#/info-install".into()), name: "Install".into(), indent: 2 },
                TocEntry { href: Some("#/info-cfgfile".into()), name: "cfg file".into(), indent: 3 },
                TocEntry { href: Some("#/info-install-1".into()), name: "Install".into(), indent: 2 },
            ]
        );
    }

    #[test]
    fn ids_match_rendered_headings() {
        let md = "# A b\n\n## A b\n";
        let html = crate::markdown::render(md);
        for entry in generate_toc(md) {
            let id = entry.href.unwrap().trim_start_matches('#').to_string();
            assert!(html.contains(&format!(r#"id="{}""#, id)));
        }
    }
}
