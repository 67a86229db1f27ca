//! Markdown rendering for the info/documentation pages.
//!
//! Output conventions: every heading gets an id of the form
//! `/info-<slug>` so the hash router can deep-link to it, h1–h3 carry a
//! GitHub-style anchor icon, bare URLs are linked and all links open in a
//! new window.

use std::collections::HashMap;

use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use wasm_bindgen::JsValue;
use web_sys::{DomParser, HtmlElement, SupportedType};

use crate::constants::HEADER_ID_PREFIX;
use crate::utils::escape_html;

const ANCHOR_SVG: &str = concat!(
    r#"<svg aria-hidden="true" class="octicon octicon-link" height="16" version="1.1" viewBox="0 0 16 16" width="16">"#,
    r#"<path fill-rule="evenodd" d="M7.775 3.275a.75.75 0 001.06 1.06l1.25-1.25a2 2 0 112.83 2.83l-2.5 2.5a2 2 0 01-2.83 0 .75.75 0 00-1.06 1.06 3.5 3.5 0 004.95 0l2.5-2.5a3.5 3.5 0 00-4.95-4.95l-1.25 1.25zm-4.69 9.64a2 2 0 010-2.83l2.5-2.5a2 2 0 012.83 0 .75.75 0 001.06-1.06 3.5 3.5 0 00-4.95 0l-2.5 2.5a3.5 3.5 0 004.95 4.95l1.25-1.25a.75.75 0 00-1.06-1.06l-1.25 1.25a2 2 0 01-2.83 0z"></path>"#,
    "</svg>"
);

/// Hands out heading ids, numbering repeats (`intro`, `intro-1`, ...).
#[derive(Default)]
pub(crate) struct HeaderIds {
    seen: HashMap<String, usize>,
}

impl HeaderIds {
    pub(crate) fn next(&mut self, title: &str) -> String {
        let slug: String = title
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_lowercase();

        let unique = match self.seen.get_mut(&slug) {
            Some(count) => {
                let id = format!("{}-{}", slug, count);
                *count += 1;
                id
            }
            None => {
                self.seen.insert(slug.clone(), 1);
                slug
            }
        };

        format!("{}{}", HEADER_ID_PREFIX, unique)
    }
}

/// A heading as it will appear in the rendered page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Heading {
    pub level: usize,
    pub text: String,
    pub id: String,
}

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Merge runs of adjacent `Text` events; the parser splits text at
/// punctuation, which would cut URLs in half.
fn coalesce_text(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out: Vec<Event> = Vec::with_capacity(events.len());
    for event in events {
        match (out.last_mut(), event) {
            (Some(Event::Text(prev)), Event::Text(next)) => {
                let merged = format!("{}{}", prev, next);
                *prev = CowStr::from(merged);
            }
            (_, event) => out.push(event),
        }
    }
    out
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Url(&'a str),
}

fn is_url_start(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("www.")
}

/// Split plain text into text and bare URL segments.
fn linkify(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;
    let mut plain_start = 0usize;
    let mut offset = 0usize;

    while !rest.is_empty() {
        let at_word_start = offset == 0
            || text[..offset]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_whitespace() || c == '(');

        if at_word_start && is_url_start(rest) {
            let raw_end = rest
                .find(|c: char| c.is_whitespace() || c == '<')
                .unwrap_or(rest.len());
            let url = rest[..raw_end].trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
            if url.len() > "www.".len() {
                if plain_start < offset {
                    segments.push(Segment::Text(&text[plain_start..offset]));
                }
                segments.push(Segment::Url(url));
                offset += url.len();
                plain_start = offset;
                rest = &text[offset..];
                continue;
            }
        }

        let step = rest.chars().next().map_or(1, char::len_utf8);
        offset += step;
        rest = &text[offset..];
    }

    if plain_start < text.len() {
        segments.push(Segment::Text(&text[plain_start..]));
    }
    segments
}

fn link_open(href: &str, title: &str) -> String {
    let title = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };
    format!(
        r#"<a href="{}"{} rel="noopener noreferrer" target="_blank">"#,
        escape_html(href),
        title
    )
}

fn heading_open(level: usize, id: &str) -> String {
    let anchor = if level <= 3 {
        format!(
            r##"<a class="anchor" href="#{}" aria-hidden="true">{}</a>"##,
            escape_html(id),
            ANCHOR_SVG
        )
    } else {
        String::new()
    };
    format!(r#"<h{} id="{}">{}"#, level, escape_html(id), anchor)
}

fn heading_level(level: HeadingLevel) -> usize {
    level as usize
}

/// Collect the headings (level, plain text, id) in document order.
pub(crate) fn headings(markdown: &str) -> Vec<Heading> {
    let mut ids = HeaderIds::default();
    let mut out = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((heading_level(level), String::new()));
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(&t);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let id = ids.next(&text);
                    out.push(Heading { level, text, id });
                }
            }
            _ => {}
        }
    }

    out
}

/// Render Markdown to an HTML string.
pub fn render(markdown: &str) -> String {
    let events: Vec<Event> = coalesce_text(Parser::new_ext(markdown, options()).collect());
    let mut heading_ids = headings(markdown).into_iter().map(|h| h.id);

    let mut out_events: Vec<Event> = Vec::with_capacity(events.len());
    let mut link_depth = 0usize;
    let mut image_depth = 0usize;

    for event in events {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                let id = heading_ids.next().unwrap_or_default();
                out_events.push(Event::Html(heading_open(heading_level(level), &id).into()));
            }
            Event::End(TagEnd::Heading(level)) => {
                out_events.push(Event::Html(format!("</h{}>\n", heading_level(level)).into()));
            }
            Event::Start(Tag::Link { dest_url, title, .. }) => {
                link_depth += 1;
                out_events.push(Event::InlineHtml(link_open(&dest_url, &title).into()));
            }
            Event::End(TagEnd::Link) => {
                link_depth = link_depth.saturating_sub(1);
                out_events.push(Event::InlineHtml("</a>".into()));
            }
            Event::Start(Tag::Image { .. }) => {
                image_depth += 1;
                out_events.push(event);
            }
            Event::End(TagEnd::Image) => {
                image_depth = image_depth.saturating_sub(1);
                out_events.push(event);
            }
            Event::Text(text) if link_depth == 0 && image_depth == 0 => {
                for segment in linkify(&text) {
                    match segment {
                        Segment::Text(t) => out_events.push(Event::Text(t.to_string().into())),
                        Segment::Url(url) => {
                            let href = if url.starts_with("www.") {
                                format!("http://{}", url)
                            } else {
                                url.to_string()
                            };
                            out_events.push(Event::InlineHtml(
                                format!("{}{}</a>", link_open(&href, ""), escape_html(url)).into(),
                            ));
                        }
                    }
                }
            }
            other => out_events.push(other),
        }
    }

    let mut html_out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_out, out_events.into_iter());
    html_out
}

/// Parse an HTML string into detached DOM nodes and return the `<body>`.
pub fn string_to_html(s: &str) -> Result<HtmlElement, JsValue> {
    let parser = DomParser::new()?;
    let doc = parser.parse_from_string(s, SupportedType::TextHtml)?;
    doc.body()
        .ok_or_else(|| JsValue::from_str("parsed document has no body"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_ids_strip_non_word_characters() {
        let mut ids = HeaderIds::default();
        assert_eq!(ids.next("Getting Started!"), "/info-gettingstarted");
        assert_eq!(ids.next("getting-started"), "/info-gettingstarted-1");
        assert_eq!(ids.next("Getting started"), "/info-gettingstarted-2");
        assert_eq!(ids.next("snake_case 2"), "/info-snake_case2");
    }

    #[test]
    fn renders_anchor_for_top_levels_only() {
        let html = render("# Intro\n\n#### Deep\n");
        assert!(html.contains(r##"<h1 id="/info-intro"><a class="anchor" href="#/info-intro" aria-hidden="true"><svg"##));
        assert!(html.contains(r#"<h4 id="/info-deep">Deep</h4>"#));
    }

    #[test]
    fn links_open_in_new_window() {
        let html = render("see [docs](https://example.com/docs \"Docs\")");
        assert!(html.contains(
            r#"<a href="https://example.com/docs" title="Docs" rel="noopener noreferrer" target="_blank">docs</a>"#
        ));
    }

    #[test]
    fn bare_urls_become_links() {
        let html = render("visit https://example.com/a_b. or www.rust-lang.org now");
        assert!(html.contains(
            r#"<a href="https://example.com/a_b" rel="noopener noreferrer" target="_blank">https://example.com/a_b</a>."#
        ));
        assert!(html.contains(r#"<a href="http://www.rust-lang.org" rel="noopener noreferrer" target="_blank">www.rust-lang.org</a> now"#));
    }

    #[test]
    fn image_alt_text_is_not_linkified() {
        let html = render("![see https://example.com/logo](logo.png)");
        assert!(html.contains(r#"alt="see https://example.com/logo""#));
        assert!(!html.contains("&lt;a"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn code_is_not_linkified() {
        let html = render("`https://example.com`");
        assert!(html.contains("<code>https://example.com</code>"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn linkify_segments() {
        assert_eq!(
            linkify("a http://x.io b"),
            vec![Segment::Text("a "), Segment::Url("http://x.io"), Segment::Text(" b")]
        );
        assert_eq!(linkify("nohttp://x"), vec![Segment::Text("nohttp://x")]);
        assert_eq!(linkify("www."), vec![Segment::Text("www.")]);
    }
}
