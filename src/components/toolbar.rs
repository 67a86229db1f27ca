//! Editor toolbar: endpoint preview selector, control load/save and the
//! list of public endpoints.

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlInputElement, HtmlSelectElement};

use crate::messages::Message;
use crate::state::{dispatch_global_message, AppState};
use crate::utils::escape_html;

const TOOLBAR_ID: &str = "toolbar";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Options for the preview selector. The first entry clears the preview; an
/// active endpoint that no longer exists stays selectable until cleared.
pub fn endpoint_options(endpoints: &[String], active: Option<&str>) -> Vec<EndpointOption> {
    let mut options = vec![EndpointOption {
        value: String::new(),
        label: "view endpoint".to_string(),
        selected: active.is_none(),
    }];

    let mut names: Vec<&str> = endpoints.iter().map(String::as_str).collect();
    if let Some(active) = active {
        if !names.contains(&active) {
            names.push(active);
        }
    }

    options.extend(names.into_iter().map(|name| EndpointOption {
        value: name.to_string(),
        label: name.to_string(),
        selected: Some(name) == active,
    }));
    options
}

fn ensure_toolbar(document: &Document) -> Result<Element, JsValue> {
    if let Some(el) = document.get_element_by_id(TOOLBAR_ID) {
        return Ok(el);
    }

    let bar = document.create_element("div")?;
    bar.set_id(TOOLBAR_ID);
    bar.set_class_name("toolbar");
    bar.set_inner_html(
        r#"<select id="view-endpoint"></select>
<button type="button" id="view-clear">clear</button>
<input type="text" id="control-name" placeholder="control name">
<button type="button" id="control-load">load</button>
<button type="button" id="control-save">save</button>
<span id="control-dirty"></span>
<div id="public-endpoints" class="public-endpoints"></div>
<span id="server-info" class="server-info"></span>"#,
    );
    match document.get_element_by_id("canvas-container") {
        Some(container) => container.before_with_node_1(&bar)?,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?
            .prepend_with_node_1(&bar)?,
    }
    wire(document)?;
    Ok(bar)
}

fn control_name_input(document: &Document) -> Option<HtmlInputElement> {
    document
        .get_element_by_id("control-name")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
}

fn listen(document: &Document, id: &str, event: &str, handler: impl FnMut(Event) + 'static) -> Result<(), JsValue> {
    let Some(el) = document.get_element_by_id(id) else {
        return Ok(());
    };
    let cb = Closure::<dyn FnMut(Event)>::new(handler);
    el.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

fn wire(document: &Document) -> Result<(), JsValue> {
    listen(document, "view-endpoint", "change", |event: Event| {
        let value = event
            .target()
            .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
            .map(|s| s.value())
            .unwrap_or_default();
        dispatch_global_message(Message::ViewEndpoint(value));
    })?;

    listen(document, "view-clear", "click", |_| {
        dispatch_global_message(Message::ViewEndpointClear);
    })?;

    listen(document, "control-name", "change", |event: Event| {
        if let Some(input) = event.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
            dispatch_global_message(Message::SetControlName(input.value()));
        }
    })?;

    let doc = document.clone();
    listen(document, "control-load", "click", move |_| {
        let name = control_name_input(&doc).map(|i| i.value()).unwrap_or_default();
        dispatch_global_message(Message::LoadControl(name));
    })?;

    let doc = document.clone();
    listen(document, "control-save", "click", move |_| {
        // Pick up a name typed without leaving the field.
        if let Some(input) = control_name_input(&doc) {
            dispatch_global_message(Message::SetControlName(input.value()));
        }
        dispatch_global_message(Message::SaveControl);
    })?;

    Ok(())
}

/// Sync the toolbar with the current state.
pub fn refresh(document: &Document, state: &AppState) -> Result<(), JsValue> {
    ensure_toolbar(document)?;

    if let Some(select) = document.get_element_by_id("view-endpoint") {
        let html: String = endpoint_options(&state.graph.endpoints(), state.view_endpoint.as_deref())
            .iter()
            .map(|o| {
                format!(
                    r#"<option value="{}"{}>{}</option>"#,
                    escape_html(&o.value),
                    if o.selected { " selected" } else { "" },
                    escape_html(&o.label)
                )
            })
            .collect();
        select.set_inner_html(&html);
    }

    if let Some(input) = control_name_input(document) {
        if input.value() != state.control_name {
            input.set_value(&state.control_name);
        }
    }

    if let Some(dirty) = document.get_element_by_id("control-dirty") {
        dirty.set_text_content(Some(if state.dirty { "unsaved" } else { "" }));
    }

    if let Some(list) = document.get_element_by_id("public-endpoints") {
        let html: String = state
            .graph
            .public_endpoints()
            .iter()
            .map(|e| format!(r#"<span class="public-endpoint">{}</span>"#, escape_html(e)))
            .collect();
        list.set_inner_html(&html);
    }

    if let Some(info) = document.get_element_by_id("server-info") {
        let text = format!("{} {}", state.info.name, state.info.version);
        info.set_text_content(Some(text.trim()));
    }

    Ok(())
}
