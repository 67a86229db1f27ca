use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, DragEvent, Element, MouseEvent};

use crate::canvas::renderer::canvas_root;
use crate::messages::Message;
use crate::models::NodeKind;
use crate::state::dispatch_global_message;

const PALETTE_ID: &str = "node-palette";
const DRAG_MIME: &str = "text/plain";

/// Where a clicked (not dragged) palette item lands.
const CLICK_DROP_X: f64 = 40.0;
const CLICK_DROP_Y: f64 = 40.0;

/// Resolve the node kind carried by a palette drag.
pub fn kind_from_transfer(data: &str) -> Option<NodeKind> {
    NodeKind::from_name(data.trim())
}

/// Render the palette into `#node-palette` and wire the canvas as a drop
/// target. Safe to call once at start-up.
pub fn render(document: &Document) -> Result<(), JsValue> {
    let container = match document.get_element_by_id(PALETTE_ID) {
        Some(el) => el,
        None => {
            let el = document.create_element("div")?;
            el.set_id(PALETTE_ID);
            el.set_class_name("node-palette");
            document
                .body()
                .ok_or_else(|| JsValue::from_str("document has no body"))?
                .append_child(&el)?;
            el
        }
    };
    container.set_inner_html("");

    for kind in NodeKind::ALL {
        let item = render_item(document, kind)?;
        container.append_child(&item)?;
    }

    if let Some(root) = canvas_root(document) {
        init_canvas_drop_handling(&root)?;
    }
    Ok(())
}

fn render_item(document: &Document, kind: NodeKind) -> Result<Element, JsValue> {
    let spec = kind.spec();
    let item = document.create_element("div")?;
    item.set_class_name(&format!("palette-node drag-drawflow {}", spec.class).trim().to_string());
    item.set_attribute("draggable", "true")?;
    item.set_attribute("data-node", spec.name)?;
    item.set_text_content(Some(spec.title));

    let ondragstart = Closure::<dyn FnMut(DragEvent)>::new(move |event: DragEvent| {
        if let Some(data_transfer) = event.data_transfer() {
            let _ = data_transfer.set_data(DRAG_MIME, kind.name());
            data_transfer.set_effect_allowed("copy");
        }
    });
    item.add_event_listener_with_callback("dragstart", ondragstart.as_ref().unchecked_ref())?;
    ondragstart.forget();

    let onclick = Closure::<dyn FnMut(MouseEvent)>::new(move |_: MouseEvent| {
        dispatch_global_message(Message::AddNode {
            kind,
            x: CLICK_DROP_X,
            y: CLICK_DROP_Y,
        });
    });
    item.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();

    Ok(item)
}

fn init_canvas_drop_handling(root: &Element) -> Result<(), JsValue> {
    if root.has_attribute("data-drop-ready") {
        return Ok(());
    }
    root.set_attribute("data-drop-ready", "true")?;

    let ondragover = Closure::<dyn FnMut(DragEvent)>::new(move |event: DragEvent| {
        event.prevent_default();
    });

    let target = root.clone();
    let ondrop = Closure::<dyn FnMut(DragEvent)>::new(move |event: DragEvent| {
        event.prevent_default();

        let Some(kind) = event
            .data_transfer()
            .and_then(|dt| dt.get_data(DRAG_MIME).ok())
            .and_then(|data| kind_from_transfer(&data))
        else {
            return;
        };

        let rect = target.get_bounding_client_rect();
        dispatch_global_message(Message::AddNode {
            kind,
            x: event.client_x() as f64 - rect.left(),
            y: event.client_y() as f64 - rect.top(),
        });
    });

    root.add_event_listener_with_callback("dragover", ondragover.as_ref().unchecked_ref())?;
    root.add_event_listener_with_callback("drop", ondrop.as_ref().unchecked_ref())?;
    ondragover.forget();
    ondrop.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_payload_names_a_kind() {
        assert_eq!(kind_from_transfer("request"), Some(NodeKind::Request));
        assert_eq!(kind_from_transfer(" hub\n"), Some(NodeKind::Hub));
        assert_eq!(kind_from_transfer("agent"), None);
    }
}
