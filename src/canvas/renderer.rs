//! DOM renderer for the workflow graph.
//!
//! Produces the same markup Drawflow does (`#node-<id>` boxes and one SVG
//! per connection classed `node_in_node-<to> node_out_node-<from>`), so the
//! stylesheet and the endpoint preview selectors work unchanged.

use std::cell::RefCell;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlInputElement, HtmlTextAreaElement, KeyboardEvent, MouseEvent};

use crate::constants::{CURVATURE, NODE_WIDTH, PORT_OFFSET_Y, PORT_SPACING};
use crate::drag::DragState;
use crate::graph::{Connection, Graph, GraphNode};
use crate::messages::Message;
use crate::models::{get_str, NodeKind};
use crate::state::{dispatch_global_message, APP_STATE};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const CANVAS_ROOT_ID: &str = "drawflow";
const CANVAS_CONTAINER_ID: &str = "canvas-container";

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

fn port_y(node: &GraphNode, index: usize) -> f64 {
    node.pos_y + PORT_OFFSET_Y + (index.saturating_sub(1) as f64) * PORT_SPACING
}

/// Canvas point of output port `index` (1-based).
pub fn output_point(node: &GraphNode, index: usize) -> (f64, f64) {
    (node.pos_x + NODE_WIDTH, port_y(node, index))
}

pub fn input_point(node: &GraphNode, index: usize) -> (f64, f64) {
    (node.pos_x, port_y(node, index))
}

/// Horizontal cubic bezier between two ports.
pub fn connection_path(start: (f64, f64), end: (f64, f64), curvature: f64) -> String {
    let hx = (end.0 - start.0).abs() * curvature;
    format!(
        "M {} {} C {} {} {} {} {} {}",
        start.0,
        start.1,
        start.0 + hx,
        start.1,
        end.0 - hx,
        end.1,
        end.0,
        end.1
    )
}

pub fn connection_classes(c: &Connection) -> String {
    format!(
        "connection node_in_node-{} node_out_node-{} output_{} input_{}",
        c.to, c.from, c.output, c.input
    )
}

pub fn node_classes(node: &GraphNode, selected: bool) -> String {
    let mut classes = vec!["drawflow-node", node.name()];
    if !node.class.is_empty() {
        classes.push(&node.class);
    }
    if selected {
        classes.push("selected");
    }
    classes.join(" ")
}

fn node_style(node: &GraphNode) -> String {
    let mut style = format!("top: {}px; left: {}px;", node.pos_y, node.pos_x);
    if node.kind == NodeKind::Note {
        style.push_str(&format!(
            " background-color: {}; color: {}; width: {}px; min-height: {}px;",
            get_str(&node.data, "backgroundColor"),
            get_str(&node.data, "textColor"),
            get_str(&node.data, "width"),
            get_str(&node.data, "height"),
        ));
    }
    style
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn canvas_root(document: &Document) -> Option<Element> {
    document.get_element_by_id(CANVAS_ROOT_ID)
}

fn ensure_root(document: &Document) -> Result<Element, JsValue> {
    if let Some(root) = canvas_root(document) {
        return Ok(root);
    }

    let root = document.create_element("div")?;
    root.set_id(CANVAS_ROOT_ID);
    root.set_class_name("drawflow");
    match document.get_element_by_id(CANVAS_CONTAINER_ID) {
        Some(container) => container.append_child(&root)?,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?
            .append_child(&root)?,
    };
    install_listeners(document, &root)?;
    Ok(root)
}

fn render_ports(document: &Document, node: &GraphNode, side: &str, count: usize) -> Result<Element, JsValue> {
    let ports = document.create_element("div")?;
    ports.set_class_name(&format!("{}s", side));
    for index in 1..=count {
        let port = document.create_element("div")?;
        port.set_class_name(&format!("{} {}_{}", side, side, index));
        port.set_attribute("data-node", &node.id.to_string())?;
        port.set_attribute("data-port", &index.to_string())?;
        ports.append_child(&port)?;
    }
    Ok(ports)
}

/// Copy data values into the node's `df-*` fields.
fn fill_fields(content: &Element, node: &GraphNode) -> Result<(), JsValue> {
    for key in node.data.keys() {
        let fields = content.query_selector_all(&format!("[df-{}]", key))?;
        let value = get_str(&node.data, key);
        for i in 0..fields.length() {
            let Some(field) = fields.get(i) else { continue };
            if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
                input.set_value(&value);
            } else if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
                area.set_value(&value);
            }
        }
    }
    Ok(())
}

fn render_node(document: &Document, node: &GraphNode, selected: bool) -> Result<Element, JsValue> {
    let parent = document.create_element("div")?;
    parent.set_class_name("parent-node");

    let el = document.create_element("div")?;
    el.set_id(&format!("node-{}", node.id));
    el.set_class_name(&node_classes(node, selected));
    el.set_attribute("style", &node_style(node))?;
    el.set_attribute("data-node-id", &node.id.to_string())?;

    let inputs = render_ports(document, node, "input", node.inputs())?;
    el.append_child(&inputs)?;

    let content = document.create_element("div")?;
    content.set_class_name("drawflow_content_node");
    content.set_inner_html(&node.html);
    fill_fields(&content, node)?;
    el.append_child(&content)?;

    let outputs = render_ports(document, node, "output", node.outputs())?;
    el.append_child(&outputs)?;

    parent.append_child(&el)?;
    Ok(parent)
}

fn render_connection(document: &Document, graph: &Graph, c: &Connection) -> Result<Option<Element>, JsValue> {
    let (Some(from), Some(to)) = (graph.node(c.from), graph.node(c.to)) else {
        return Ok(None);
    };

    let svg = document.create_element_ns(Some(SVG_NS), "svg")?;
    svg.set_attribute("class", &connection_classes(c))?;
    svg.set_attribute("data-from", &c.from.to_string())?;
    svg.set_attribute("data-output", &c.output.to_string())?;
    svg.set_attribute("data-to", &c.to.to_string())?;
    svg.set_attribute("data-input", &c.input.to_string())?;

    let path = document.create_element_ns(Some(SVG_NS), "path")?;
    path.set_attribute("class", "main-path")?;
    path.set_attribute(
        "d",
        &connection_path(output_point(from, c.output), input_point(to, c.input), CURVATURE),
    )?;
    svg.append_child(&path)?;
    Ok(Some(svg))
}

/// Redraw the whole graph. Listeners live on the root and survive redraws.
pub fn render(document: &Document, graph: &Graph, selected: Option<u32>) -> Result<(), JsValue> {
    let root = ensure_root(document)?;
    root.set_inner_html("");

    for connection in graph.connections() {
        if let Some(svg) = render_connection(document, graph, connection)? {
            root.append_child(&svg)?;
        }
    }
    for node in graph.nodes() {
        let el = render_node(document, node, selected == Some(node.id))?;
        root.append_child(&el)?;
    }

    crate::debug_log!(
        "rendered {} nodes, {} connections",
        graph.len(),
        graph.connections().count()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Interaction
// ---------------------------------------------------------------------------

/// A node being dragged. The position lives here until mouseup commits it.
struct NodeDrag {
    id: u32,
    state: DragState,
    x: f64,
    y: f64,
    moved: bool,
}

#[derive(Default)]
struct CanvasUi {
    /// Output port picked as the start of a new connection.
    connect_from: Option<(u32, usize)>,
    drag: Option<NodeDrag>,
}

thread_local! {
    static CANVAS_UI: RefCell<CanvasUi> = RefCell::new(CanvasUi::default());
}

/// New `d` attributes for every connection touching `id` if it sat at
/// `(x, y)`.
pub fn dragged_paths(graph: &Graph, id: u32, x: f64, y: f64) -> Vec<(Connection, String)> {
    let Some(node) = graph.node(id) else {
        return Vec::new();
    };
    let mut moved = node.clone();
    moved.pos_x = x;
    moved.pos_y = y;

    let at = |other: u32| if other == id { Some(&moved) } else { graph.node(other) };
    graph
        .connections()
        .filter(|c| c.from == id || c.to == id)
        .filter_map(|c| {
            let (from, to) = (at(c.from)?, at(c.to)?);
            let d = connection_path(output_point(from, c.output), input_point(to, c.input), CURVATURE);
            Some((*c, d))
        })
        .collect()
}

fn connection_selector(c: &Connection) -> String {
    format!("svg.{} path.main-path", connection_classes(c).replace(' ', "."))
}

/// Move a node's box and its connection paths without a full redraw.
fn move_in_place(id: u32, x: f64, y: f64) -> Result<(), JsValue> {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Ok(());
    };
    let Some(root) = canvas_root(&document) else {
        return Ok(());
    };

    APP_STATE.with(|state| {
        let state = state.borrow();
        let Some(node) = state.graph.node(id) else {
            return Ok(());
        };
        let mut moved = node.clone();
        moved.pos_x = x;
        moved.pos_y = y;
        if let Some(el) = root.query_selector(&format!("#node-{}", id))? {
            el.set_attribute("style", &node_style(&moved))?;
        }
        for (connection, d) in dragged_paths(&state.graph, id, x, y) {
            if let Some(path) = root.query_selector(&connection_selector(&connection))? {
                path.set_attribute("d", &d)?;
            }
        }
        Ok(())
    })
}

fn event_element(event: &Event) -> Option<Element> {
    event.target().and_then(|t| t.dyn_into::<Element>().ok())
}

fn attr_num<T: std::str::FromStr>(el: &Element, name: &str) -> Option<T> {
    el.get_attribute(name).and_then(|v| v.parse().ok())
}

fn enclosing_node(el: &Element) -> Option<u32> {
    el.closest(".drawflow-node")
        .ok()
        .flatten()
        .and_then(|n| attr_num(&n, "data-node-id"))
}

fn on_click(event: MouseEvent) {
    let Some(target) = event_element(&event) else { return };
    let classes = target.class_list();

    if classes.contains("output") {
        let port = attr_num(&target, "data-node").zip(attr_num(&target, "data-port"));
        CANVAS_UI.with(|ui| crate::mut_borrow!(ui).connect_from = port);
        return;
    }

    if classes.contains("input") {
        let pending = CANVAS_UI.with(|ui| crate::mut_borrow!(ui).connect_from.take());
        let target_port = attr_num::<u32>(&target, "data-node").zip(attr_num::<usize>(&target, "data-port"));
        if let (Some((from, output)), Some((to, input))) = (pending, target_port) {
            dispatch_global_message(Message::Connect { from, output, to, input });
        }
        return;
    }

    if let Some(svg) = target.closest("svg.connection").ok().flatten() {
        let connection = (|| {
            Some(Connection {
                from: attr_num(&svg, "data-from")?,
                output: attr_num(&svg, "data-output")?,
                to: attr_num(&svg, "data-to")?,
                input: attr_num(&svg, "data-input")?,
            })
        })();
        if let Some(connection) = connection {
            dispatch_global_message(Message::Disconnect(connection));
        }
        return;
    }

    CANVAS_UI.with(|ui| crate::mut_borrow!(ui).connect_from = None);
    dispatch_global_message(Message::SelectNode(enclosing_node(&target)));
}

fn on_mouse_down(event: MouseEvent) {
    let Some(target) = event_element(&event) else { return };
    let tag = target.tag_name().to_lowercase();
    if matches!(tag.as_str(), "input" | "textarea" | "select") {
        return;
    }
    let classes = target.class_list();
    if classes.contains("input") || classes.contains("output") {
        return;
    }
    let Some(id) = enclosing_node(&target) else { return };
    let Some((x, y)) = APP_STATE.with(|state| state.borrow().graph.node(id).map(|n| (n.pos_x, n.pos_y))) else {
        return;
    };

    let mut drag = DragState::new(true, true);
    drag.start(event.client_x() as f64, event.client_y() as f64);
    CANVAS_UI.with(|ui| {
        crate::mut_borrow!(ui).drag = Some(NodeDrag { id, state: drag, x, y, moved: false });
    });
}

fn on_mouse_move(event: MouseEvent) {
    let step = CANVAS_UI.with(|ui| {
        let mut ui = crate::mut_borrow!(ui);
        let drag = ui.drag.as_mut()?;
        let (dx, dy) = drag.state.move_to(event.client_x() as f64, event.client_y() as f64);
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        drag.x -= dx;
        drag.y -= dy;
        drag.moved = true;
        Some((drag.id, drag.x, drag.y))
    });
    let Some((id, x, y)) = step else { return };

    if let Err(e) = move_in_place(id, x, y) {
        web_sys::console::warn_2(&"node drag failed".into(), &e);
    }
}

fn on_mouse_up(_event: MouseEvent) {
    let drag = CANVAS_UI.with(|ui| crate::mut_borrow!(ui).drag.take());
    if let Some(NodeDrag { id, x, y, moved: true, .. }) = drag {
        dispatch_global_message(Message::MoveNode { id, x, y });
    }
}

/// Editable `df-*` fields (note text) write back on change.
fn on_change(event: Event) {
    let Some(target) = event_element(&event) else { return };
    let Some(id) = enclosing_node(&target) else { return };

    let names = target.get_attribute_names();
    let Some(key) = names
        .iter()
        .filter_map(|n| n.as_string())
        .find_map(|n| n.strip_prefix("df-").map(str::to_string))
    else {
        return;
    };

    let value = if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = target.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        return;
    };

    dispatch_global_message(Message::UpdateNodeData {
        id,
        key,
        value: serde_json::Value::String(value),
    });
}

fn on_key_down(event: KeyboardEvent) {
    if event.key() != "Delete" {
        return;
    }
    // Do not eat deletes typed into form fields.
    if let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) {
        if matches!(target.tag_name().to_lowercase().as_str(), "input" | "textarea" | "select") {
            return;
        }
    }
    let selected = APP_STATE.with(|state| state.borrow().selected_node);
    if let Some(id) = selected {
        dispatch_global_message(Message::RemoveNode(id));
    }
}

fn install_listeners(document: &Document, root: &Element) -> Result<(), JsValue> {
    let click = Closure::<dyn FnMut(MouseEvent)>::new(on_click);
    let down = Closure::<dyn FnMut(MouseEvent)>::new(on_mouse_down);
    let moved = Closure::<dyn FnMut(MouseEvent)>::new(on_mouse_move);
    let up = Closure::<dyn FnMut(MouseEvent)>::new(on_mouse_up);
    let change = Closure::<dyn FnMut(Event)>::new(on_change);
    let key = Closure::<dyn FnMut(KeyboardEvent)>::new(on_key_down);

    root.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
    root.add_event_listener_with_callback("mousedown", down.as_ref().unchecked_ref())?;
    root.add_event_listener_with_callback("mousemove", moved.as_ref().unchecked_ref())?;
    document.add_event_listener_with_callback("mouseup", up.as_ref().unchecked_ref())?;
    root.add_event_listener_with_callback("change", change.as_ref().unchecked_ref())?;
    document.add_event_listener_with_callback("keydown", key.as_ref().unchecked_ref())?;

    click.forget();
    down.forget();
    moved.forget();
    up.forget();
    change.forget();
    key.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(kind: NodeKind, x: f64, y: f64) -> GraphNode {
        let mut g = Graph::new();
        let id = g.add_node(kind, x, y).unwrap();
        g.node(id).cloned().unwrap()
    }

    #[test]
    fn ports_stack_downwards() {
        let node = node_at(NodeKind::Request, 100.0, 50.0);
        assert_eq!(input_point(&node, 1), (100.0, 70.0));
        assert_eq!(input_point(&node, 2), (100.0, 92.0));
        assert_eq!(output_point(&node, 3), (260.0, 114.0));
    }

    #[test]
    fn bezier_uses_horizontal_handles() {
        assert_eq!(
            connection_path((0.0, 0.0), (100.0, 40.0), 0.5),
            "M 0 0 C 50 0 50 40 100 40"
        );
        // Backwards links keep positive handles.
        assert_eq!(
            connection_path((100.0, 0.0), (0.0, 0.0), 0.5),
            "M 100 0 C 150 0 -50 0 0 0"
        );
    }

    #[test]
    fn dragging_recomputes_attached_paths_only() {
        let mut g = Graph::new();
        let e = g.add_node(NodeKind::Endpoint, 0.0, 0.0).unwrap();
        let hub = g.add_node(NodeKind::Hub, 300.0, 0.0).unwrap();
        let log = g.add_node(NodeKind::Log, 600.0, 0.0).unwrap();
        g.add_connection(e, 1, hub, 1).unwrap();
        g.add_connection(hub, 1, log, 1).unwrap();
        let unrelated = g.add_node(NodeKind::Respond, 0.0, 200.0).unwrap();
        g.add_connection(e, 1, unrelated, 1).unwrap();

        let paths = dragged_paths(&g, hub, 400.0, 100.0);
        assert_eq!(paths.len(), 2);
        let into_hub = paths.iter().find(|(c, _)| c.to == hub).unwrap();
        assert_eq!(into_hub.1, connection_path((160.0, 20.0), (400.0, 120.0), CURVATURE));
        let out_of_hub = paths.iter().find(|(c, _)| c.from == hub).unwrap();
        assert_eq!(out_of_hub.1, connection_path((560.0, 120.0), (600.0, 20.0), CURVATURE));
        // The graph itself is untouched until the drop commits the move.
        assert_eq!(g.node(hub).unwrap().pos_x, 300.0);
        assert!(dragged_paths(&g, 99, 0.0, 0.0).is_empty());
    }

    #[test]
    fn connection_path_selector_is_port_specific() {
        let c = Connection { from: 3, output: 2, to: 7, input: 1 };
        assert_eq!(
            connection_selector(&c),
            "svg.connection.node_in_node-7.node_out_node-3.output_2.input_1 path.main-path"
        );
    }

    #[test]
    fn connection_classes_match_preview_selectors() {
        let c = Connection { from: 3, output: 2, to: 7, input: 1 };
        assert_eq!(connection_classes(&c), "connection node_in_node-7 node_out_node-3 output_2 input_1");
    }

    #[test]
    fn node_classes_include_kind_and_selection() {
        let node = node_at(NodeKind::Hub, 0.0, 0.0);
        assert_eq!(node_classes(&node, false), "drawflow-node hub node-hub title-box-alone");
        assert!(node_classes(&node, true).ends_with(" selected"));
    }

    #[test]
    fn note_style_carries_colours() {
        let note = node_at(NodeKind::Note, 5.0, 6.0);
        let style = node_style(&note);
        assert!(style.starts_with("top: 6px; left: 5px;"));
        assert!(style.contains("background-color: #FEF9C3"));
        assert!(style.contains("width: 262px"));
    }
}
