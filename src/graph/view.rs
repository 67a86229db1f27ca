//! Endpoint path preview.
//!
//! Given an endpoint name, walk the graph depth-first from every endpoint
//! node carrying that name and collect what an incoming call could reach.
//! A connection is followed only when the target node's tags match the
//! tags of the endpoint the walk started from. All walks share one visited
//! set, so a node reached once is not walked again under another
//! endpoint's tags. The result is a plain set of
//! ids so it can be tested without a browser; `apply_view` turns it into
//! CSS classes on the rendered canvas.

use std::collections::BTreeSet;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use crate::constants::{
    CLASS_VIEW_CONNECTION, CLASS_VIEW_CONNECTION_DISABLED, CLASS_VIEW_NODE, CLASS_VIEW_NODE_DISABLED,
    CLASS_VIEW_ROOT_DISABLED,
};
use crate::graph::editor::{Connection, Graph};
use crate::graph::tags::TagSet;
use crate::models::node::{get_str, NodeKind};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewHighlight {
    pub nodes: BTreeSet<u32>,
    pub connections: BTreeSet<Connection>,
    pub disabled_nodes: BTreeSet<u32>,
    pub disabled_connections: BTreeSet<Connection>,
}

impl ViewHighlight {
    pub fn is_highlighted(&self, id: u32) -> bool {
        self.nodes.contains(&id)
    }
}

pub fn compute_view(graph: &Graph, endpoint: &str) -> ViewHighlight {
    let mut view = ViewHighlight::default();
    let mut visited = BTreeSet::new();
    let mut walked = false;

    for id in graph.nodes_by_name(NodeKind::Endpoint.name()) {
        let Some(node) = graph.node(id) else { continue };
        if get_str(&node.data, "endpoint") != endpoint {
            continue;
        }

        let active = TagSet::parse(&node.tags());
        visit(graph, id, &active, &mut visited, &mut view);
        walked = true;
    }

    for node in graph.nodes() {
        if !view.nodes.contains(&node.id) && node.kind != NodeKind::Note {
            view.disabled_nodes.insert(node.id);
        }
    }
    // Connections are only greyed out once something was walked.
    if walked {
        for connection in graph.connections() {
            if !view.connections.contains(connection) {
                view.disabled_connections.insert(*connection);
            }
        }
    }

    view
}

fn visit(
    graph: &Graph,
    id: u32,
    active: &TagSet,
    visited: &mut BTreeSet<u32>,
    view: &mut ViewHighlight,
) {
    visited.insert(id);
    view.nodes.insert(id);

    for connection in graph.outgoing(id) {
        let Some(next) = graph.node(connection.to) else { continue };
        if !active.matches(&TagSet::parse(&next.tags())) {
            continue;
        }

        view.connections.insert(connection);

        if visited.contains(&connection.to) {
            continue;
        }
        visit(graph, connection.to, active, visited, view);
    }
}

fn node_selector(id: u32) -> String {
    format!("#node-{}", id)
}

fn connection_selector(c: &Connection) -> String {
    format!(
        ".connection.node_in_node-{}.node_out_node-{}.output_{}.input_{}",
        c.to, c.from, c.output, c.input
    )
}

fn add_class(root: &Element, selector: &str, class: &str) -> Result<(), JsValue> {
    if let Some(el) = root.query_selector(selector)? {
        el.class_list().add_1(class)?;
    }
    Ok(())
}

fn remove_class_everywhere(root: &Element, class: &str) -> Result<(), JsValue> {
    let list = root.query_selector_all(&format!(".{}", class))?;
    for i in 0..list.length() {
        if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            el.class_list().remove_1(class)?;
        }
    }
    Ok(())
}

/// Reflect a computed preview onto the rendered canvas under `root`.
pub fn apply_view(root: &Element, view: &ViewHighlight) -> Result<(), JsValue> {
    for id in &view.nodes {
        add_class(root, &node_selector(*id), CLASS_VIEW_NODE)?;
    }
    for id in &view.disabled_nodes {
        add_class(root, &node_selector(*id), CLASS_VIEW_NODE_DISABLED)?;
    }
    for c in &view.connections {
        add_class(root, &connection_selector(c), CLASS_VIEW_CONNECTION)?;
    }
    for c in &view.disabled_connections {
        add_class(root, &connection_selector(c), CLASS_VIEW_CONNECTION_DISABLED)?;
    }
    root.class_list().add_1(CLASS_VIEW_ROOT_DISABLED)?;
    Ok(())
}

pub fn view_endpoint(root: &Element, graph: &Graph, endpoint: &str) -> Result<ViewHighlight, JsValue> {
    view_endpoint_clear(root)?;
    let view = compute_view(graph, endpoint);
    apply_view(root, &view)?;
    Ok(view)
}

pub fn view_endpoint_clear(root: &Element) -> Result<(), JsValue> {
    remove_class_everywhere(root, CLASS_VIEW_NODE)?;
    remove_class_everywhere(root, CLASS_VIEW_NODE_DISABLED)?;
    root.class_list().remove_1(CLASS_VIEW_ROOT_DISABLED)?;
    remove_class_everywhere(root, CLASS_VIEW_CONNECTION)?;
    remove_class_everywhere(root, CLASS_VIEW_CONNECTION_DISABLED)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoint(g: &mut Graph, name: &str, tags: &str) -> u32 {
        let id = g.add_node(NodeKind::Endpoint, 0.0, 0.0).unwrap();
        g.set_data(id, "endpoint", json!(name)).unwrap();
        g.set_data(id, "tags", json!(tags)).unwrap();
        id
    }

    fn step(g: &mut Graph, kind: NodeKind, tags: &str) -> u32 {
        let id = g.add_node(kind, 0.0, 0.0).unwrap();
        g.set_data(id, "tags", json!(tags)).unwrap();
        id
    }

    #[test]
    fn follows_every_path_without_tags() {
        let mut g = Graph::new();
        let e = endpoint(&mut g, "create", "");
        let cond = step(&mut g, NodeKind::If, "");
        let yes = step(&mut g, NodeKind::Respond, "");
        let no = step(&mut g, NodeKind::Log, "");
        let other = endpoint(&mut g, "delete", "");
        let note = g.add_node(NodeKind::Note, 0.0, 0.0).unwrap();
        g.add_connection(e, 1, cond, 1).unwrap();
        g.add_connection(cond, 1, yes, 1).unwrap();
        g.add_connection(cond, 2, no, 1).unwrap();

        let view = compute_view(&g, "create");
        assert_eq!(view.nodes, BTreeSet::from([e, cond, yes, no]));
        assert_eq!(view.connections.len(), 3);
        assert!(view.disabled_connections.is_empty());
        assert_eq!(view.disabled_nodes, BTreeSet::from([other]));
        assert!(!view.disabled_nodes.contains(&note));
    }

    #[test]
    fn tag_mismatch_blocks_the_edge() {
        let mut g = Graph::new();
        let e = endpoint(&mut g, "create", "prod");
        let prod = step(&mut g, NodeKind::Log, "prod");
        let dev = step(&mut g, NodeKind::Log, "dev");
        let untagged = step(&mut g, NodeKind::Respond, "");
        let behind_dev = step(&mut g, NodeKind::Respond, "");
        g.add_connection(e, 1, prod, 1).unwrap();
        g.add_connection(e, 1, dev, 1).unwrap();
        g.add_connection(prod, 1, untagged, 1).unwrap();
        let blocked = g.add_connection(dev, 1, behind_dev, 1).unwrap();

        let view = compute_view(&g, "create");
        assert_eq!(view.nodes, BTreeSet::from([e, prod, untagged]));
        assert!(view.disabled_nodes.contains(&dev));
        assert!(view.disabled_nodes.contains(&behind_dev));
        assert!(view.disabled_connections.contains(&blocked));
        assert!(!view.connections.iter().any(|c| c.to == dev));
    }

    #[test]
    fn cycles_terminate_and_back_edges_are_highlighted() {
        let mut g = Graph::new();
        let e = endpoint(&mut g, "loop", "");
        let a = step(&mut g, NodeKind::Hub, "");
        let b = step(&mut g, NodeKind::Wait, "");
        g.add_connection(e, 1, a, 1).unwrap();
        g.add_connection(a, 1, b, 1).unwrap();
        let back = g.add_connection(b, 1, a, 1).unwrap();

        let view = compute_view(&g, "loop");
        assert_eq!(view.nodes, BTreeSet::from([e, a, b]));
        assert!(view.connections.contains(&back));
    }

    #[test]
    fn first_walk_claims_shared_nodes() {
        let mut g = Graph::new();
        let prod_entry = endpoint(&mut g, "create", "prod");
        let dev_entry = endpoint(&mut g, "create", "dev");
        let shared = step(&mut g, NodeKind::Hub, "");
        let dev_only = step(&mut g, NodeKind::Respond, "dev");
        g.add_connection(prod_entry, 1, shared, 1).unwrap();
        g.add_connection(dev_entry, 1, shared, 1).unwrap();
        g.add_connection(shared, 1, dev_only, 1).unwrap();

        let view = compute_view(&g, "create");
        assert_eq!(view.nodes, BTreeSet::from([prod_entry, dev_entry, shared]));
        assert!(view.disabled_nodes.contains(&dev_only));
        assert!(view.connections.iter().any(|c| c.from == dev_entry && c.to == shared));
    }

    #[test]
    fn unknown_endpoint_disables_nodes_only() {
        let mut g = Graph::new();
        let e = endpoint(&mut g, "create", "");
        let r = step(&mut g, NodeKind::Respond, "");
        g.add_connection(e, 1, r, 1).unwrap();

        let view = compute_view(&g, "missing");
        assert!(view.nodes.is_empty());
        assert_eq!(view.disabled_nodes, BTreeSet::from([e, r]));
        assert!(view.connections.is_empty());
        assert!(view.disabled_connections.is_empty());
    }
}
