//! In-memory workflow graph and the editing operations the canvas drives.
//!
//! Nodes are keyed by the numeric ids Drawflow uses; connections are stored
//! once, as `(from, output) -> (to, input)` with 1-based port indices, and
//! expanded into Drawflow's doubly-linked port maps only on export.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::constants::DRAWFLOW_MODULE;
use crate::error::GraphError;
use crate::models::drawflow::{
    input_port_name, output_port_name, parse_port, DrawflowExport, DrawflowModule, DrawflowNode,
    InputConnection, InputPort, OutputConnection, OutputPort,
};
use crate::models::node::{get_bool, get_str, NodeData, NodeKind};

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    pub id: u32,
    pub kind: NodeKind,
    pub data: NodeData,
    pub class: String,
    pub html: String,
    pub pos_x: f64,
    pub pos_y: f64,
}

impl GraphNode {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn inputs(&self) -> usize {
        self.kind.spec().input
    }

    pub fn outputs(&self) -> usize {
        self.kind.spec().output
    }

    pub fn tags(&self) -> String {
        get_str(&self.data, "tags")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Connection {
    pub from: u32,
    pub output: usize,
    pub to: u32,
    pub input: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<u32, GraphNode>,
    connections: BTreeSet<Connection>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
    }

    fn next_id(&self) -> Result<u32, GraphError> {
        match self.nodes.keys().next_back() {
            None => Ok(1),
            Some(last) => last.checked_add(1).ok_or(GraphError::IdsExhausted),
        }
    }

    pub fn add_node(&mut self, kind: NodeKind, pos_x: f64, pos_y: f64) -> Result<u32, GraphError> {
        let id = self.next_id()?;
        let spec = kind.spec();
        self.nodes.insert(
            id,
            GraphNode {
                id,
                kind,
                data: kind.default_data(),
                class: spec.class.to_string(),
                html: spec.html.to_string(),
                pos_x,
                pos_y,
            },
        );
        Ok(id)
    }

    pub fn remove_node(&mut self, id: u32) -> Result<GraphNode, GraphError> {
        let node = self.nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))?;
        self.connections.retain(|c| c.from != id && c.to != id);
        Ok(node)
    }

    pub fn node(&self, id: u32) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    pub fn add_connection(
        &mut self,
        from: u32,
        output: usize,
        to: u32,
        input: usize,
    ) -> Result<Connection, GraphError> {
        let source = self.nodes.get(&from).ok_or(GraphError::NodeNotFound(from))?;
        let target = self.nodes.get(&to).ok_or(GraphError::NodeNotFound(to))?;

        if from == to {
            return Err(GraphError::SelfConnection(from));
        }
        if output == 0 || output > source.outputs() {
            return Err(GraphError::PortOutOfRange { node: from, direction: "output", port: output });
        }
        if input == 0 || input > target.inputs() {
            return Err(GraphError::PortOutOfRange { node: to, direction: "input", port: input });
        }

        let connection = Connection { from, output, to, input };
        if !self.connections.insert(connection) {
            return Err(GraphError::DuplicateConnection { from, output, to, input });
        }
        Ok(connection)
    }

    pub fn remove_connection(&mut self, connection: &Connection) -> bool {
        self.connections.remove(connection)
    }

    pub fn move_node(&mut self, id: u32, pos_x: f64, pos_y: f64) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        node.pos_x = pos_x;
        node.pos_y = pos_y;
        Ok(())
    }

    pub fn set_data(&mut self, id: u32, key: &str, value: Value) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        node.data.insert(key.to_string(), value);
        Ok(())
    }

    pub fn replace_data(&mut self, id: u32, data: NodeData) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        node.data = data;
        Ok(())
    }

    /// Ids of all nodes of the given type, ascending.
    pub fn nodes_by_name(&self, name: &str) -> Vec<u32> {
        self.nodes
            .values()
            .filter(|n| n.name() == name)
            .map(|n| n.id)
            .collect()
    }

    /// Outgoing connections of a node, ordered by output port.
    pub fn outgoing(&self, id: u32) -> Vec<Connection> {
        self.connections.iter().filter(|c| c.from == id).copied().collect()
    }

    pub fn incoming(&self, id: u32) -> Vec<Connection> {
        self.connections.iter().filter(|c| c.to == id).copied().collect()
    }

    /// Distinct, non-empty endpoint names; feeds the preview selector.
    pub fn endpoints(&self) -> Vec<String> {
        self.nodes
            .values()
            .filter(|n| n.kind == NodeKind::Endpoint)
            .map(|n| get_str(&n.data, "endpoint"))
            .filter(|e| !e.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Endpoint names marked public, in node order.
    pub fn public_endpoints(&self) -> Vec<String> {
        self.nodes
            .values()
            .filter(|n| n.kind == NodeKind::Endpoint && get_bool(&n.data, "public"))
            .map(|n| get_str(&n.data, "endpoint"))
            .collect()
    }

    pub fn export(&self) -> DrawflowExport {
        let mut data = BTreeMap::new();

        for node in self.nodes.values() {
            let mut outputs: BTreeMap<String, OutputPort> = (1..=node.outputs())
                .map(|i| (output_port_name(i), OutputPort::default()))
                .collect();
            let mut inputs: BTreeMap<String, InputPort> = (1..=node.inputs())
                .map(|i| (input_port_name(i), InputPort::default()))
                .collect();

            for c in self.outgoing(node.id) {
                outputs
                    .entry(output_port_name(c.output))
                    .or_default()
                    .connections
                    .push(OutputConnection { node: c.to.to_string(), output: input_port_name(c.input) });
            }
            for c in self.incoming(node.id) {
                inputs
                    .entry(input_port_name(c.input))
                    .or_default()
                    .connections
                    .push(InputConnection { node: c.from.to_string(), input: output_port_name(c.output) });
            }

            data.insert(
                node.id.to_string(),
                DrawflowNode {
                    id: node.id,
                    name: node.name().to_string(),
                    data: node.data.clone(),
                    class: node.class.clone(),
                    html: node.html.clone(),
                    typenode: false,
                    inputs,
                    outputs,
                    pos_x: node.pos_x,
                    pos_y: node.pos_y,
                },
            );
        }

        let mut drawflow = BTreeMap::new();
        drawflow.insert(DRAWFLOW_MODULE.to_string(), DrawflowModule { data });
        DrawflowExport { drawflow }
    }

    /// Build a graph from an export. The current graph is left untouched if
    /// the document is rejected.
    pub fn import(export: &DrawflowExport) -> Result<Graph, GraphError> {
        let module = export
            .drawflow
            .get(DRAWFLOW_MODULE)
            .ok_or_else(|| GraphError::MissingModule(DRAWFLOW_MODULE.to_string()))?;

        let mut graph = Graph::new();

        for (key, node) in &module.data {
            let id: u32 = key.parse().map_err(|_| GraphError::InvalidId(key.clone()))?;
            let kind = NodeKind::from_name(&node.name)
                .ok_or_else(|| GraphError::UnknownNodeType(node.name.clone()))?;
            graph.nodes.insert(
                id,
                GraphNode {
                    id,
                    kind,
                    data: node.data.clone(),
                    class: node.class.clone(),
                    html: node.html.clone(),
                    pos_x: node.pos_x,
                    pos_y: node.pos_y,
                },
            );
        }

        for (key, node) in &module.data {
            let from: u32 = key.parse().map_err(|_| GraphError::InvalidId(key.clone()))?;
            for (port_name, port) in &node.outputs {
                let output = parse_port(port_name, "output")
                    .ok_or_else(|| GraphError::InvalidPort(port_name.clone()))?;
                for conn in &port.connections {
                    let to: u32 = conn.node.parse().map_err(|_| GraphError::InvalidId(conn.node.clone()))?;
                    let input = parse_port(&conn.output, "input")
                        .ok_or_else(|| GraphError::InvalidPort(conn.output.clone()))?;
                    match graph.add_connection(from, output, to, input) {
                        Ok(_) | Err(GraphError::DuplicateConnection { .. }) => {}
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        Ok(graph)
    }
}
