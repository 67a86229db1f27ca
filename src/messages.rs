// src/messages.rs
//
// Everything that can happen in the editor, plus the side effects the
// reducer asks for.
//
use crate::graph::{Connection, Graph};
use crate::models::{Control, NodeData, NodeKind, ServerInfo};
use crate::toast::ToastKind;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Graph editing
    AddNode {
        kind: NodeKind,
        x: f64,
        y: f64,
    },
    RemoveNode(u32),
    MoveNode {
        id: u32,
        x: f64,
        y: f64,
    },
    SelectNode(Option<u32>),
    UpdateNodeData {
        id: u32,
        key: String,
        value: Value,
    },
    ReplaceNodeData {
        id: u32,
        data: NodeData,
    },
    Connect {
        from: u32,
        output: usize,
        to: u32,
        input: usize,
    },
    Disconnect(Connection),
    ClearGraph,
    ImportGraph(Graph),

    // Endpoint preview
    ViewEndpoint(String),
    ViewEndpointClear,
    SetViewReload(bool),

    // Controls
    SetControlName(String),
    LoadControl(String),
    ControlLoaded(Control),
    SaveControl,
    ControlSaved(String),

    // Server
    FetchInfo,
    InfoLoaded(ServerInfo),

    // UI
    SetSidebar(String),
    AddToast {
        message: String,
        kind: ToastKind,
        timeout_ms: u32,
    },
    RemoveToast(u32),
    RequestFailed {
        context: String,
        error: String,
    },
}

/// Side effects returned by `update`; run by `command_executors` after the
/// state borrow is released.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Chain another message to be processed
    SendMessage(Message),

    /// Redraw nodes and connections
    RenderCanvas,
    /// Redraw toolbar (endpoint list, control name)
    RenderToolbar,
    /// Redraw the selected node's form
    RenderNodeEditor,
    RenderToasts,

    /// Re-apply the stored preview onto the canvas
    ApplyView,
    ClearView,

    ScheduleToastRemoval {
        id: u32,
        timeout_ms: u32,
    },
    CancelToastTimer(u32),

    FetchInfo,
    FetchControl(String),
    SaveControl(Control),

    NoOp,
}
