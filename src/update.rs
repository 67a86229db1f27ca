// src/update.rs
//
// The reducer. Pure state transitions; anything touching the browser is
// returned as a `Command`.
//
use crate::codec::{content_json, decode_content};
use crate::constants::DEFAULT_TOAST_TIMEOUT_MS;
use crate::messages::{Command, Message};
use crate::models::Control;
use crate::state::AppState;
use crate::toast::ToastKind;

fn toast(state: &mut AppState, commands: &mut Vec<Command>, message: String, kind: ToastKind, timeout_ms: u32) {
    let id = state.toasts.add(&message, kind, timeout_ms);
    commands.push(Command::RenderToasts);
    if timeout_ms > 0 {
        commands.push(Command::ScheduleToastRemoval { id, timeout_ms });
    }
}

/// Canvas changed: redraw, keep the preview in sync and refresh the
/// endpoint list.
fn graph_changed(state: &mut AppState, commands: &mut Vec<Command>) {
    state.dirty = true;
    redraw(state, commands);
}

fn redraw(state: &AppState, commands: &mut Vec<Command>) {
    commands.push(Command::RenderCanvas);
    if state.view_reload && state.view_endpoint.is_some() {
        commands.push(Command::ApplyView);
    }
    commands.push(Command::RenderToolbar);
}

pub fn update(state: &mut AppState, msg: Message) -> Vec<Command> {
    let mut commands = Vec::new();

    match msg {
        // ---------------- Graph editing ----------------
        Message::AddNode { kind, x, y } => match state.graph.add_node(kind, x, y) {
            Ok(id) => {
                state.selected_node = Some(id);
                graph_changed(state, &mut commands);
                commands.push(Command::RenderNodeEditor);
            }
            Err(e) => toast(state, &mut commands, e.to_string(), ToastKind::Alert, DEFAULT_TOAST_TIMEOUT_MS),
        },
        Message::RemoveNode(id) => match state.graph.remove_node(id) {
            Ok(_) => {
                if state.selected_node == Some(id) {
                    state.selected_node = None;
                    commands.push(Command::RenderNodeEditor);
                }
                graph_changed(state, &mut commands);
            }
            Err(e) => toast(state, &mut commands, e.to_string(), ToastKind::Warn, DEFAULT_TOAST_TIMEOUT_MS),
        },
        Message::MoveNode { id, x, y } => {
            // Moves only change geometry; the preview classes stay valid.
            if state.graph.move_node(id, x, y).is_ok() {
                state.dirty = true;
                commands.push(Command::RenderCanvas);
                if state.view_reload && state.view_endpoint.is_some() {
                    commands.push(Command::ApplyView);
                }
            }
        }
        Message::SelectNode(id) => {
            state.selected_node = id.filter(|id| state.graph.node(*id).is_some());
            commands.push(Command::RenderNodeEditor);
        }
        Message::UpdateNodeData { id, key, value } => match state.graph.set_data(id, &key, value) {
            Ok(()) => graph_changed(state, &mut commands),
            Err(e) => toast(state, &mut commands, e.to_string(), ToastKind::Warn, DEFAULT_TOAST_TIMEOUT_MS),
        },
        Message::ReplaceNodeData { id, data } => match state.graph.replace_data(id, data) {
            Ok(()) => {
                graph_changed(state, &mut commands);
                commands.push(Command::RenderNodeEditor);
            }
            Err(e) => toast(state, &mut commands, e.to_string(), ToastKind::Warn, DEFAULT_TOAST_TIMEOUT_MS),
        },
        Message::Connect { from, output, to, input } => {
            match state.graph.add_connection(from, output, to, input) {
                Ok(_) => graph_changed(state, &mut commands),
                Err(e) => toast(state, &mut commands, e.to_string(), ToastKind::Warn, DEFAULT_TOAST_TIMEOUT_MS),
            }
        }
        Message::Disconnect(connection) => {
            if state.graph.remove_connection(&connection) {
                graph_changed(state, &mut commands);
            }
        }
        Message::ClearGraph => {
            state.graph.clear();
            state.selected_node = None;
            state.view_endpoint = None;
            commands.push(Command::ClearView);
            commands.push(Command::RenderNodeEditor);
            graph_changed(state, &mut commands);
        }
        Message::ImportGraph(graph) => {
            state.graph = graph;
            state.selected_node = None;
            state.dirty = false;
            commands.push(Command::RenderNodeEditor);
            redraw(state, &mut commands);
        }

        // ---------------- Endpoint preview ----------------
        Message::ViewEndpoint(endpoint) => {
            if endpoint.is_empty() {
                state.view_endpoint = None;
                commands.push(Command::ClearView);
            } else {
                state.view_endpoint = Some(endpoint);
                commands.push(Command::ApplyView);
            }
            commands.push(Command::RenderToolbar);
        }
        Message::ViewEndpointClear => {
            state.view_endpoint = None;
            commands.push(Command::ClearView);
            commands.push(Command::RenderToolbar);
        }
        Message::SetViewReload(reload) => {
            state.view_reload = reload;
        }

        // ---------------- Controls ----------------
        Message::SetControlName(name) => {
            state.control_name = name.trim().to_string();
            commands.push(Command::RenderToolbar);
        }
        Message::LoadControl(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                toast(state, &mut commands, "control name is required".into(), ToastKind::Warn, DEFAULT_TOAST_TIMEOUT_MS);
            } else {
                commands.push(Command::FetchControl(name));
            }
        }
        Message::ControlLoaded(control) => match decode_content(&control.content) {
            Ok(graph) => {
                state.graph = graph;
                state.control_name = control.name.clone();
                state.selected_node = None;
                state.dirty = false;
                commands.push(Command::RenderNodeEditor);
                redraw(state, &mut commands);
                toast(state, &mut commands, format!("loaded {}", control.name), ToastKind::Info, DEFAULT_TOAST_TIMEOUT_MS);
            }
            Err(e) => toast(
                state,
                &mut commands,
                format!("cannot open {}: {}", control.name, e),
                ToastKind::Alert,
                0,
            ),
        },
        Message::SaveControl => {
            if state.control_name.is_empty() {
                toast(state, &mut commands, "control name is required".into(), ToastKind::Warn, DEFAULT_TOAST_TIMEOUT_MS);
            } else {
                match content_json(&state.graph.export()) {
                    Ok(content) => commands.push(Command::SaveControl(Control {
                        name: state.control_name.clone(),
                        content,
                        ..Control::default()
                    })),
                    Err(e) => toast(state, &mut commands, e.to_string(), ToastKind::Alert, 0),
                }
            }
        }
        Message::ControlSaved(name) => {
            if name == state.control_name {
                state.dirty = false;
            }
            toast(state, &mut commands, format!("saved {}", name), ToastKind::Info, DEFAULT_TOAST_TIMEOUT_MS);
        }

        // ---------------- Server ----------------
        Message::FetchInfo => commands.push(Command::FetchInfo),
        Message::InfoLoaded(info) => {
            state.info = info;
            commands.push(Command::RenderToolbar);
        }

        // ---------------- UI ----------------
        Message::SetSidebar(sidebar) => {
            state.sidebar = sidebar;
        }
        Message::AddToast { message, kind, timeout_ms } => {
            toast(state, &mut commands, message, kind, timeout_ms);
        }
        Message::RemoveToast(id) => {
            if state.toasts.remove(id) {
                commands.push(Command::CancelToastTimer(id));
                commands.push(Command::RenderToasts);
            }
        }
        Message::RequestFailed { context, error } => {
            toast(state, &mut commands, format!("{}: {}", context, error), ToastKind::Alert, DEFAULT_TOAST_TIMEOUT_MS);
        }
    }

    commands
}
