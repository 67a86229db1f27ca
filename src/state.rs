use std::cell::RefCell;

use crate::graph::{compute_view, Graph, ViewHighlight};
use crate::messages::{Command, Message};
use crate::models::ServerInfo;
use crate::toast::ToastStore;
use crate::update::update;

/// Everything the editor knows; mutated only through `update`.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub graph: Graph,
    /// Name of the control being edited; empty for a fresh workflow.
    pub control_name: String,
    /// Endpoint currently previewed on the canvas.
    pub view_endpoint: Option<String>,
    /// Re-apply the preview after every canvas redraw.
    pub view_reload: bool,
    pub sidebar: String,
    pub info: ServerInfo,
    pub toasts: ToastStore,
    pub selected_node: Option<u32>,
    /// Unsaved edits since the last load or save.
    pub dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view_reload: true,
            ..Self::default()
        }
    }

    /// Highlight for the active preview, if any.
    pub fn current_view(&self) -> Option<ViewHighlight> {
        self.view_endpoint
            .as_deref()
            .map(|endpoint| compute_view(&self.graph, endpoint))
    }

    pub fn dispatch(&mut self, msg: Message) -> Vec<Command> {
        update(self, msg)
    }
}

// We use thread_local to store our app state
thread_local! {
    pub static APP_STATE: RefCell<AppState> = RefCell::new(AppState::new());
}

/// Run `msg` through the reducer, then execute the resulting commands once
/// the state borrow is released so executors can read state again.
pub fn dispatch_global_message(msg: Message) {
    crate::debug_log!("dispatch {:?}", msg);
    let commands = APP_STATE.with(|state| crate::mut_borrow!(state).dispatch(msg));

    for cmd in commands {
        crate::command_executors::execute(cmd);
    }
}
