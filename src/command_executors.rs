use crate::canvas::renderer;
use crate::components::{node_editor, toolbar};
use crate::error::ApiError;
use crate::graph::{apply_view, view_endpoint_clear};
use crate::messages::{Command, Message};
use crate::network::api_client::ApiClient;
use crate::state::{dispatch_global_message, APP_STATE};
use crate::toast;

fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|w| w.document())
}

fn report(context: &str, error: ApiError) {
    web_sys::console::error_1(&format!("{}: {}", context, error).into());
    if error.status() == Some(401) {
        crate::auth::logout();
    }
    dispatch_global_message(Message::RequestFailed {
        context: context.to_string(),
        error: error.to_string(),
    });
}

pub fn execute(cmd: Command) {
    match cmd {
        Command::SendMessage(msg) => dispatch_global_message(msg),
        Command::NoOp => {}
        Command::ScheduleToastRemoval { id, timeout_ms } => toast::schedule_removal(id, timeout_ms),
        Command::CancelToastTimer(id) => toast::cancel_removal(id),
        Command::FetchInfo
        | Command::FetchControl(_)
        | Command::SaveControl(_) => execute_fetch_command(cmd),
        _ => execute_ui_command(cmd),
    }
}

pub fn execute_ui_command(cmd: Command) {
    let Some(document) = document() else {
        debug_log!("no document; skipping {:?}", cmd);
        return;
    };

    let result = APP_STATE.with(|state| {
        let state = state.borrow();
        match &cmd {
            Command::RenderCanvas => renderer::render(&document, &state.graph, state.selected_node),
            Command::RenderToolbar => toolbar::refresh(&document, &state),
            Command::RenderNodeEditor => node_editor::refresh(&document, &state),
            Command::RenderToasts => toast::render(&document, &state.toasts),
            Command::ApplyView => match (renderer::canvas_root(&document), state.current_view()) {
                (Some(root), Some(view)) => view_endpoint_clear(&root).and_then(|_| apply_view(&root, &view)),
                _ => Ok(()),
            },
            Command::ClearView => match renderer::canvas_root(&document) {
                Some(root) => view_endpoint_clear(&root),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    });

    if let Err(e) = result {
        web_sys::console::warn_2(&format!("{:?} failed", cmd).into(), &e);
    }
}

pub fn execute_fetch_command(cmd: Command) {
    match cmd {
        Command::FetchInfo => {
            wasm_bindgen_futures::spawn_local(async move {
                match ApiClient::info().await {
                    Ok(info) => dispatch_global_message(Message::InfoLoaded(info)),
                    Err(e) => web_sys::console::warn_1(&format!("Failed to fetch server info: {}", e).into()),
                }
            });
        }
        Command::FetchControl(name) => {
            wasm_bindgen_futures::spawn_local(async move {
                match ApiClient::get_control(&name).await {
                    Ok(control) => dispatch_global_message(Message::ControlLoaded(control)),
                    Err(e) => report(&format!("load {}", name), e),
                }
            });
        }
        Command::SaveControl(control) => {
            wasm_bindgen_futures::spawn_local(async move {
                match ApiClient::save_control(&control).await {
                    Ok(()) => dispatch_global_message(Message::ControlSaved(control.name)),
                    Err(e) => report(&format!("save {}", control.name), e),
                }
            });
        }
        other => debug_log!("not a fetch command: {:?}", other),
    }
}
