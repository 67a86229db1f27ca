//! Browser tests for the toast store wiring.
#![cfg(target_arch = "wasm32")]

use chore_editor::messages::Message;
use chore_editor::state::{dispatch_global_message, APP_STATE};
use chore_editor::toast::{self, ToastKind};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn toast_count() -> u32 {
    web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .query_selector_all("#toast-root .toast")
        .unwrap()
        .length()
}

#[wasm_bindgen_test]
fn toasts_render_and_close() {
    let before = APP_STATE.with(|s| s.borrow().toasts.len());

    toast::show("sticky note", ToastKind::Warn, 0);
    toast::show("short lived", ToastKind::Info, 60_000);

    let (sticky, timed) = APP_STATE.with(|s| {
        let state = s.borrow();
        let ids: Vec<u32> = state.toasts.iter().map(|t| t.id).collect();
        (ids[ids.len() - 2], ids[ids.len() - 1])
    });
    assert_eq!(timed, sticky + 1);
    assert_eq!(toast_count() as usize, before + 2);
    assert!(toast::pending_timers() >= 1);

    dispatch_global_message(Message::RemoveToast(timed));
    dispatch_global_message(Message::RemoveToast(sticky));
    assert_eq!(toast_count() as usize, before);
}
