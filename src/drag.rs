//! Mouse drag for panels and dividers.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, EventTarget, HtmlElement, MouseEvent};

/// Delta arithmetic for one drag gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub x_enabled: bool,
    pub y_enabled: bool,
    active: bool,
    last_x: f64,
    last_y: f64,
}

impl DragState {
    pub fn new(x_enabled: bool, y_enabled: bool) -> Self {
        Self {
            x_enabled,
            y_enabled,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&mut self, x: f64, y: f64) {
        self.active = true;
        if self.x_enabled {
            self.last_x = x;
        }
        if self.y_enabled {
            self.last_y = y;
        }
    }

    /// `(previous - current)` on each enabled axis, 0 on disabled ones.
    pub fn move_to(&mut self, x: f64, y: f64) -> (f64, f64) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.x_enabled {
            dx = self.last_x - x;
            self.last_x = x;
        }
        if self.y_enabled {
            dy = self.last_y - y;
            self.last_y = y;
        }
        (dx, dy)
    }

    pub fn stop(&mut self) {
        self.active = false;
    }
}

type MouseClosure = Closure<dyn FnMut(MouseEvent)>;

/// Keeps the installed listeners alive; dropping it detaches them.
pub struct DragHandle {
    element: HtmlElement,
    document: Document,
    on_down: MouseClosure,
    on_move: MouseClosure,
    on_up: MouseClosure,
}

impl DragHandle {
    /// Leave the listeners installed for the lifetime of the page.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for DragHandle {
    fn drop(&mut self) {
        let element: &EventTarget = self.element.as_ref();
        let _ = element.remove_event_listener_with_callback("mousedown", self.on_down.as_ref().unchecked_ref());
        let _ = element.remove_event_listener_with_callback("mousemove", self.on_move.as_ref().unchecked_ref());
        let _ = self
            .document
            .remove_event_listener_with_callback("mouseup", self.on_up.as_ref().unchecked_ref());
    }
}

fn targets(event: &MouseEvent, element: &HtmlElement) -> bool {
    event
        .target()
        .is_some_and(|t| t.loose_eq(element.as_ref()))
}

/// Make `element` draggable. Only presses and moves whose target is the
/// element itself count; releasing anywhere on the document ends the drag.
pub fn move_element(
    element: &HtmlElement,
    x: bool,
    y: bool,
    on_move: impl FnMut(f64, f64) + 'static,
    on_down: impl FnMut() + 'static,
) -> Result<DragHandle, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let state = Rc::new(RefCell::new(DragState::new(x, y)));

    let down = {
        let state = state.clone();
        let element = element.clone();
        let mut on_down = on_down;
        Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            if !targets(&e, &element) {
                return;
            }
            e.prevent_default();
            crate::mut_borrow!(state).start(e.client_x() as f64, e.client_y() as f64);
            on_down();
        })
    };

    let moved = {
        let state = state.clone();
        let element = element.clone();
        let mut on_move = on_move;
        Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            if !state.borrow().is_active() || !targets(&e, &element) {
                return;
            }
            e.prevent_default();
            let (dx, dy) = crate::mut_borrow!(state).move_to(e.client_x() as f64, e.client_y() as f64);
            on_move(dx, dy);
        })
    };

    let up = {
        let state = state.clone();
        Closure::<dyn FnMut(MouseEvent)>::new(move |_e: MouseEvent| {
            crate::mut_borrow!(state).stop();
        })
    };

    element.add_event_listener_with_callback("mousedown", down.as_ref().unchecked_ref())?;
    element.add_event_listener_with_callback("mousemove", moved.as_ref().unchecked_ref())?;
    document.add_event_listener_with_callback("mouseup", up.as_ref().unchecked_ref())?;

    Ok(DragHandle {
        element: element.clone(),
        document,
        on_down: down,
        on_move: moved,
        on_up: up,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_previous_minus_current() {
        let mut drag = DragState::new(true, true);
        drag.start(100.0, 50.0);
        assert_eq!(drag.move_to(90.0, 60.0), (10.0, -10.0));
        assert_eq!(drag.move_to(95.0, 60.0), (-5.0, 0.0));
    }

    #[test]
    fn disabled_axis_stays_zero() {
        let mut drag = DragState::new(false, true);
        drag.start(100.0, 50.0);
        assert_eq!(drag.move_to(0.0, 40.0), (0.0, 10.0));

        let mut drag = DragState::new(true, false);
        drag.start(100.0, 50.0);
        assert_eq!(drag.move_to(120.0, 0.0), (-20.0, 0.0));
    }

    #[test]
    fn stop_ends_gesture() {
        let mut drag = DragState::new(true, true);
        assert!(!drag.is_active());
        drag.start(0.0, 0.0);
        assert!(drag.is_active());
        drag.stop();
        assert!(!drag.is_active());
    }
}
