//! Small crate-wide convenience macros.

/// Console logging for chatty diagnostics. Compiles to nothing in release
/// builds so the hot paths (rendering, drag) stay quiet in production.
///
/// ```rust,ignore
/// debug_log!("rendered {} nodes", count);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            web_sys::console::log_1(&format!($($arg)*).into());
        }
    };
}

/// Acquire a **mutable** borrow from a `RefCell` (or `Rc<RefCell>`).
///
/// ```rust,ignore
/// use std::cell::RefCell;
/// let cell = RefCell::new(1);
/// {
///     let mut n = mut_borrow!(cell);
///     *n += 1;
/// }
/// assert_eq!(*cell.borrow(), 2);
/// ```
#[macro_export]
macro_rules! mut_borrow {
    ($cell:expr) => {
        $cell.borrow_mut()
    };
}
