pub mod renderer;

pub use renderer::{canvas_root, render};
