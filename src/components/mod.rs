pub mod node_editor;
pub mod node_palette;
pub mod toolbar;
