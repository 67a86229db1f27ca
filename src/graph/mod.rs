pub mod editor;
pub mod tags;
pub mod view;

pub use editor::{Connection, Graph, GraphNode};
pub use tags::{compare_tags, TagSet};
pub use view::{apply_view, compute_view, view_endpoint, view_endpoint_clear, ViewHighlight};
