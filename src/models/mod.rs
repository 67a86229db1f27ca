pub mod api;
pub mod drawflow;
pub mod node;

pub use api::{
    ApiData, ApiDataMeta, ApiErrorBody, AuthItem, Control, ControlItem, LoginRequest, LoginToken, Meta,
    RecordId, ServerInfo, TemplateItem, TokenCheck,
};
pub use drawflow::{DrawflowExport, DrawflowModule, DrawflowNode};
pub use node::{get_bool, get_list, get_str, NodeData, NodeKind, NodeSpec};
