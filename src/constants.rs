// localStorage keys
pub const TOKEN_STORAGE_KEY: &str = "token";

// API defaults
pub const DEFAULT_API_BASE: &str = "./api/v1";
pub const DEFAULT_LIST_LIMIT: u32 = 20;

// Drawflow module that holds the editable graph
pub const DRAWFLOW_MODULE: &str = "Home";

// Preview highlight classes
pub const CLASS_VIEW_NODE: &str = "view-endpoint";
pub const CLASS_VIEW_NODE_DISABLED: &str = "view-endpoint-disabled";
pub const CLASS_VIEW_CONNECTION: &str = "view-connection";
pub const CLASS_VIEW_CONNECTION_DISABLED: &str = "view-connection-disabled";
pub const CLASS_VIEW_ROOT_DISABLED: &str = "view-disabled";

// Markdown heading ids
pub const HEADER_ID_PREFIX: &str = "/info-";

// Toasts
pub const DEFAULT_TOAST_TIMEOUT_MS: u32 = 3000;

// Node visual defaults
pub const DEFAULT_NOTE_BACKGROUND: &str = "#FEF9C3";
pub const DEFAULT_NOTE_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_NOTE_WIDTH: u32 = 262;
pub const DEFAULT_NOTE_HEIGHT: u32 = 32;
pub const DEFAULT_SCRIPT: &str = "function main(data) {\n  return data;\n}\n";

// Canvas geometry used by the connection renderer
pub const NODE_WIDTH: f64 = 160.0;
pub const PORT_SPACING: f64 = 22.0;
pub const PORT_OFFSET_Y: f64 = 20.0;
pub const CURVATURE: f64 = 0.5;
