pub mod api_client;
pub mod config;

pub use api_client::{request_sender, ApiClient, ApiResponse, Method};
pub use config::{api_config, set_api_config, ApiConfig};
