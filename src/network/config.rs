use std::cell::RefCell;

use crate::constants::DEFAULT_API_BASE;
use crate::utils::join_path;

/// API route configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl Default for ApiConfig {
    /// The backend serves the UI and the API from the same origin, so a
    /// relative base works unless a build or `init_api_config` says otherwise.
    fn default() -> Self {
        Self::from_url(DEFAULT_API_BASE)
    }
}

impl ApiConfig {
    /// Read the base from the `API_BASE_URL` env var baked in at build time.
    pub fn new() -> Result<Self, &'static str> {
        match option_env!("API_BASE_URL") {
            Some(url) if !url.trim().is_empty() => Ok(Self::from_url(url)),
            _ => Err("API_BASE_URL environment variable is not set"),
        }
    }

    pub fn from_url(url: &str) -> Self {
        let trimmed = url.trim().trim_end_matches('/');
        Self {
            base_url: if trimmed.is_empty() { ".".to_string() } else { trimmed.to_string() },
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API area such as `/control` or `token/check`.
    pub fn url(&self, path: &str) -> String {
        join_path(&self.base_url, path)
    }
}

thread_local! {
    static API_CONFIG: RefCell<ApiConfig> =
        RefCell::new(ApiConfig::new().unwrap_or_default());
}

pub fn api_config() -> ApiConfig {
    API_CONFIG.with(|c| c.borrow().clone())
}

pub fn set_api_config(config: ApiConfig) {
    API_CONFIG.with(|c| *crate::mut_borrow!(c) = config);
}
