//! Endpoint configuration
//!
//! The API base URI is assembled from host, API version and product, each of
//! which can be overridden on the command line or through the environment
//! (`ATP_HOST`, `ATP_API_VERSION`, `ATP_PRODUCT`). `ATP_BASE_URI` replaces the
//! assembled URI outright.

use crate::cli::{Cli, DEFAULT_API_VERSION, DEFAULT_HOST, DEFAULT_PRODUCT};

/// Where requests are sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub api_version: String,
    pub product: String,
    pub base_uri: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            product: DEFAULT_PRODUCT.to_string(),
            base_uri: None,
        }
    }
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            host: cli.host.clone(),
            api_version: cli.api_version.clone(),
            product: cli.product.clone(),
            base_uri: cli.base_uri.clone(),
        }
    }

    /// Returns `https://{host}/{api_version}/{product}` unless an explicit
    /// base URI was configured. Trailing slashes are removed so paths can be
    /// appended directly.
    pub fn base_uri(&self) -> String {
        let uri = match &self.base_uri {
            Some(uri) => uri.clone(),
            None => format!("https://{}/{}/{}", self.host, self.api_version, self.product),
        };
        uri.trim_end_matches('/').to_string()
    }
}
