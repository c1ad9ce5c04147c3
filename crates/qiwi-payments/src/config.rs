// ============================================================================
// QIWI-PAYMENTS - Configuration
// ============================================================================
// API hosts and request timeout. Credentials live in `Credentials`.

use crate::error::QiwiError;
use crate::Result;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client configuration
///
/// ```json
/// {
///   "edgeUrl": "https://edge.qiwi.com",
///   "billsUrl": "https://api.qiwi.com/partner/bill/v1/bills",
///   "timeoutSeconds": 5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QiwiConfig {
    /// Wallet API host (profile, balances, payments)
    #[serde(default = "default_edge_url")]
    pub edge_url: String,

    /// P2P bills endpoint
    #[serde(default = "default_bills_url")]
    pub bills_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_edge_url() -> String {
    "https://edge.qiwi.com".to_string()
}

fn default_bills_url() -> String {
    "https://api.qiwi.com/partner/bill/v1/bills".to_string()
}

fn default_timeout() -> u64 {
    5
}

impl QiwiConfig {
    /// Override the wallet API host
    pub fn with_edge_url(mut self, url: impl Into<String>) -> Self {
        self.edge_url = url.into();
        self
    }

    /// Override the bills endpoint
    pub fn with_bills_url(mut self, url: impl Into<String>) -> Self {
        self.bills_url = url.into();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Absolute URL on the wallet API host.
    ///
    /// Each segment is percent-encoded on its own, so ids holding `/`, `?`
    /// or `#` stay inside their segment.
    pub fn edge_endpoint(&self, segments: &[&str]) -> Result<String> {
        join_segments(&self.edge_url, segments)
    }

    /// Absolute URL under the bills endpoint
    pub fn bill_endpoint(&self, segments: &[&str]) -> Result<String> {
        join_segments(&self.bills_url, segments)
    }
}

impl Default for QiwiConfig {
    fn default() -> Self {
        Self {
            edge_url: default_edge_url(),
            bills_url: default_bills_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn join_segments(base: &str, segments: &[&str]) -> Result<String> {
    let mut url = Url::parse(base)
        .map_err(|e| QiwiError::configuration(format!("Invalid base URL {}: {}", base, e)))?;

    url.path_segments_mut()
        .map_err(|_| QiwiError::configuration(format!("Base URL cannot take a path: {}", base)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url.to_string())
}
