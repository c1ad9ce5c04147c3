// ============================================================================
// QIWI-PAYMENTS - Request Executor
// ============================================================================
// Turns a (role, method, url, query, body) call into one authenticated HTTP
// request and classifies the outcome.
//
// Classification order matters:
//   1. HTTP 401 -> AuthInvalid, HTTP 403 -> PermissionDenied
//   2. body must decode as JSON, else ApiError with the raw body
//   3. `errorCode` / `code` in the payload -> ApiError, even on HTTP 200
//
// Headers are built per call and never stored on the shared client.
// ============================================================================

use crate::config::QiwiConfig;
use crate::credentials::{CredentialRole, Credentials};
use crate::error::QiwiError;
use crate::transport::{ApiRequest, HttpTransport, ReqwestTransport};
use crate::Result;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Executes single authenticated calls against the QIWI APIs
pub struct RequestExecutor {
    credentials: Arc<Credentials>,
    transport: Arc<dyn HttpTransport>,
    config: QiwiConfig,
}

impl RequestExecutor {
    /// Create executor over the default reqwest transport
    pub fn new(credentials: Credentials, config: QiwiConfig) -> Result<Self> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(credentials, config, Arc::new(transport)))
    }

    /// Create executor over a custom transport
    pub fn with_transport(
        credentials: Credentials,
        config: QiwiConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            credentials: Arc::new(credentials),
            transport,
            config,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn config(&self) -> &QiwiConfig {
        &self.config
    }

    /// Build the request for a call without sending it
    pub fn build_request(
        &self,
        role: CredentialRole,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<ApiRequest> {
        let token = self.credentials.bearer(role)?;

        let mut headers = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {}", token)),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        Ok(ApiRequest {
            method,
            url: url.to_string(),
            headers,
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body,
            timeout: self.config.timeout(),
        })
    }

    /// Issue one request and return the decoded payload
    pub async fn execute(
        &self,
        role: CredentialRole,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value> {
        let request = self.build_request(role, method, url, query, body)?;

        debug!("{} {} ({})", request.method, request.url, role);

        let response = self.transport.send(request).await?;

        debug!("HTTP {} from {}", response.status, url);

        classify(response.status, &response.body).map_err(|err| {
            warn!("QIWI call to {} failed: {} [{}]", url, err, err.code());
            err
        })
    }

    pub async fn get(&self, role: CredentialRole, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.execute(role, Method::GET, url, query, None).await
    }

    pub async fn post(&self, role: CredentialRole, url: &str, body: Option<Value>) -> Result<Value> {
        self.execute(role, Method::POST, url, &[], body).await
    }

    pub async fn put(&self, role: CredentialRole, url: &str, body: Value) -> Result<Value> {
        self.execute(role, Method::PUT, url, &[], Some(body)).await
    }
}

/// Map an HTTP status and body onto a payload or a classified error
pub fn classify(status: u16, body: &[u8]) -> Result<Value> {
    match status {
        401 => return Err(QiwiError::AuthInvalid),
        403 => return Err(QiwiError::PermissionDenied),
        _ => {}
    }

    let success = (200..300).contains(&status);

    let payload: Value = if success && body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body)
            .map_err(|_| QiwiError::Api(Value::String(String::from_utf8_lossy(body).into_owned())))?
    };

    if payload.get("errorCode").is_some() || payload.get("code").is_some() {
        return Err(QiwiError::Api(payload));
    }

    if !success {
        return Err(QiwiError::Api(payload));
    }

    Ok(payload)
}
