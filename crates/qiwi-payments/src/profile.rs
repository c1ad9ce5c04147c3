//! Profile Service
//!
//! Wallet profile and identification lookups. Also resolves the wallet
//! identity (`personId`) for balance lookups when no account id was configured.

use crate::credentials::CredentialRole;
use crate::error::QiwiError;
use crate::executor::RequestExecutor;
use crate::Result;
use serde_json::Value;
use std::sync::Arc;

/// Which profile sections to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileQuery {
    pub auth_info: bool,
    pub contract_info: bool,
    pub user_info: bool,
}

impl ProfileQuery {
    /// Only the `authInfo` section, enough to learn the wallet identity
    pub fn auth_only() -> Self {
        Self {
            auth_info: true,
            contract_info: false,
            user_info: false,
        }
    }

    fn params(&self) -> [(&'static str, &'static str); 3] {
        [
            ("authInfoEnabled", flag(self.auth_info)),
            ("contractInfoEnabled", flag(self.contract_info)),
            ("userInfoEnabled", flag(self.user_info)),
        ]
    }
}

impl Default for ProfileQuery {
    fn default() -> Self {
        Self {
            auth_info: true,
            contract_info: true,
            user_info: true,
        }
    }
}

fn flag(enabled: bool) -> &'static str {
    if enabled {
        "true"
    } else {
        "false"
    }
}

pub struct ProfileService {
    executor: Arc<RequestExecutor>,
}

impl ProfileService {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Fetch the current wallet profile
    pub async fn get_profile(&self, query: ProfileQuery) -> Result<Value> {
        let url = self
            .executor
            .config()
            .edge_endpoint(&["person-profile", "v1", "profile", "current"])?;
        self.executor
            .get(CredentialRole::AccountToken, &url, &query.params())
            .await
    }

    /// Wallet identity (`authInfo.personId`) of the account token's owner
    pub async fn person_id(&self) -> Result<String> {
        let profile = self.get_profile(ProfileQuery::auth_only()).await?;
        person_id_from_profile(&profile)
    }

    /// Configured account id, or the identity derived from the account token
    pub async fn resolve_account_id(&self) -> Result<String> {
        let credentials = self.executor.credentials();

        if let Some(account_id) = credentials.account_id() {
            return Ok(account_id.to_string());
        }

        if !credentials.has_account_token() {
            return Err(QiwiError::configuration(
                "balance lookups need an account id or an account token",
            ));
        }

        self.person_id().await
    }

    /// Identification (verification) data of the wallet
    pub async fn get_identification(&self) -> Result<Value> {
        let person_id = self.resolve_account_id().await?;
        let url = self
            .executor
            .config()
            .edge_endpoint(&[
                "identification",
                "v1",
                "persons",
                person_id.as_str(),
                "identification",
            ])?;

        self.executor.get(CredentialRole::AccountToken, &url, &[]).await
    }
}

fn person_id_from_profile(profile: &Value) -> Result<String> {
    match profile.get("authInfo").and_then(|a| a.get("personId")) {
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(QiwiError::NotFound("authInfo.personId in profile".to_string())),
    }
}
