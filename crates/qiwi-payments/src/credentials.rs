// ============================================================================
// QIWI-PAYMENTS - Credentials
// ============================================================================
// Long-lived identity used to authenticate calls. Immutable once built.
//
// The wallet API and the bills API use different bearer tokens, so every
// call names the role it needs and the executor picks the token per call.
// ============================================================================

use crate::error::QiwiError;
use crate::Result;
use secrecy::{ExposeSecret, Secret};
use std::fmt;

/// Which bearer secret a call authenticates with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialRole {
    /// Wallet API token (profile, balances, payments)
    AccountToken,
    /// P2P secret key (bills)
    SecretKey,
}

impl fmt::Display for CredentialRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialRole::AccountToken => write!(f, "account token"),
            CredentialRole::SecretKey => write!(f, "secret key"),
        }
    }
}

pub struct Credentials {
    account_token: Option<Secret<String>>,
    secret_key: Option<Secret<String>>,
    account_id: Option<String>,
}

impl Credentials {
    /// Build credentials; at least one of the two tokens is required.
    pub fn new(
        account_token: Option<String>,
        secret_key: Option<String>,
        account_id: Option<String>,
    ) -> Result<Self> {
        let account_token = non_empty(account_token);
        let secret_key = non_empty(secret_key);

        if account_token.is_none() && secret_key.is_none() {
            return Err(QiwiError::configuration(
                "either an account token or a P2P secret key is required",
            ));
        }

        Ok(Self {
            account_token: account_token.map(Secret::new),
            secret_key: secret_key.map(Secret::new),
            account_id: non_empty(account_id),
        })
    }

    /// Credentials for wallet operations only
    pub fn with_account_token(token: impl Into<String>, account_id: Option<String>) -> Result<Self> {
        Self::new(Some(token.into()), None, account_id)
    }

    /// Credentials for bill operations only
    pub fn with_secret_key(secret_key: impl Into<String>) -> Result<Self> {
        Self::new(None, Some(secret_key.into()), None)
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn has_account_token(&self) -> bool {
        self.account_token.is_some()
    }

    pub fn has_secret_key(&self) -> bool {
        self.secret_key.is_some()
    }

    pub fn has_role(&self, role: CredentialRole) -> bool {
        match role {
            CredentialRole::AccountToken => self.has_account_token(),
            CredentialRole::SecretKey => self.has_secret_key(),
        }
    }

    /// Token for the given role, or a configuration error when it was never supplied
    pub(crate) fn bearer(&self, role: CredentialRole) -> Result<&str> {
        let secret = match role {
            CredentialRole::AccountToken => self.account_token.as_ref(),
            CredentialRole::SecretKey => self.secret_key.as_ref(),
        };

        secret
            .map(|s| s.expose_secret().as_str())
            .ok_or_else(|| QiwiError::configuration(format!("no {} configured", role)))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_token", &self.account_token.as_ref().map(|_| "[REDACTED]"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("account_id", &self.account_id)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
