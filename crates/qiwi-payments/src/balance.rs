// ============================================================================
// QIWI-PAYMENTS - Balance Service
// ============================================================================
// Funding sources of a wallet and single-alias balances.
// Produced fresh on every call, never cached.
// ============================================================================

use crate::credentials::CredentialRole;
use crate::error::QiwiError;
use crate::executor::RequestExecutor;
use crate::profile::ProfileService;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Alias of the ruble wallet account
pub const DEFAULT_BALANCE_ALIAS: &str = "qw_wallet_rub";

// ============================================================================
// DATA TYPES
// ============================================================================

/// Amount held on a funding account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub amount: f64,

    /// ISO 4217 numeric code (643 = RUB)
    #[serde(default)]
    pub currency: Option<u16>,
}

/// One funding source of the wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingAccount {
    /// Account alias, e.g. `qw_wallet_rub`
    pub alias: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub has_balance: bool,

    /// Absent (null) for accounts without a balance
    #[serde(default)]
    pub balance: Option<AccountBalance>,

    #[serde(default)]
    pub currency: Option<u16>,

    #[serde(default)]
    pub default_account: bool,
}

impl FundingAccount {
    /// Balance amount, if the account carries one
    pub fn amount(&self) -> Option<f64> {
        self.balance.as_ref().map(|b| b.amount)
    }
}

#[derive(Debug, Deserialize)]
struct FundingSources {
    #[serde(default)]
    accounts: Vec<FundingAccount>,
}

/// Result of [`BalanceService::get_balance`]
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceReport {
    /// Amount of the requested alias
    Amount(f64),
    /// Every funding account, unfiltered
    Accounts(Vec<FundingAccount>),
}

/// First account whose alias matches, as an amount
pub fn find_balance(accounts: &[FundingAccount], alias: &str) -> Result<f64> {
    let account = accounts
        .iter()
        .find(|a| a.alias == alias)
        .ok_or_else(|| QiwiError::NotFound(format!("funding account with alias '{}'", alias)))?;

    account
        .amount()
        .ok_or_else(|| QiwiError::NotFound(format!("balance of funding account '{}'", alias)))
}

// ============================================================================
// BALANCE SERVICE
// ============================================================================

pub struct BalanceService {
    executor: Arc<RequestExecutor>,
    profile: ProfileService,
}

impl BalanceService {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        let profile = ProfileService::new(executor.clone());
        Self { executor, profile }
    }

    /// Balance of one alias (`only_balance`) or the full list of funding accounts
    pub async fn get_balance(&self, only_balance: bool, alias: &str) -> Result<BalanceReport> {
        let accounts = self.funding_accounts().await?;

        if only_balance {
            Ok(BalanceReport::Amount(find_balance(&accounts, alias)?))
        } else {
            Ok(BalanceReport::Accounts(accounts))
        }
    }

    /// Amount of the funding account with the given alias
    pub async fn balance(&self, alias: &str) -> Result<f64> {
        let accounts = self.funding_accounts().await?;
        find_balance(&accounts, alias)
    }

    /// All funding accounts of the wallet
    pub async fn funding_accounts(&self) -> Result<Vec<FundingAccount>> {
        let person_id = self.profile.resolve_account_id().await?;
        let url = self
            .executor
            .config()
            .edge_endpoint(&[
                "funding-sources",
                "v2",
                "persons",
                person_id.as_str(),
                "accounts",
            ])?;

        debug!("Fetching funding sources for {}", person_id);

        let payload = self
            .executor
            .get(CredentialRole::AccountToken, &url, &[])
            .await?;

        let sources: FundingSources = serde_json::from_value(payload)?;
        Ok(sources.accounts)
    }
}
