// ============================================================================
// QIWI-PAYMENTS - Transfers
// ============================================================================
// Wallet-to-wallet and provider payments via the sinap payments API
// (account token role). Inputs are validated before any request is made.
// ============================================================================

use crate::credentials::CredentialRole;
use crate::error::QiwiError;
use crate::executor::RequestExecutor;
use crate::ids;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// ISO 4217 numeric code of the ruble
pub const RUB_CURRENCY_CODE: &str = "643";

/// Payment terms (recipient providers) of the payments API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// QIWI wallet
    #[default]
    Qiwi,
    AlfaBank,
    TinkoffBank,
    RsBank,
    PsBank,
    VisaCis,
    VisaRussia,
    MastercardCis,
    MastercardRussia,
    Mir,
}

impl Provider {
    /// Terms id used in `/sinap/api/v2/terms/{id}/payments`
    pub fn id(&self) -> u32 {
        match self {
            Provider::Qiwi => 99,
            Provider::AlfaBank => 464,
            Provider::TinkoffBank => 466,
            Provider::RsBank => 815,
            Provider::PsBank => 821,
            Provider::VisaCis => 1960,
            Provider::VisaRussia => 1963,
            Provider::MastercardCis => 21012,
            Provider::MastercardRussia => 21013,
            Provider::Mir => 31652,
        }
    }
}

/// A payment to submit
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub destination: String,
    pub amount: f64,
    pub currency_code: String,
    pub comment: Option<String>,
    pub provider: Provider,
}

impl TransferRequest {
    /// Ruble transfer to another QIWI wallet
    pub fn new(destination: impl Into<String>, amount: f64) -> Self {
        Self {
            destination: destination.into(),
            amount,
            currency_code: RUB_CURRENCY_CODE.to_string(),
            comment: None,
            provider: Provider::Qiwi,
        }
    }

    pub fn currency_code(mut self, code: impl Into<String>) -> Self {
        self.currency_code = code.into();
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(QiwiError::validation(
                "destination account is required for a transfer",
            ));
        }

        if self.amount == 0.0 || !self.amount.is_finite() {
            return Err(QiwiError::validation("transfer amount must be non-zero"));
        }

        Ok(())
    }

    fn body(&self, transaction_id: String) -> Value {
        json!({
            "id": transaction_id,
            "sum": {
                "amount": self.amount,
                "currency": self.currency_code,
            },
            "paymentMethod": {
                "type": "Account",
                "accountId": self.currency_code,
            },
            "comment": self.comment.clone().unwrap_or_default(),
            "fields": {
                "account": self.destination.trim(),
            },
        })
    }
}

/// Decoded payment response; its schema varies by provider
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    payload: Value,
}

impl TransferReceipt {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Transaction id assigned by QIWI
    pub fn transaction_id(&self) -> Option<&str> {
        self.payload
            .get("transaction")
            .and_then(|t| t.get("id"))
            .and_then(Value::as_str)
    }

    /// Transaction state code, e.g. `Accepted`
    pub fn state(&self) -> Option<&str> {
        self.payload
            .get("transaction")
            .and_then(|t| t.get("state"))
            .and_then(|s| s.get("code"))
            .and_then(Value::as_str)
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }
}

pub struct TransferService {
    executor: Arc<RequestExecutor>,
}

impl TransferService {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Submit a payment
    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt> {
        request.validate()?;

        let terms = request.provider.id().to_string();
        let url = self
            .executor
            .config()
            .edge_endpoint(&["sinap", "api", "v2", "terms", terms.as_str(), "payments"])?;
        let body = request.body(ids::transaction_id());

        let payload = self
            .executor
            .post(CredentialRole::AccountToken, &url, Some(body))
            .await?;

        let receipt = TransferReceipt::new(payload);
        info!(
            "Transfer of {} to {} submitted: {:?}",
            request.amount,
            request.destination,
            receipt.state()
        );
        Ok(receipt)
    }
}
