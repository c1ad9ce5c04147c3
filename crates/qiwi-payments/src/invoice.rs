// ============================================================================
// QIWI-PAYMENTS - Invoices (P2P Bills)
// ============================================================================
// Create, query and reject bills via the P2P bills API (secret key role).
//
// An `Invoice` is a point-in-time snapshot of the server's state. It is never
// mutated; re-fetch to observe a newer state.
//
// Lifecycle: WAITING -> { PAID | REJECTED | EXPIRED }, terminal states final.
// ============================================================================

use crate::credentials::CredentialRole;
use crate::error::QiwiError;
use crate::executor::RequestExecutor;
use crate::ids;
use crate::Result;
use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Offset the bills API expects on `expirationDateTime` (Moscow time)
const BILLS_UTC_OFFSET_SECS: i32 = 3 * 3600;

const DEFAULT_LIFETIME_MINUTES: u32 = 15;

// ============================================================================
// DATA TYPES
// ============================================================================

/// Bill currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Rub,
    Kzt,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Rub => "RUB",
            Currency::Kzt => "KZT",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = QiwiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RUB" => Ok(Currency::Rub),
            "KZT" => Ok(Currency::Kzt),
            other => Err(QiwiError::validation(format!(
                "currency must be \"RUB\" or \"KZT\", not \"{}\"",
                other
            ))),
        }
    }
}

/// Bill status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    Waiting,
    Paid,
    Rejected,
    Expired,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Waiting => "WAITING",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Rejected => "REJECTED",
            InvoiceStatus::Expired => "EXPIRED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvoiceStatus::Waiting)
    }

    /// Whether a bill in this status may later be observed in `next`
    pub fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        match self {
            InvoiceStatus::Waiting => true,
            terminal => *terminal == next,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = QiwiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "WAITING" => Ok(InvoiceStatus::Waiting),
            "PAID" => Ok(InvoiceStatus::Paid),
            "REJECTED" => Ok(InvoiceStatus::Rejected),
            "EXPIRED" => Ok(InvoiceStatus::Expired),
            other => Err(QiwiError::invalid_invoice(format!("unknown status '{}'", other))),
        }
    }
}

/// Snapshot of a bill as reported by the server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    id: String,
    amount: f64,
    currency: Currency,
    status: InvoiceStatus,
    status_changed_at: Option<DateTime<FixedOffset>>,
    created_at: Option<DateTime<FixedOffset>>,
    expires_at: Option<DateTime<FixedOffset>>,
    pay_url: String,
    comment: Option<String>,
}

impl Invoice {
    /// Build a snapshot from a bills API payload
    pub fn from_payload(payload: &Value) -> Result<Self> {
        if payload.get("errorCode").is_some() {
            return Err(QiwiError::Api(payload.clone()));
        }

        let id = payload
            .get("billId")
            .or_else(|| payload.get("id"))
            .and_then(scalar_string)
            .ok_or_else(|| QiwiError::invalid_invoice("missing billId"))?;

        let amount_obj = payload
            .get("amount")
            .ok_or_else(|| QiwiError::invalid_invoice("missing amount"))?;

        let amount = amount_obj
            .get("value")
            .and_then(parse_amount)
            .ok_or_else(|| QiwiError::invalid_invoice("missing or invalid amount.value"))?;

        let currency = amount_obj
            .get("currency")
            .and_then(Value::as_str)
            .ok_or_else(|| QiwiError::invalid_invoice("missing amount.currency"))?
            .parse::<Currency>()
            .map_err(|e| QiwiError::invalid_invoice(e.to_string()))?;

        let status_obj = payload
            .get("status")
            .ok_or_else(|| QiwiError::invalid_invoice("missing status"))?;

        let status = status_obj
            .get("value")
            .and_then(Value::as_str)
            .ok_or_else(|| QiwiError::invalid_invoice("missing status.value"))?
            .parse::<InvoiceStatus>()?;

        Ok(Self {
            id,
            amount,
            currency,
            status,
            status_changed_at: status_obj.get("changedDateTime").and_then(parse_timestamp),
            created_at: payload.get("creationDateTime").and_then(parse_timestamp),
            expires_at: payload.get("expirationDateTime").and_then(parse_timestamp),
            pay_url: payload
                .get("payUrl")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            comment: payload
                .get("comment")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn status_changed_at(&self) -> Option<DateTime<FixedOffset>> {
        self.status_changed_at
    }

    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.created_at
    }

    pub fn expires_at(&self) -> Option<DateTime<FixedOffset>> {
        self.expires_at
    }

    pub fn pay_url(&self) -> &str {
        &self.pay_url
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check that `later` is a legal successor snapshot of this bill
    pub fn verify_successor(&self, later: &Invoice) -> Result<()> {
        if later.id != self.id {
            return Err(QiwiError::invalid_invoice(format!(
                "snapshot of bill '{}' cannot follow bill '{}'",
                later.id, self.id
            )));
        }

        if !self.status.can_transition_to(later.status) {
            return Err(QiwiError::invalid_invoice(format!(
                "bill '{}' cannot move from {} to {}",
                self.id, self.status, later.status
            )));
        }

        Ok(())
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The bills API sends amounts as "400.00" strings; accept numbers too
fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<FixedOffset>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

/// `now + lifetime`, rendered in the bills API's fixed +03:00 offset
fn expiration_timestamp(now: DateTime<Utc>, lifetime_minutes: u32) -> String {
    let offset = FixedOffset::east_opt(BILLS_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    (now + Duration::minutes(i64::from(lifetime_minutes)))
        .with_timezone(&offset)
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}

// ============================================================================
// CREATE REQUEST
// ============================================================================

/// Parameters of a new bill
#[derive(Debug, Clone, PartialEq)]
pub struct CreateInvoice {
    pub amount: f64,
    pub lifetime_minutes: u32,
    pub currency: String,
    pub comment: Option<String>,
    pub id: Option<String>,
}

impl CreateInvoice {
    /// Ruble bill living 15 minutes
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            lifetime_minutes: DEFAULT_LIFETIME_MINUTES,
            currency: Currency::Rub.to_string(),
            comment: None,
            id: None,
        }
    }

    pub fn lifetime(mut self, minutes: u32) -> Self {
        self.lifetime_minutes = minutes;
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Validate and render the bill id and PUT body
    fn prepare(&self, now: DateTime<Utc>) -> Result<(String, Value)> {
        let currency: Currency = self.currency.parse()?;

        if !self.amount.is_finite() {
            return Err(QiwiError::validation("amount must be a finite number"));
        }

        let cents = self.amount * 100.0;
        if (cents - cents.round()).abs() > 1e-6 {
            return Err(QiwiError::validation(format!(
                "amount {} has more than two decimal places",
                self.amount
            )));
        }

        if self.lifetime_minutes == 0 {
            return Err(QiwiError::validation("bill lifetime must be at least one minute"));
        }

        let id = match &self.id {
            Some(id) => checked_id(id)?.to_string(),
            None => ids::bill_id(),
        };

        let body = json!({
            "amount": {
                "currency": currency.as_str(),
                "value": format!("{:.2}", self.amount),
            },
            "comment": self.comment.clone().unwrap_or_default(),
            "expirationDateTime": expiration_timestamp(now, self.lifetime_minutes),
        });

        Ok((id, body))
    }
}

// ============================================================================
// INVOICE SERVICE
// ============================================================================

pub struct InvoiceService {
    executor: Arc<RequestExecutor>,
}

impl InvoiceService {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Issue a new bill
    pub async fn create_invoice(&self, request: CreateInvoice) -> Result<Invoice> {
        let (id, body) = request.prepare(Utc::now())?;
        let url = self.executor.config().bill_endpoint(&[id.as_str()])?;

        debug!("Creating bill {}", id);

        let payload = self
            .executor
            .put(CredentialRole::SecretKey, &url, body)
            .await?;

        let invoice = Invoice::from_payload(&payload)?;
        info!("Bill created: {} ({} {})", invoice.id(), invoice.amount(), invoice.currency());
        Ok(invoice)
    }

    /// Current state of a bill
    pub async fn get_invoice_status(&self, id: &str) -> Result<Invoice> {
        let url = self.executor.config().bill_endpoint(&[checked_id(id)?])?;

        let payload = self
            .executor
            .get(CredentialRole::SecretKey, &url, &[])
            .await?;

        Invoice::from_payload(&payload)
    }

    /// Reject an unpaid bill
    pub async fn cancel_invoice(&self, id: &str) -> Result<Invoice> {
        let url = self
            .executor
            .config()
            .bill_endpoint(&[checked_id(id)?, "reject"])?;

        let payload = self
            .executor
            .post(CredentialRole::SecretKey, &url, None)
            .await?;

        let invoice = Invoice::from_payload(&payload)?;
        info!("Bill {} is now {}", invoice.id(), invoice.status());
        Ok(invoice)
    }
}

fn checked_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(QiwiError::validation("bill id must not be empty"));
    }
    // Dot segments would be normalized away and address the parent resource
    if id == "." || id == ".." {
        return Err(QiwiError::validation(format!("bill id {:?} is not addressable", id)));
    }
    Ok(id)
}
