// ============================================================================
// QIWI-PAYMENTS - QIWI Wallet & P2P Bills
// ============================================================================
// Async client for the QIWI wallet API (edge.qiwi.com) and the P2P bills
// API (api.qiwi.com).
//
// Two credentials, two roles:
// - account token: profile, balances, transfers
// - secret key:    bills (create / status / reject)
//
// Features:
// - Typed, classified errors (401 / 403 / API errors in 200 bodies)
// - Invoice snapshots with forward-only status lifecycle
// - Funding-source balances by alias
// - Wallet and provider transfers
// ============================================================================

pub mod config;
pub mod credentials;
pub mod error;
pub mod transport;
pub mod executor;
pub mod profile;
pub mod balance;
pub mod invoice;
pub mod transfer;
pub mod client;

mod ids;

pub use config::QiwiConfig;
pub use credentials::{CredentialRole, Credentials};
pub use error::{ErrorKind, QiwiError};
pub use transport::{ApiRequest, HttpTransport, RawResponse, ReqwestTransport};
pub use executor::{classify, RequestExecutor};
pub use profile::{ProfileQuery, ProfileService};
pub use balance::{BalanceReport, BalanceService, FundingAccount, DEFAULT_BALANCE_ALIAS};
pub use invoice::{CreateInvoice, Currency, Invoice, InvoiceService, InvoiceStatus};
pub use transfer::{Provider, TransferReceipt, TransferRequest, TransferService, RUB_CURRENCY_CODE};
pub use client::QiwiClient;
pub use reqwest::Method;

/// Re-export for convenience
pub type Result<T> = std::result::Result<T, QiwiError>;
