// ============================================================================
// QIWI-PAYMENTS - Client
// ============================================================================
// High-level client: one shared executor, one service per API area.
//
//   let client = QiwiClient::new(Credentials::new(token, secret_key, phone)?)?;
//   let rub = client.balance(DEFAULT_BALANCE_ALIAS).await?;
//   let bill = client.create_invoice(CreateInvoice::new(400.0)).await?;
// ============================================================================

use crate::balance::{BalanceReport, BalanceService};
use crate::config::QiwiConfig;
use crate::credentials::Credentials;
use crate::executor::RequestExecutor;
use crate::invoice::{CreateInvoice, Invoice, InvoiceService};
use crate::profile::{ProfileQuery, ProfileService};
use crate::transfer::{TransferReceipt, TransferRequest, TransferService};
use crate::transport::HttpTransport;
use crate::Result;
use serde_json::Value;
use std::sync::Arc;

pub struct QiwiClient {
    executor: Arc<RequestExecutor>,
    profile: ProfileService,
    balance: BalanceService,
    invoices: InvoiceService,
    transfers: TransferService,
}

impl QiwiClient {
    /// Create client against the production hosts
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, QiwiConfig::default())
    }

    /// Create client with custom hosts / timeout
    pub fn with_config(credentials: Credentials, config: QiwiConfig) -> Result<Self> {
        let executor = RequestExecutor::new(credentials, config)?;
        Ok(Self::from_executor(Arc::new(executor)))
    }

    /// Create client over a custom transport
    pub fn with_transport(
        credentials: Credentials,
        config: QiwiConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let executor = RequestExecutor::with_transport(credentials, config, transport);
        Self::from_executor(Arc::new(executor))
    }

    fn from_executor(executor: Arc<RequestExecutor>) -> Self {
        Self {
            profile: ProfileService::new(executor.clone()),
            balance: BalanceService::new(executor.clone()),
            invoices: InvoiceService::new(executor.clone()),
            transfers: TransferService::new(executor.clone()),
            executor,
        }
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub fn credentials(&self) -> &Credentials {
        self.executor.credentials()
    }

    pub fn config(&self) -> &QiwiConfig {
        self.executor.config()
    }

    pub fn profile(&self) -> &ProfileService {
        &self.profile
    }

    pub fn balances(&self) -> &BalanceService {
        &self.balance
    }

    pub fn invoices(&self) -> &InvoiceService {
        &self.invoices
    }

    pub fn transfers(&self) -> &TransferService {
        &self.transfers
    }

    // ==================== Profile ====================

    pub async fn get_profile(&self, query: ProfileQuery) -> Result<Value> {
        self.profile.get_profile(query).await
    }

    pub async fn get_identification(&self) -> Result<Value> {
        self.profile.get_identification().await
    }

    // ==================== Balances ====================

    pub async fn get_balance(&self, only_balance: bool, alias: &str) -> Result<BalanceReport> {
        self.balance.get_balance(only_balance, alias).await
    }

    pub async fn balance(&self, alias: &str) -> Result<f64> {
        self.balance.balance(alias).await
    }

    // ==================== Invoices ====================

    pub async fn create_invoice(&self, request: CreateInvoice) -> Result<Invoice> {
        self.invoices.create_invoice(request).await
    }

    pub async fn get_invoice_status(&self, id: &str) -> Result<Invoice> {
        self.invoices.get_invoice_status(id).await
    }

    pub async fn cancel_invoice(&self, id: &str) -> Result<Invoice> {
        self.invoices.cancel_invoice(id).await
    }

    // ==================== Transfers ====================

    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt> {
        self.transfers.transfer(request).await
    }
}
