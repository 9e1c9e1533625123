//! Wallet endpoints. Funding starts a payment-gateway checkout; the
//! balance moves only once the gateway reference is verified.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;

use super::agents::Pagination;
use super::client::ZurriClient;

/// Points balance for the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    #[serde(alias = "_id")]
    pub id: String,
    pub balance: i64,
    #[serde(default)]
    pub balance_in_dollars: f64,
    #[serde(default)]
    pub free_tasks_remaining: u32,
}

#[derive(Debug, Deserialize)]
struct WalletEnvelope {
    wallet: Wallet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Purchase,
    Charge,
    Refund,
    Free,
    AdminTest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub amount: i64,
    pub balance_after: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub kind: Option<TransactionKind>,
    pub status: Option<TransactionStatus>,
}

impl TransactionQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(kind) = self.kind {
            params.push(("type", enum_param(&kind)));
        }
        if let Some(status) = self.status {
            params.push(("status", enum_param(&status)));
        }
        params
    }
}

/// Render a unit enum the way serde names it on the wire.
fn enum_param<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

#[derive(Serialize)]
struct FundRequest {
    amount: u64,
}

/// The gateway's view of a top-up: what is charged and what is credited.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub reference: String,
    pub amount: u64,
    pub currency: String,
    pub points: u64,
    /// Preformatted by the backend, e.g. `"1.25"`.
    #[serde(default)]
    pub amount_in_dollars: String,
}

/// A checkout opened by [`ZurriClient::fund_wallet`]. The user completes
/// payment at `authorization_url`, then the reference is verified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FundingSession {
    #[serde(rename = "publicKey", default)]
    pub public_key: String,
    pub reference: String,
    pub authorization_url: String,
    #[serde(default)]
    pub access_code: String,
    pub payment: Payment,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Verification {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub transaction: Option<Transaction>,
    #[serde(default)]
    pub wallet: Option<Wallet>,
}

impl ZurriClient {
    pub async fn wallet(&self) -> Result<Wallet, ApiError> {
        let envelope: WalletEnvelope = self
            .execute_json(self.request(Method::GET, "/wallet"))
            .await?;
        Ok(envelope.wallet)
    }

    pub async fn transactions(&self, query: &TransactionQuery) -> Result<TransactionList, ApiError> {
        let builder = self
            .request(Method::GET, "/wallet/transactions")
            .query(&query.params());
        self.execute_json(builder).await
    }

    /// Open a checkout for `amount` in the gateway's local currency (NGN).
    pub async fn fund_wallet(&self, amount: u64) -> Result<FundingSession, ApiError> {
        if amount == 0 {
            return Err(ApiError::Http {
                status: 400,
                message: Some("amount must be greater than zero".into()),
            });
        }
        let session: FundingSession = self
            .execute_json(self.request(Method::POST, "/wallet/fund").json(&FundRequest { amount }))
            .await?;
        info!(reference = %session.reference, points = session.payment.points, "wallet checkout opened");
        Ok(session)
    }

    /// Confirm a gateway payment and credit the wallet.
    pub async fn verify_transaction(&self, reference: &str) -> Result<Verification, ApiError> {
        self.execute_json(self.request(Method::GET, &format!("/wallet/verify/{reference}")))
            .await
    }
}
