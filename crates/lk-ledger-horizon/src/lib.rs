use async_trait::async_trait;
use lk_api_types::{Address, Transaction};
use lk_ledger_client::{LedgerQuery, LedgerQueryError};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

type EndpointFn = dyn Fn() -> Option<Url> + Send + Sync;

enum Endpoint {
    Fixed(Url),
    Following(Arc<EndpointFn>),
}

/// HTTP client for a Horizon server.
///
/// The endpoint is either fixed at construction time or resolved on every
/// request, so a client built with [`HorizonClient::following`] keeps up with
/// network switches made after it was created.
pub struct HorizonClient {
    endpoint: Endpoint,
    http: reqwest::Client,
}

impl HorizonClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint: Endpoint::Fixed(endpoint),
            http: reqwest::Client::new(),
        }
    }

    pub fn following<F>(resolve: F) -> Self
    where
        F: Fn() -> Option<Url> + Send + Sync + 'static,
    {
        Self {
            endpoint: Endpoint::Following(Arc::new(resolve)),
            http: reqwest::Client::new(),
        }
    }

    fn base_url(&self) -> Result<Url, LedgerQueryError> {
        match &self.endpoint {
            Endpoint::Fixed(url) => Ok(url.clone()),
            Endpoint::Following(resolve) => resolve()
                .ok_or_else(|| LedgerQueryError::Unexpected("there is no Horizon URL set".to_owned())),
        }
    }

    fn account_url(&self, address: &Address, suffix: Option<&str>) -> Result<Url, LedgerQueryError> {
        let mut url = self.base_url()?;
        let path = match suffix {
            Some(suffix) => format!("/accounts/{}/{suffix}", address.0),
            None => format!("/accounts/{}", address.0),
        };
        url.set_path(&path);
        url.set_query(None);
        Ok(url)
    }

    async fn get_json<T>(&self, url: Url, what: &str) -> Result<T, LedgerQueryError>
    where
        T: for<'de> Deserialize<'de>,
    {
        debug!("horizon {} GET {}", what, url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| LedgerQueryError::Network(format!("horizon {what} transport: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, what, &text));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| LedgerQueryError::Unexpected(format!("horizon {what} parse: {err}")))
    }
}

// ── Horizon REST API types ─────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AccountResponse {
    balances: Vec<BalanceLine>,
}

#[derive(Debug, Deserialize)]
struct BalanceLine {
    balance: String,
    asset_type: String,
}

#[derive(Debug, Deserialize)]
struct TransactionPage {
    #[serde(rename = "_embedded")]
    embedded: EmbeddedRecords,
}

#[derive(Debug, Deserialize)]
struct EmbeddedRecords {
    records: Vec<Transaction>,
}

fn classify_status(status: StatusCode, what: &str, body: &str) -> LedgerQueryError {
    if status == StatusCode::NOT_FOUND {
        return LedgerQueryError::NotFound(format!("horizon {what}: {status}"));
    }
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        warn!("horizon {} failed with {}: {}", what, status, body);
        return LedgerQueryError::Network(format!("failed to fetch {what}: {status}"));
    }
    LedgerQueryError::Unexpected(format!("horizon {what} HTTP {status}: {body}"))
}

#[async_trait]
impl LedgerQuery for HorizonClient {
    async fn get_native_balance(&self, address: &Address) -> Result<String, LedgerQueryError> {
        let url = self.account_url(address, None)?;
        let account: AccountResponse = self.get_json(url, "account").await?;

        account
            .balances
            .into_iter()
            .find(|line| line.asset_type == "native")
            .map(|line| line.balance)
            .ok_or_else(|| LedgerQueryError::Unexpected(format!("account {} has no native balance", address)))
    }

    async fn get_recent_transactions(
        &self,
        address: &Address,
        limit: u32,
    ) -> Result<Vec<Transaction>, LedgerQueryError> {
        let mut url = self.account_url(address, Some("transactions"))?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("order", "desc");

        let page: TransactionPage = self.get_json(url, "transactions").await?;
        Ok(page.embedded.records)
    }
}
