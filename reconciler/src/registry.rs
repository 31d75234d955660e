//! Authoritative reads from the on-chain transfer registry.
//!
//! Queries go through the chain's LCD REST endpoint
//! (`/cosmwasm/wasm/v1/contract/{address}/smart/{base64-query}`), which
//! returns the contract's query response under a `data` key.

use std::time::Duration;

use async_trait::async_trait;
use eyre::{eyre, Result, WrapErr};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use remittance::msg::{QueryMsg, TransferCountResponse, TransferResponse};

use crate::types::TransferSnapshot;

/// Read access to the canonical transfer registry.
///
/// The reconciler only ever reads through this trait, so tests can swap
/// in an in-memory source.
#[async_trait]
pub trait TransferSource: Send + Sync {
    /// Total number of transfers ever created (ids are 1..=count)
    async fn transfer_count(&self) -> Result<u64>;

    /// Snapshot of one transfer, None if the id was never allocated
    async fn transfer(&self, id: u64) -> Result<Option<TransferSnapshot>>;
}

/// LCD-backed client for the remittance contract
pub struct RegistryClient {
    lcd_url: String,
    contract_address: String,
    client: Client,
}

impl RegistryClient {
    pub fn new(lcd_url: &str, contract_address: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .wrap_err("Failed to create HTTP client")?;

        Ok(Self {
            lcd_url: lcd_url.trim_end_matches('/').to_string(),
            contract_address: contract_address.to_string(),
            client,
        })
    }

    /// Run a smart query against the contract and decode the `data` payload
    async fn smart_query<R: DeserializeOwned>(&self, msg: &QueryMsg) -> Result<R> {
        let query_b64 = base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            serde_json::to_string(msg)?,
        );

        let url = format!(
            "{}/cosmwasm/wasm/v1/contract/{}/smart/{}",
            self.lcd_url, self.contract_address, query_b64
        );

        debug!(url = %url, "Querying contract");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .wrap_err("Failed to query contract")?;

        if !response.status().is_success() {
            return Err(eyre!(
                "Contract query failed: {} - {}",
                response.status(),
                response.text().await.unwrap_or_default()
            ));
        }

        let body: serde_json::Value = response.json().await?;
        let data = body
            .get("data")
            .ok_or_else(|| eyre!("Missing 'data' field in smart query response"))?;

        serde_json::from_value(data.clone()).wrap_err("Failed to decode smart query response")
    }
}

#[async_trait]
impl TransferSource for RegistryClient {
    async fn transfer_count(&self) -> Result<u64> {
        let resp: TransferCountResponse = self.smart_query(&QueryMsg::TransferCount {}).await?;
        Ok(resp.count)
    }

    async fn transfer(&self, id: u64) -> Result<Option<TransferSnapshot>> {
        let resp: Option<TransferResponse> = self.smart_query(&QueryMsg::Transfer { id }).await?;
        Ok(resp.map(TransferSnapshot::from))
    }
}
