use async_trait::async_trait;
use bitcoin::{Address, Txid};
use serde::Deserialize;

use super::{ChainBackend, Utxo};
use crate::amount::sats_from_decimal;
use crate::error::WalletError;

/// HTTP client for the indexer/relay pair.
///
/// Wire format:
/// - `GET {indexer}/addr/{address}/utxo` -> `[{txid, vout, amount}]`
/// - `GET {indexer}/addr/{address}/balance` -> plain decimal number
/// - `POST {relay}/tx/send` `{"rawtx": hex}` -> `{"txid": ...}`
///
/// Monetary values on this boundary are decimal coin numbers; they are
/// converted to smallest units before anything downstream sees them.
pub struct IndexerClient {
    client: reqwest::Client,
    indexer_url: String,
    relay_url: String,
}

#[derive(Debug, Deserialize)]
struct UtxoEntry {
    txid: String,
    vout: u32,
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct BroadcastReply {
    txid: Option<String>,
}

impl IndexerClient {
    pub fn new(indexer_url: impl Into<String>, relay_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            indexer_url: indexer_url.into(),
            relay_url: relay_url.into(),
        }
    }
}

#[async_trait]
impl ChainBackend for IndexerClient {
    async fn fetch_utxos(&self, address: &Address) -> Result<Vec<Utxo>, WalletError> {
        let url = format!("{}/addr/{}/utxo", self.indexer_url, address);
        log::debug!("Fetching UTXOs from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WalletError::Network(format!(
                "indexer returned {} for UTXO query",
                response.status()
            )));
        }

        let entries: Vec<UtxoEntry> = response
            .json()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        let mut utxos = Vec::with_capacity(entries.len());
        for entry in entries {
            let txid = entry.txid.parse::<Txid>().map_err(|e| {
                WalletError::Network(format!("indexer returned malformed txid: {}", e))
            })?;
            let amount_sats = sats_from_decimal(entry.amount).map_err(|_| {
                WalletError::Network(format!(
                    "indexer returned malformed amount: {}",
                    entry.amount
                ))
            })?;

            utxos.push(Utxo {
                txid,
                vout: entry.vout,
                amount_sats,
            });
        }

        log::debug!("Indexer reported {} UTXOs for {}", utxos.len(), address);
        Ok(utxos)
    }

    async fn fetch_balance(&self, address: &Address) -> Result<u64, WalletError> {
        let url = format!("{}/addr/{}/balance", self.indexer_url, address);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WalletError::Network(format!(
                "indexer returned {} for balance query",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        let balance: f64 = body.trim().parse().map_err(|_| {
            WalletError::Network(format!("indexer returned malformed balance: {}", body))
        })?;

        sats_from_decimal(balance)
            .map_err(|_| WalletError::Network(format!("indexer returned malformed balance: {}", body)))
    }

    async fn broadcast(&self, raw_tx_hex: &str) -> Result<String, WalletError> {
        let url = format!("{}/tx/send", self.relay_url);
        log::debug!("Broadcasting transaction to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "rawtx": raw_tx_hex }))
            .send()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(WalletError::BroadcastFailure(error_text));
        }

        let reply: BroadcastReply = response
            .json()
            .await
            .map_err(|e| WalletError::BroadcastFailure(e.to_string()))?;

        match reply.txid {
            Some(txid) if !txid.is_empty() => Ok(txid),
            _ => Err(WalletError::BroadcastFailure(
                "relay accepted the transaction but returned no txid".to_string(),
            )),
        }
    }
}
