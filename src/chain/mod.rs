//! External chain collaborators
//!
//! - UTXO and balance lookup against an indexer
//! - Transaction broadcast against a relay
//!
//! Both are reached through the `ChainBackend` capability set so the send
//! flow can run against a deterministic stub in tests.

pub mod indexer;

pub use indexer::IndexerClient;

use async_trait::async_trait;
use bitcoin::{Address, Txid};

use crate::error::WalletError;

/// One spendable output, as reported by the indexer. Amounts are already
/// converted to smallest units at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub txid: Txid,
    pub vout: u32,
    pub amount_sats: u64,
}

/// Capability set consumed by the send flow.
#[async_trait]
pub trait ChainBackend: Send + Sync {
    /// All spendable outputs currently attributed to an address.
    async fn fetch_utxos(&self, address: &Address) -> Result<Vec<Utxo>, WalletError>;

    /// Current balance of an address, in smallest units.
    async fn fetch_balance(&self, address: &Address) -> Result<u64, WalletError>;

    /// Submit a serialized transaction; returns the relay-assigned txid.
    async fn broadcast(&self, raw_tx_hex: &str) -> Result<String, WalletError>;
}
