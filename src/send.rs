//! Request-level send flow
//!
//! Sequences balance check, amount resolution, draft construction,
//! signing, broadcast and result assembly. Each stage is fallible and a
//! failure aborts every remaining stage; nothing is retried. The one
//! irreversible step is broadcast: once the relay returns a txid the
//! transaction is committed, so result assembly degrades instead of
//! failing after that point.

use std::sync::Arc;

use bitcoin::{Address, PrivateKey};

use crate::amount::{
    decimal_from_sats, sats_from_decimal_str, AmountMode, AmountPolicy,
};
use crate::api::types::{SendResult, WalletKeypair};
use crate::chain::ChainBackend;
use crate::config::ServiceConfig;
use crate::error::WalletError;
use crate::keys;
use crate::tx::{InputSigner, TransactionDraftBuilder};

pub struct SendService {
    config: ServiceConfig,
    chain: Arc<dyn ChainBackend>,
}

impl SendService {
    pub fn new(config: ServiceConfig, chain: Arc<dyn ChainBackend>) -> Self {
        Self { config, chain }
    }

    /// Generate a fresh keypair for the `GET /` endpoint.
    pub fn generate_wallet(&self) -> WalletKeypair {
        let (address, wif) = keys::generate_keypair(self.config.network);
        WalletKeypair {
            address: address.to_string(),
            private_key: wif,
        }
    }

    /// Sweep the key's full balance to `destination`, minus the deposit
    /// withholding and the send fee.
    pub async fn deposit(&self, wif: &str, destination: &str) -> Result<SendResult, WalletError> {
        let private_key = keys::parse_wif(wif, self.config.network)?;
        let origin = keys::derive_address(&private_key, self.config.network);
        let destination = keys::parse_address(destination, self.config.network)?;

        self.execute(
            private_key,
            origin,
            destination,
            AmountMode::Sweep,
            self.config.deposit_withholding_sats,
        )
        .await
    }

    /// Send a fixed decimal amount to `destination`, optionally naming an
    /// explicit origin address whose UTXOs are spent. With an explicit
    /// origin that the key does not control, the request fails at the
    /// signing stage.
    pub async fn send(
        &self,
        wif: &str,
        destination: &str,
        amount: &str,
        origin: Option<&str>,
    ) -> Result<SendResult, WalletError> {
        let private_key = keys::parse_wif(wif, self.config.network)?;
        let origin = match origin {
            Some(raw) => keys::parse_address(raw, self.config.network)?,
            None => keys::derive_address(&private_key, self.config.network),
        };
        let destination = keys::parse_address(destination, self.config.network)?;
        let amount_sats = sats_from_decimal_str(amount)?;

        self.execute(
            private_key,
            origin,
            destination,
            AmountMode::Fixed(amount_sats),
            0,
        )
        .await
    }

    async fn execute(
        &self,
        private_key: PrivateKey,
        origin: Address,
        destination: Address,
        mode: AmountMode,
        withholding_sats: u64,
    ) -> Result<SendResult, WalletError> {
        // Balance check: one UTXO fetch establishes the spendable total.
        let utxos = self.chain.fetch_utxos(&origin).await?;
        if utxos.is_empty() {
            return Err(WalletError::NoUtxoFound(format!(
                "no spendable outputs for {}",
                origin
            )));
        }

        let total_sats: u64 = utxos.iter().map(|utxo| utxo.amount_sats).sum();
        let available_sats = total_sats.saturating_sub(withholding_sats);
        log::info!(
            "Sending from {}: {} UTXOs totaling {} sats ({} sats available)",
            origin,
            utxos.len(),
            total_sats,
            available_sats
        );

        let policy = AmountPolicy::new(self.config.send_fee_sats);
        let resolution = policy.resolve(available_sats, mode)?;
        log::debug!(
            "Resolved spend: {} sats, fee {} sats, sweep={}",
            resolution.spend_sats,
            resolution.fee_sats,
            resolution.is_sweep
        );

        // Draft build.
        let secp = bitcoin::secp256k1::Secp256k1::new();
        let public_key = private_key.public_key(&secp);
        let draft = TransactionDraftBuilder::new(&public_key).build(
            utxos,
            resolution.spend_sats,
            destination.clone(),
            origin.clone(),
        )?;

        // Sign: all inputs or none.
        let signed_tx = InputSigner::new(private_key).sign(&draft)?;

        // Broadcast.
        let raw_tx_hex = bitcoin::consensus::encode::serialize_hex(&signed_tx);
        let txid = self.chain.broadcast(&raw_tx_hex).await?;
        log::info!("Transaction broadcast, txid: {}", txid);

        // Result assembly. The broadcast is committed, so a failed balance
        // re-read must not fail the request.
        let remaining_sats = match self.chain.fetch_balance(&origin).await {
            Ok(balance) => balance,
            Err(e) => {
                log::warn!(
                    "Balance re-read for {} failed after broadcast: {}",
                    origin,
                    e
                );
                0
            }
        };

        Ok(SendResult {
            txid,
            withdrawn_amount: decimal_from_sats(resolution.spend_sats),
            toaddr: destination.to_string(),
            from_address: origin.to_string(),
            remaining_balance: decimal_from_sats(remaining_sats),
            fee: decimal_from_sats(resolution.fee_sats),
        })
    }
}
