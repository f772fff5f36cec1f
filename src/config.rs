/// Service configuration from environment variables
///
/// Controls the coin network, the indexer/relay endpoints and the fixed
/// fee constants used by the amount policy.
use bitcoin::Network;
use std::env;

/// Flat per-transaction send fee in smallest units.
pub const DEFAULT_SEND_FEE_SATS: u64 = 5_530;

/// Margin withheld from the available balance on deposit sweeps, in
/// smallest units. Kept as a named constant because the upstream service
/// applied it without documenting why.
pub const DEFAULT_DEPOSIT_WITHHOLDING_SATS: u64 = 2_000;

const DEFAULT_INDEXER_URL: &str = "https://ravencoin.network/api";

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Coin network (governs address/WIF version bytes)
    pub network: Network,
    /// Indexer base URL (UTXO and balance queries)
    pub indexer_url: String,
    /// Relay base URL (transaction broadcast); defaults to the indexer
    pub relay_url: String,
    /// Flat send fee in smallest units
    pub send_fee_sats: u64,
    /// Margin withheld from deposit sweeps in smallest units
    pub deposit_withholding_sats: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `NETWORK`: "mainnet" (default), "testnet", "signet" or "regtest"
    /// - `INDEXER_URL`: indexer API endpoint
    /// - `RELAY_URL`: broadcast endpoint (defaults to `INDEXER_URL`)
    /// - `SEND_FEE_SATS`: flat send fee in smallest units
    /// - `DEPOSIT_WITHHOLDING_SATS`: deposit sweep margin in smallest units
    pub fn from_env() -> Self {
        let network_str = env::var("NETWORK")
            .unwrap_or_else(|_| "mainnet".to_string())
            .to_lowercase();

        let network = match network_str.as_str() {
            "mainnet" | "bitcoin" | "" => Network::Bitcoin,
            "testnet" => Network::Testnet,
            "signet" => Network::Signet,
            "regtest" => Network::Regtest,
            other => {
                log::warn!("Unknown network '{}', defaulting to mainnet", other);
                Network::Bitcoin
            }
        };

        let indexer_url = env::var("INDEXER_URL")
            .unwrap_or_else(|_| DEFAULT_INDEXER_URL.to_string());

        // The original deployment used one service for both lookups and
        // broadcast, so the relay falls back to the indexer endpoint.
        let relay_url = env::var("RELAY_URL").unwrap_or_else(|_| indexer_url.clone());

        let send_fee_sats = parse_sats_var("SEND_FEE_SATS", DEFAULT_SEND_FEE_SATS);
        let deposit_withholding_sats =
            parse_sats_var("DEPOSIT_WITHHOLDING_SATS", DEFAULT_DEPOSIT_WITHHOLDING_SATS);

        log::info!(
            "Config: network={}, indexer={}, relay={}, send_fee={} sats, withholding={} sats",
            network,
            indexer_url,
            relay_url,
            send_fee_sats,
            deposit_withholding_sats
        );

        Self {
            network,
            indexer_url,
            relay_url,
            send_fee_sats,
            deposit_withholding_sats,
        }
    }
}

fn parse_sats_var(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Invalid {}='{}', using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            network: Network::Bitcoin,
            indexer_url: DEFAULT_INDEXER_URL.to_string(),
            relay_url: DEFAULT_INDEXER_URL.to_string(),
            send_fee_sats: DEFAULT_SEND_FEE_SATS,
            deposit_withholding_sats: DEFAULT_DEPOSIT_WITHHOLDING_SATS,
        }
    }
}
