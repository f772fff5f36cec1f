//! Key parsing, address derivation and keypair generation
//!
//! Pure pay-to-public-key-hash: secp256k1 public key, HASH160,
//! base58check with the configured network's version byte.

use bitcoin::secp256k1::{rand, Secp256k1};
use bitcoin::{Address, Network, NetworkKind, PrivateKey};
use std::str::FromStr;

use crate::error::WalletError;

/// Parse a WIF-encoded private key, enforcing the configured network.
pub fn parse_wif(wif: &str, network: Network) -> Result<PrivateKey, WalletError> {
    let key = PrivateKey::from_wif(wif)
        .map_err(|e| WalletError::InvalidKey(e.to_string()))?;

    if key.network != NetworkKind::from(network) {
        return Err(WalletError::InvalidKey(format!(
            "key was encoded for a different network than {}",
            network
        )));
    }

    Ok(key)
}

/// Derive the P2PKH address controlled by a private key. Deterministic.
pub fn derive_address(key: &PrivateKey, network: Network) -> Address {
    let secp = Secp256k1::new();
    let public_key = key.public_key(&secp);
    Address::p2pkh(public_key.pubkey_hash(), network)
}

/// Generate a fresh random keypair, returning the address and the WIF
/// serialization of the key.
pub fn generate_keypair(network: Network) -> (Address, String) {
    let secp = Secp256k1::new();
    let (secret_key, _) = secp.generate_keypair(&mut rand::thread_rng());
    let key = PrivateKey::new(secret_key, network);
    let address = derive_address(&key, network);
    (address, key.to_wif())
}

/// Parse and network-check a destination address.
pub fn parse_address(raw: &str, network: Network) -> Result<Address, WalletError> {
    Address::from_str(raw)
        .map_err(|e| WalletError::InvalidAddress(format!("{}: {}", raw, e)))?
        .require_network(network)
        .map_err(|e| WalletError::InvalidAddress(format!("{}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let (address, wif) = generate_keypair(Network::Regtest);
        let key = parse_wif(&wif, Network::Regtest).unwrap();
        assert_eq!(derive_address(&key, Network::Regtest), address);
        assert_eq!(derive_address(&key, Network::Regtest), address);
    }

    #[test]
    fn generated_address_round_trips_through_parsing() {
        let (address, _) = generate_keypair(Network::Regtest);
        let parsed = parse_address(&address.to_string(), Network::Regtest).unwrap();
        assert_eq!(parsed, address);
    }

    #[test]
    fn malformed_wif_is_rejected() {
        assert!(matches!(
            parse_wif("not-a-key", Network::Regtest),
            Err(WalletError::InvalidKey(_))
        ));
    }

    #[test]
    fn wrong_network_wif_is_rejected() {
        let (_, mainnet_wif) = generate_keypair(Network::Bitcoin);
        assert!(matches!(
            parse_wif(&mainnet_wif, Network::Regtest),
            Err(WalletError::InvalidKey(_))
        ));
    }
}
