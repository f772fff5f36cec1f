//! Stateless single-key send service.
//!
//! Each request supplies its own WIF private key; the service derives the
//! P2PKH address, gathers its unspent outputs from an indexer, builds and
//! signs a transaction spending all of them, and broadcasts it to a relay.
//! Nothing is persisted between requests.

pub mod amount;
pub mod api;
pub mod chain;
pub mod config;
pub mod error;
pub mod keys;
pub mod send;
pub mod tx;
