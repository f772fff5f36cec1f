//! Transaction construction and signing
//!
//! - Draft assembly from a UTXO set and a resolved spend amount
//! - Per-input legacy P2PKH signing

pub mod builder;
pub mod signer;

pub use builder::{TransactionDraft, TransactionDraftBuilder};
pub use signer::InputSigner;
