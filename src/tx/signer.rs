use bitcoin::blockdata::script::{Builder, ScriptBuf};
use bitcoin::blockdata::transaction::Transaction;
use bitcoin::hashes::Hash;
use bitcoin::script::PushBytesBuf;
use bitcoin::secp256k1::{Message, Secp256k1};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::PrivateKey;

use super::builder::TransactionDraft;
use crate::error::WalletError;

/// Signs every input of a draft with one private key.
///
/// Single-key model: all inputs of a draft are assumed owned by the same
/// key, which must also control the origin (change) address. Signatures
/// are input-local; each covers the legacy sighash over that input's
/// previous-output script, so signing order carries no dependencies.
pub struct InputSigner {
    private_key: PrivateKey,
}

impl InputSigner {
    pub fn new(private_key: PrivateKey) -> Self {
        Self { private_key }
    }

    /// Produce a fully signed transaction, or fail without signing anything.
    pub fn sign(&self, draft: &TransactionDraft) -> Result<Transaction, WalletError> {
        let secp = Secp256k1::new();
        let public_key = self.private_key.public_key(&secp);
        let own_script = ScriptBuf::new_p2pkh(&public_key.pubkey_hash());

        // Ownership check before any signature is produced: the change
        // output carries the origin address, whose script must match the
        // key's public-key hash.
        let change = draft.outputs.last().ok_or_else(|| {
            WalletError::SigningFailure("draft has no change output".to_string())
        })?;
        if change.address.script_pubkey() != own_script {
            return Err(WalletError::SigningFailure(format!(
                "private key does not control the origin address {}",
                change.address
            )));
        }

        for input in &draft.inputs {
            if input.script_pubkey != own_script {
                return Err(WalletError::SigningFailure(
                    "input locking script does not match the signing key".to_string(),
                ));
            }
        }

        let mut tx = draft.to_transaction();

        let mut script_sigs = Vec::with_capacity(draft.inputs.len());
        {
            let cache = SighashCache::new(&tx);
            for (input_index, input) in draft.inputs.iter().enumerate() {
                let sighash = cache
                    .legacy_signature_hash(
                        input_index,
                        &input.script_pubkey,
                        EcdsaSighashType::All.to_u32(),
                    )
                    .map_err(|e| WalletError::SigningFailure(e.to_string()))?;

                let message = Message::from_digest(sighash.to_byte_array());
                let signature = secp.sign_ecdsa(&message, &self.private_key.inner);

                let mut sig_with_hashtype = signature.serialize_der().to_vec();
                sig_with_hashtype.push(EcdsaSighashType::All.to_u32() as u8);
                let sig_push = PushBytesBuf::try_from(sig_with_hashtype)
                    .map_err(|e| WalletError::SigningFailure(e.to_string()))?;

                script_sigs.push(
                    Builder::new()
                        .push_slice(sig_push)
                        .push_key(&public_key)
                        .into_script(),
                );
            }
        }

        for (input, script_sig) in tx.input.iter_mut().zip(script_sigs) {
            input.script_sig = script_sig;
        }

        Ok(tx)
    }
}
