use bitcoin::blockdata::script::ScriptBuf;
use bitcoin::blockdata::transaction::{Transaction, TxIn, TxOut};
use bitcoin::blockdata::witness::Witness;
use bitcoin::transaction::{OutPoint, Sequence};
use bitcoin::{absolute, Address, Amount, PublicKey};

use crate::chain::Utxo;
use crate::error::WalletError;

/// One draft input: the consumed UTXO plus the locking script it will be
/// signed against.
#[derive(Debug, Clone)]
pub struct DraftInput {
    pub utxo: Utxo,
    pub script_pubkey: ScriptBuf,
}

#[derive(Debug, Clone)]
pub struct DraftOutput {
    pub address: Address,
    pub amount_sats: u64,
}

/// Ordered, unsigned transaction skeleton.
///
/// Inputs consume the full UTXO set; outputs are always exactly two, the
/// spend output followed by a zero-value change placeholder. Immutable
/// once handed to the signer.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub inputs: Vec<DraftInput>,
    pub outputs: Vec<DraftOutput>,
}

impl TransactionDraft {
    pub fn total_input_sats(&self) -> u64 {
        self.inputs.iter().map(|input| input.utxo.amount_sats).sum()
    }

    /// Lower the draft to an unsigned consensus transaction.
    pub fn to_transaction(&self) -> Transaction {
        let input = self
            .inputs
            .iter()
            .map(|draft_input| TxIn {
                previous_output: OutPoint {
                    txid: draft_input.utxo.txid,
                    vout: draft_input.utxo.vout,
                },
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            })
            .collect();

        let output = self
            .outputs
            .iter()
            .map(|draft_output| TxOut {
                value: Amount::from_sat(draft_output.amount_sats),
                script_pubkey: draft_output.address.script_pubkey(),
            })
            .collect();

        Transaction {
            version: bitcoin::transaction::Version::ONE,
            lock_time: absolute::LockTime::ZERO,
            input,
            output,
        }
    }
}

/// Builds a draft from a UTXO set and a resolved spend amount.
///
/// Every UTXO in the set is consumed; there is no coin selection. Each
/// input's locking script is derived from the signing key's public-key
/// hash, and the outputs are emitted in fixed order: spend first, then a
/// zero-value change placeholder back to the origin. Any input value above
/// the spend amount is forfeited as additional fee.
pub struct TransactionDraftBuilder {
    locking_script: ScriptBuf,
}

impl TransactionDraftBuilder {
    pub fn new(signer_pubkey: &PublicKey) -> Self {
        Self {
            locking_script: ScriptBuf::new_p2pkh(&signer_pubkey.pubkey_hash()),
        }
    }

    pub fn build(
        &self,
        utxos: Vec<Utxo>,
        spend_sats: u64,
        destination: Address,
        origin: Address,
    ) -> Result<TransactionDraft, WalletError> {
        if utxos.is_empty() {
            return Err(WalletError::NoUtxoFound(format!(
                "no spendable outputs for {}",
                origin
            )));
        }

        let total_input_sats: u64 = utxos.iter().map(|utxo| utxo.amount_sats).sum();

        // Invariant: the spend amount never exceeds the input total.
        if total_input_sats < spend_sats {
            return Err(WalletError::ValueConservationViolation(format!(
                "inputs total {} sats but the spend amount is {} sats",
                total_input_sats, spend_sats
            )));
        }

        let inputs = utxos
            .into_iter()
            .map(|utxo| DraftInput {
                utxo,
                script_pubkey: self.locking_script.clone(),
            })
            .collect();

        let outputs = vec![
            DraftOutput {
                address: destination,
                amount_sats: spend_sats,
            },
            DraftOutput {
                address: origin,
                amount_sats: 0,
            },
        ];

        Ok(TransactionDraft { inputs, outputs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::secp256k1::{Secp256k1, SecretKey};
    use bitcoin::{Network, PrivateKey};

    fn test_key(byte: u8) -> (PrivateKey, PublicKey, Address) {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&[byte; 32]).unwrap();
        let key = PrivateKey::new(secret, Network::Regtest);
        let public_key = key.public_key(&secp);
        let address = Address::p2pkh(public_key.pubkey_hash(), Network::Regtest);
        (key, public_key, address)
    }

    fn utxo(vout: u32, amount_sats: u64) -> Utxo {
        Utxo {
            txid: "1111111111111111111111111111111111111111111111111111111111111111"
                .parse()
                .unwrap(),
            vout,
            amount_sats,
        }
    }

    #[test]
    fn consumes_every_utxo_and_orders_outputs() {
        let (_, pubkey, origin) = test_key(1);
        let (_, _, destination) = test_key(2);

        let draft = TransactionDraftBuilder::new(&pubkey)
            .build(
                vec![utxo(0, 60_000_000), utxo(1, 40_000_000)],
                50_000_000,
                destination.clone(),
                origin.clone(),
            )
            .unwrap();

        assert_eq!(draft.inputs.len(), 2);
        assert_eq!(draft.total_input_sats(), 100_000_000);
        assert_eq!(draft.outputs.len(), 2);
        assert_eq!(draft.outputs[0].address, destination);
        assert_eq!(draft.outputs[0].amount_sats, 50_000_000);
        assert_eq!(draft.outputs[1].address, origin);
        assert_eq!(draft.outputs[1].amount_sats, 0);
    }

    #[test]
    fn binds_every_input_to_the_signer_script() {
        let (_, pubkey, origin) = test_key(1);
        let (_, _, destination) = test_key(2);
        let expected = ScriptBuf::new_p2pkh(&pubkey.pubkey_hash());

        let draft = TransactionDraftBuilder::new(&pubkey)
            .build(vec![utxo(0, 1_000), utxo(1, 2_000)], 500, destination, origin)
            .unwrap();

        for input in &draft.inputs {
            assert_eq!(input.script_pubkey, expected);
        }
    }

    #[test]
    fn empty_utxo_set_is_rejected() {
        let (_, pubkey, origin) = test_key(1);
        let (_, _, destination) = test_key(2);

        let result = TransactionDraftBuilder::new(&pubkey).build(
            Vec::new(),
            1_000,
            destination,
            origin,
        );
        assert!(matches!(result, Err(WalletError::NoUtxoFound(_))));
    }

    #[test]
    fn overdrawn_spend_is_rejected() {
        let (_, pubkey, origin) = test_key(1);
        let (_, _, destination) = test_key(2);

        let result = TransactionDraftBuilder::new(&pubkey).build(
            vec![utxo(0, 1_000)],
            1_001,
            destination,
            origin,
        );
        assert!(matches!(
            result,
            Err(WalletError::ValueConservationViolation(_))
        ));
    }

    #[test]
    fn lowers_to_a_version_one_transaction() {
        let (_, pubkey, origin) = test_key(1);
        let (_, _, destination) = test_key(2);

        let draft = TransactionDraftBuilder::new(&pubkey)
            .build(vec![utxo(3, 10_000)], 4_000, destination, origin)
            .unwrap();
        let tx = draft.to_transaction();

        assert_eq!(tx.version, bitcoin::transaction::Version::ONE);
        assert_eq!(tx.input.len(), 1);
        assert_eq!(tx.input[0].previous_output.vout, 3);
        assert!(tx.input[0].script_sig.is_empty());
        assert_eq!(tx.output.len(), 2);
        assert_eq!(tx.output[0].value, Amount::from_sat(4_000));
        assert_eq!(tx.output[1].value, Amount::from_sat(0));
    }
}
