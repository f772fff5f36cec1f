use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WalletKeypair {
    pub address: String,
    #[serde(rename = "privateKey")]
    pub private_key: String,
}

/// Result record for a completed send. Monetary fields are decimal coin
/// values, converted from smallest units at response assembly.
#[derive(Debug, Serialize)]
pub struct SendResult {
    pub txid: String,
    #[serde(rename = "withdrawnAmount")]
    pub withdrawn_amount: f64,
    pub toaddr: String,
    #[serde(rename = "fromAddress")]
    pub from_address: String,
    #[serde(rename = "remainingBalance")]
    pub remaining_balance: f64,
    pub fee: f64,
}
