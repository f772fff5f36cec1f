use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use zeroize::Zeroizing;

use super::types::{SendResult, WalletKeypair};
use crate::error::WalletError;
use crate::send::SendService;

pub async fn generate_wallet_handler(
    State(service): State<Arc<SendService>>,
) -> Result<Json<WalletKeypair>, WalletError> {
    Ok(Json(service.generate_wallet()))
}

pub async fn deposit_handler(
    State(service): State<Arc<SendService>>,
    Path((private_key, address)): Path<(String, String)>,
) -> Result<Json<SendResult>, WalletError> {
    // Key material lives only for this request; the WIF buffer is wiped
    // when the handler returns.
    let wif = Zeroizing::new(private_key);
    let result = service.deposit(&wif, &address).await?;
    Ok(Json(result))
}

pub async fn send_handler(
    State(service): State<Arc<SendService>>,
    Path((private_key, address, amount)): Path<(String, String, String)>,
) -> Result<Json<SendResult>, WalletError> {
    let wif = Zeroizing::new(private_key);
    let result = service.send(&wif, &address, &amount, None).await?;
    Ok(Json(result))
}

pub async fn send_from_handler(
    State(service): State<Arc<SendService>>,
    Path((private_key, address, amount, my_address)): Path<(String, String, String, String)>,
) -> Result<Json<SendResult>, WalletError> {
    let wif = Zeroizing::new(private_key);
    let result = service
        .send(&wif, &address, &amount, Some(&my_address))
        .await?;
    Ok(Json(result))
}
