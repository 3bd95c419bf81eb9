use axum::{Json, extract::State};
use lk_api_types::{Address, SupportedWallet, WalletId};
use lk_wallet_core::PickOutcome;
use lk_wallet_core::ranking::platform_wrapper;
use lk_wallet_core::wallets::wallet_description;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{ApiResult, AppState, bad_request, kit_error, not_found};

#[derive(Debug, Serialize)]
pub(crate) struct WalletView {
    wallet: SupportedWallet,
    description: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WalletsResponse {
    wallets: Vec<WalletView>,
    /// Set when the picker is skipped and this wallet is used directly.
    platform_wrapper: Option<WalletId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PickRequest {
    wallet_id: WalletId,
}

#[derive(Debug, Serialize)]
pub(crate) struct PickResponse {
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConnectRequest {
    wallet_id: WalletId,
    address: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ConnectResponse {
    address: Address,
    label: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct DisconnectResponse {
    connected: bool,
}

/// Allowed wallets in picker order.
pub(crate) async fn list_wallets(State(state): State<AppState>) -> Json<WalletsResponse> {
    Json(ranked(&state).await)
}

/// Replaces the allowed wallets with the list the browser detected.
pub(crate) async fn replace_wallets(
    State(state): State<AppState>,
    Json(wallets): Json<Vec<SupportedWallet>>,
) -> ApiResult<WalletsResponse> {
    let mut seen = HashSet::new();
    if let Some(duplicate) = wallets.iter().find(|wallet| !seen.insert(&wallet.id)) {
        return Err(bad_request(&format!("duplicate wallet id {}", duplicate.id)));
    }

    state.kit.set_allowed_wallets(wallets);
    Ok(Json(ranked(&state).await))
}

/// The browser plays the closing animation itself, so the selection is
/// completed right away.
pub(crate) async fn pick_wallet(
    State(state): State<AppState>,
    Json(request): Json<PickRequest>,
) -> ApiResult<PickResponse> {
    let wallet = state
        .kit
        .store()
        .allowed_wallets()
        .into_iter()
        .find(|wallet| wallet.id == request.wallet_id)
        .ok_or_else(|| not_found(&format!("wallet {} is not allowed", request.wallet_id)))?;

    let url = wallet.url.clone();
    let modal = state.kit.modal();
    match modal.pick(wallet) {
        PickOutcome::InstallRequested => Ok(Json(PickResponse {
            outcome: "install_requested",
            url: Some(url),
        })),
        PickOutcome::Selecting => {
            modal.finish_transition().await;
            Ok(Json(PickResponse {
                outcome: "selected",
                url: None,
            }))
        }
    }
}

pub(crate) async fn connect(
    State(state): State<AppState>,
    Json(request): Json<ConnectRequest>,
) -> ApiResult<ConnectResponse> {
    let address = request.address.trim();
    if address.is_empty() {
        return Err(bad_request("address is required"));
    }
    let address = Address::from(address);

    state
        .kit
        .connect_with_address(&request.wallet_id, address.clone())
        .await
        .map_err(kit_error)?;

    Ok(Json(ConnectResponse {
        label: address.short_label(),
        address,
    }))
}

pub(crate) async fn disconnect(State(state): State<AppState>) -> Json<DisconnectResponse> {
    state.kit.disconnect();
    Json(DisconnectResponse { connected: false })
}

async fn ranked(state: &AppState) -> WalletsResponse {
    let allowed = state.kit.store().allowed_wallets();
    let wrapper = platform_wrapper(&allowed).map(|wallet| wallet.id.clone());
    let wallets = state
        .kit
        .modal()
        .sorted_wallets()
        .await
        .into_iter()
        .map(|wallet| WalletView {
            description: wallet_description(&wallet.id),
            wallet,
        })
        .collect();
    WalletsResponse {
        wallets,
        platform_wrapper: wrapper,
    }
}
