use axum::{Json, extract::State, http::StatusCode};
use lk_api_types::NetworkInfo;
use lk_wallet_core::AccountSnapshot;
use serde::{Deserialize, Serialize};

use crate::{ApiResult, AppState, not_found};

#[derive(Debug, Serialize)]
pub(crate) struct NetworksResponse {
    current: NetworkInfo,
    networks: Vec<NetworkInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SelectNetworkRequest {
    id: String,
}

pub(crate) async fn account(State(state): State<AppState>) -> Json<AccountSnapshot> {
    Json(state.account.snapshot())
}

pub(crate) async fn retry(State(state): State<AppState>) -> StatusCode {
    state.account.retry();
    StatusCode::ACCEPTED
}

pub(crate) async fn networks(State(state): State<AppState>) -> Json<NetworksResponse> {
    let selector = state.kit.network();
    Json(NetworksResponse {
        current: selector.current(),
        networks: selector.networks(),
    })
}

pub(crate) async fn select_network(
    State(state): State<AppState>,
    Json(request): Json<SelectNetworkRequest>,
) -> ApiResult<NetworkInfo> {
    state
        .kit
        .network()
        .select(&request.id)
        .map(Json)
        .ok_or_else(|| not_found(&format!("unknown network '{}'", request.id)))
}
