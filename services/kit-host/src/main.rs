use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use lk_api_types::{ButtonTheme, ModalTheme, ThemeVariant};
use lk_ledger_horizon::HorizonClient;
use lk_wallet_core::{AccountPipeline, ConnectionStore, KitConfig, KitError, WalletKit, WalletRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

mod account;
mod wallets;

#[derive(Debug, Serialize)]
struct HealthResponse {
    service: &'static str,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    service: &'static str,
    version: &'static str,
}

#[derive(Debug, Deserialize)]
struct ThemeRequest {
    variant: ThemeVariant,
}

#[derive(Debug, Serialize)]
struct ThemeResponse {
    modal: BTreeMap<&'static str, String>,
    button: BTreeMap<&'static str, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    error: String,
}

pub(crate) type ApiError = (StatusCode, Json<ErrorResponse>);
pub(crate) type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Clone)]
pub(crate) struct AppState {
    kit: WalletKit,
    account: Arc<AccountPipeline>,
}

impl AppState {
    fn new(kit: WalletKit) -> Self {
        let account = Arc::new(kit.account_pipeline());
        Self { kit, account }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = KitConfig::from_env()?;
    let ledger = config.open_ledger()?;

    let store = ConnectionStore::new();
    let endpoint = store.clone();
    let horizon = HorizonClient::following(move || endpoint.network_endpoint());
    let kit = WalletKit::new(&config, store, ledger, WalletRegistry::new(), Arc::new(horizon));

    let state = AppState::new(kit);
    let app = router(state.clone());

    info!(
        "kit-host listening on {} ({}, {})",
        config.bind_addr, config.network.name, config.horizon_url
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.kit.shutdown();
    info!("kit-host stopped");
    Ok(())
}

pub(crate) fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/wallets", get(wallets::list_wallets).put(wallets::replace_wallets))
        .route("/wallets/pick", post(wallets::pick_wallet))
        .route("/connect", post(wallets::connect))
        .route("/disconnect", post(wallets::disconnect))
        .route("/account", get(account::account))
        .route("/account/retry", post(account::retry))
        .route("/networks", get(account::networks))
        .route("/network", post(account::select_network))
        .route("/theme", put(set_theme))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "kit-host",
        status: "ok",
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "kit-host",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Applies a preset to both the modal and the button and returns the CSS
/// variables the browser should set.
async fn set_theme(State(state): State<AppState>, Json(request): Json<ThemeRequest>) -> Json<ThemeResponse> {
    let modal = ModalTheme::preset(request.variant);
    let button = ButtonTheme::preset(request.variant);
    let response = ThemeResponse {
        modal: css_map(modal.css_vars()),
        button: css_map(button.css_vars()),
    };

    let store = state.kit.store();
    store.set_modal_theme(Some(modal));
    store.set_button_theme(Some(button));
    Json(response)
}

fn css_map(vars: Vec<(&'static str, &str)>) -> BTreeMap<&'static str, String> {
    vars.into_iter()
        .map(|(name, value)| (name, value.to_owned()))
        .collect()
}

pub(crate) fn bad_request(message: &str) -> ApiError {
    error(StatusCode::BAD_REQUEST, message)
}

pub(crate) fn not_found(message: &str) -> ApiError {
    error(StatusCode::NOT_FOUND, message)
}

pub(crate) fn kit_error(err: KitError) -> ApiError {
    let status = match &err {
        KitError::UnknownWallet(_) => StatusCode::NOT_FOUND,
        KitError::WalletUnavailable(_) => StatusCode::CONFLICT,
        KitError::Connect { .. } => StatusCode::BAD_GATEWAY,
    };
    error(status, &err.to_string())
}

fn error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_owned(),
        }),
    )
}
