use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;

use crate::error::InventoryError;
use crate::metrics::Metrics;
use crate::session::Inventory;
use crate::table::Item;

pub struct AppState {
    inventory: Mutex<Inventory>,
}

impl AppState {
    pub fn new(inventory: Inventory) -> Arc<Self> {
        Arc::new(AppState {
            inventory: Mutex::new(inventory),
        })
    }
}

#[derive(Deserialize)]
struct ItemsQuery {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
struct QuantityUpdate {
    name: String,
    quantity: i64,
}

#[derive(Deserialize)]
struct AdjustUpdate {
    name: String,
    value: i64,
}

#[derive(Serialize)]
struct ItemsResponse {
    items: Vec<Item>,
    metrics: Metrics,
    dirty: bool,
    last_flush: Option<String>,
}

#[derive(Serialize)]
struct ItemResponse {
    status: String,
    item: Item,
    metrics: Metrics,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

/// An [`InventoryError`] rendered as a JSON status body.
struct ApiError(StatusCode, String);

impl From<InventoryError> for ApiError {
    fn from(e: InventoryError) -> Self {
        let code = match &e {
            InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
            InventoryError::InvalidInput(_) | InventoryError::InsufficientStock { .. } => {
                StatusCode::BAD_REQUEST
            }
            InventoryError::Load(_) | InventoryError::Malformed(_) | InventoryError::Persist(_) => {
                StatusCode::BAD_GATEWAY
            }
            InventoryError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(code, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.0,
            Json(StatusResponse {
                status: "error".to_string(),
                message: Some(self.1),
            }),
        )
            .into_response()
    }
}

fn lock(state: &AppState) -> Result<MutexGuard<'_, Inventory>, ApiError> {
    state.inventory.lock().map_err(|_| {
        ApiError(
            StatusCode::INTERNAL_SERVER_ERROR,
            "inventory state is unavailable".to_string(),
        )
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_page))
        .route("/api/items", get(get_items))
        .route("/api/metrics", get(get_metrics))
        .route("/api/sell", post(sell))
        .route("/api/restock", post(restock))
        .route("/api/adjust", post(adjust))
        .route("/api/flush", post(flush))
        .route("/api/reload", post(reload))
        .with_state(state)
}

pub async fn run(inventory: Inventory, listen: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(AppState::new(inventory));

    let listener = TcpListener::bind(listen).await?;
    info!("Listening on http://{}", listen);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_page() -> Html<&'static str> {
    Html(include_str!("./static/inventory.html"))
}

async fn get_items(
    Query(params): Query<ItemsQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let inventory = lock(&state)?;
    Ok(Json(ItemsResponse {
        items: inventory.filter(&params.q).into_iter().cloned().collect(),
        metrics: inventory.metrics(),
        dirty: inventory.is_dirty(),
        last_flush: inventory.last_flush().map(|t| t.to_rfc3339()),
    }))
}

async fn get_metrics(State(state): State<Arc<AppState>>) -> Result<Json<Metrics>, ApiError> {
    Ok(Json(lock(&state)?.metrics()))
}

async fn sell(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QuantityUpdate>,
) -> Result<Json<ItemResponse>, ApiError> {
    let mut inventory = lock(&state)?;
    let item = inventory.sell(&payload.name, payload.quantity)?.clone();
    Ok(Json(item_response(item, &inventory)))
}

async fn restock(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QuantityUpdate>,
) -> Result<Json<ItemResponse>, ApiError> {
    let mut inventory = lock(&state)?;
    let item = inventory.restock(&payload.name, payload.quantity)?.clone();
    Ok(Json(item_response(item, &inventory)))
}

async fn adjust(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AdjustUpdate>,
) -> Result<Json<ItemResponse>, ApiError> {
    let mut inventory = lock(&state)?;
    let item = inventory.adjust_on_hand(&payload.name, payload.value)?.clone();
    Ok(Json(item_response(item, &inventory)))
}

fn item_response(item: Item, inventory: &Inventory) -> ItemResponse {
    ItemResponse {
        status: "ok".to_string(),
        item,
        metrics: inventory.metrics(),
    }
}

// Flush and reload block on the sheet backend, so they run off the async
// workers.
async fn flush(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let rows = blocking(state, |inventory| inventory.flush()).await?;
    Ok(Json(StatusResponse {
        status: "ok".to_string(),
        message: Some(format!("saved {} rows", rows)),
    }))
}

async fn reload(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    blocking(state, |inventory| inventory.reload()).await?;
    Ok(Json(StatusResponse {
        status: "ok".to_string(),
        message: None,
    }))
}

async fn blocking<T, F>(state: Arc<AppState>, action: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut Inventory) -> crate::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut inventory = lock(&state)?;
        action(&mut inventory).map_err(ApiError::from)
    })
    .await
    .map_err(|e| {
        error!("blocking task failed: {}", e);
        ApiError(StatusCode::INTERNAL_SERVER_ERROR, "task failed".to_string())
    })?
}
