// handlers/items/list.rs - GET /api/items
use axum::extract::State;

use crate::database::Item;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/items - the full collection, no filtering or pagination.
/// Read-only, so no verification gate.
pub async fn items_get(State(state): State<AppState>) -> ApiResult<Vec<Item>> {
    let items = state.items.list().await?;
    Ok(ApiResponse::success(items))
}
