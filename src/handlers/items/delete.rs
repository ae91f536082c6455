// handlers/items/delete.rs - DELETE /api/items?id=<id>
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::create::require_field;

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemRequest {
    pub recaptcha_token: Option<String>,
}

/// DELETE /api/items?id=<id> - remove an item. The id travels as a query
/// parameter, the token in the JSON body.
pub async fn items_delete(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
    Json(payload): Json<DeleteItemRequest>,
) -> ApiResult<Value> {
    let id = require_field(query.id, "ID is required")?;
    let token = require_field(payload.recaptcha_token, "reCAPTCHA token is required")?;

    if !state.verifier.verify(&token).await {
        return Err(ApiError::verification("reCAPTCHA verification failed"));
    }

    state.items.delete(&id).await?;
    Ok(ApiResponse::success(json!({ "message": "Item deleted successfully" })))
}
