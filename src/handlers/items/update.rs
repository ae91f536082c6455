// handlers/items/update.rs - PUT /api/items
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::database::Item;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::create::require_field;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
    pub recaptcha_token: Option<String>,
}

/// PUT /api/items - update an item in place, keyed by id. Unknown ids are
/// a 404; the verification gate still runs first.
pub async fn items_put(
    State(state): State<AppState>,
    Json(payload): Json<UpdateItemRequest>,
) -> ApiResult<Item> {
    let id = require_field(payload.id, "ID is required")?;
    let token = require_field(payload.recaptcha_token, "reCAPTCHA token is required")?;
    let name = require_field(payload.name, "Name is required")?;
    let value = require_field(payload.value, "Value is required")?;

    if !state.verifier.verify(&token).await {
        return Err(ApiError::verification("reCAPTCHA verification failed"));
    }

    let item = state.items.update(&id, &name, &value).await?;
    Ok(ApiResponse::success(item))
}
