// handlers/items/create.rs - POST /api/items
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::database::Item;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: Option<String>,
    pub value: Option<String>,
    pub recaptcha_token: Option<String>,
}

/// POST /api/items - create one item. The verification gate runs before
/// any store access.
pub async fn items_post(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemRequest>,
) -> ApiResult<Item> {
    let token = require_field(payload.recaptcha_token, "reCAPTCHA token is required")?;
    let name = require_field(payload.name, "Name is required")?;
    let value = require_field(payload.value, "Value is required")?;

    if !state.verifier.verify(&token).await {
        return Err(ApiError::verification("reCAPTCHA verification failed"));
    }

    let item = state.items.create(&name, &value).await?;
    Ok(ApiResponse::created(item))
}

/// Presence check shared by the mutating handlers: absent or blank fields
/// are a validation failure.
pub(super) fn require_field(field: Option<String>, message: &str) -> Result<String, ApiError> {
    match field {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::validation(message)),
    }
}
