use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::database::Item;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// Typed access to the items API. One method per operation; mutating calls
/// carry the verification token the caller obtained.
#[derive(Debug, Clone)]
pub struct ItemsApi {
    http: reqwest::Client,
    base_url: String,
}

impl ItemsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn items_url(&self) -> String {
        format!("{}/api/items", self.base_url)
    }

    pub async fn get_items(&self) -> Result<Vec<Item>, ClientError> {
        let response = self.http.get(self.items_url()).send().await?;
        Self::decode(response).await
    }

    pub async fn create_item(
        &self,
        name: &str,
        value: &str,
        recaptcha_token: &str,
    ) -> Result<Item, ClientError> {
        let response = self
            .http
            .post(self.items_url())
            .json(&json!({
                "name": name,
                "value": value,
                "recaptchaToken": recaptcha_token,
            }))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn update_item(
        &self,
        id: &str,
        name: &str,
        value: &str,
        recaptcha_token: &str,
    ) -> Result<Item, ClientError> {
        let response = self
            .http
            .put(self.items_url())
            .json(&json!({
                "id": id,
                "name": name,
                "value": value,
                "recaptchaToken": recaptcha_token,
            }))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn delete_item(
        &self,
        id: &str,
        recaptcha_token: &str,
    ) -> Result<DeleteConfirmation, ClientError> {
        let response = self
            .http
            .delete(self.items_url())
            .query(&[("id", id)])
            .json(&json!({ "recaptchaToken": recaptcha_token }))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Non-2xx responses become ClientError, carrying the server's error
    /// string when the body has one.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        match response.json::<ErrorBody>().await {
            Ok(body) => Err(ClientError::Api {
                status: status.as_u16(),
                message: body.error,
            }),
            Err(_) => Err(ClientError::Status {
                status: status.as_u16(),
            }),
        }
    }
}
