use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, warn};

use crate::config::VerificationConfig;

/// Trust decision for a client-supplied proof-of-humanity token.
///
/// Implementations must not fail: any problem reaching or reading the
/// remote service degrades to a deny, never an error or a panic.
#[async_trait]
pub trait BotVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> bool;
}

/// Verifies tokens against the reCAPTCHA siteverify endpoint.
pub struct RecaptchaVerifier {
    http: reqwest::Client,
    secret_key: Option<String>,
    verify_url: String,
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
}

impl RecaptchaVerifier {
    pub fn new(secret_key: Option<String>, verify_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            verify_url: verify_url.into(),
        }
    }

    pub fn from_config(config: &VerificationConfig) -> Self {
        Self::new(config.secret_key.clone(), config.verify_url.clone())
    }
}

#[async_trait]
impl BotVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str) -> bool {
        let Some(secret) = self.secret_key.as_deref() else {
            warn!("RECAPTCHA_SECRET_KEY not set; rejecting verification request");
            return false;
        };

        let params = [("secret", secret), ("response", token)];

        let response = match self.http.post(&self.verify_url).form(&params).send().await {
            Ok(r) => r,
            Err(e) => {
                error!("reCAPTCHA verification request failed: {}", e);
                return false;
            }
        };

        match response.json::<SiteverifyResponse>().await {
            Ok(body) => body.success,
            Err(e) => {
                error!("reCAPTCHA verification returned unreadable body: {}", e);
                false
            }
        }
    }
}
