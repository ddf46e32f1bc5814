use std::{fmt::Display, sync::Arc};

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::config::Config;

pub use error::GatewayError;

pub mod auth;
pub mod error;
/// Secret masking for logs
pub mod mask;
pub mod payin;
/// Transaction verification
pub mod status;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// shurjoPay API paths relative to the configured endpoint
#[derive(Debug, Clone, Copy)]
pub enum Endpoint {
    Token,
    SecretPay,
    Verification,
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token => f.write_str("api/get_token"),
            Self::SecretPay => f.write_str("api/secret-pay"),
            Self::Verification => f.write_str("api/verification"),
        }
    }
}

/// Which gateway rejection a non-success status maps to
#[derive(Debug, Clone, Copy)]
enum Rejection {
    Authentication,
    Payment,
    Verification,
}

impl Rejection {
    fn into_error(self, status: reqwest::StatusCode) -> GatewayError {
        match self {
            Self::Authentication => GatewayError::Authentication(status),
            Self::Payment => GatewayError::Payment(status),
            Self::Verification => GatewayError::Verification(status),
        }
    }
}

/// shurjoPay merchant client.
///
/// Holds no per-call state: every operation authenticates again and cloning is cheap.
#[derive(Debug, Clone)]
pub struct Shurjopay {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl Shurjopay {
    pub fn new(config: Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: Config) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.config.endpoint, endpoint)
    }

    /// POST `body` as JSON and decode a success response into `T`.
    ///
    /// A success body that does not fit `T` is handed back in
    /// [`GatewayError::UnexpectedResponse`].
    async fn post<B, T>(
        &self,
        endpoint: Endpoint,
        headers: HeaderMap,
        body: &B,
        rejection: Rejection,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        tracing::debug!(%url, data = %mask::secure_serializable(body), "Gateway API request");
        let res = self
            .client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            tracing::error!(%url, %status, "Gateway API rejected request");
            return Err(rejection.into_error(status));
        }

        let response = res.json::<serde_json::Value>().await?;
        tracing::debug!(
            %status,
            data = %mask::secure_value(&response),
            "Gateway API response"
        );
        match T::deserialize(&response) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(%url, "Gateway API response has unexpected shape: {e}");
                Err(GatewayError::UnexpectedResponse(response))
            }
        }
    }
}
