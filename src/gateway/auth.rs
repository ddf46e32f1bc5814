use std::fmt::Display;

use axum::http::{HeaderMap, HeaderValue, header};
use axum_extra::headers::{self, HeaderMapExt};
use serde::{Deserialize, Serialize};

use crate::gateway::{Endpoint, GatewayError, Rejection, Result, Shurjopay};

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Store identifiers come back as numbers from production and as strings from some
/// sandboxes. They are sent back in the same JSON type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreId {
    Number(u64),
    Text(String),
}

impl Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    pub token_type: String,
    pub store_id: StoreId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sp_code: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Token {
    /// `authorization` header value, `"<token_type> <token>"`
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }

    pub fn authenticated_headers(&self) -> Result<HeaderMap> {
        let value = HeaderValue::from_str(&self.authorization()).map_err(|_| {
            tracing::error!("Gateway issued a token that is not a valid header value");
            GatewayError::GatewayDeserialization(serde::de::Error::custom(
                "token is not a valid header value",
            ))
        })?;
        let mut map = json_headers();
        map.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        map.insert(header::AUTHORIZATION, value);
        Ok(map)
    }
}

fn json_headers() -> HeaderMap {
    let mut map = HeaderMap::new();
    map.typed_insert(headers::ContentType::json());
    map
}

impl Shurjopay {
    /// Exchange merchant credentials for a fresh token.
    ///
    /// Tokens are never cached, each payment and verification calls this again.
    pub async fn authenticate(&self) -> Result<Token> {
        let request = TokenRequest {
            username: &self.config.username,
            password: &self.config.password,
        };
        let token: Token = self
            .post(
                Endpoint::Token,
                json_headers(),
                &request,
                Rejection::Authentication,
            )
            .await?;
        tracing::debug!(store_id = %token.store_id, "Merchant authenticated");
        Ok(token)
    }
}
