use serde::Serialize;

use crate::gateway::mask;

pub mod api;

pub type Result<T> = std::result::Result<T, ConnectErrorResponse>;

/// Failure envelope, carries the gateway error text in band
#[derive(Debug, Serialize)]
pub struct ConnectErrorResponse {
    result: bool,
    error: String,
}

impl std::error::Error for ConnectErrorResponse {}

impl std::fmt::Display for ConnectErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error)
    }
}

impl ConnectErrorResponse {
    pub fn new(text: String) -> Self {
        Self {
            result: false,
            error: text,
        }
    }
}

impl From<crate::gateway::GatewayError> for ConnectErrorResponse {
    fn from(value: crate::gateway::GatewayError) -> Self {
        Self::new(value.to_string())
    }
}

impl axum::response::IntoResponse for ConnectErrorResponse {
    fn into_response(self) -> axum::response::Response {
        tracing::debug!(data = %mask::secure_serializable(&self), "Connect API error response payload");
        (reqwest::StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ConnectResponse<T> {
    result: bool,
    data: T,
}

impl<T> ConnectResponse<T> {
    pub fn new(data: T) -> Self {
        Self { result: true, data }
    }
}

impl<T: Serialize> axum::response::IntoResponse for ConnectResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let value = mask::secure_serializable(&self);
        tracing::debug!(data = %value, "Connect API response payload");
        axum::Json(self).into_response()
    }
}
