use std::{fmt::Display, time::Duration};

use reqwest::StatusCode;
use serde::de::Error;

use crate::gateway::mask;

pub const MSG_AUTH_FAILED: &str = "Merchant authentication failure";
pub const MSG_PAYMENT_FAILED: &str = "Payment processing failed";
pub const MSG_PAYMENT_VERIFY_FAILED: &str = "Payment verification failed";
pub const MSG_MISSING_ORDER_ID: &str = "Missing order ID";

#[derive(Debug)]
pub enum GatewayError {
    /// Token endpoint answered with a non-success status
    Authentication(StatusCode),
    /// Payment endpoint answered with a non-success status
    Payment(StatusCode),
    /// Verification endpoint answered with a non-success status
    Verification(StatusCode),
    MissingOrderId,
    RequestError(reqwest::Error),
    GatewayDeserialization(serde_json::Error),
    /// Success status with a JSON body of another shape, e.g. `{"sp_code": .., "message": ..}`
    UnexpectedResponse(serde_json::Value),
    Timeout(Duration),
}

impl GatewayError {
    /// Whether repeating the same call may succeed.
    ///
    /// Rejections from the gateway are final, transport level failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestError(e) => !e.is_builder(),
            Self::Timeout(_) => true,
            _ => false,
        }
    }

    /// Whether the failed call surely never reached the gateway.
    ///
    /// Only connection failures qualify, a timeout may hide a request the gateway accepted.
    pub fn is_unsent(&self) -> bool {
        matches!(self, Self::RequestError(e) if e.is_connect())
    }

    /// Gateway body of an [`GatewayError::UnexpectedResponse`]
    pub fn response(&self) -> Option<&serde_json::Value> {
        match self {
            Self::UnexpectedResponse(body) => Some(body),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Authentication(s) | Self::Payment(s) | Self::Verification(s) => Some(*s),
            Self::RequestError(e) => e.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            return Self::GatewayDeserialization(serde_json::Error::custom(
                "failed to decode response body",
            ));
        }
        Self::RequestError(value)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(value: serde_json::Error) -> Self {
        Self::GatewayDeserialization(value)
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RequestError(e) => Some(e),
            Self::GatewayDeserialization(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::Authentication(_) => f.write_str(MSG_AUTH_FAILED),
            GatewayError::Payment(_) => f.write_str(MSG_PAYMENT_FAILED),
            GatewayError::Verification(_) => f.write_str(MSG_PAYMENT_VERIFY_FAILED),
            GatewayError::MissingOrderId => f.write_str(MSG_MISSING_ORDER_ID),
            GatewayError::RequestError(e) => write!(f, "{e}"),
            GatewayError::GatewayDeserialization(e) => {
                write!(f, "gateway response deserialization: {e}")
            }
            GatewayError::UnexpectedResponse(body) => match body.get("message") {
                Some(serde_json::Value::String(message)) => {
                    write!(f, "unexpected gateway response: {message}")
                }
                _ => write!(f, "unexpected gateway response: {}", mask::secure_value(body)),
            },
            GatewayError::Timeout(after) => {
                write!(f, "gateway did not respond within {}ms", after.as_millis())
            }
        }
    }
}
