use serde::Serialize;

use crate::gateway::{Endpoint, GatewayError, Rejection, Result, Shurjopay};

/// Verification body exactly as the gateway returned it.
///
/// shurjoPay answers with an array of transaction records, but nothing here depends on
/// that shape.
pub type Verification = serde_json::Value;

#[derive(Debug, Serialize)]
struct VerificationRequest<'a> {
    order_id: &'a str,
}

impl Shurjopay {
    /// Query the final state of a gateway order.
    ///
    /// An empty id fails with [`GatewayError::MissingOrderId`] before any request is made.
    pub async fn verify_payment(&self, sp_order_id: &str) -> Result<Verification> {
        if sp_order_id.is_empty() {
            tracing::warn!("Verification requested without order id");
            return Err(GatewayError::MissingOrderId);
        }

        let token = self.authenticate().await?;
        let verification: Verification = self
            .post(
                Endpoint::Verification,
                token.authenticated_headers()?,
                &VerificationRequest {
                    order_id: sp_order_id,
                },
                Rejection::Verification,
            )
            .await?;
        tracing::info!(sp_order_id, "Verified payment");
        Ok(verification)
    }
}
