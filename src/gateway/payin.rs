use serde::{Deserialize, Serialize};

use crate::gateway::{Endpoint, GatewayError, Rejection, Result, Shurjopay, auth::Token};

/// Checkout details supplied by the merchant.
///
/// Nothing is validated here, the gateway is the judge of what it accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: f64,
    /// Merchant prefix, prepended by the gateway to its own order ids
    pub prefix: String,
    pub currency: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub customer_address: String,
    pub customer_city: String,
    pub customer_state: String,
    pub customer_postcode: String,
    pub customer_country: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_country: String,
    pub received_person_name: String,
    pub shipping_phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value4: Option<String>,
    /// Any other field the merchant wants forwarded as is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Accepted checkout.
///
/// Only `checkout_url` is required, sandbox and production disagree on the names of the
/// rest. Unknown keys stay in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// Hosted page the customer is redirected to
    pub checkout_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PaymentResponse {
    fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(serde_json::Value::as_str)
    }

    /// Gateway order id, `order_id` or else `sp_order_id`
    pub fn order_id(&self) -> Option<&str> {
        self.order_id
            .as_deref()
            .or_else(|| self.extra_str("sp_order_id"))
    }

    /// Transaction status, `status` or else `transactionStatus`
    pub fn status(&self) -> Option<&str> {
        self.status
            .as_deref()
            .or_else(|| self.extra_str("transactionStatus"))
    }
}

/// Fields the gateway needs on top of the merchant request
#[derive(Debug, Serialize)]
struct Derived<'a> {
    store_id: &'a crate::gateway::auth::StoreId,
    token: &'a str,
    client_ip: &'a str,
    return_url: &'a str,
    cancel_url: &'a str,
    order_id: &'a str,
}

/// Shallow merge of the merchant request and the derived fields, derived fields win.
fn checkout_payload(
    request: &PaymentRequest,
    derived: &Derived<'_>,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    let mut payload = match serde_json::to_value(request)? {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    if let serde_json::Value::Object(derived) = serde_json::to_value(derived)? {
        payload.extend(derived);
    }
    Ok(payload)
}

impl Shurjopay {
    /// Public address of this host as reported by the IP lookup service
    async fn client_ip(&self) -> Result<String> {
        let url = &self.config.ip_lookup_url;
        let res = self.client.get(url).send().await?;
        let body = res.text().await?;
        let ip = body.trim().to_owned();
        tracing::debug!(%url, %ip, "Resolved client ip");
        Ok(ip)
    }

    /// Start a checkout and get the url the customer should be sent to.
    pub async fn make_payment(
        &self,
        merchant_order_id: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse> {
        let client_ip = self.client_ip().await?;
        let token: Token = self.authenticate().await?;

        let payload = checkout_payload(
            request,
            &Derived {
                store_id: &token.store_id,
                token: &token.token,
                client_ip: &client_ip,
                return_url: &self.config.return_url,
                cancel_url: &self.config.return_url,
                order_id: merchant_order_id,
            },
        )?;

        let response: PaymentResponse = self
            .post(
                Endpoint::SecretPay,
                token.authenticated_headers()?,
                &payload,
                Rejection::Payment,
            )
            .await
            .inspect_err(|e| {
                if !matches!(e, GatewayError::Payment(_)) {
                    tracing::error!(merchant_order_id, "Failed to submit payment: {e}");
                }
            })?;
        tracing::info!(
            merchant_order_id,
            sp_order_id = response.order_id(),
            status = response.status(),
            "Created payment"
        );
        Ok(response)
    }
}
