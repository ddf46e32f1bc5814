use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tracing::instrument;

use crate::{
    connect::{ConnectErrorResponse, ConnectResponse, Result},
    gateway::{payin::PaymentResponse, status::Verification},
    reliability::ResilientShurjopay,
    state::AppState,
};

#[instrument(skip_all)]
pub async fn pay(
    State(gateway): State<ResilientShurjopay>,
    Json(payment): Json<req::Payment>,
) -> Result<ConnectResponse<PaymentResponse>> {
    match gateway
        .make_payment(&payment.order_id, &payment.request)
        .await
    {
        Ok(res) => Ok(ConnectResponse::new(res)),
        Err(e) => {
            tracing::error!(order_id = %payment.order_id, "Failed to create a payment: {e}");
            Err(e.into())
        }
    }
}

#[instrument(skip_all)]
pub async fn verify(
    State(gateway): State<ResilientShurjopay>,
    Json(verification): Json<req::Verification>,
) -> Result<ConnectResponse<Verification>> {
    match gateway.verify_payment(&verification.order_id).await {
        Ok(res) => Ok(ConnectResponse::new(res)),
        Err(e) => {
            tracing::error!(order_id = %verification.order_id, "Failed to verify payment: {e}");
            Err(e.into())
        }
    }
}

pub mod req {
    use serde::Deserialize;

    use crate::gateway::payin::PaymentRequest;

    #[derive(Debug, Deserialize)]
    pub struct Payment {
        /// Merchant order id
        pub order_id: String,
        #[serde(flatten)]
        pub request: PaymentRequest,
    }

    #[derive(Debug, Deserialize)]
    pub struct Verification {
        /// Gateway order id (`sp_order_id`)
        #[serde(default)]
        pub order_id: String,
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/payment", post(pay))
        .route("/verification", post(verify))
}

/// `Json` extractor wrapper that answers rejections with the error envelope.
///
/// The rejection status (400, 415, 422) is kept so callers can tell a bad request from
/// a gateway failure, which is always answered with 200.
pub struct Json<T>(pub T);

impl<S, T> axum::extract::FromRequest<S> for Json<T>
where
    T: serde::de::DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, axum::Json<ConnectErrorResponse>);

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let path = req.uri().path().to_owned();
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let status = rejection.status();
                let text = rejection.body_text();
                tracing::warn!(%path, %status, "Rejected connect request: {text}");
                Err((status, axum::Json(ConnectErrorResponse::new(text))))
            }
        }
    }
}
