#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde_json::{Value, json};
use shurjopay_connect::{Config, Shurjopay, gateway::payin::PaymentRequest};

pub const CLIENT_IP: &str = "203.0.113.5";
pub const RETURN_URL: &str = "https://shop.example.com/payment/return";

/// Canned answers of the mock gateway
#[derive(Debug, Clone)]
pub struct Behavior {
    pub token_status: StatusCode,
    pub token_body: Value,
    pub pay_status: StatusCode,
    pub pay_body: Value,
    pub pay_delay: Duration,
    pub verify_status: StatusCode,
    pub verify_body: Value,
    pub verify_delay: Duration,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            token_status: StatusCode::OK,
            token_body: json!({"token": "T1", "token_type": "Bearer", "store_id": "S1"}),
            pay_status: StatusCode::OK,
            pay_body: json!({
                "checkout_url": "https://pay/x",
                "order_id": "ORDER123",
                "status": "Initiated"
            }),
            pay_delay: Duration::ZERO,
            verify_status: StatusCode::OK,
            verify_body: json!([{
                "id": 1,
                "order_id": "sp65b0c0e4",
                "currency": "BDT",
                "amount": 1050,
                "sp_code": "1000",
                "sp_message": "Success",
                "customer_order_id": "ORDER123"
            }]),
            verify_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: &'static str,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Debug)]
struct Mock {
    behavior: Behavior,
    recorded: Mutex<Vec<Recorded>>,
}

impl Mock {
    fn record(&self, path: &'static str, headers: &HeaderMap, body: Value) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        self.recorded.lock().unwrap().push(Recorded {
            path,
            authorization,
            body,
        });
    }
}

pub struct MockGateway {
    pub addr: SocketAddr,
    mock: Arc<Mock>,
}

impl MockGateway {
    pub async fn start(behavior: Behavior) -> Self {
        let mock = Arc::new(Mock {
            behavior,
            recorded: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/ip", get(ip))
            .route("/api/get_token", post(token))
            .route("/api/secret-pay", post(secret_pay))
            .route("/api/verification", post(verification))
            .with_state(mock.clone());
        let addr = serve(app).await;
        Self { addr, mock }
    }

    pub fn config(&self) -> Config {
        Config::new(
            format!("http://{}/", self.addr),
            "sp_sandbox",
            "pyyk97hu&6u6",
            RETURN_URL,
        )
        .with_ip_lookup_url(format!("http://{}/ip", self.addr))
    }

    pub fn client(&self) -> Shurjopay {
        Shurjopay::new(self.config())
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.mock.recorded.lock().unwrap().clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.recorded().iter().filter(|r| r.path == path).count()
    }

    pub fn last(&self, path: &str) -> Option<Recorded> {
        self.recorded().into_iter().rev().find(|r| r.path == path)
    }
}

/// Serve `app` on an ephemeral local port
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Address nothing listens on
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn ip(State(mock): State<Arc<Mock>>, headers: HeaderMap) -> String {
    mock.record("/ip", &headers, Value::Null);
    format!("  {CLIENT_IP}\n")
}

async fn token(
    State(mock): State<Arc<Mock>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.record("/api/get_token", &headers, body);
    (mock.behavior.token_status, Json(mock.behavior.token_body.clone()))
}

async fn secret_pay(
    State(mock): State<Arc<Mock>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.record("/api/secret-pay", &headers, body);
    if !mock.behavior.pay_delay.is_zero() {
        tokio::time::sleep(mock.behavior.pay_delay).await;
    }
    (mock.behavior.pay_status, Json(mock.behavior.pay_body.clone()))
}

async fn verification(
    State(mock): State<Arc<Mock>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.record("/api/verification", &headers, body);
    if !mock.behavior.verify_delay.is_zero() {
        tokio::time::sleep(mock.behavior.verify_delay).await;
    }
    (mock.behavior.verify_status, Json(mock.behavior.verify_body.clone()))
}

pub fn payment_request() -> PaymentRequest {
    serde_json::from_value(json!({
        "amount": 1050,
        "prefix": "sp",
        "currency": "BDT",
        "customer_name": "Rahim Uddin",
        "customer_phone": "01711111111",
        "customer_email": "rahim@example.com",
        "customer_address": "House 7, Road 3",
        "customer_city": "Dhaka",
        "customer_state": "Dhaka",
        "customer_postcode": "1207",
        "customer_country": "Bangladesh",
        "shipping_address": "House 7, Road 3",
        "shipping_city": "Dhaka",
        "shipping_country": "Bangladesh",
        "received_person_name": "Rahim Uddin",
        "shipping_phone_number": "01711111111",
        "discount_amount": 50,
        "order_id": "FROM_FORM"
    }))
    .unwrap()
}
