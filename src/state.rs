use crate::reliability::ResilientShurjopay;

#[derive(Debug, Clone, axum::extract::FromRef)]
pub struct AppState {
    pub gateway: ResilientShurjopay,
}

impl AppState {
    pub fn new(gateway: ResilientShurjopay) -> Self {
        Self { gateway }
    }
}
