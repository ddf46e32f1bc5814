//! Opt-in timeout and retry around gateway operations.
//!
//! The gateway client itself makes exactly one attempt per call and never times out.
//! [`ResilientShurjopay`] wraps it with a [`Policy`] without touching the operations.

use std::time::Duration;

use crate::gateway::{
    GatewayError, Result, Shurjopay,
    auth::Token,
    payin::{PaymentRequest, PaymentResponse},
    status::Verification,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Policy {
    /// Applied to each attempt separately
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl Policy {
    /// Run `operation` until it succeeds, fails permanently or attempts run out.
    ///
    /// Only [`GatewayError::is_transient`] failures are retried. The last error is returned.
    pub async fn run<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run_retrying(GatewayError::is_transient, operation)
            .await
    }

    /// Like [`Policy::run`], retrying only failures accepted by `retryable`.
    pub async fn run_retrying<R, F, Fut, T>(&self, retryable: R, mut operation: F) -> Result<T>
    where
        R: Fn(&GatewayError) -> bool,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let result = match self.timeout {
                Some(limit) => tokio::time::timeout(limit, operation())
                    .await
                    .unwrap_or(Err(GatewayError::Timeout(limit))),
                None => operation().await,
            };
            match result {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(attempt, "Gateway call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if retryable(&e) && attempt < attempts => {
                    tracing::warn!(attempt, max_attempts = attempts, "Gateway call failed: {e}");
                    if !self.retry.delay.is_zero() {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// [`Shurjopay`] with every operation run through a [`Policy`]
#[derive(Debug, Clone)]
pub struct ResilientShurjopay {
    inner: Shurjopay,
    policy: Policy,
}

impl ResilientShurjopay {
    pub fn new(inner: Shurjopay, policy: Policy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub async fn authenticate(&self) -> Result<Token> {
        self.policy.run(move || self.inner.authenticate()).await
    }

    /// Retried only when no attempt could have reached the gateway, a timed out
    /// submission may already have created a checkout.
    pub async fn make_payment(
        &self,
        merchant_order_id: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse> {
        self.policy
            .run_retrying(GatewayError::is_unsent, move || {
                self.inner.make_payment(merchant_order_id, request)
            })
            .await
    }

    pub async fn verify_payment(&self, sp_order_id: &str) -> Result<Verification> {
        self.policy
            .run(move || self.inner.verify_payment(sp_order_id))
            .await
    }
}
