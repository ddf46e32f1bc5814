//! shurjoPay merchant integration.
//!
//! - [gateway] (shurjoPay API client)
//! - [reliability] (opt-in timeout and retry around the client)
//! - [connect] (HTTP surface exposing the client to other services)
#![doc = include_str!("../README.md")]

pub mod config;
/// HTTP API in front of the gateway client
pub mod connect;
/// shurjoPay gateway integration
///
/// Types and methods to authenticate, create checkouts and verify them.
pub mod gateway;
pub mod reliability;
pub mod state;

pub use config::Config;
pub use gateway::{GatewayError, Shurjopay};
