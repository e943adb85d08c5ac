//! # waxpeer-rs
//!
//! A Rust client library for the Waxpeer skin marketplace.
//!
//! This library provides:
//! - A typed REST client for account, market, buying, selling, buy order and
//!   merchant endpoints
//! - A trade socket client delivering the seller's trade lifecycle events
//! - A site socket client streaming market-wide item changes
//!
//! ## Features
//!
//! - **Self-healing sockets**: Reconnection with linear backoff, keep-alive pings
//!   and re-authentication or re-subscription on every reconnect
//! - **Callbacks and streams**: Register `Fn` listeners per event kind, or consume
//!   every event as a `futures` stream
//! - **Proper Error Handling**: No panics, one error type for the whole crate
//! - **Exact prices**: Integer mils with `rust_decimal` conversions
//!
//! ## Logging
//!
//! The crate logs through the `log` facade and never installs a logger.

// Public modules
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod types;
pub mod websocket;

// Internal modules
mod http;
mod ratelimit;

pub use error::{Error, Result};
pub use types::{Credentials, Game, Id, Price};

// Re-export clients
pub use client::WaxpeerClient;

// Re-export websocket clients
pub use websocket::{SiteWsClient, TradeWsClient};
