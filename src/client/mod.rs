//! REST client for the Waxpeer marketplace API.
//!
//! [`WaxpeerClient`] covers the whole v1 API. Its methods are grouped by area:
//! account, market data, buying, selling, buy orders and merchant endpoints.

mod account;
mod buy_orders;
mod buying;
mod market;
mod merchant;
mod selling;

use std::num::NonZeroU32;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::ratelimit::EndpointLimiter;

/// Requests allowed per minute on each of the price endpoints
const PRICES_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(60) {
    Some(n) => n,
    None => unreachable!(),
};

/// Client for the Waxpeer REST API
///
/// Every request is authenticated with the API key passed at construction.
/// Prices are integer mils where 1000 equals one US dollar.
///
/// # Example
///
/// ```no_run
/// use waxpeer_rs::types::{Game, PricesQuery};
/// use waxpeer_rs::WaxpeerClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = WaxpeerClient::new("your_api_key")?;
///
///     let profile = client.get_profile().await?;
///     println!("wallet: {:?}", profile.user.and_then(|u| u.wallet));
///
///     let prices = client
///         .get_prices(&PricesQuery {
///             game: Game::Rust,
///             ..Default::default()
///         })
///         .await?;
///     println!("{} items priced", prices.items.len());
///     Ok(())
/// }
/// ```
pub struct WaxpeerClient {
    http_client: HttpClient,
    prices_limiter: EndpointLimiter,
    dopplers_limiter: EndpointLimiter,
}

impl WaxpeerClient {
    /// Create a client for the public API
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ClientConfig::default())
    }

    /// Create a client with a custom host, version or timeout
    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::AuthRequired("an API key is required".to_string()));
        }

        Ok(Self {
            http_client: HttpClient::new(&config, api_key)?,
            prices_limiter: EndpointLimiter::per_minute("prices", PRICES_PER_MINUTE),
            dopplers_limiter: EndpointLimiter::per_minute("prices/dopplers", PRICES_PER_MINUTE),
        })
    }
}

impl std::fmt::Debug for WaxpeerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaxpeerClient").finish_non_exhaustive()
    }
}
