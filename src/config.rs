//! Client configuration for the REST API and the event sockets.

use std::time::Duration;

/// Default REST API host
pub const DEFAULT_BASE_URL: &str = "https://api.waxpeer.com";

/// Default REST API version segment
pub const DEFAULT_API_VERSION: &str = "v1";

/// Trade event socket endpoint
pub const TRADE_WS_URL: &str = "wss://wssex.waxpeer.com";

/// Site event socket endpoint (Socket.IO over Engine.IO v4)
pub const SITE_WS_URL: &str = "wss://waxpeer.com/socket.io/?EIO=4&transport=websocket";

/// Configuration for [`WaxpeerClient`](crate::WaxpeerClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API
    pub base_url: String,
    /// Version path segment (e.g. "v1")
    pub version: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl ClientConfig {
    /// Use a different API host, e.g. a proxy in front of the marketplace
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Configuration for reconnection behavior
///
/// The delay before the Nth consecutive reconnect attempt is
/// `N * base_interval`. By default there is neither a delay cap nor an
/// attempt limit, so a client retries forever.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Step added to the delay for each consecutive failure
    pub base_interval: Duration,
    /// Upper bound on a single delay (None = unbounded)
    pub max_delay: Option<Duration>,
    /// Maximum number of consecutive failed attempts (None = infinite)
    pub max_attempts: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_secs(1),
            max_delay: None,
            max_attempts: None,
        }
    }
}

/// Configuration for one event socket
#[derive(Debug, Clone)]
pub struct SocketConfig {
    /// Endpoint to connect to
    pub url: String,
    /// Interval of client keep-alive pings (None = the protocol has its own)
    pub keepalive_interval: Option<Duration>,
    /// Reconnection behavior
    pub retry: RetryConfig,
}

impl SocketConfig {
    /// Defaults for the trade event socket
    pub fn trade() -> Self {
        Self {
            url: TRADE_WS_URL.to_string(),
            keepalive_interval: Some(Duration::from_secs(25)),
            retry: RetryConfig::default(),
        }
    }

    /// Defaults for the site event socket
    ///
    /// Engine.IO heartbeats are driven by the server, so no client ping is
    /// scheduled.
    pub fn site() -> Self {
        Self {
            url: SITE_WS_URL.to_string(),
            keepalive_interval: None,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_keepalive_interval(mut self, interval: Option<Duration>) -> Self {
        self.keepalive_interval = interval;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}
