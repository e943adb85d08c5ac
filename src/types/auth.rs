use serde::Serialize;

use crate::error::{Error, Result};

/// API credentials
///
/// The marketplace accepts three kinds of credential. Any combination may be
/// supplied; every one that is present is sent and the server picks one.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Legacy API key (`apiKey`)
    pub api_key: Option<String>,
    /// Alternate API key (`waxApi`)
    pub wax_api: Option<String>,
    /// Bearer access token (`accessToken`)
    pub access_token: Option<String>,
}

impl Credentials {
    /// Credentials holding only the legacy API key
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Credentials holding only the alternate API key
    pub fn wax_api(key: impl Into<String>) -> Self {
        Self {
            wax_api: Some(key.into()),
            ..Self::default()
        }
    }

    /// Credentials holding only a bearer access token
    pub fn access_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_wax_api(mut self, key: impl Into<String>) -> Self {
        self.wax_api = Some(key.into());
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// True when at least one non-empty credential is present
    pub fn is_present(&self) -> bool {
        [&self.api_key, &self.wax_api, &self.access_token]
            .into_iter()
            .any(|c| c.as_deref().is_some_and(|c| !c.is_empty()))
    }

    /// Fail unless at least one credential is present
    pub fn validate(&self) -> Result<()> {
        if self.is_present() {
            Ok(())
        } else {
            Err(Error::AuthRequired(
                "one of api key, wax api key or access token must be set".to_string(),
            ))
        }
    }

    /// Value for an `authorization` header, preferring the API keys
    pub fn authorization_header(&self) -> Option<String> {
        let non_empty = |c: &Option<String>| c.clone().filter(|c| !c.is_empty());
        non_empty(&self.api_key)
            .or_else(|| non_empty(&self.wax_api))
            .or_else(|| non_empty(&self.access_token).map(|t| format!("Bearer {}", t)))
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |c: &Option<String>| c.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("wax_api", &mask(&self.wax_api))
            .field("access_token", &mask(&self.access_token))
            .finish()
    }
}

/// Client build information sent along with the trade socket authentication
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClientInfo {
    pub version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Authentication frame of the trade socket
#[derive(Debug, Clone, Serialize)]
pub struct TradeAuthentication {
    name: &'static str,
    pub steamid: String,
    pub tradeurl: String,
    pub source: String,
    pub info: ClientInfo,
    #[serde(rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(rename = "waxApi", skip_serializing_if = "Option::is_none")]
    pub wax_api: Option<String>,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl TradeAuthentication {
    /// Identifies this library to the server
    pub const SOURCE: &'static str = "waxpeer_rs";

    pub fn new(credentials: &Credentials, steamid: &str, tradelink: &str) -> Self {
        Self {
            name: "auth",
            steamid: steamid.to_string(),
            tradeurl: tradelink.to_string(),
            source: Self::SOURCE.to_string(),
            info: ClientInfo::default(),
            api_key: credentials.api_key.clone(),
            wax_api: credentials.wax_api.clone(),
            access_token: credentials.access_token.clone(),
        }
    }
}
