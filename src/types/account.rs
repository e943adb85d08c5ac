use serde::{Deserialize, Serialize};

use super::Price;

/// Generic `{ success, msg }` response
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Profile of the authenticated user
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct User {
    #[serde(default)]
    pub wallet: Option<Price>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub id64: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sell_fees: Option<f64>,
    #[serde(default)]
    pub can_p2p: Option<bool>,
    #[serde(default)]
    pub tradelink: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProfileResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
}

/// Result of validating or changing a trade link
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TradeLinkResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub steamid32: Option<serde_json::Value>,
    #[serde(default)]
    pub steamid64: Option<serde_json::Value>,
}

/// Trades and wallet transactions, as returned by `my-history`
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MyHistoryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: MyHistoryData,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MyHistoryData {
    #[serde(default)]
    pub trades: Vec<serde_json::Value>,
    #[serde(default)]
    pub transactions: Vec<serde_json::Value>,
}
