use serde::{Deserialize, Serialize};

use super::{Id, Price};

/// Trade link partner and token of the buyer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradePartner {
    pub partner: String,
    pub token: String,
}

impl TradePartner {
    pub fn new(partner: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            partner: partner.into(),
            token: token.into(),
        }
    }
}

/// Response to a purchase
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BuyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub id: Option<Id>,
}

/// Status of one purchase trade
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TradeStatus {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub trade_id: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub for_steamid64: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub send_until: Option<i64>,
    #[serde(default)]
    pub last_updated: Option<i64>,
    #[serde(default)]
    pub counter: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TradesStatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub trades: Vec<TradeStatus>,
}

/// One entry of the purchase history
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Purchase {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub trade_id: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub send_until: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PurchaseHistoryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub history: Vec<Purchase>,
}

/// Item to list or re-price
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ListingRequest {
    pub item_id: Id,
    pub price: Price,
}

impl ListingRequest {
    pub fn new(item_id: impl Into<Id>, price: Price) -> Self {
        Self {
            item_id: item_id.into(),
            price,
        }
    }
}

/// Item a merchant lists on behalf of one of its users
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct MerchantListing {
    pub item_id: Id,
    pub price: Price,
    /// Sell instantly; the price is then set by the marketplace
    #[serde(default)]
    pub instant: bool,
}

/// An item listed by the user
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ListedItem {
    #[serde(default)]
    pub item_id: Option<Id>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ListItemsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub items: Vec<ListedItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FailedEdit {
    #[serde(default)]
    pub item_id: Option<Id>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct EditItemsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub updated: Vec<ListedItem>,
    #[serde(default)]
    pub failed: Vec<FailedEdit>,
    #[serde(default)]
    pub removed: Vec<Id>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RemoveItemsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub removed: Vec<Id>,
}

/// Item in the user's steam inventory
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct InventoryItem {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub market_name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub steam_price: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct InventoryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub items: Vec<InventoryItem>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub msg: Option<String>,
}
