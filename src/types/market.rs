use serde::{Deserialize, Serialize};

use super::{Game, ItemsOrderBy, Price, SortOrder};

/// Aggregated price of one item name
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriceItem {
    #[serde(default)]
    pub name: Option<String>,
    pub max: Price,
    pub avg: Price,
    pub min: Price,
    #[serde(default)]
    pub count: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PricesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub items: Vec<PriceItem>,
}

/// Filters of the `prices` endpoint
#[derive(Debug, Clone, Default)]
pub struct PricesQuery {
    pub game: Game,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub search: Option<String>,
    pub minified: bool,
    pub highest_offer: bool,
    pub single: bool,
}

/// Filters of the `prices/dopplers` endpoint
#[derive(Debug, Clone)]
pub struct DopplersQuery {
    /// Phase name, "any" for all
    pub phase: String,
    pub exterior: Option<String>,
    pub weapon: Option<String>,
    pub minified: bool,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub search: Option<String>,
    pub single: bool,
}

impl Default for DopplersQuery {
    fn default() -> Self {
        Self {
            phase: "any".to_string(),
            exterior: None,
            weapon: None,
            minified: true,
            min_price: None,
            max_price: None,
            search: None,
            single: false,
        }
    }
}

/// Filters of the `get-items-list` endpoint
#[derive(Debug, Clone, Default)]
pub struct ItemsListQuery {
    pub skip: u32,
    pub search: Option<String>,
    pub brand: Option<String>,
    pub order: SortOrder,
    pub order_by: ItemsOrderBy,
    pub exterior: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub game: Game,
}

/// An item listed for sale on the market
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MarketItem {
    #[serde(default)]
    pub item_id: Option<super::Id>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub steam_price: Option<Price>,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub best_deals: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ItemsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub items: Vec<MarketItem>,
}

/// Availability of a listed item
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Availability {
    pub item_id: super::Id,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub selling: bool,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Availability>,
}
