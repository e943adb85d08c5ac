use serde::{Deserialize, Serialize};
use std::fmt;

/// Game an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    #[default]
    Csgo,
    Dota2,
    Tf2,
    Rust,
}

impl Game {
    pub fn as_str(&self) -> &'static str {
        match self {
            Game::Csgo => "csgo",
            Game::Dota2 => "dota2",
            Game::Tf2 => "tf2",
            Game::Rust => "rust",
        }
    }

    /// Steam application id of the game
    pub fn app_id(&self) -> u32 {
        match self {
            Game::Csgo => 730,
            Game::Dota2 => 570,
            Game::Tf2 => 440,
            Game::Rust => 252490,
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Sort key of the items list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemsOrderBy {
    #[default]
    Price,
    Name,
    Discount,
    BestDeals,
}

impl ItemsOrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemsOrderBy::Price => "price",
            ItemsOrderBy::Name => "name",
            ItemsOrderBy::Discount => "discount",
            ItemsOrderBy::BestDeals => "best_deals",
        }
    }
}
