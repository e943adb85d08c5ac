use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Result;

/// Closed set of notification kinds of one event socket
pub trait EventKind: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Kind used to surface transport-level errors
    const ERROR: Self;

    /// Wire name of the kind
    fn as_str(&self) -> &'static str;
}

/// Notification kinds of the trade socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeEventKind {
    /// A sale needs a steam trade to be sent (`send-trade`)
    SendTrade,
    /// A trade was cancelled (`cancelTrade`)
    CancelTrade,
    /// A withdrawal was accepted (`accept_withdraw`)
    AcceptWithdraw,
    /// The user's state changed (`user_change`)
    UserChange,
    /// Transport-level error
    Error,
}

impl TradeEventKind {
    /// Map a frame discriminant to a kind; `None` for anything unknown
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "send-trade" => Some(Self::SendTrade),
            "cancelTrade" => Some(Self::CancelTrade),
            "accept_withdraw" => Some(Self::AcceptWithdraw),
            "user_change" | "change_user" => Some(Self::UserChange),
            _ => None,
        }
    }
}

impl EventKind for TradeEventKind {
    const ERROR: Self = Self::Error;

    fn as_str(&self) -> &'static str {
        match self {
            Self::SendTrade => "send-trade",
            Self::CancelTrade => "cancelTrade",
            Self::AcceptWithdraw => "accept_withdraw",
            Self::UserChange => "user_change",
            Self::Error => "error",
        }
    }
}

/// Notification kinds of the site socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteEventKind {
    /// Session info sent by the server after connecting
    Handshake,
    /// An item was listed (`new`, legacy `add_item`)
    New,
    /// A listed item changed (`update`, legacy `update_item`)
    Update,
    /// An item was delisted (`removed`, legacy `remove`)
    Removed,
    /// Steam trade progress of the user (`steamTrade`)
    SteamTrade,
    /// The user's account changed (`change_user`)
    ChangeUser,
    /// Transport-level or server-reported error
    Error,
}

impl SiteEventKind {
    /// Map a Socket.IO event name to a kind; `None` for anything unknown
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "handshake" => Some(Self::Handshake),
            "new" | "add_item" => Some(Self::New),
            "update" | "update_item" => Some(Self::Update),
            "removed" | "remove" => Some(Self::Removed),
            "steamTrade" => Some(Self::SteamTrade),
            "change_user" => Some(Self::ChangeUser),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl EventKind for SiteEventKind {
    const ERROR: Self = Self::Error;

    fn as_str(&self) -> &'static str {
        match self {
            Self::Handshake => "handshake",
            Self::New => "new",
            Self::Update => "update",
            Self::Removed => "removed",
            Self::SteamTrade => "steamTrade",
            Self::ChangeUser => "change_user",
            Self::Error => "error",
        }
    }
}

/// An event delivered to the application
#[derive(Debug, Clone, PartialEq)]
pub struct Notification<K> {
    pub kind: K,
    /// Payload exactly as received
    pub data: serde_json::Value,
}

impl<K: EventKind> Notification<K> {
    pub fn new(kind: K, data: serde_json::Value) -> Self {
        Self { kind, data }
    }

    /// Error notification carrying a message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: K::ERROR,
            data: serde_json::Value::String(message.into()),
        }
    }

    /// Deserialize the payload into one of the typed event structs
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.data)?)
    }
}

/// Notification of the trade socket
pub type TradeEvent = Notification<TradeEventKind>;

/// Notification of the site socket
pub type SiteEvent = Notification<SiteEventKind>;

/// Frame of the trade socket, as received
#[derive(Debug, Clone, Deserialize)]
pub struct TradeFrame {
    pub name: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Keep-alive ping of the trade socket
#[derive(Debug, Clone, Serialize)]
pub struct PingFrame {
    name: &'static str,
}

impl Default for PingFrame {
    fn default() -> Self {
        Self { name: "ping" }
    }
}

/// Payload of a site subscription request
///
/// Older servers expected `["sub", {"name": topic, "value": true}]`; that
/// shape is deprecated and not sent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SiteSubscription {
    pub name: String,
}

/// `send-trade` payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateTradeData {
    pub waxid: String,
    #[serde(default)]
    pub wax_id: Option<String>,
    pub json_tradeoffer: TradeOffer,
    #[serde(default)]
    pub tradeoffermessage: Option<String>,
    pub tradelink: String,
    pub partner: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub now: Option<String>,
    #[serde(default)]
    pub send_until: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradeOffer {
    #[serde(default)]
    pub newversion: bool,
    #[serde(default)]
    pub version: u32,
    pub me: TradeOfferSide,
    pub them: TradeOfferSide,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradeOfferSide {
    #[serde(default)]
    pub assets: Vec<TradeAsset>,
    #[serde(default)]
    pub currency: Vec<serde_json::Value>,
    #[serde(default)]
    pub ready: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradeAsset {
    pub appid: u32,
    pub contextid: String,
    pub amount: u32,
    pub assetid: String,
}

/// `cancelTrade` and `accept_withdraw` payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradeRef {
    pub trade_id: String,
    #[serde(default)]
    pub seller_steamid: Option<String>,
}

/// `user_change` payload of the trade socket
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserOnlineChange {
    pub can_p2p: bool,
}

/// `handshake` payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Handshake {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `new`, `update` and `removed` payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemChange {
    pub item_id: super::Id,
    pub name: String,
    pub price: super::Price,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub steam_price: Option<super::Price>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub float: Option<f64>,
}

/// `change_user` payload of the site socket
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct UserChange {
    #[serde(default)]
    pub wallet: Option<super::Price>,
    #[serde(default)]
    pub kyc_status: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub ban: Option<bool>,
    #[serde(default)]
    pub last_login: Option<String>,
}

/// `steamTrade` payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SteamTrade {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: serde_json::Value,
}
