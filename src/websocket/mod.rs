//! WebSocket clients for the Waxpeer event sockets.
//!
//! This module provides two clients:
//! - [`TradeWsClient`]: Authenticated trade lifecycle events for a seller
//! - [`SiteWsClient`]: Public item listing changes for subscribed topics
//!
//! # Connection Management
//!
//! Both clients keep their connection alive on their own. A dropped connection
//! is re-established after a delay that grows by one retry interval per failed
//! attempt and resets once the server has accepted a session. Only
//! [`TradeWsClient::disconnect`] or [`SiteWsClient::disconnect`] stops this.
//!
//! The site socket is only open once the server acknowledges the namespace
//! connection, and is dropped when the server stays silent for longer than the
//! heartbeat window it announced.
//!
//! Events are delivered to callbacks registered with `on`, and to every stream
//! returned by `events`.

mod listeners;
mod site;
mod socketio;
mod state;
mod stream;
mod supervisor;
#[cfg(test)]
mod testing;
mod trade;
mod transport;

pub use site::SiteWsClient;
pub use state::ConnectionState;
pub use stream::EventStream;
pub use trade::TradeWsClient;
pub use transport::{Connector, FrameSink, FrameStream, Transport, WsConnector};

// Re-export commonly used types for convenience
pub use crate::types::{
    CreateTradeData, ItemChange, Notification, SiteEvent, SiteEventKind, SteamTrade, TradeEvent,
    TradeEventKind, UserChange,
};
