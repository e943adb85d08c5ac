use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::socketio::{self, Packet};
use super::state::ConnectionState;
use super::stream::EventStream;
use super::supervisor::{Inbound, Protocol, SocketHandle};
use super::transport::{Connector, WsConnector};
use crate::config::SocketConfig;
use crate::error::Result;
use crate::types::{Credentials, Notification, SiteEventKind, SiteSubscription};

/// Event that asks the server to start streaming a topic
const SUBSCRIBE: &str = "subscribe";

struct SiteProtocol {
    credentials: Credentials,
    topics: Vec<String>,
    /// Announced by the server in its open packet
    liveness: Option<Duration>,
}

impl SiteProtocol {
    fn subscriptions(&self) -> Vec<String> {
        self.topics
            .iter()
            .filter_map(|topic| {
                let subscription = SiteSubscription {
                    name: topic.clone(),
                };
                match socketio::event(SUBSCRIBE, &subscription) {
                    Ok(frame) => Some(frame),
                    Err(err) => {
                        log::warn!("Failed to encode subscription to '{}': {}", topic, err);
                        None
                    }
                }
            })
            .collect()
    }
}

impl Protocol for SiteProtocol {
    type Kind = SiteEventKind;
    const NAME: &'static str = "SiteWebsocket";
    const AWAITS_ACK: bool = true;

    // The server speaks first with its Engine.IO handshake
    fn handshake(&mut self) -> Option<Vec<String>> {
        self.liveness = None;
        self.credentials.is_present().then(Vec::new)
    }

    fn keepalive_frame(&self) -> Option<String> {
        None
    }

    fn can_reconnect(&self) -> bool {
        self.credentials.is_present()
    }

    fn liveness_timeout(&self) -> Option<Duration> {
        self.liveness
    }

    fn decode(&mut self, text: &str) -> Result<Inbound<SiteEventKind>> {
        let inbound = match Packet::parse(text)? {
            Packet::Open(open) => {
                log::debug!("{} engine session {} open", Self::NAME, open.sid);
                self.liveness = open.liveness_timeout();
                Inbound::Reply(vec![socketio::CONNECT.to_string()])
            }
            Packet::Ping => Inbound::Reply(vec![socketio::PONG.to_string()]),
            Packet::Pong | Packet::Noop => Inbound::Ignore,
            Packet::Connect(_) => {
                log::info!("{} subscribing to {:?}", Self::NAME, self.topics);
                Inbound::Ready(self.subscriptions())
            }
            Packet::Event { name, data } => match SiteEventKind::from_name(&name) {
                Some(kind) => Inbound::Notify(Notification::new(kind, data)),
                None => {
                    log::debug!("Ignoring unknown site socket event '{}'", name);
                    Inbound::Ignore
                }
            },
            Packet::ConnectError(data) => {
                Inbound::Reject(Notification::new(SiteEventKind::Error, data))
            }
            Packet::Disconnect | Packet::Close => Inbound::Close,
        };
        Ok(inbound)
    }
}

/// Client of the public site socket
///
/// Streams market-wide item changes for the subscribed topics (for example
/// `"csgo"` or `"rust"`). Subscriptions are sent again every time the
/// connection is re-established, so a consumer never has to resubscribe.
///
/// ```no_run
/// use waxpeer_rs::types::{Credentials, ItemChange, SiteEventKind};
/// use waxpeer_rs::websocket::SiteWsClient;
///
/// # fn run() -> waxpeer_rs::Result<()> {
/// let client = SiteWsClient::new(Credentials::api_key("your_api_key"), ["csgo"])?;
/// client.on(SiteEventKind::New, |data| {
///     if let Ok(item) = serde_json::from_value::<ItemChange>(data.clone()) {
///         println!("listed: {} for {}", item.name, item.price);
///     }
/// });
/// client.connect()?;
/// # Ok(())
/// # }
/// ```
pub struct SiteWsClient {
    handle: SocketHandle<SiteEventKind>,
}

impl SiteWsClient {
    pub fn new<I, S>(credentials: Credentials, topics: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(credentials, topics, SocketConfig::site())
    }

    /// Create a client with custom socket settings
    ///
    /// The credential is sent in the `authorization` header of the upgrade request.
    pub fn with_config<I, S>(credentials: Credentials, topics: I, config: SocketConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        credentials.validate()?;
        let mut connector = WsConnector::new(config.url.clone());
        if let Some(authorization) = credentials.authorization_header() {
            connector = connector.with_header("authorization", authorization);
        }
        Self::with_connector(credentials, topics, config, Arc::new(connector))
    }

    /// Create a client that opens its transports through `connector`
    ///
    /// The connector is responsible for the `authorization` header.
    pub fn with_connector<I, S>(
        credentials: Credentials,
        topics: I,
        config: SocketConfig,
        connector: Arc<dyn Connector>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        credentials.validate()?;

        let protocol = SiteProtocol {
            credentials,
            topics: topics.into_iter().map(Into::into).collect(),
            liveness: None,
        };

        Ok(Self {
            handle: SocketHandle::new(protocol, connector, &config),
        })
    }

    /// Open the connection, replacing any current one
    ///
    /// Must be called within a Tokio runtime.
    pub fn connect(&self) -> Result<()> {
        self.handle.connect()
    }

    /// Close the connection and stop reconnecting
    pub fn disconnect(&self) {
        self.handle.disconnect()
    }

    /// Whether the server acknowledged the namespace connection
    pub fn is_open(&self) -> bool {
        self.handle.state() == ConnectionState::Open
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.handle.state()
    }

    /// Receiver that observes every state change
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.handle.watch_state()
    }

    /// Register a listener for one kind of event; it receives the payload as sent
    pub fn on<F>(&self, kind: SiteEventKind, listener: F)
    where
        F: Fn(&serde_json::Value) + Send + Sync + 'static,
    {
        self.handle.on(kind, listener)
    }

    /// Stream of every event from now on
    pub fn events(&self) -> EventStream<SiteEventKind> {
        self.handle.events()
    }
}

impl std::fmt::Debug for SiteWsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteWsClient")
            .field("state", &self.state())
            .finish()
    }
}
