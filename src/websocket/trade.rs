use std::sync::Arc;
use tokio::sync::watch;

use super::state::ConnectionState;
use super::stream::EventStream;
use super::supervisor::{Inbound, Protocol, SocketHandle};
use super::transport::{Connector, WsConnector};
use crate::config::SocketConfig;
use crate::error::Result;
use crate::types::{
    Credentials, Notification, PingFrame, TradeAuthentication, TradeEventKind, TradeFrame,
};

/// Discriminant of the server's keep-alive acknowledgment
const PONG: &str = "pong";

struct TradeProtocol {
    credentials: Credentials,
    steamid: String,
    tradelink: String,
}

impl Protocol for TradeProtocol {
    type Kind = TradeEventKind;
    const NAME: &'static str = "TradeWebsocket";

    fn handshake(&mut self) -> Option<Vec<String>> {
        if self.steamid.is_empty() {
            return None;
        }
        let auth = TradeAuthentication::new(&self.credentials, &self.steamid, &self.tradelink);
        match serde_json::to_string(&auth) {
            Ok(frame) => Some(vec![frame]),
            Err(err) => {
                log::warn!("Failed to encode trade socket authentication: {}", err);
                None
            }
        }
    }

    fn keepalive_frame(&self) -> Option<String> {
        serde_json::to_string(&PingFrame::default()).ok()
    }

    fn can_reconnect(&self) -> bool {
        !self.steamid.is_empty() && self.credentials.is_present()
    }

    fn decode(&mut self, text: &str) -> Result<Inbound<TradeEventKind>> {
        decode_frame(text)
    }
}

/// Classify one trade socket frame
pub(crate) fn decode_frame(text: &str) -> Result<Inbound<TradeEventKind>> {
    let frame: TradeFrame = serde_json::from_str(text)?;
    if frame.name == PONG {
        return Ok(Inbound::Ignore);
    }
    match TradeEventKind::from_name(&frame.name) {
        Some(kind) => Ok(Inbound::Notify(Notification::new(kind, frame.data))),
        None => {
            log::debug!("Ignoring unknown trade socket message '{}'", frame.name);
            Ok(Inbound::Ignore)
        }
    }
}

/// Client of the trade event socket
///
/// Delivers the trade lifecycle of the authenticated seller: trades that must
/// be sent, cancellations, accepted withdrawals and account changes. The
/// connection is kept alive with a ping every 25 seconds and re-established
/// with a growing delay whenever it drops, re-authenticating each time. The
/// delay only starts over once the server has answered an authenticated
/// session, so a refused authentication keeps backing off.
///
/// Events that arrive while disconnected are lost. Use the REST client to
/// catch up, e.g. [`ready_to_transfer_p2p`](crate::WaxpeerClient::ready_to_transfer_p2p).
///
/// # Example
///
/// ```no_run
/// use waxpeer_rs::types::{CreateTradeData, Credentials, TradeEventKind};
/// use waxpeer_rs::websocket::TradeWsClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = TradeWsClient::new(
///         Credentials::api_key("your_api_key"),
///         "76561198000000000",
///         "https://steamcommunity.com/tradeoffer/new/?partner=1&token=abc",
///     )?;
///
///     client.on(TradeEventKind::SendTrade, |data| {
///         if let Ok(trade) = serde_json::from_value::<CreateTradeData>(data.clone()) {
///             println!("send trade {} to {}", trade.waxid, trade.tradelink);
///         }
///     });
///     client.on(TradeEventKind::Error, |err| eprintln!("socket error: {}", err));
///
///     client.connect()?;
///     tokio::signal::ctrl_c().await?;
///     client.disconnect();
///     Ok(())
/// }
/// ```
pub struct TradeWsClient {
    handle: SocketHandle<TradeEventKind>,
}

impl TradeWsClient {
    /// Create a client for the default endpoint
    ///
    /// Fails with [`Error::AuthRequired`](crate::Error::AuthRequired) when no
    /// credential is given. No connection is made until [`connect`](Self::connect).
    pub fn new(
        credentials: Credentials,
        steamid: impl Into<String>,
        tradelink: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(credentials, steamid, tradelink, SocketConfig::trade())
    }

    /// Create a client with custom socket settings
    pub fn with_config(
        credentials: Credentials,
        steamid: impl Into<String>,
        tradelink: impl Into<String>,
        config: SocketConfig,
    ) -> Result<Self> {
        let connector = Arc::new(WsConnector::new(config.url.clone()));
        Self::with_connector(credentials, steamid, tradelink, config, connector)
    }

    /// Create a client that opens its transports through `connector`
    pub fn with_connector(
        credentials: Credentials,
        steamid: impl Into<String>,
        tradelink: impl Into<String>,
        config: SocketConfig,
        connector: Arc<dyn Connector>,
    ) -> Result<Self> {
        credentials.validate()?;

        let protocol = TradeProtocol {
            credentials,
            steamid: steamid.into(),
            tradelink: tradelink.into(),
        };

        Ok(Self {
            handle: SocketHandle::new(protocol, connector, &config),
        })
    }

    /// Open the connection, replacing any current one, and re-enable reconnection
    ///
    /// Must be called within a Tokio runtime.
    pub fn connect(&self) -> Result<()> {
        self.handle.connect()
    }

    /// Close the connection and stop reconnecting
    ///
    /// Safe to call repeatedly and from inside a listener.
    pub fn disconnect(&self) {
        self.handle.disconnect()
    }

    /// Whether the transport is open and authenticated
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
    pub fn on<F>(&self, kind: TradeEventKind, listener: F)
    where
        F: Fn(&serde_json::Value) + Send + Sync + 'static,
    {
        self.handle.on(kind, listener)
    }

    /// Stream of every event from now on
    pub fn events(&self) -> EventStream<TradeEventKind> {
        self.handle.events()
    }
}

impl std::fmt::Debug for TradeWsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeWsClient")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SocketConfig;
    use crate::error::Error;
    use crate::websocket::testing::{MockConnector, MockServer};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::Instant;
    use tokio_test::assert_ok;

    const STEAMID: &str = "76561198000000000";
    const TRADELINK: &str = "https://steamcommunity.com/tradeoffer/new/?partner=1&token=abc";

    fn client(connector: &Arc<MockConnector>) -> TradeWsClient {
        TradeWsClient::with_connector(
            Credentials::api_key("key"),
            STEAMID,
            TRADELINK,
            SocketConfig::trade().with_url("ws://mock"),
            Arc::clone(connector) as Arc<dyn Connector>,
        )
        .unwrap()
    }

    async fn wait_for(client: &TradeWsClient, state: ConnectionState) {
        let mut rx = client.watch_state();
        rx.wait_for(|s| *s == state).await.unwrap();
    }

    async fn next_server(servers: &mut mpsc::UnboundedReceiver<MockServer>) -> MockServer {
        servers.recv().await.unwrap()
    }

    fn is_ping(frame: &str) -> bool {
        serde_json::from_str::<Value>(frame).unwrap()["name"] == "ping"
    }

    #[test]
    fn test_decode_dispatch() {
        let frame = json!({"name": "send-trade", "data": {"waxid": "w1", "partner": "p"}});
        match decode_frame(&frame.to_string()).unwrap() {
            Inbound::Notify(event) => {
                assert_eq!(event.kind, TradeEventKind::SendTrade);
                assert_eq!(event.data, json!({"waxid": "w1", "partner": "p"}));
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(
            decode_frame(r#"{"name":"pong"}"#).unwrap(),
            Inbound::Ignore
        ));
        assert!(matches!(
            decode_frame(r#"{"name":"brand-new-kind","data":1}"#).unwrap(),
            Inbound::Ignore
        ));
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(decode_frame("not json"), Err(Error::Json(_))));
        assert!(matches!(decode_frame(r#"{"data":{}}"#), Err(Error::Json(_))));
    }

    #[test]
    fn test_construction_requires_credentials() {
        let (connector, _servers) = MockConnector::new();
        let result = TradeWsClient::with_connector(
            Credentials::default(),
            STEAMID,
            TRADELINK,
            SocketConfig::trade(),
            Arc::clone(&connector) as Arc<dyn Connector>,
        );

        assert!(matches!(result, Err(Error::AuthRequired(_))));
        assert!(connector.attempts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_authenticates_on_open() {
        let (connector, mut servers) = MockConnector::new();
        let client = client(&connector);
        assert!(!client.is_open());
        assert_ok!(client.connect());

        let mut server = next_server(&mut servers).await;
        let auth: Value = serde_json::from_str(&server.recv_text().await.unwrap()).unwrap();
        assert_eq!(auth["name"], "auth");
        assert_eq!(auth["steamid"], STEAMID);
        assert_eq!(auth["tradeurl"], TRADELINK);
        assert_eq!(auth["apiKey"], "key");

        wait_for(&client, ConnectionState::Open).await;
        assert!(client.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_listener_receives_payload_unchanged() {
        let (connector, mut servers) = MockConnector::new();
        let client = client(&connector);

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        client.on(TradeEventKind::SendTrade, move |data| {
            sink.lock().unwrap().push(data.clone());
        });
        let cancels = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&cancels);
        client.on(TradeEventKind::CancelTrade, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut events = client.events();
        client.connect().unwrap();
        let server = next_server(&mut servers).await;

        let payload = json!({"waxid": "w1", "json_tradeoffer": {"me": {}, "them": {}}});
        server.send_text(r#"{"name":"pong"}"#);
        server.send_text(&json!({"name": "send-trade", "data": payload}).to_string());

        let event = futures_util::StreamExt::next(&mut events).await.unwrap();
        assert_eq!(event.kind, TradeEventKind::SendTrade);
        assert_eq!(*received.lock().unwrap(), vec![payload]);
        assert_eq!(cancels.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_frames_keep_connection() {
        let (connector, mut servers) = MockConnector::new();
        let client = client(&connector);
        let invoked = Arc::new(AtomicUsize::new(0));
        for kind in [
            TradeEventKind::SendTrade,
            TradeEventKind::CancelTrade,
            TradeEventKind::AcceptWithdraw,
            TradeEventKind::UserChange,
            TradeEventKind::Error,
        ] {
            let counter = Arc::clone(&invoked);
            client.on(kind, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        let mut events = client.events();
        client.connect().unwrap();
        let server = next_server(&mut servers).await;
        wait_for(&client, ConnectionState::Open).await;

        server.send_text("not json at all");
        server.send_text(r#"{"data":{"trade_id":"1"}}"#);
        server.send_text(r#"{"name":"accept_withdraw","data":{"trade_id":"9"}}"#);

        let event = futures_util::StreamExt::next(&mut events).await.unwrap();
        assert_eq!(event.kind, TradeEventKind::AcceptWithdraw);
        assert_eq!(invoked.load(Ordering::SeqCst), 1);
        assert_eq!(client.state(), ConnectionState::Open);
        assert_eq!(connector.attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_grows_and_resets() {
        let (connector, mut servers) = MockConnector::new();
        connector.fail_next(3);
        let client = client(&connector);
        client.connect().unwrap();

        // attempts at 0s, 1s, 3s, 6s; the fourth succeeds
        let server = next_server(&mut servers).await;
        wait_for(&client, ConnectionState::Open).await;

        let attempts = connector.attempts();
        assert_eq!(attempts.len(), 4);
        for k in 1..attempts.len() {
            let gap = attempts[k] - attempts[k - 1];
            assert!(gap >= Duration::from_secs(k as u64), "retry {} after {:?}", k, gap);
        }

        // once the server has answered, the next drop retries after one interval again
        let dropped_at = Instant::now();
        server.send_text(r#"{"name":"pong"}"#);
        drop(server);
        let _server = next_server(&mut servers).await;
        let attempts = connector.attempts();
        let gap = attempts[attempts.len() - 1] - dropped_at;
        assert_eq!(gap, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_grows_while_auth_is_refused() {
        let (connector, mut servers) = MockConnector::new();
        let client = client(&connector);
        client.connect().unwrap();

        // the server hangs up as soon as it reads the auth frame
        for _ in 0..6 {
            let mut server = next_server(&mut servers).await;
            let auth: Value = serde_json::from_str(&server.recv_text().await.unwrap()).unwrap();
            assert_eq!(auth["name"], "auth");
            drop(server);
        }

        let attempts = connector.attempts();
        assert_eq!(attempts.len(), 6);
        for k in 1..attempts.len() {
            assert_eq!(attempts[k] - attempts[k - 1], Duration::from_secs(k as u64));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_surfaces_and_reconnects() {
        let (connector, mut servers) = MockConnector::new();
        let client = client(&connector);
        let mut events = client.events();
        client.connect().unwrap();

        let server = next_server(&mut servers).await;
        wait_for(&client, ConnectionState::Open).await;
        server.send_error(Error::WebSocket("reset by peer".to_string()));

        let event = futures_util::StreamExt::next(&mut events).await.unwrap();
        assert_eq!(event.kind, TradeEventKind::Error);
        assert_eq!(event.data, json!("WebSocket error: reset by peer"));

        let mut second = next_server(&mut servers).await;
        let auth: Value = serde_json::from_str(&second.recv_text().await.unwrap()).unwrap();
        assert_eq!(auth["name"], "auth");
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_keepalive_after_reconnect() {
        let (connector, mut servers) = MockConnector::new();
        let client = client(&connector);
        client.connect().unwrap();

        let mut first = next_server(&mut servers).await;
        assert!(!is_ping(&first.recv_text().await.unwrap()));
        assert!(is_ping(&first.recv_text().await.unwrap())); // t = 25s

        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(first); // t = 30s, reconnect at 31s

        let mut second = next_server(&mut servers).await;
        assert!(!is_ping(&second.recv_text().await.unwrap()));
        let opened = Instant::now();

        tokio::time::sleep(Duration::from_secs(25) + Duration::from_millis(500)).await;
        let frames = second.drain_texts();
        assert_eq!(frames.len(), 1, "frames: {:?}", frames);
        assert!(is_ping(&frames[0]));

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(second.drain_texts().len(), 1);
        assert!(Instant::now() - opened < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_is_idempotent() {
        let (connector, mut servers) = MockConnector::new();
        let client = client(&connector);
        client.connect().unwrap();

        let mut server = next_server(&mut servers).await;
        wait_for(&client, ConnectionState::Open).await;

        client.disconnect();
        client.disconnect();
        wait_for(&client, ConnectionState::Closed).await;

        let mut saw_close = false;
        while let Some(message) = server.recv().await {
            saw_close |= message.is_close();
        }
        assert!(saw_close);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(client.state(), ConnectionState::Closed);
        assert_eq!(connector.attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_from_listener() {
        let (connector, mut servers) = MockConnector::new();
        let client = Arc::new(client(&connector));

        let weak = Arc::downgrade(&client);
        client.on(TradeEventKind::CancelTrade, move |_| {
            if let Some(client) = weak.upgrade() {
                client.disconnect();
            }
        });

        client.connect().unwrap();
        let server = next_server(&mut servers).await;
        server.send_text(r#"{"name":"cancelTrade","data":{"trade_id":"1"}}"#);

        wait_for(&client, ConnectionState::Closed).await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(connector.attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnect_after_disconnect() {
        let (connector, mut servers) = MockConnector::new();
        let client = client(&connector);
        client.connect().unwrap();
        let _first = next_server(&mut servers).await;
        wait_for(&client, ConnectionState::Open).await;

        client.disconnect();
        wait_for(&client, ConnectionState::Closed).await;

        client.connect().unwrap();
        let mut second = next_server(&mut servers).await;
        let auth: Value = serde_json::from_str(&second.recv_text().await.unwrap()).unwrap();
        assert_eq!(auth["steamid"], STEAMID);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_steamid_never_authenticates() {
        let (connector, mut servers) = MockConnector::new();
        let client = TradeWsClient::with_connector(
            Credentials::api_key("key"),
            "",
            TRADELINK,
            SocketConfig::trade(),
            Arc::clone(&connector) as Arc<dyn Connector>,
        )
        .unwrap();
        client.connect().unwrap();

        let mut server = next_server(&mut servers).await;
        assert!(server.recv().await.unwrap().is_close());
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(connector.attempts().len(), 1);
    }
}
