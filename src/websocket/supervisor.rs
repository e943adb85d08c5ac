//! Connection lifecycle shared by the event sockets.
//!
//! Each socket client owns one background task running a [`Supervisor`]. The
//! task exclusively owns the transport, the keep-alive timer, the liveness
//! deadline, the retry timer and the retry counter. The public handle talks to
//! it through a command channel and observes it through a `watch` of the
//! [`ConnectionState`].
//!
//! The retry counter only resets once a session is confirmed: by the server's
//! acknowledgment for protocols that wait for one, otherwise by the first
//! well-formed frame after the handshake.

use futures_util::future::{self, BoxFuture};
use futures_util::{FutureExt, SinkExt, StreamExt};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior, Sleep};
use tokio_tungstenite::tungstenite::Message;

use super::listeners::Notifier;
use super::state::{ConnectionState, RetrySchedule};
use super::stream::{event_stream, EventStream};
use super::transport::{Connector, Transport};
use crate::config::SocketConfig;
use crate::error::{Error, Result};
use crate::types::{EventKind, Notification};

/// Upper bound on a graceful close handshake
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// What an inbound text frame means to the channel
#[derive(Debug)]
pub(crate) enum Inbound<K> {
    /// Deliver to the application
    Notify(Notification<K>),
    /// Protocol-level answer to send back
    Reply(Vec<String>),
    /// The server accepted the session; frames to send once it is open
    Ready(Vec<String>),
    /// The server refused the session; delivered, then the connection is retried
    Reject(Notification<K>),
    /// The server ended the session
    Close,
    /// Keep-alive acknowledgment or unknown kind
    Ignore,
}

/// Channel-specific behavior plugged into the supervisor
pub(crate) trait Protocol: Send + 'static {
    type Kind: EventKind;

    /// Name used in log lines
    const NAME: &'static str;

    /// Stay `Connecting` after the transport opens until [`Inbound::Ready`]
    const AWAITS_ACK: bool = false;

    /// Frames to send right after the transport opens.
    /// `None` means the connection must not be used and is closed.
    fn handshake(&mut self) -> Option<Vec<String>>;

    /// Client keep-alive ping, if the channel uses one
    fn keepalive_frame(&self) -> Option<String>;

    /// Whether the identity needed to reconnect is present
    fn can_reconnect(&self) -> bool;

    /// Longest silence tolerated from the server, once known
    fn liveness_timeout(&self) -> Option<Duration> {
        None
    }

    /// Classify one inbound text frame
    fn decode(&mut self, text: &str) -> Result<Inbound<Self::Kind>>;
}

#[derive(Debug)]
pub(crate) enum Command {
    Connect,
    Disconnect,
}

pub(crate) struct Supervisor<P: Protocol> {
    protocol: P,
    connector: Arc<dyn Connector>,
    keepalive_interval: Option<Duration>,
    notifier: Arc<Notifier<P::Kind>>,
    state: watch::Sender<ConnectionState>,
    commands: mpsc::UnboundedReceiver<Command>,
    retry: RetrySchedule,
    reconnect_allowed: bool,
    connecting: Option<BoxFuture<'static, Result<Transport>>>,
    transport: Option<Transport>,
    keepalive: Option<Interval>,
    liveness: Option<Pin<Box<Sleep>>>,
    retry_timer: Option<Pin<Box<Sleep>>>,
    confirmed: bool,
}

impl<P: Protocol> Supervisor<P> {
    pub async fn run(mut self) {
        log::debug!("{} supervisor started", P::NAME);

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Connect) => self.connect(),
                    Some(Command::Disconnect) => self.disconnect().await,
                    None => {
                        log::debug!("{} client dropped, stopping supervisor", P::NAME);
                        self.disconnect().await;
                        break;
                    }
                },
                result = wait_connecting(&mut self.connecting) => {
                    self.connecting = None;
                    match result {
                        Ok(transport) => self.on_open(transport).await,
                        Err(err) => {
                            self.on_error(&err);
                            self.on_close();
                        }
                    }
                }
                frame = next_frame(&mut self.transport) => self.on_frame(frame).await,
                _ = tick(&mut self.keepalive) => self.send_keepalive().await,
                _ = fire(&mut self.liveness) => {
                    self.liveness = None;
                    self.on_silence().await;
                }
                _ = fire(&mut self.retry_timer) => {
                    self.retry_timer = None;
                    self.on_retry();
                }
            }
        }
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            log::debug!("{} state {:?} -> {:?}", P::NAME, previous, state);
        }
    }

    fn connect(&mut self) {
        self.reconnect_allowed = true;
        self.retry_timer = None;
        self.keepalive = None;
        self.liveness = None;
        if self.transport.take().is_some() {
            log::debug!("{} terminating current connection", P::NAME);
        }
        self.connecting = None;
        self.start_connecting();
    }

    fn start_connecting(&mut self) {
        log::info!(
            "{} connecting (attempt {})",
            P::NAME,
            self.retry.tries() + 1
        );
        self.set_state(ConnectionState::Connecting);
        self.connecting = Some(self.connector.connect());
    }

    async fn on_open(&mut self, transport: Transport) {
        self.keepalive = None;
        self.confirmed = false;
        self.transport = Some(transport);
        if !P::AWAITS_ACK {
            self.set_state(ConnectionState::Open);
        }

        match self.protocol.handshake() {
            Some(frames) => {
                for frame in frames {
                    self.send_text(frame).await;
                }
                self.keepalive = self.new_keepalive();
                self.arm_liveness();
                log::info!("{} transport open", P::NAME);
            }
            None => {
                log::warn!("{} has no identity to authenticate with, closing", P::NAME);
                self.close_transport().await;
                self.on_close();
            }
        }
    }

    /// The server accepted the session
    fn confirm(&mut self) {
        if self.confirmed {
            return;
        }
        self.confirmed = true;
        self.retry.reset();
        self.set_state(ConnectionState::Open);
        log::info!("{} session confirmed", P::NAME);
    }

    /// Restart the silence deadline from now
    fn arm_liveness(&mut self) {
        let Some(timeout) = self.protocol.liveness_timeout() else {
            self.liveness = None;
            return;
        };
        let deadline = Instant::now() + timeout;
        match self.liveness.as_mut() {
            Some(sleep) => sleep.as_mut().reset(deadline),
            None => self.liveness = Some(Box::pin(tokio::time::sleep_until(deadline))),
        }
    }

    async fn on_silence(&mut self) {
        let timeout = self.protocol.liveness_timeout().unwrap_or_default();
        let err = Error::WebSocket(format!("no traffic from server within {:?}", timeout));
        self.on_error(&err);
        self.close_transport().await;
        self.on_close();
    }

    fn new_keepalive(&self) -> Option<Interval> {
        let period = self.keepalive_interval?;
        self.protocol.keepalive_frame()?;
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Some(interval)
    }

    async fn send_keepalive(&mut self) {
        if *self.state.borrow() != ConnectionState::Open {
            return;
        }
        if let Some(frame) = self.protocol.keepalive_frame() {
            self.send_text(frame).await;
        }
    }

    async fn send_text(&mut self, text: String) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        log::trace!("{} -> {}", P::NAME, text);
        if let Err(err) = transport.sink.send(Message::Text(text)).await {
            log::warn!("{} failed to send frame: {}", P::NAME, err);
        }
    }

    async fn on_frame(&mut self, frame: Option<Result<Message>>) {
        let alive = matches!(frame, Some(Ok(ref message)) if !message.is_close());
        match frame {
            Some(Ok(Message::Text(text))) => self.on_text(&text).await,
            Some(Ok(Message::Close(close_frame))) => {
                match close_frame {
                    Some(frame) => log::info!(
                        "{} closed by server: code={}, reason={}",
                        P::NAME,
                        frame.code,
                        frame.reason
                    ),
                    None => log::info!("{} closed by server", P::NAME),
                }
                self.on_close();
            }
            // Control frames are answered by tungstenite itself
            Some(Ok(_)) => {}
            Some(Err(err)) => {
                self.on_error(&err);
                self.on_close();
            }
            None => {
                log::info!("{} connection ended", P::NAME);
                self.on_close();
            }
        }
        if alive && self.transport.is_some() {
            self.arm_liveness();
        }
    }

    async fn on_text(&mut self, text: &str) {
        log::trace!("{} <- {}", P::NAME, text);
        let inbound = match self.protocol.decode(text) {
            Ok(inbound) => inbound,
            Err(err) => {
                let preview: String = text.chars().take(200).collect();
                log::warn!("{} dropped malformed frame ({}): {}", P::NAME, err, preview);
                return;
            }
        };
        if !P::AWAITS_ACK && !matches!(inbound, Inbound::Close | Inbound::Reject(_)) {
            self.confirm();
        }

        match inbound {
            Inbound::Notify(notification) => self.notifier.notify(notification),
            Inbound::Reply(frames) => {
                for frame in frames {
                    self.send_text(frame).await;
                }
            }
            Inbound::Ready(frames) => {
                self.confirm();
                for frame in frames {
                    self.send_text(frame).await;
                }
            }
            Inbound::Reject(notification) => {
                log::warn!("{} session rejected by server", P::NAME);
                self.notifier.notify(notification);
                self.close_transport().await;
                self.on_close();
            }
            Inbound::Close => {
                log::info!("{} session ended by server", P::NAME);
                self.close_transport().await;
                self.on_close();
            }
            Inbound::Ignore => {}
        }
    }

    fn on_error(&self, err: &Error) {
        log::warn!("{} transport error: {}", P::NAME, err);
        self.notifier.notify(Notification::error(err.to_string()));
    }

    fn on_close(&mut self) {
        self.transport = None;
        self.keepalive = None;
        self.liveness = None;
        self.set_state(ConnectionState::Closed);

        let delay = self.retry.next_delay();

        if !self.reconnect_allowed || !self.protocol.can_reconnect() {
            log::debug!("{} closed, not reconnecting", P::NAME);
            return;
        }

        if self.retry.exhausted() {
            let err = Error::ReconnectFailed {
                attempts: self.retry.tries(),
            };
            log::warn!("{} {}", P::NAME, err);
            self.reconnect_allowed = false;
            self.notifier.notify(Notification::error(err.to_string()));
            return;
        }

        log::info!("{} closed, reconnecting in {:?}", P::NAME, delay);
        self.retry_timer = Some(Box::pin(tokio::time::sleep(delay)));
    }

    fn on_retry(&mut self) {
        if self.reconnect_allowed && self.transport.is_none() && self.connecting.is_none() {
            self.start_connecting();
        }
    }

    async fn close_transport(&mut self) {
        let Some(mut transport) = self.transport.take() else {
            return;
        };
        self.set_state(ConnectionState::Closing);
        let graceful = async {
            transport.sink.send(Message::Close(None)).await?;
            transport.sink.close().await?;
            Ok::<(), Error>(())
        };
        match tokio::time::timeout(CLOSE_TIMEOUT, graceful).await {
            Ok(Ok(())) => log::debug!("{} closed gracefully", P::NAME),
            Ok(Err(err)) => log::debug!("{} close handshake failed: {}", P::NAME, err),
            Err(_) => log::debug!("{} close handshake timed out", P::NAME),
        }
    }

    async fn disconnect(&mut self) {
        self.reconnect_allowed = false;
        self.keepalive = None;
        self.liveness = None;
        self.retry_timer = None;
        if self.connecting.take().is_some() {
            log::debug!("{} connection attempt aborted", P::NAME);
        }
        self.close_transport().await;
        self.set_state(ConnectionState::Closed);
    }
}

async fn wait_connecting(
    connecting: &mut Option<BoxFuture<'static, Result<Transport>>>,
) -> Result<Transport> {
    match connecting {
        Some(attempt) => attempt.await,
        None => future::pending().await,
    }
}

async fn next_frame(transport: &mut Option<Transport>) -> Option<Result<Message>> {
    match transport {
        Some(transport) => transport.stream.next().await,
        None => future::pending().await,
    }
}

async fn tick(keepalive: &mut Option<Interval>) {
    match keepalive {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending().await,
    }
}

async fn fire(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => future::pending().await,
    }
}

/// Public-facing half shared by the socket clients
pub(crate) struct SocketHandle<K> {
    commands: mpsc::UnboundedSender<Command>,
    pending: Mutex<Option<BoxFuture<'static, ()>>>,
    notifier: Arc<Notifier<K>>,
    state: watch::Receiver<ConnectionState>,
}

impl<K: EventKind> SocketHandle<K> {
    pub fn new<P>(protocol: P, connector: Arc<dyn Connector>, config: &SocketConfig) -> Self
    where
        P: Protocol<Kind = K>,
    {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Closed);
        let notifier = Arc::new(Notifier::new());

        let supervisor = Supervisor {
            protocol,
            connector,
            keepalive_interval: config.keepalive_interval,
            notifier: Arc::clone(&notifier),
            state: state_tx,
            commands: commands_rx,
            retry: RetrySchedule::new(&config.retry),
            reconnect_allowed: false,
            connecting: None,
            transport: None,
            keepalive: None,
            liveness: None,
            retry_timer: None,
            confirmed: false,
        };

        Self {
            commands: commands_tx,
            pending: Mutex::new(Some(supervisor.run().boxed())),
            notifier,
            state: state_rx,
        }
    }

    pub fn connect(&self) -> Result<()> {
        self.start()?;
        self.commands
            .send(Command::Connect)
            .map_err(|_| Error::ConnectionClosed)
    }

    pub fn disconnect(&self) {
        // Before the first connect this is queued and is a no-op once processed.
        let _ = self.commands.send(Command::Disconnect);
    }

    /// Spawn the supervisor on first use
    fn start(&self) -> Result<()> {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if pending.is_none() {
            return Ok(());
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            Error::Config("event sockets must be connected within a Tokio runtime".to_string())
        })?;
        if let Some(task) = pending.take() {
            runtime.spawn(task);
        }
        Ok(())
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub fn on<F>(&self, kind: K, listener: F)
    where
        F: Fn(&serde_json::Value) + Send + Sync + 'static,
    {
        self.notifier.register(kind, listener);
    }

    pub fn events(&self) -> EventStream<K> {
        event_stream(self.notifier.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::types::TradeEventKind;
    use crate::websocket::testing::MockConnector;
    use serde_json::json;

    /// Minimal protocol: every frame is a `send-trade` notification, "bye" ends the session
    struct EchoProtocol {
        identity: bool,
    }

    impl Protocol for EchoProtocol {
        type Kind = TradeEventKind;
        const NAME: &'static str = "EchoSocket";

        fn handshake(&mut self) -> Option<Vec<String>> {
            self.identity.then(|| vec!["hello".to_string()])
        }

        fn keepalive_frame(&self) -> Option<String> {
            Some("ping".to_string())
        }

        fn can_reconnect(&self) -> bool {
            self.identity
        }

        fn decode(&mut self, text: &str) -> Result<Inbound<TradeEventKind>> {
            match text {
                "bye" => Ok(Inbound::Close),
                "marco" => Ok(Inbound::Reply(vec!["polo".to_string()])),
                _ => Ok(Inbound::Notify(Notification::new(
                    TradeEventKind::SendTrade,
                    serde_json::from_str(text)?,
                ))),
            }
        }
    }

    fn config() -> SocketConfig {
        SocketConfig::trade()
            .with_url("ws://mock")
            .with_keepalive_interval(Some(Duration::from_secs(10)))
    }

    async fn wait_for(handle: &SocketHandle<TradeEventKind>, state: ConnectionState) {
        let mut rx = handle.watch_state();
        rx.wait_for(|s| *s == state).await.unwrap();
    }

    #[test]
    fn test_connect_outside_runtime() {
        let (connector, _servers) = MockConnector::new();
        let handle = SocketHandle::new(EchoProtocol { identity: true }, connector, &config());
        assert!(matches!(handle.connect(), Err(Error::Config(_))));
        assert_eq!(handle.state(), ConnectionState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handshake_and_reply() {
        let (connector, mut servers) = MockConnector::new();
        let handle = SocketHandle::new(EchoProtocol { identity: true }, connector, &config());
        handle.connect().unwrap();

        let mut server = servers.recv().await.unwrap();
        assert_eq!(server.recv_text().await.unwrap(), "hello");
        wait_for(&handle, ConnectionState::Open).await;

        server.send_text("marco");
        assert_eq!(server.recv_text().await.unwrap(), "polo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_identity_closes_without_retry() {
        let (connector, mut servers) = MockConnector::new();
        let handle = SocketHandle::new(
            EchoProtocol { identity: false },
            Arc::clone(&connector) as Arc<dyn Connector>,
            &config(),
        );
        handle.connect().unwrap();

        let mut server = servers.recv().await.unwrap();
        assert!(matches!(server.recv().await, Some(Message::Close(None))));
        wait_for(&handle, ConnectionState::Closed).await;

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(connector.attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_close_packet_reconnects() {
        let (connector, mut servers) = MockConnector::new();
        let handle = SocketHandle::new(EchoProtocol { identity: true }, connector, &config());
        handle.connect().unwrap();

        let server = servers.recv().await.unwrap();
        wait_for(&handle, ConnectionState::Open).await;
        server.send_text("bye");

        let mut second = servers.recv().await.unwrap();
        assert_eq!(second.recv_text().await.unwrap(), "hello");
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_limit_stops_retrying() {
        let (connector, _servers) = MockConnector::new();
        connector.fail_next(usize::MAX);
        let config = config().with_retry(RetryConfig {
            max_attempts: Some(3),
            ..RetryConfig::default()
        });
        let handle = SocketHandle::new(
            EchoProtocol { identity: true },
            Arc::clone(&connector) as Arc<dyn Connector>,
            &config,
        );
        let mut events = handle.events();
        handle.connect().unwrap();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(connector.attempts().len(), 3);

        let mut last = None;
        while let Some(Some(event)) = events.next().now_or_never() {
            last = Some(event);
        }
        let last = last.unwrap();
        assert_eq!(last.kind, TradeEventKind::Error);
        assert_eq!(last.data, json!("Reconnection failed after 3 attempts"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_while_open_replaces_transport() {
        let (connector, mut servers) = MockConnector::new();
        let handle = SocketHandle::new(EchoProtocol { identity: true }, connector, &config());
        handle.connect().unwrap();

        let mut first = servers.recv().await.unwrap();
        wait_for(&handle, ConnectionState::Open).await;

        handle.connect().unwrap();
        let mut second = servers.recv().await.unwrap();
        assert_eq!(second.recv_text().await.unwrap(), "hello");

        // the old transport was dropped without further traffic
        assert_eq!(first.recv_text().await.as_deref(), Some("hello"));
        assert!(first.recv_text().await.is_none());
    }
}
