//! In-memory transport for exercising the socket clients without a network.

use futures_util::future::{self, BoxFuture};
use futures_util::{sink, stream, FutureExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;

use super::transport::{Connector, Transport};
use crate::error::{Error, Result};

/// Server end of one mock connection; dropping it closes the connection
pub(crate) struct MockServer {
    received: mpsc::UnboundedReceiver<Message>,
    outgoing: mpsc::UnboundedSender<Result<Message>>,
}

impl MockServer {
    pub fn send_text(&self, text: &str) {
        let _ = self.outgoing.send(Ok(Message::Text(text.to_string())));
    }

    pub fn send_error(&self, err: Error) {
        let _ = self.outgoing.send(Err(err));
    }

    /// Next frame sent by the client, `None` once the client dropped the connection
    pub async fn recv(&mut self) -> Option<Message> {
        self.received.recv().await
    }

    /// Next text frame sent by the client
    pub async fn recv_text(&mut self) -> Option<String> {
        loop {
            if let Message::Text(text) = self.received.recv().await? {
                return Some(text);
            }
        }
    }

    /// Text frames already sent by the client, without waiting
    pub fn drain_texts(&mut self) -> Vec<String> {
        let mut texts = Vec::new();
        while let Ok(message) = self.received.try_recv() {
            if let Message::Text(text) = message {
                texts.push(text);
            }
        }
        texts
    }
}

pub(crate) struct MockConnector {
    failures: AtomicUsize,
    attempts: Mutex<Vec<Instant>>,
    servers: mpsc::UnboundedSender<MockServer>,
}

impl MockConnector {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<MockServer>) {
        let (servers_tx, servers_rx) = mpsc::unbounded_channel();
        let connector = Self {
            failures: AtomicUsize::new(0),
            attempts: Mutex::new(Vec::new()),
            servers: servers_tx,
        };
        (Arc::new(connector), servers_rx)
    }

    /// Refuse the next `count` connection attempts
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Time of every connection attempt so far
    pub fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().unwrap().clone()
    }
}

impl Connector for MockConnector {
    fn connect(&self) -> BoxFuture<'static, Result<Transport>> {
        self.attempts.lock().unwrap().push(Instant::now());

        let refused = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if refused {
            return future::ready(Err(Error::WebSocket("connection refused".to_string()))).boxed();
        }

        let (client_tx, server_rx) = mpsc::unbounded_channel::<Message>();
        let (server_tx, client_rx) = mpsc::unbounded_channel::<Result<Message>>();
        let _ = self.servers.send(MockServer {
            received: server_rx,
            outgoing: server_tx,
        });

        let sink = sink::unfold(client_tx, |tx, message: Message| async move {
            tx.send(message).map_err(|_| Error::ConnectionClosed)?;
            Ok::<_, Error>(tx)
        });
        let stream = stream::unfold(client_rx, |mut rx| async move {
            rx.recv().await.map(|message| (message, rx))
        });

        future::ready(Ok(Transport {
            sink: Box::pin(sink),
            stream: Box::pin(stream),
        }))
        .boxed()
    }
}
