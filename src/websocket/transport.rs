use futures_util::future::BoxFuture;
use futures_util::{FutureExt, Sink, SinkExt, Stream, StreamExt, TryStreamExt};
use std::pin::Pin;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::Message;

use crate::error::{Error, Result};

/// Outgoing half of a connection
pub type FrameSink = Pin<Box<dyn Sink<Message, Error = Error> + Send>>;

/// Incoming half of a connection
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Message>> + Send>>;

/// One established connection
pub struct Transport {
    pub sink: FrameSink,
    pub stream: FrameStream,
}

/// Opens transports for an event socket
///
/// The default is [`WsConnector`]; a custom connector can route the socket
/// through a proxy or an in-memory transport.
pub trait Connector: Send + Sync + 'static {
    fn connect(&self) -> BoxFuture<'static, Result<Transport>>;
}

/// WebSocket connector backed by tokio-tungstenite
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
    headers: Vec<(String, String)>,
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Add a header to the upgrade request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl Connector for WsConnector {
    fn connect(&self) -> BoxFuture<'static, Result<Transport>> {
        let url = self.url.clone();
        let headers = self.headers.clone();

        async move {
            let mut request = url.as_str().into_client_request()?;
            for (name, value) in headers {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| Error::Config(format!("invalid header name: {}", e)))?;
                let value = HeaderValue::from_str(&value)
                    .map_err(|e| Error::Config(format!("invalid header value: {}", e)))?;
                request.headers_mut().insert(name, value);
            }

            let (ws_stream, _) = connect_async(request).await?;
            let (write, read) = ws_stream.split();

            Ok(Transport {
                sink: Box::pin(write.sink_map_err(Error::from)),
                stream: Box::pin(read.map_err(Error::from)),
            })
        }
        .boxed()
    }
}
