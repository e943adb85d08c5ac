//! Minimal Engine.IO v4 / Socket.IO v5 text packet codec.
//!
//! Only the default namespace and text frames are supported, which is all the
//! site socket uses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::{Error, Result};

/// Namespace connect request, also the server's connect acknowledgment prefix
pub(crate) const CONNECT: &str = "40";
/// Engine.IO pong
pub(crate) const PONG: &str = "3";

/// Body of the Engine.IO open packet
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct EngineOpen {
    #[serde(default)]
    pub sid: String,
    /// Milliseconds between server pings
    #[serde(rename = "pingInterval", default)]
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong
    #[serde(rename = "pingTimeout", default)]
    pub ping_timeout: u64,
}

impl EngineOpen {
    /// How long the connection may stay silent before it is considered dead
    pub fn liveness_timeout(&self) -> Option<Duration> {
        let total = self.ping_interval.saturating_add(self.ping_timeout);
        (total > 0).then(|| Duration::from_millis(total))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Packet {
    /// Engine.IO handshake, `0{"sid":...,"pingInterval":...}`
    Open(EngineOpen),
    /// Engine.IO close, `1`
    Close,
    /// Engine.IO ping, `2`
    Ping,
    /// Engine.IO pong, `3`
    Pong,
    /// Engine.IO noop, `6`
    Noop,
    /// Socket.IO namespace connected, `40{...}`
    Connect(Option<Value>),
    /// Socket.IO namespace disconnected, `41`
    Disconnect,
    /// Socket.IO event, `42[name, data]` with an optional ack id
    Event { name: String, data: Value },
    /// Socket.IO connect error, `44{...}`
    ConnectError(Value),
}

impl Packet {
    pub fn parse(text: &str) -> Result<Self> {
        let mut chars = text.chars();
        let engine = chars
            .next()
            .ok_or_else(|| Error::InvalidParameter("empty socket.io packet".to_string()))?;
        let rest = chars.as_str();

        match engine {
            '0' => Ok(Packet::Open(serde_json::from_str(rest)?)),
            '1' => Ok(Packet::Close),
            '2' => Ok(Packet::Ping),
            '3' => Ok(Packet::Pong),
            '6' => Ok(Packet::Noop),
            '4' => parse_message(rest),
            other => Err(Error::InvalidParameter(format!(
                "unknown engine.io packet type '{}'",
                other
            ))),
        }
    }
}

fn parse_message(text: &str) -> Result<Packet> {
    let mut chars = text.chars();
    let kind = chars
        .next()
        .ok_or_else(|| Error::InvalidParameter("empty socket.io message".to_string()))?;
    let body = chars.as_str();

    match kind {
        '0' => {
            if body.is_empty() {
                Ok(Packet::Connect(None))
            } else {
                Ok(Packet::Connect(Some(serde_json::from_str(body)?)))
            }
        }
        '1' => Ok(Packet::Disconnect),
        '2' => {
            let body = body.trim_start_matches(|c: char| c.is_ascii_digit());
            let mut args: Vec<Value> = serde_json::from_str(body)?;
            if args.is_empty() {
                return Err(Error::InvalidParameter(
                    "socket.io event without a name".to_string(),
                ));
            }
            let data = if args.len() > 1 {
                args.swap_remove(1)
            } else {
                Value::Null
            };
            match args.swap_remove(0) {
                Value::String(name) => Ok(Packet::Event { name, data }),
                other => Err(Error::InvalidParameter(format!(
                    "socket.io event name must be a string, got {}",
                    other
                ))),
            }
        }
        '4' => Ok(Packet::ConnectError(serde_json::from_str(body)?)),
        other => Err(Error::InvalidParameter(format!(
            "unsupported socket.io packet type '{}'",
            other
        ))),
    }
}

/// Encode an event packet, `42["name",data]`
pub(crate) fn event<T: Serialize + ?Sized>(name: &str, data: &T) -> Result<String> {
    let args = (name, data);
    Ok(format!("42{}", serde_json::to_string(&args)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_engine_packets() {
        assert_eq!(
            Packet::parse(r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#)
                .unwrap(),
            Packet::Open(EngineOpen {
                sid: "abc".to_string(),
                ping_interval: 25000,
                ping_timeout: 20000,
            })
        );
        assert_eq!(Packet::parse("1").unwrap(), Packet::Close);
        assert_eq!(Packet::parse("2").unwrap(), Packet::Ping);
        assert_eq!(Packet::parse("3").unwrap(), Packet::Pong);
        assert_eq!(Packet::parse("6").unwrap(), Packet::Noop);
    }

    #[test]
    fn test_open_liveness_timeout() {
        let open = EngineOpen {
            sid: "abc".to_string(),
            ping_interval: 25000,
            ping_timeout: 20000,
        };
        assert_eq!(open.liveness_timeout(), Some(Duration::from_secs(45)));

        let Packet::Open(bare) = Packet::parse(r#"0{"sid":"abc"}"#).unwrap() else {
            panic!("expected open packet");
        };
        assert_eq!(bare.liveness_timeout(), None);
    }

    #[test]
    fn test_parse_socket_packets() {
        assert_eq!(Packet::parse("40").unwrap(), Packet::Connect(None));
        assert_eq!(
            Packet::parse(r#"40{"sid":"xyz"}"#).unwrap(),
            Packet::Connect(Some(json!({"sid": "xyz"})))
        );
        assert_eq!(Packet::parse("41").unwrap(), Packet::Disconnect);
        assert_eq!(
            Packet::parse(r#"44{"message":"Not authorized"}"#).unwrap(),
            Packet::ConnectError(json!({"message": "Not authorized"}))
        );
    }

    #[test]
    fn test_parse_event() {
        assert_eq!(
            Packet::parse(r#"42["new",{"item_id":1,"price":1500}]"#).unwrap(),
            Packet::Event {
                name: "new".to_string(),
                data: json!({"item_id": 1, "price": 1500}),
            }
        );
        // ack id before the payload
        assert_eq!(
            Packet::parse(r#"4217["removed",{"item_id":2}]"#).unwrap(),
            Packet::Event {
                name: "removed".to_string(),
                data: json!({"item_id": 2}),
            }
        );
        assert_eq!(
            Packet::parse(r#"42["handshake"]"#).unwrap(),
            Packet::Event {
                name: "handshake".to_string(),
                data: Value::Null,
            }
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Packet::parse("").is_err());
        assert!(Packet::parse("9").is_err());
        assert!(Packet::parse("4").is_err());
        assert!(Packet::parse("45[]").is_err());
        assert!(Packet::parse("42[]").is_err());
        assert!(Packet::parse("42[1,2]").is_err());
        assert!(Packet::parse("42{not json").is_err());
    }

    #[test]
    fn test_encode_event() {
        let frame = event("subscribe", &json!({"name": "csgo"})).unwrap();
        assert_eq!(frame, r#"42["subscribe",{"name":"csgo"}]"#);
    }
}
