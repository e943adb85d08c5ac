use futures_util::{stream, Stream};
use std::pin::Pin;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::types::{EventKind, Notification};

/// Stream of notifications from one event socket
///
/// The stream outlives reconnects; it ends only when the client is dropped.
/// A consumer that falls too far behind skips the oldest notifications.
pub type EventStream<K> = Pin<Box<dyn Stream<Item = Notification<K>> + Send>>;

pub(crate) fn event_stream<K: EventKind>(
    receiver: broadcast::Receiver<Notification<K>>,
) -> EventStream<K> {
    Box::pin(stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(notification) => return Some((notification, receiver)),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Event stream lagged, {} notification(s) skipped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SiteEventKind;
    use futures_util::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_stream_ends_when_sender_dropped() {
        let (tx, rx) = broadcast::channel(4);
        let mut events = event_stream::<SiteEventKind>(rx);

        tx.send(Notification::new(SiteEventKind::New, json!({"item_id": 1})))
            .unwrap();
        drop(tx);

        let first = events.next().await.unwrap();
        assert_eq!(first.kind, SiteEventKind::New);
        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_skips_lagged() {
        let (tx, rx) = broadcast::channel(2);
        let mut events = event_stream::<SiteEventKind>(rx);

        for i in 0..4 {
            tx.send(Notification::new(SiteEventKind::Update, json!(i)))
                .unwrap();
        }

        let next = events.next().await.unwrap();
        assert_eq!(next.data, json!(2));
    }
}
