//! Message bridge: the only writer that turns link events into status
//! store updates and LED pulses.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{LinkClient, LinkEvent};
use crate::status::StatusStore;

/// Spawns the bridge task. Exits quietly when the event channel closes.
pub fn spawn(
    mut events: mpsc::Receiver<LinkEvent>,
    link: LinkClient,
    store: StatusStore,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                LinkEvent::SessionEstablished => {
                    info!(topic = link.topic(), "session established, subscribing");
                    link.subscribe_inbound();
                    store.mark_transmit();
                }
                LinkEvent::Inbound { topic, payload } => {
                    debug!(topic = %topic, "inbound message");
                    store.set_status_line(&format!("data: {payload}"));
                    store.trigger_message_pulse();
                }
            }
        }
        debug!("link event channel closed, bridge exiting");
    })
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::status::{ConnectionState, MessageLamp, STATUS_LINE_CAPACITY};

    fn setup() -> (mpsc::Sender<LinkEvent>, JoinHandle<()>, StatusStore) {
        let store = StatusStore::new();
        let link = LinkClient::new("/esp32/coffee".into(), store.clone());
        let (tx, rx) = mpsc::channel(8);
        let handle = spawn(rx, link, store.clone());
        (tx, handle, store)
    }

    #[tokio::test]
    async fn inbound_message_sets_line_and_starts_pulse() {
        let (tx, handle, store) = setup();

        tx.send(LinkEvent::Inbound {
            topic: "/esp32/coffee".into(),
            payload: "hi".into(),
        })
        .await
        .unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(store.status_line(), "data: hi");
        assert_eq!(store.advance_pulse(), MessageLamp::Lit);
    }

    #[tokio::test]
    async fn oversized_payload_is_truncated_not_fatal() {
        let (tx, handle, store) = setup();

        tx.send(LinkEvent::Inbound {
            topic: "t".into(),
            payload: "y".repeat(500),
        })
        .await
        .unwrap();
        drop(tx);
        handle.await.unwrap();

        let line = store.status_line();
        assert!(line.starts_with("data: y"));
        assert!(line.len() <= STATUS_LINE_CAPACITY - 1);
    }

    #[tokio::test]
    async fn session_established_marks_transmit_feedback() {
        let (tx, handle, store) = setup();

        tx.send(LinkEvent::SessionEstablished).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        assert!(store.take_transmit());
        // The session event must not touch the connection state; that is
        // the supervisor's job.
        assert_eq!(store.connection(), ConnectionState::Disconnected);
    }
}
