//! # MQTT Link
//!
//! Messaging collaborator for the event relay. The session owns the rumqttc
//! event loop and forwards the few notifications the core cares about over
//! a channel, so nothing in the broker's callback context ever touches the
//! core's locking discipline.
//!
//! ```text
//! link/
//! ├── session.rs - rumqttc session lifecycle and event pump
//! └── bridge.rs  - consumes LinkEvents, writes the status store
//! ```
//!
//! Publishing is fire-and-forget: before a session exists, publishes are
//! silently dropped; nothing is queued and no error reaches the user.

pub mod bridge;
pub mod session;

use std::sync::{Arc, OnceLock};

use rumqttc::{AsyncClient, QoS};
use tracing::{debug, warn};

use crate::status::StatusStore;

/// Notifications crossing from the session's context into the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// Broker accepted the session.
    SessionEstablished,
    /// A message arrived on a subscribed topic.
    Inbound { topic: String, payload: String },
}

/// Cheap cloneable handle for publishing and subscribing.
///
/// Created before the session exists; [`session::LinkSession::start`]
/// attaches the real client once the supervisor brings the network up.
#[derive(Clone, Debug)]
pub struct LinkClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    client: OnceLock<AsyncClient>,
    topic: String,
    store: StatusStore,
}

impl LinkClient {
    pub fn new(topic: String, store: StatusStore) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                client: OnceLock::new(),
                topic,
                store,
            }),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.inner.client.get().is_some()
    }

    pub fn topic(&self) -> &str {
        &self.inner.topic
    }

    pub(crate) fn attach(&self, client: AsyncClient) {
        if self.inner.client.set(client).is_err() {
            warn!("link client already attached, ignoring second session");
        }
    }

    /// Publishes a short event string to the device topic. No-ops silently
    /// when no session exists; marks the transmit pulse on success.
    pub fn publish_event(&self, payload: &str) {
        let Some(client) = self.inner.client.get() else {
            debug!(payload, "no session yet, dropping publish");
            return;
        };
        match client.try_publish(self.inner.topic.as_str(), QoS::AtLeastOnce, false, payload) {
            Ok(()) => self.inner.store.mark_transmit(),
            Err(e) => warn!(error = %e, "publish failed"),
        }
    }

    /// Subscribes to the device's inbound topic.
    pub(crate) fn subscribe_inbound(&self) {
        let Some(client) = self.inner.client.get() else {
            debug!("no session yet, skipping subscribe");
            return;
        };
        if let Err(e) = client.try_subscribe(self.inner.topic.as_str(), QoS::AtMostOnce) {
            warn!(error = %e, "subscribe failed");
        }
    }
}
