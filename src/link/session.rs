//! Session lifecycle: one rumqttc client plus the task pumping its event
//! loop into [`LinkEvent`]s.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, Incoming, MqttOptions};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{LinkClient, LinkEvent};
use crate::settings::DeviceSettings;

const CLIENT_ID: &str = "event-notifier";
const KEEP_ALIVE: Duration = Duration::from_secs(5);
const RECONNECT_BACKOFF: Duration = Duration::from_secs(5);

pub struct LinkSession;

impl LinkSession {
    /// Starts the MQTT session and its event pump. Called once, after the
    /// supervisor reports the network up. The broker connection itself is
    /// established asynchronously by the event loop; the ConnAck surfaces
    /// as [`LinkEvent::SessionEstablished`].
    pub fn start(
        settings: &DeviceSettings,
        handle: LinkClient,
        events: mpsc::Sender<LinkEvent>,
    ) -> JoinHandle<()> {
        let (host, port) = settings.broker_host_port();
        info!(host = %host, port, "starting mqtt session");

        let mut options = MqttOptions::new(CLIENT_ID, host, port);
        options.set_keep_alive(KEEP_ALIVE);

        let (client, mut event_loop) = AsyncClient::new(options, 100);
        handle.attach(client);

        tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                        if events.send(LinkEvent::SessionEstablished).await.is_err() {
                            break;
                        }
                    }
                    Ok(Event::Incoming(Incoming::Publish(publish))) => {
                        let payload = String::from_utf8_lossy(&publish.payload).to_string();
                        let event = LinkEvent::Inbound {
                            topic: publish.topic.clone(),
                            payload,
                        };
                        if events.send(event).await.is_err() {
                            break;
                        }
                    }
                    Ok(other) => debug!(?other, "ignoring mqtt event"),
                    Err(e) => {
                        warn!(error = %e, "mqtt connection error, backing off");
                        tokio::time::sleep(RECONNECT_BACKOFF).await;
                    }
                }
            }
            debug!("link event channel closed, session pump exiting");
        })
    }
}
