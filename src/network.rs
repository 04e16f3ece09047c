//! Network supervisor
//!
//! Sequences radio bring-up, WiFi association and the one-time MQTT session
//! start. Each attempt runs to completion on the blocking pool (the radio
//! driver calls block); the monitor re-spawns it while the link is down,
//! gated by an in-flight flag so attempts are never re-entrant. While the
//! link is up the monitor keeps polling the radio and drops back to a fresh
//! attempt once the association is gone.
//!
//! A radio that never becomes ready is permanent for the session: the
//! monitor records a diagnostic line and stops retrying, leaving the device
//! in a UI-only degraded state. Association failures are transient and
//! retried after a bounded delay.

use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use statum::{machine, state};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::platform::wifi::{NetworkCredentials, RadioError, WifiRadio};
use crate::status::{ConnectionState, StatusStore};

/// Delay between supervisor re-checks and between failed attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Status line recorded when the radio hardware never becomes ready.
pub const RADIO_DIAGNOSTIC: &str = "WiFi radio not responding";

// Phases: Idle (radio unpowered) -> Associating (walking the candidate
// list) -> Online (associated, address assigned).
#[state]
#[derive(Debug, Clone)]
pub enum AttemptPhase {
    Idle,
    Associating,
    Online,
}

/// One connection attempt as a typestate machine. Phase transitions are the
/// only way forward; an association failure hands the machine back in
/// [`Idle`] so the radio can be reused by the next attempt.
#[machine]
pub struct LinkAttempt<S: AttemptPhase> {
    radio: Box<dyn WifiRadio>,
    networks: Vec<NetworkCredentials>,
    store: StatusStore,
}

impl LinkAttempt<Idle> {
    pub fn create(
        radio: Box<dyn WifiRadio>,
        networks: Vec<NetworkCredentials>,
        store: StatusStore,
    ) -> Self {
        Self::new(radio, networks, store)
    }

    /// Powers the radio. Failure here means the hardware is absent and the
    /// attempt (and the radio) is abandoned.
    pub fn power_on(mut self) -> Result<LinkAttempt<Associating>, RadioError> {
        self.store.set_connection(ConnectionState::Connecting);
        self.radio.bring_up()?;
        Ok(self.transition())
    }

    pub fn into_radio(self) -> Box<dyn WifiRadio> {
        self.radio
    }
}

impl LinkAttempt<Associating> {
    /// Tries the candidate networks in order; first success wins.
    pub fn associate(mut self) -> Result<LinkAttempt<Online>, LinkAttempt<Idle>> {
        let networks = std::mem::take(&mut self.networks);
        for network in &networks {
            info!(ssid = %network.ssid, "associating");
            match self.radio.join(network) {
                Ok(()) => {
                    info!(ssid = %network.ssid, "association succeeded");
                    self.networks = networks;
                    return Ok(self.transition());
                }
                Err(e) => warn!(ssid = %network.ssid, error = %e, "association failed"),
            }
        }
        self.networks = networks;
        Err(self.transition())
    }
}

impl LinkAttempt<Online> {
    pub fn address(&self) -> Option<Ipv4Addr> {
        self.radio.address()
    }

    pub fn into_radio(self) -> Box<dyn WifiRadio> {
        self.radio
    }
}

/// What one finished attempt reports back to the monitor.
#[derive(Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    Online,
    RadioAbsent,
    AssociationFailed,
}

/// Runs a single attempt to completion, updating the store as it goes.
/// Returns the radio for reuse unless the hardware turned out absent.
pub fn run_attempt(
    radio: Box<dyn WifiRadio>,
    networks: Vec<NetworkCredentials>,
    store: StatusStore,
) -> (Option<Box<dyn WifiRadio>>, AttemptOutcome) {
    let attempt = LinkAttempt::create(radio, networks, store.clone());

    let attempt = match attempt.power_on() {
        Ok(attempt) => attempt,
        Err(e) => {
            error!(error = %e, "radio bring-up failed, disabling radio for this session");
            store.set_status_line(RADIO_DIAGNOSTIC);
            store.set_connection(ConnectionState::Disconnected);
            return (None, AttemptOutcome::RadioAbsent);
        }
    };

    match attempt.associate() {
        Ok(online) => {
            if let Some(address) = online.address() {
                store.set_status_line(&address.to_string());
            }
            store.set_connection(ConnectionState::Connected);
            (Some(online.into_radio()), AttemptOutcome::Online)
        }
        Err(idle) => {
            store.set_connection(ConnectionState::Disconnected);
            (Some(idle.into_radio()), AttemptOutcome::AssociationFailed)
        }
    }
}

/// Spawns the supervisor monitor: re-spawns attempts while the link is
/// down, polls the radio while it is up so a lost association drops back
/// to a fresh attempt, fires `on_online` exactly once for the MQTT session
/// start, and exits for good when the radio turns out to be absent.
pub fn spawn_monitor<F>(
    store: StatusStore,
    networks: Vec<NetworkCredentials>,
    mut radio: Box<dyn WifiRadio>,
    retry_delay: Duration,
    mut on_online: F,
) -> JoinHandle<()>
where
    F: FnMut() + Send + 'static,
{
    info!("starting network supervisor");
    tokio::spawn(async move {
        let in_flight = Arc::new(AtomicBool::new(false));
        let mut session_started = false;

        loop {
            if store.connection() == ConnectionState::Connected {
                if radio.is_connected() {
                    tokio::time::sleep(retry_delay).await;
                    continue;
                }
                warn!("association lost, re-attempting");
                store.set_connection(ConnectionState::Disconnected);
            }
            if in_flight.swap(true, Ordering::SeqCst) {
                tokio::time::sleep(retry_delay).await;
                continue;
            }

            let task_store = store.clone();
            let task_networks = networks.clone();
            let flag = Arc::clone(&in_flight);
            let attempt = tokio::task::spawn_blocking(move || {
                let result = run_attempt(radio, task_networks, task_store);
                flag.store(false, Ordering::SeqCst);
                result
            });

            match attempt.await {
                Ok((Some(returned), AttemptOutcome::Online)) => {
                    radio = returned;
                    if !session_started {
                        session_started = true;
                        on_online();
                    }
                }
                Ok((Some(returned), _)) => {
                    radio = returned;
                    tokio::time::sleep(retry_delay).await;
                }
                Ok((None, _)) => {
                    warn!("radio disabled, supervisor exiting (UI-only mode)");
                    return;
                }
                Err(e) => {
                    error!(error = %e, "connection attempt task failed, supervisor exiting");
                    store.set_connection(ConnectionState::Disconnected);
                    return;
                }
            }
        }
    })
}
