//! WiFi radio collaborator.
//!
//! The radio's own calls are blocking and bounded by the driver's timeouts;
//! the supervisor runs them inside its own task, so nothing else stalls.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One candidate network from the device settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkCredentials {
    pub ssid: String,
    pub psk: String,
}

#[derive(Debug, Error)]
pub enum RadioError {
    /// The radio never became ready. Permanent for this session; the
    /// supervisor stops retrying and the device stays in UI-only mode.
    #[error("radio hardware not responding: {0}")]
    HardwareAbsent(String),

    /// Association with one candidate network failed. Transient.
    #[error("association failed: {0}")]
    AssociationFailed(String),
}

/// Radio driver interface consumed by the network supervisor.
pub trait WifiRadio: Send {
    /// Powers the radio into application mode.
    fn bring_up(&mut self) -> Result<(), RadioError>;

    /// Associates with one network; blocks, bounded by the driver timeout.
    fn join(&mut self, network: &NetworkCredentials) -> Result<(), RadioError>;

    fn is_connected(&self) -> bool;

    /// Address assigned by the network, once associated.
    fn address(&self) -> Option<Ipv4Addr>;
}
