pub mod indicator;
pub mod link;
pub mod network;
pub mod platform;
pub mod settings;
pub mod status;
pub mod ui;

use color_eyre::Result;
use tokio::sync::{mpsc, watch};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::link::session::LinkSession;
use crate::link::LinkClient;
use crate::platform::headless::{
    spawn_stdin_feed, AbsentRadio, SyntheticPower, TraceCanvas, TraceDisplay, TraceLedStrip,
};
use crate::platform::wifi::WifiRadio;
use crate::settings::DeviceSettings;
use crate::status::StatusStore;
use crate::ui::UiState;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let settings = DeviceSettings::load_or_default();
    let store = StatusStore::new();

    // Messaging: handle now, session later (started once the link is up).
    let link = LinkClient::new(settings.device_topic.clone(), store.clone());
    let (link_event_tx, link_event_rx) = mpsc::channel(100);
    let _bridge = link::bridge::spawn(link_event_rx, link.clone(), store.clone());

    // Periodic tasks.
    let _indicator = indicator::spawn(store.clone(), SyntheticPower, TraceLedStrip);
    let (ui_tx, ui_rx) = watch::channel(UiState::default());
    let _render = ui::render::spawn(
        store.clone(),
        ui_rx,
        TraceDisplay,
        TraceCanvas::default(),
        settings.clock_offset(),
    );

    // Network bring-up with one-time session start on success.
    let radio: Box<dyn WifiRadio> = Box::new(AbsentRadio);
    let session_settings = settings.clone();
    let session_link = link.clone();
    let _supervisor = network::spawn_monitor(
        store.clone(),
        settings.networks.clone(),
        radio,
        network::RETRY_DELAY,
        move || {
            let _session =
                LinkSession::start(&session_settings, session_link.clone(), link_event_tx.clone());
        },
    );

    // Input: the dispatcher is the foreground loop, fed from stdin when
    // running headless.
    let (input_tx, input_rx) = mpsc::channel(32);
    spawn_stdin_feed(input_tx);

    info!("event notifier running");
    ui::input::run(input_rx, ui_tx, link).await;

    Ok(())
}

fn setup() -> Result<()> {
    seed_env_defaults();
    color_eyre::install()?;

    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();
    Ok(())
}

fn seed_env_defaults() {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
}
