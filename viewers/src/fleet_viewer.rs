//! Live taxi fleet viewer. Connects to the taxi and client-request
//! streams, reconciles every partial update into the shared fleet state,
//! and redraws (here: logs a fleet summary) whenever the dirty flag says
//! something changed.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::signal;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::interval;

use fleetview::config;
use fleetview::ingest::StreamIngestor;
use fleetview::logger;
use fleetview::model::TaxiStatus;
use fleetview::monitor::{Channel, ThroughputMonitor};
use fleetview::render::DirtyFlag;
use fleetview::state::FleetState;
use fleetview::upstream::{self, ChannelStatus, UpstreamCommand};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config();
    logger::setup_logging(&config.log_dir(), &config.log_level())?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let state = FleetState::new();
    let dirty = DirtyFlag::new();
    let ingestor = Arc::new(StreamIngestor::new(state.clone(), dirty.clone()));

    let (taxi_cmd_tx, taxi_cmd_rx) = mpsc::unbounded_channel();
    let (_client_cmd_tx, client_cmd_rx) = mpsc::unbounded_channel();
    let (taxi_status_tx, taxi_status_rx) = watch::channel(ChannelStatus::Connecting);
    let (client_status_tx, client_status_rx) = watch::channel(ChannelStatus::Connecting);

    let taxi_handle = tokio::spawn(upstream::run(
        config.taxi_ws_url(),
        Channel::Taxis,
        Arc::clone(&ingestor),
        ThroughputMonitor::new(Channel::Taxis),
        taxi_cmd_rx,
        taxi_status_tx,
        shutdown_tx.subscribe(),
    ));

    let client_handle = tokio::spawn(upstream::run(
        config.client_ws_url(),
        Channel::Clients,
        Arc::clone(&ingestor),
        ThroughputMonitor::new(Channel::Clients),
        client_cmd_rx,
        client_status_tx,
        shutdown_tx.subscribe(),
    ));

    if let Some(rate) = config.target_rate() {
        log::info!("Requesting target stream rate of {} msg/s", rate);
        let _ = taxi_cmd_tx.send(UpstreamCommand::SetRate(rate));
    }

    let render_handle = tokio::spawn(render_loop(
        state.clone(),
        dirty.clone(),
        config.redraw_interval_ms(),
        taxi_status_rx,
        client_status_rx,
        shutdown_tx.subscribe(),
    ));

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            log::info!("Ctrl-C received, initiating shutdown.");
        }
        _ = async {
            #[cfg(unix)]
            {
                if let Ok(mut term_signal) = signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    term_signal.recv().await;
                    log::info!("SIGTERM received, initiating shutdown.");
                } else {
                    std::future::pending::<()>().await;
                }
            }
            #[cfg(not(unix))]
            {
                // On non-unix platforms, just wait forever.
                std::future::pending::<()>().await;
            }
        } => {}
    }

    let _ = shutdown_tx.send(());
    let _ = tokio::try_join!(taxi_handle, client_handle, render_handle);

    log::info!("Shutdown complete.");
    Ok(())
}

/// The external render collaborator, reduced to logging: drains the dirty
/// flag on a fixed cadence and prints a fleet summary, plus channel
/// status transitions as they happen.
async fn render_loop(
    state: FleetState,
    dirty: Arc<DirtyFlag>,
    redraw_interval_ms: u64,
    mut taxi_status: watch::Receiver<ChannelStatus>,
    mut client_status: watch::Receiver<ChannelStatus>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut tick = interval(Duration::from_millis(redraw_interval_ms));

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                log::info!("Render loop shutting down.");
                break;
            }
            Ok(()) = taxi_status.changed() => {
                log::info!("Taxi channel: {:?}", *taxi_status.borrow_and_update());
            }
            Ok(()) = client_status.changed() => {
                log::info!("Client channel: {:?}", *client_status.borrow_and_update());
            }
            _ = tick.tick() => {
                if !dirty.take() {
                    continue;
                }
                redraw(&state).await;
            }
        }
    }
}

async fn redraw(state: &FleetState) {
    let taxis = state.taxi_snapshot().await;
    let (mut empty, mut reserved, mut occupied) = (0u32, 0u32, 0u32);
    for taxi in &taxis {
        match taxi.status {
            TaxiStatus::Empty => empty += 1,
            TaxiStatus::Reserved => reserved += 1,
            TaxiStatus::Occupied => occupied += 1,
        }
    }
    log::info!(
        "redraw: {} taxis ({} empty, {} reserved, {} occupied)",
        taxis.len(),
        empty,
        reserved,
        occupied
    );

    if let Some(req) = state.current_request().await {
        log::debug!(
            "latest request: client {} ({:.4}, {:.4}) -> ({:.4}, {:.4}), share={}",
            req.client_id,
            req.orig_lon,
            req.orig_lat,
            req.dest_lon,
            req.dest_lat,
            req.will_share
        );
    }
}
