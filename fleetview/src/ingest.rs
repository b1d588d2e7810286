use std::sync::Arc;

use crate::error::IngestError;
use crate::model::{RideRequest, TaxiUpdate};
use crate::render::RenderScheduler;
use crate::state::FleetState;

/// Parses and routes raw channel payloads. One instance serves both
/// channels; they share the state handle but are never merged or ordered
/// relative to one another.
///
/// Malformed payloads are dropped silently (logged at debug): one bad
/// frame never disturbs the ones after it, and nothing here panics or
/// propagates an error to the channel task.
pub struct StreamIngestor {
    state: FleetState,
    render: Arc<dyn RenderScheduler>,
}

impl StreamIngestor {
    pub fn new(state: FleetState, render: Arc<dyn RenderScheduler>) -> Self {
        Self { state, render }
    }

    pub fn state(&self) -> &FleetState {
        &self.state
    }

    /// Taxi channel entry point.
    pub async fn on_taxi_message(&self, raw: &str) {
        match parse_taxi(raw) {
            Ok(update) => {
                self.state.apply_taxi(&update).await;
                self.render.mark_dirty();
            }
            Err(err) => log::debug!("dropping taxi message: {}", err),
        }
    }

    /// Client request channel entry point. All five request fields are
    /// required; a message missing any of them is malformed.
    pub async fn on_request_message(&self, raw: &str) {
        match parse_request(raw) {
            Ok(update) => {
                self.state.apply_request(update).await;
                self.render.mark_dirty();
            }
            Err(err) => log::debug!("dropping client request: {}", err),
        }
    }
}

fn parse_taxi(raw: &str) -> Result<TaxiUpdate, IngestError> {
    Ok(serde_json::from_str(raw)?)
}

fn parse_request(raw: &str) -> Result<RideRequest, IngestError> {
    Ok(serde_json::from_str(raw)?)
}
