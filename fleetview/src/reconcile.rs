//! Folds one inbound partial message into the authoritative stores.
//!
//! The taxi precedence order below is deliberate and load-bearing:
//! reservation markers override an occupancy-driven Occupied transition
//! when both arrive in the same message. Whether that combination occurs
//! in real traffic is an open question, so do not rearrange the steps
//! without checking against live streams first.

use crate::model::{RideRequest, TaxiStatus, TaxiUpdate};
use crate::state::{RequestSlot, TaxiStore};

/// Applies a sparse taxi update. Absent fields leave the target taxi
/// untouched; an unknown id gets a default entry first and the update is
/// applied on top of the defaults.
pub fn apply_taxi_update(store: &mut TaxiStore, update: &TaxiUpdate) {
    let taxi = store.get_or_create(update.taxi_id);

    // Position moves only when both coordinates are present.
    if let (Some(lon), Some(lat)) = (update.lon, update.lat) {
        taxi.lon = lon;
        taxi.lat = lat;
    }

    if let Some(n) = update.num_occupants {
        taxi.num_occupants = n;
        if n > 0 {
            taxi.status = TaxiStatus::Occupied;
        }
    }

    if update.reservation_lon.is_some() && update.reservation_lat.is_some() {
        taxi.status = TaxiStatus::Reserved;
    }

    // A trip-completion record (fare total) frees the taxi.
    if update.total_amount.is_some() {
        taxi.status = TaxiStatus::Empty;
    }
}

/// Requests have no partial-field semantics: the new snapshot replaces
/// the old one wholesale.
pub fn apply_request_update(slot: &mut RequestSlot, update: RideRequest) {
    slot.replace(update);
}
