use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{RideRequest, TaxiState, TaxiUpdate};
use crate::reconcile;

/// In-memory map of every taxi ever observed. Entries are created lazily
/// on first reference and never evicted; a taxi whose stream goes quiet
/// keeps its last known state for the rest of the session.
#[derive(Debug, Default)]
pub struct TaxiStore {
    taxis: HashMap<i64, TaxiState>,
}

impl TaxiStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state for `taxi_id`, inserting defaults if the id has
    /// never been seen. The insertion is visible to later calls and to
    /// enumeration.
    pub fn get_or_create(&mut self, taxi_id: i64) -> &mut TaxiState {
        self.taxis
            .entry(taxi_id)
            .or_insert_with(|| TaxiState::new(taxi_id))
    }

    pub fn get(&self, taxi_id: i64) -> Option<&TaxiState> {
        self.taxis.get(&taxi_id)
    }

    pub fn len(&self) -> usize {
        self.taxis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxis.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaxiState> {
        self.taxis.values()
    }

    /// Owned snapshot for rendering. Order is not significant.
    pub fn snapshot(&self) -> Vec<TaxiState> {
        self.taxis.values().cloned().collect()
    }
}

/// Single-slot holder for the most recent ride request. Empty until the
/// first request arrives; a new request overwrites the previous one
/// entirely, there is no per-client map.
#[derive(Debug, Default)]
pub struct RequestSlot {
    current: Option<RideRequest>,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, request: RideRequest) {
        self.current = Some(request);
    }

    pub fn current(&self) -> Option<&RideRequest> {
        self.current.as_ref()
    }
}

/// Shared handle over the two stores. The stores are mutated only from
/// within the channel-handling tasks; the mutexes serialize those writes
/// against snapshot reads from the render loop.
#[derive(Clone, Default)]
pub struct FleetState {
    taxis: Arc<Mutex<TaxiStore>>,
    request: Arc<Mutex<RequestSlot>>,
}

impl FleetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn apply_taxi(&self, update: &TaxiUpdate) {
        let mut store = self.taxis.lock().await;
        reconcile::apply_taxi_update(&mut store, update);
    }

    pub async fn apply_request(&self, update: RideRequest) {
        let mut slot = self.request.lock().await;
        reconcile::apply_request_update(&mut slot, update);
    }

    pub async fn taxi_snapshot(&self) -> Vec<TaxiState> {
        self.taxis.lock().await.snapshot()
    }

    pub async fn taxi_count(&self) -> usize {
        self.taxis.lock().await.len()
    }

    pub async fn taxi(&self, taxi_id: i64) -> Option<TaxiState> {
        self.taxis.lock().await.get(taxi_id).cloned()
    }

    pub async fn current_request(&self) -> Option<RideRequest> {
        self.request.lock().await.current().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaxiStatus;

    #[test]
    fn unseen_id_gets_default_state() {
        let mut store = TaxiStore::new();
        let taxi = store.get_or_create(42);
        assert_eq!(taxi.status, TaxiStatus::Empty);
        assert_eq!((taxi.lon, taxi.lat), (0.0, 0.0));
        assert_eq!(taxi.num_occupants, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_or_create_returns_the_same_entry() {
        let mut store = TaxiStore::new();
        store.get_or_create(1).num_occupants = 4;
        assert_eq!(store.get_or_create(1).num_occupants, 4);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn snapshot_contains_every_observed_taxi() {
        let mut store = TaxiStore::new();
        store.get_or_create(1);
        store.get_or_create(2);
        store.get_or_create(3);
        let mut ids: Vec<i64> = store.snapshot().iter().map(|t| t.taxi_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn request_slot_starts_empty() {
        let slot = RequestSlot::new();
        assert!(slot.current().is_none());
    }
}
