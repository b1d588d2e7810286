//! Replays a canned taxi trip (pickup, reservation, dropoff) and a pair
//! of client requests through the full ingest path, then checks the
//! resulting fleet snapshot. Runs offline, no streamer needed.

use std::sync::Arc;

use fleetview::ingest::StreamIngestor;
use fleetview::model::TaxiStatus;
use fleetview::render::DirtyFlag;
use fleetview::state::FleetState;

const TAXI_MESSAGES: &[&str] = &[
    // Taxi 12 wanders around empty.
    r#"{"taxiId": 12, "lon": -73.9692, "lat": 40.7306}"#,
    r#"{"taxiId": 12, "lon": -73.9640, "lat": 40.7350}"#,
    // Taxi 31 gets a reservation across town.
    r#"{"taxiId": 31, "reservationLon": -73.9857, "reservationLat": 40.7484}"#,
    // Taxi 12 picks up two passengers and moves.
    r#"{"taxiId": 12, "numOccupants": 2, "destLon": -73.9442, "destLat": 40.6782}"#,
    r#"{"taxiId": 12, "lon": -73.9500, "lat": 40.7000}"#,
    // A frame the parser must shrug off.
    r#"{"taxiId": "oops"}"#,
    // Taxi 12 completes the trip.
    r#"{"taxiId": 12, "totalAmount": 14.75, "fareAmount": 12.0, "tipAmount": 2.75}"#,
];

const CLIENT_MESSAGES: &[&str] = &[
    r#"{"clientId": 4, "origLon": -73.99, "origLat": 40.70, "destLon": -73.95, "destLat": 40.75, "willShare": true}"#,
    r#"{"clientId": 9, "origLon": -73.91, "origLat": 40.63, "destLon": -73.86, "destLat": 40.69, "willShare": false}"#,
];

#[tokio::main]
async fn main() {
    let state = FleetState::new();
    let dirty = DirtyFlag::new();
    let ingestor = Arc::new(StreamIngestor::new(state.clone(), dirty.clone()));

    for raw in TAXI_MESSAGES {
        ingestor.on_taxi_message(raw).await;
    }
    for raw in CLIENT_MESSAGES {
        ingestor.on_request_message(raw).await;
    }

    let taxi12 = state.taxi(12).await.expect("taxi 12 tracked");
    assert_eq!(taxi12.status, TaxiStatus::Empty, "trip completed, taxi freed");
    assert_eq!(taxi12.num_occupants, 2, "occupant count survives completion");
    assert_eq!((taxi12.lon, taxi12.lat), (-73.95, 40.70));

    let taxi31 = state.taxi(31).await.expect("taxi 31 tracked");
    assert_eq!(taxi31.status, TaxiStatus::Reserved);
    assert_eq!((taxi31.lon, taxi31.lat), (0.0, 0.0), "never sent a position");

    assert_eq!(state.taxi_count().await, 2, "malformed frame created no entry");

    let request = state.current_request().await.expect("request slot filled");
    assert_eq!(request.client_id, 9, "only the latest request survives");
    assert!(!request.will_share);

    assert!(dirty.take(), "reconciliation left a pending redraw");

    println!("Replay OK: {} taxis tracked, latest request from client {}.",
        state.taxi_count().await,
        request.client_id
    );
}
