use serde::{Deserialize, Serialize};

/// Status of a taxi as rendered on the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxiStatus {
    #[default]
    Empty,
    Reserved,
    Occupied,
}

/// Latest reconciled state of a single taxi.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxiState {
    pub taxi_id: i64,
    pub status: TaxiStatus,
    pub lon: f64,
    pub lat: f64,
    pub num_occupants: u32,
}

impl TaxiState {
    /// State of a taxi that has been referenced but never updated.
    pub fn new(taxi_id: i64) -> Self {
        Self {
            taxi_id,
            status: TaxiStatus::Empty,
            lon: 0.0,
            lat: 0.0,
            num_occupants: 0,
        }
    }
}

/// Sparse taxi channel message. Any subset of the optional fields may be
/// present in a single frame. The streamer also sends fields this viewer
/// does not track (destLon/destLat, the fare breakdown of a completed
/// trip); the deserializer tolerates and ignores them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxiUpdate {
    pub taxi_id: i64,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub num_occupants: Option<u32>,
    pub reservation_lon: Option<f64>,
    pub reservation_lat: Option<f64>,
    pub total_amount: Option<f64>,
}

/// Most recent ride request. A single global slot: every message on the
/// client channel carries all five fields and replaces the previous
/// request wholesale, regardless of which client sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideRequest {
    pub client_id: i64,
    pub orig_lon: f64,
    pub orig_lat: f64,
    pub dest_lon: f64,
    pub dest_lat: f64,
    pub will_share: bool,
}

/// Fire-and-forget rate control frame written back on the taxi channel,
/// asking the streamer for a different target message rate.
#[derive(Debug, Clone, Serialize)]
pub struct RateRequest {
    #[serde(rename = "Num")]
    pub num: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_taxi_update_parses_with_missing_fields() {
        let update: TaxiUpdate =
            serde_json::from_str(r#"{"taxiId": 7, "lon": -73.9, "lat": 40.7}"#).unwrap();
        assert_eq!(update.taxi_id, 7);
        assert_eq!(update.lon, Some(-73.9));
        assert_eq!(update.lat, Some(40.7));
        assert_eq!(update.num_occupants, None);
        assert_eq!(update.reservation_lon, None);
        assert_eq!(update.total_amount, None);
    }

    #[test]
    fn taxi_update_tolerates_unknown_fields() {
        let raw = r#"{"taxiId": 3, "numOccupants": 2, "destLon": -73.8, "destLat": 40.6,
                      "fareAmount": 9.5, "tipAmount": 1.0}"#;
        let update: TaxiUpdate = serde_json::from_str(raw).unwrap();
        assert_eq!(update.taxi_id, 3);
        assert_eq!(update.num_occupants, Some(2));
    }

    #[test]
    fn taxi_update_requires_an_id() {
        assert!(serde_json::from_str::<TaxiUpdate>(r#"{"lon": 1.0, "lat": 2.0}"#).is_err());
    }

    #[test]
    fn ride_request_requires_all_fields() {
        let raw = r#"{"clientId": 5, "origLon": -73.9, "origLat": 40.7, "destLon": -73.8}"#;
        assert!(serde_json::from_str::<RideRequest>(raw).is_err());
    }

    #[test]
    fn rate_request_serializes_with_capitalized_key() {
        let frame = serde_json::to_string(&RateRequest { num: 500 }).unwrap();
        assert_eq!(frame, r#"{"Num":500}"#);
    }
}
