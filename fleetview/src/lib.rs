//! Core of the live taxi fleet viewer: stream-to-state reconciliation
//! plus per-channel throughput instrumentation.
//!
//! Two independent WebSocket channels deliver partial JSON updates about
//! taxis and ride requests. The [`ingest::StreamIngestor`] parses each
//! payload, the [`reconcile`] functions fold it into the shared
//! [`state::FleetState`], and a [`render::RenderScheduler`] is nudged so
//! the embedding UI knows to redraw. The map/canvas front end itself is
//! an external collaborator; it only ever sees a state snapshot and the
//! dirty flag.

pub mod config;
pub mod error;
pub mod ingest;
pub mod logger;
pub mod model;
pub mod monitor;
pub mod reconcile;
pub mod render;
pub mod state;
pub mod upstream;
