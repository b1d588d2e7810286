use thiserror::Error;

/// Why an inbound message was dropped. The ingestor logs these and moves
/// on; nothing here ever propagates past the channel handler, so one bad
/// frame cannot disturb the ones after it.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The payload was not valid JSON, or a required field was missing
    /// or of the wrong type.
    #[error("malformed payload: {0}")]
    Parse(#[from] serde_json::Error),
}
