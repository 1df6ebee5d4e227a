use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::predict::types::EventKind;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Malformed event stream: {event} at {at} while {state}")]
    MalformedEventStream {
        state: &'static str,
        event: EventKind,
        at: DateTime<Utc>,
    },
    #[error("Invalid element set: {0}")]
    InvalidTle(#[from] sgp4::TleError),
    #[error("Elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
    #[error("Propagation error: {0}")]
    Propagation(String),
    #[error("Scan step must be positive, got {0}")]
    InvalidStep(chrono::Duration),
}
