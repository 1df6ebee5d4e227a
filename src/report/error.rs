use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
