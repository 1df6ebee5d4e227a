use thiserror::Error;

use crate::config::ConfigError;
use crate::elements::{FetchError, StoreError};
use crate::predict::PredictError;
use crate::report::ReportError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Satellite '{0}' not found in element store")]
    NotFound(String),
    #[error("Fetch failed: {0}")]
    FetchFailed(FetchError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Prediction error: {0}")]
    Predict(#[from] PredictError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Store(e) => Error::Store(e),
            other => Error::FetchFailed(other),
        }
    }
}
