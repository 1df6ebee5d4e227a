use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt record on line {line}: {source}")]
    Corrupt {
        line: usize,
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Source returned status {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to write listing artifact: {0}")]
    Artifact(std::io::Error),
}
