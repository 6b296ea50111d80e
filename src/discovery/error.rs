use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read listing page body from {0}")]
    Body(String, #[source] reqwest::Error),

    #[error("Invalid link selector: {0}")]
    Selector(String),

    #[error("Invalid month file pattern")]
    Pattern(#[from] regex::Error),
}
