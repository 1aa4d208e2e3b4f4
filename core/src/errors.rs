use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid write mode '{mode}', must be one of: merge, replace, append")]
    InvalidMode { mode: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Failed to load configuration from {path}: {reason}")]
    LoadFailed { path: String, reason: String },
}

/// Failures talking to the Feefo API. Fatal when raised while paginating
/// reviews; recovered per SKU inside the enrichment transformer.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {reason}")]
    Client { reason: String },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to prepare table {table}: {reason}")]
    Prepare { table: String, reason: String },

    #[error("Failed to write to table {table}: {reason}")]
    Write { table: String, reason: String },

    #[error("Failed to flush sink: {reason}")]
    Flush { reason: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
