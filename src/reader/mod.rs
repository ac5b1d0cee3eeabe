use thiserror::Error;

pub mod local;
pub mod remote;

pub use local::LocalSource;
pub use remote::RemoteSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

/// CBSA codes become file names and URL path segments; anything but plain
/// identifiers is refused.
pub(crate) fn is_safe_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Log a failed fetch and turn it into the absence sentinel.
pub(crate) fn absorb<T>(what: &str, result: Result<T, SourceError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!("Error fetching {}: {}", what, err);
            None
        }
    }
}
