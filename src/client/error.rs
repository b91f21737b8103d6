use thiserror::Error;

/// Errors returned by a [`ResourceClient`](super::ResourceClient).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{kind} \"{name}\" not found in namespace \"{namespace}\"")]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    #[error("API server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request to API server failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response from API server: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read credentials: {0}")]
    Credentials(#[from] std::io::Error),
}
