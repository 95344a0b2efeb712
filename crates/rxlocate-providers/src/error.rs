use thiserror::Error;

/// Errors returned by the Nominatim client.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered 429 Too Many Requests.
    #[error("geocoder rate limit exceeded")]
    RateLimited,

    /// Any other non-2xx status.
    #[error("geocoder returned HTTP {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid geocoder base URL '{0}'")]
    InvalidBaseUrl(String),
}
