//! Error type for the Octopus API clients.

use thiserror::Error;

/// Failure raised by the transport or a resource client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, refused connection, timeout).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with an error status code.
    #[error("Code {code} - \n{body}")]
    Status { code: u16, body: String },

    /// The response body does not have the expected shape.
    #[error("malformed response from '{path}': {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized.
    #[error("could not encode request body for '{path}': {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A caller-supplied argument cannot be turned into a request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
