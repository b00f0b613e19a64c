/// All error types that can occur when talking to a bridge or its lights.
///
/// Every variant leaves the [`crate::LightController`] that produced it in a
/// valid, usable state.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No bridge address has been configured yet.
    #[error("no bridge address configured")]
    NotConfigured,

    /// The operation referenced a light absent from the last refresh.
    #[error("light {0:?} is not known; refresh the light list first")]
    UnknownLight(String),

    /// Reading the light list failed; the cached collection is unchanged.
    #[error("failed to fetch lights: {0}")]
    Fetch(#[source] TransportError),

    /// A targeted state update failed; no local state was changed.
    #[error("failed to update light {id:?}: {source}")]
    Update {
        id: String,
        #[source]
        source: TransportError,
    },

    /// A hex color was rejected under [`crate::HexPolicy::Strict`].
    #[error("invalid hex color: {0:?}")]
    InvalidHexColor(String),

    /// The bridge address could not be parsed.
    #[error("invalid bridge address {input:?}: {reason}")]
    InvalidEndpoint { input: String, reason: String },

    /// The address store could not be read or written.
    #[error("address store {action} error: {err:?}")]
    Store { action: String, err: std::io::Error },

    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),
}

impl Error {
    /// Create a new update error
    pub fn update(id: &str, source: TransportError) -> Self {
        Error::Update {
            id: id.to_string(),
            source,
        }
    }

    /// Create a new invalid endpoint error
    pub fn invalid_endpoint(input: &str, reason: &str) -> Self {
        Error::InvalidEndpoint {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new store error
    pub fn store(action: &str, err: std::io::Error) -> Self {
        Error::Store {
            action: action.to_string(),
            err,
        }
    }
}

/// Failures reported by an [`crate::HttpTransport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// A network socket operation failed while talking to the bridge.
    #[error("socket {action} error: {err:?}")]
    Socket { action: String, err: std::io::Error },

    /// The bridge did not answer in time.
    #[error("request timed out")]
    TimedOut,

    /// The URL scheme is not handled by this transport.
    #[error("unsupported url scheme in {0:?}")]
    UnsupportedScheme(String),

    /// The URL could not be split into host, port and path.
    #[error("invalid url {0:?}")]
    InvalidUrl(String),

    /// The bridge answered with a non-success HTTP status.
    #[error("http status {code}: {body}")]
    Status { code: u16, body: String },

    /// The reply was not a well-formed HTTP response or light listing.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The reply body was not valid JSON.
    #[error("invalid json body: {0:?}")]
    Json(serde_json::Error),

    /// The bridge answered with an error object.
    #[error("bridge error {kind} at {address}: {description}")]
    Bridge {
        kind: i64,
        address: String,
        description: String,
    },
}

impl TransportError {
    /// Create a new socket error
    pub fn socket(action: &str, err: std::io::Error) -> Self {
        TransportError::Socket {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new malformed response error
    pub fn malformed(reason: impl Into<String>) -> Self {
        TransportError::Malformed(reason.into())
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_error_names_light() {
        let err = Error::update("3", TransportError::TimedOut);
        assert_eq!(
            err.to_string(),
            "failed to update light \"3\": request timed out"
        );
    }

    #[test]
    fn test_fetch_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::Fetch(TransportError::malformed("not an object"));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("malformed response: not an object"));
    }
}
