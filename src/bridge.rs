//! Bridge addressing and REST paths.

use std::fmt;
use std::str::FromStr;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Everything but the RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Base address of a bridge: scheme, host and optional port.
///
/// # Example
///
/// ```
/// use std::str::FromStr;
/// use hue_bridge_rs::BridgeEndpoint;
///
/// let endpoint = BridgeEndpoint::from_str("192.168.1.2:8080").unwrap();
/// assert_eq!(endpoint.base_url(), "http://192.168.1.2:8080");
/// assert_eq!(
///     endpoint.lights_url("newdeveloper"),
///     "http://192.168.1.2:8080/api/newdeveloper/lights"
/// );
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeEndpoint {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl BridgeEndpoint {
    const DEFAULT_SCHEME: &'static str = "http";

    pub fn new(host: &str, port: Option<u16>) -> Self {
        BridgeEndpoint {
            scheme: Self::DEFAULT_SCHEME.to_string(),
            host: host.to_string(),
            port,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// `scheme://host[:port]`, without a trailing slash.
    pub fn base_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme, self.host, port),
            None => format!("{}://{}", self.scheme, self.host),
        }
    }

    /// Path listing every light known to the bridge.
    pub fn lights_url(&self, user: &str) -> String {
        format!("{}/api/{}/lights", self.base_url(), user)
    }

    /// Path updating the state of a single light.
    ///
    /// Light ids are arbitrary bridge keys, so the id is percent-encoded as a
    /// single path segment.
    pub fn light_state_url(&self, user: &str, id: &str) -> String {
        format!(
            "{}/{}/state",
            self.lights_url(user),
            utf8_percent_encode(id, PATH_SEGMENT)
        )
    }
}

impl FromStr for BridgeEndpoint {
    type Err = Error;

    /// Parse `host`, `host:port` or `scheme://host[:port][/]`.
    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        if input.is_empty() {
            return Err(Error::invalid_endpoint(s, "empty address"));
        }

        let (scheme, rest) = match input.split_once("://") {
            Some((scheme, rest)) => (scheme.to_ascii_lowercase(), rest),
            None => (Self::DEFAULT_SCHEME.to_string(), input),
        };
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+') {
            return Err(Error::invalid_endpoint(s, "invalid scheme"));
        }

        let authority = match rest.split_once('/') {
            Some((authority, "")) => authority,
            Some(_) => return Err(Error::invalid_endpoint(s, "paths are not supported")),
            None => rest,
        };

        let (host, port) = match authority.rsplit_once(':') {
            // Bracketed IPv6 literals keep their inner colons.
            Some((host, port)) if !port.contains(']') => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| Error::invalid_endpoint(s, "invalid port"))?;
                (host, Some(port))
            }
            _ => (authority, None),
        };
        if host.is_empty() {
            return Err(Error::invalid_endpoint(s, "missing host"));
        }

        Ok(BridgeEndpoint {
            scheme,
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for BridgeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}
