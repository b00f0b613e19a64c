//! HTTP capability used to reach the bridge.

use std::future::Future;
use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::errors::TransportError;
use crate::runtime::{self, AsyncTcpStream, TcpStream};

type Result<T> = std::result::Result<T, TransportError>;

/// Extra request headers as `(name, value)` pairs.
pub type Headers<'a> = [(&'a str, &'a str)];

/// Largest reply, headers included, that [`HttpClient`] reads before giving up.
pub const MAX_RESPONSE_BYTES: usize = 1 << 20;

/// Headers sent with every state update.
pub const JSON_HEADERS: [(&str, &str); 1] = [("Content-Type", "application/json")];

/// The transport a [`crate::LightController`] sends its requests through.
///
/// Implementations own everything below the JSON level: connections, TLS,
/// timeouts. Each call is a single attempt.
pub trait HttpTransport: Send + Sync {
    /// Issue a GET and decode the JSON reply.
    fn get(&self, url: &str, headers: &Headers<'_>) -> impl Future<Output = Result<Value>> + Send;

    /// Issue a PUT with a JSON body and decode the JSON reply.
    fn put(
        &self,
        url: &str,
        body: &Value,
        headers: &Headers<'_>,
    ) -> impl Future<Output = Result<Value>> + Send;
}

/// Minimal plain-HTTP/1.1 client over the selected async runtime.
///
/// One connection per request, closed by the peer after the reply. Only the
/// `http` scheme is handled.
#[derive(Debug, Clone)]
pub struct HttpClient {
    timeout: Duration,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    const DEFAULT_PORT: u16 = 80;
    const TIMEOUT_MS: u64 = 5000;

    pub fn new() -> Self {
        HttpClient {
            timeout: Duration::from_millis(Self::TIMEOUT_MS),
        }
    }

    /// Bound every request, from connect to the end of the reply.
    pub fn with_timeout(timeout: Duration) -> Self {
        HttpClient { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn request(
        &self,
        method: &str,
        url: &str,
        body: Option<&Value>,
        headers: &Headers<'_>,
    ) -> Result<Value> {
        let target = Target::parse(url)?;
        let body = match body {
            Some(value) => serde_json::to_vec(value).map_err(TransportError::Json)?,
            None => Vec::new(),
        };

        let mut head = format!(
            "{method} {} HTTP/1.1\r\nHost: {}\r\nAccept: application/json\r\nConnection: close\r\n",
            target.path, target.authority
        );
        for (name, value) in headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        if method != "GET" {
            head.push_str(&format!("Content-Length: {}\r\n", body.len()));
        }
        head.push_str("\r\n");

        let mut message = head.into_bytes();
        message.extend_from_slice(&body);

        debug!("{} {} ({} byte body)", method, url, body.len());
        let raw = runtime::timeout(self.timeout, exchange(&target.address, &message))
            .await
            .map_err(|_| TransportError::TimedOut)??;

        parse_response(&raw)
    }
}

impl HttpTransport for HttpClient {
    async fn get(&self, url: &str, headers: &Headers<'_>) -> Result<Value> {
        self.request("GET", url, None, headers).await
    }

    async fn put(&self, url: &str, body: &Value, headers: &Headers<'_>) -> Result<Value> {
        self.request("PUT", url, Some(body), headers).await
    }
}

async fn exchange(address: &str, message: &[u8]) -> Result<Vec<u8>> {
    let mut stream = TcpStream::connect(address)
        .await
        .map_err(|e| TransportError::socket("connect", e))?;

    stream
        .write_all(message)
        .await
        .map_err(|e| TransportError::socket("send", e))?;

    let mut response = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream
            .read(&mut chunk)
            .await
            .map_err(|e| TransportError::socket("receive", e))?;
        if n == 0 {
            return Ok(response);
        }
        if response.len() + n > MAX_RESPONSE_BYTES {
            return Err(TransportError::malformed(format!(
                "response exceeds {MAX_RESPONSE_BYTES} bytes"
            )));
        }
        response.extend_from_slice(&chunk[..n]);
    }
}

/// Where an `http://` URL points.
#[derive(Debug, PartialEq, Eq)]
struct Target {
    /// `host[:port]` as written, for the Host header
    authority: String,
    /// `host:port` to connect to
    address: String,
    path: String,
}

impl Target {
    fn parse(url: &str) -> Result<Self> {
        let Some((scheme, rest)) = url.split_once("://") else {
            return Err(TransportError::InvalidUrl(url.to_string()));
        };
        if !scheme.eq_ignore_ascii_case("http") {
            return Err(TransportError::UnsupportedScheme(url.to_string()));
        }

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };
        // Anything that could split the request line or inject a header.
        if authority.is_empty()
            || rest
                .bytes()
                .any(|b| b.is_ascii_whitespace() || b.is_ascii_control())
        {
            return Err(TransportError::InvalidUrl(url.to_string()));
        }

        let has_port = authority
            .rsplit_once(':')
            .is_some_and(|(_, port)| !port.contains(']'));
        let address = if has_port {
            authority.to_string()
        } else {
            format!("{}:{}", authority, HttpClient::DEFAULT_PORT)
        };

        Ok(Target {
            authority: authority.to_string(),
            address,
            path: path.to_string(),
        })
    }
}

fn parse_response(raw: &[u8]) -> Result<Value> {
    let head_end = find(raw, b"\r\n\r\n")
        .ok_or_else(|| TransportError::malformed("missing end of http headers"))?;
    let head = std::str::from_utf8(&raw[..head_end])
        .map_err(|_| TransportError::malformed("http headers are not utf-8"))?;
    let body = &raw[head_end + 4..];

    let mut lines = head.split("\r\n");
    let status = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| TransportError::malformed("invalid http status line"))?;

    let chunked = lines.any(|line| {
        line.split_once(':').is_some_and(|(name, value)| {
            name.trim().eq_ignore_ascii_case("transfer-encoding")
                && value.trim().eq_ignore_ascii_case("chunked")
        })
    });
    let body = if chunked {
        decode_chunked(body)?
    } else {
        body.to_vec()
    };

    if !(200..300).contains(&status) {
        return Err(TransportError::Status {
            code: status,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&body).map_err(TransportError::Json)
}

fn decode_chunked(mut rest: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let line_end =
            find(rest, b"\r\n").ok_or_else(|| TransportError::malformed("truncated chunk size"))?;
        let size = std::str::from_utf8(&rest[..line_end])
            .ok()
            .and_then(|line| line.split(';').next())
            .and_then(|size| usize::from_str_radix(size.trim(), 16).ok())
            .ok_or_else(|| TransportError::malformed("invalid chunk size"))?;
        rest = &rest[line_end + 2..];

        if size == 0 {
            return Ok(out);
        }
        // Chunk data is followed by its own CRLF.
        let Some(end) = size.checked_add(2).filter(|end| *end <= rest.len()) else {
            return Err(TransportError::malformed("truncated chunk"));
        };
        out.extend_from_slice(&rest[..size]);
        rest = &rest[end..];
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    #[test]
    fn test_target_parse() {
        let target = Target::parse("http://localhost/api/newdeveloper/lights").unwrap();
        assert_eq!(target.authority, "localhost");
        assert_eq!(target.address, "localhost:80");
        assert_eq!(target.path, "/api/newdeveloper/lights");

        let target = Target::parse("http://[::1]:8080").unwrap();
        assert_eq!(target.address, "[::1]:8080");
        assert_eq!(target.path, "/");
    }

    #[test]
    fn test_target_rejects() {
        assert!(matches!(
            Target::parse("https://bridge/api"),
            Err(TransportError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            Target::parse("bridge/api"),
            Err(TransportError::InvalidUrl(_))
        ));
        assert!(matches!(
            Target::parse("http:///api"),
            Err(TransportError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_parse_plain_response() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"1\":{\"on\":true}}";
        assert_eq!(parse_response(raw).unwrap(), json!({"1": {"on": true}}));
    }

    #[test]
    fn test_parse_chunked_response() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\n[1,2\r\n2\r\n,3\r\n1\r\n]\r\n0\r\n\r\n";
        assert_eq!(parse_response(raw).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_parse_empty_body() {
        let raw = b"HTTP/1.1 204 No Content\r\n\r\n";
        assert_eq!(parse_response(raw).unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_error_status() {
        let raw = b"HTTP/1.1 404 Not Found\r\n\r\nnope";
        match parse_response(raw) {
            Err(TransportError::Status { code, body }) => {
                assert_eq!(code, 404);
                assert_eq!(body, "nope");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_target_rejects_request_line_breakers() {
        for url in [
            "http://bridge/api/u/lights/a b/state",
            "http://bridge/api/u/lights/x\r\nHost: evil/state",
            "http://bri\tdge/api",
        ] {
            assert!(
                matches!(Target::parse(url), Err(TransportError::InvalidUrl(_))),
                "accepted {url:?}"
            );
        }
    }

    #[test]
    fn test_parse_oversized_chunk_size() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nffffffffffffffff\r\nab\r\n0\r\n\r\n";
        assert!(matches!(
            parse_response(raw),
            Err(TransportError::Malformed(_))
        ));

        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n10\r\nab\r\n0\r\n\r\n";
        assert!(matches!(
            parse_response(raw),
            Err(TransportError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_response(b"not http").is_err());
        assert!(parse_response(b"HTTP/1.1 200 OK\r\n\r\n{oops").is_err());
    }

    /// Accept one connection, capture the full request, then send `reply`
    /// and close.
    async fn serve_once(reply: Vec<u8>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(&reply).await.ok();
            socket.shutdown().await.ok();
            request
        });
        (base, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            if let Some(head_end) = find(&raw, b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&raw[..head_end]).to_ascii_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|len| len.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= head_end + 4 + length {
                    return String::from_utf8(raw).unwrap();
                }
            }
            if n == 0 {
                return String::from_utf8(raw).unwrap();
            }
        }
    }

    #[tokio::test]
    async fn test_put_request_on_the_wire() {
        let reply = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n[{\"success\":{}}]";
        let (base, server) = serve_once(reply.to_vec()).await;
        let url = format!("{base}/api/u/lights/1/state");

        let value = HttpClient::new()
            .put(&url, &json!({"on": false}), &JSON_HEADERS)
            .await
            .unwrap();
        assert_eq!(value, json!([{"success": {}}]));

        let host = base.trim_start_matches("http://");
        assert_eq!(
            server.await.unwrap(),
            format!(
                "PUT /api/u/lights/1/state HTTP/1.1\r\n\
                 Host: {host}\r\n\
                 Accept: application/json\r\n\
                 Connection: close\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: 12\r\n\
                 \r\n\
                 {{\"on\":false}}"
            )
        );
    }

    #[tokio::test]
    async fn test_get_request_on_the_wire() {
        let reply = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n2\r\n{}\r\n0\r\n\r\n";
        let (base, server) = serve_once(reply.to_vec()).await;

        let value = HttpClient::new()
            .get(&format!("{base}/api/u/lights"), &[])
            .await
            .unwrap();
        assert_eq!(value, json!({}));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/u/lights HTTP/1.1\r\n"));
        assert!(request.contains("Connection: close\r\n"));
        assert!(!request.contains("Content-Length"));
        assert!(request.ends_with("\r\n\r\n"));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let reply = b"HTTP/1.1 503 Service Unavailable\r\n\r\nbusy";
        let (base, server) = serve_once(reply.to_vec()).await;

        let result = HttpClient::new().get(&format!("{base}/api"), &[]).await;
        assert!(matches!(result, Err(TransportError::Status { code: 503, .. })));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = HttpClient::new().get(&format!("http://{addr}/api"), &[]).await;
        match result {
            Err(TransportError::Socket { action, .. }) => assert_eq!(action, "connect"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_silent_peer_times_out() {
        // Connections queue in the backlog but are never answered.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api", listener.local_addr().unwrap());

        let client = HttpClient::with_timeout(Duration::from_millis(50));
        assert_eq!(client.timeout(), Duration::from_millis(50));
        assert!(matches!(
            client.get(&url, &[]).await,
            Err(TransportError::TimedOut)
        ));
        drop(listener);
    }

    #[tokio::test]
    async fn test_oversized_response_is_cut_off() {
        let mut reply = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
        reply.resize(MAX_RESPONSE_BYTES + 1, b' ');
        let (base, server) = serve_once(reply).await;

        match HttpClient::new().get(&format!("{base}/api"), &[]).await {
            Err(TransportError::Malformed(reason)) => assert!(reason.contains("exceeds")),
            other => panic!("unexpected {other:?}"),
        }
        server.await.unwrap();
    }
}
