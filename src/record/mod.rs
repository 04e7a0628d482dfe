//! The per-exchange snapshot handed to the writer once a response completes.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Everything a format variant may need to render one access-log line.
///
/// The middleware layer fills in the request fields up front, updates
/// `status` and `bytes_sent` as the response is written, stamps `time` and
/// `elapsed` on completion, and then hands the record to
/// [`LogWriter::write`](crate::LogWriter::write) exactly once.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    /// Client IP with the port already stripped (see [`strip_port`]).
    pub ip: String,
    /// Completion timestamp, UTC.
    pub time: DateTime<Utc>,
    /// HTTP method ("GET", "POST", ...).
    pub method: String,
    /// Request URI as received.
    pub uri: String,
    /// Protocol version ("HTTP/1.1", ...).
    pub protocol: String,
    /// Final response status code.
    pub status: u16,
    /// Total response body bytes written.
    pub bytes_sent: u64,
    /// Wall-clock time from request start to response completion.
    pub elapsed: Duration,
    /// `Referer` request header, empty if absent.
    pub referer: String,
    /// `User-Agent` request header, empty if absent.
    pub agent: String,
}

impl Default for RequestRecord {
    fn default() -> Self {
        Self {
            ip: String::new(),
            time: DateTime::<Utc>::UNIX_EPOCH,
            method: String::new(),
            uri: String::new(),
            protocol: String::new(),
            status: 200,
            bytes_sent: 0,
            elapsed: Duration::ZERO,
            referer: String::new(),
            agent: String::new(),
        }
    }
}

impl RequestRecord {
    /// The request line as it appears between quotes in the log.
    #[must_use]
    pub fn request_line(&self) -> String {
        [self.method.as_str(), self.uri.as_str(), self.protocol.as_str()].join(" ")
    }
}

/// Drops the `:port` suffix from a remote address.
///
/// Splits on the last colon, so `"127.0.0.1:8080"` becomes `"127.0.0.1"` and
/// a bracketed IPv6 address like `"[::1]:8080"` becomes `"[::1]"`. An address
/// without a colon is returned unchanged.
#[must_use]
pub fn strip_port(remote_addr: &str) -> &str {
    remote_addr
        .rfind(':')
        .map_or(remote_addr, |colon| &remote_addr[..colon])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_port_variants() {
        assert_eq!(strip_port("127.0.0.1:8080"), "127.0.0.1");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
        assert_eq!(strip_port("unix-peer"), "unix-peer");
    }

    #[test]
    fn request_line_joins_with_spaces() {
        let record = RequestRecord {
            method: "GET".to_string(),
            uri: "/index.html".to_string(),
            protocol: "HTTP/1.1".to_string(),
            ..RequestRecord::default()
        };
        assert_eq!(record.request_line(), "GET /index.html HTTP/1.1");
    }
}
