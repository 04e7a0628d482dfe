//! The five Apache-style line layouts and their rendering rules.
//!
//! The set is closed, so the variants live in one enum dispatched through a
//! single rendering function rather than behind a trait object. Layouts
//! follow Apache's `mod_log_config` formats and must stay byte-for-byte
//! stable; downstream log parsers depend on the exact punctuation.

use crate::record::RequestRecord;
use serde::Deserialize;

/// Timestamp layout inside the `[...]` brackets (12-hour clock).
const TIME_FORMAT: &str = "%d/%b/%Y %I:%M:%S";

/// One of the fixed Apache-style access-log line layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Common Log Format: `%h %l %u %t "%r" %>s %b`.
    #[default]
    Common,
    /// Common Log Format with a leading virtual-host field:
    /// `%v %h %l %u %t "%r" %>s %b`. Virtual-host data is unavailable here,
    /// so the field renders as `-`.
    CommonVhost,
    /// NCSA combined: common plus quoted `Referer` and `User-Agent`.
    Combined,
    /// Referer log: `%{Referer}i -> %U`.
    Referer,
    /// Agent log: `%{User-agent}i`.
    Agent,
}

impl LogFormat {
    /// Renders `record` as one log line, trailing newline included.
    ///
    /// Pure; performs no I/O. The rendered byte length is what the writer
    /// accounts against the rotation threshold.
    #[must_use]
    pub fn render(self, record: &RequestRecord) -> String {
        let time = record.time.format(TIME_FORMAT);
        let request = record.request_line();

        match self {
            Self::Common => format!(
                "{} - - [{time}] \"{request}\" {} {}\n",
                record.ip, record.status, record.bytes_sent
            ),
            Self::CommonVhost => format!(
                "- {} - - [{time}] \"{request}\" {} {}\n",
                record.ip, record.status, record.bytes_sent
            ),
            Self::Combined => format!(
                "{} - - [{time}] \"{request}\" {} {} \"{}\" \"{}\"\n",
                record.ip, record.status, record.bytes_sent, record.referer, record.agent
            ),
            Self::Referer => format!("{} -> {}\n", record.referer, record.uri),
            Self::Agent => format!("{}\n", record.agent),
        }
    }
}
