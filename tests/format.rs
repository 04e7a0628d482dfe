//! Golden-output tests: one fixed record, one expected line per variant.

use accesslog::{LogFormat, RequestRecord};
use chrono::TimeZone;
use std::time::Duration;

fn fixed_record() -> RequestRecord {
    RequestRecord {
        ip: "192.168.0.10".to_string(),
        time: chrono::Utc.with_ymd_and_hms(2024, 5, 29, 10, 53, 19).unwrap(),
        method: "GET".to_string(),
        uri: "/static/logo.png".to_string(),
        protocol: "HTTP/1.1".to_string(),
        status: 304,
        bytes_sent: 0,
        elapsed: Duration::from_millis(3),
        referer: "http://example.com/".to_string(),
        agent: "Mozilla/5.0 (X11; Linux x86_64)".to_string(),
    }
}

#[test]
fn common() {
    assert_eq!(
        LogFormat::Common.render(&fixed_record()),
        "192.168.0.10 - - [29/May/2024 10:53:19] \"GET /static/logo.png HTTP/1.1\" 304 0\n"
    );
}

#[test]
fn common_vhost() {
    assert_eq!(
        LogFormat::CommonVhost.render(&fixed_record()),
        "- 192.168.0.10 - - [29/May/2024 10:53:19] \"GET /static/logo.png HTTP/1.1\" 304 0\n"
    );
}

#[test]
fn combined() {
    assert_eq!(
        LogFormat::Combined.render(&fixed_record()),
        "192.168.0.10 - - [29/May/2024 10:53:19] \"GET /static/logo.png HTTP/1.1\" 304 0 \
         \"http://example.com/\" \"Mozilla/5.0 (X11; Linux x86_64)\"\n"
    );
}

#[test]
fn referer() {
    assert_eq!(
        LogFormat::Referer.render(&fixed_record()),
        "http://example.com/ -> /static/logo.png\n"
    );
}

#[test]
fn agent() {
    assert_eq!(
        LogFormat::Agent.render(&fixed_record()),
        "Mozilla/5.0 (X11; Linux x86_64)\n"
    );
}

#[test]
fn rendering_reports_no_hidden_bytes() {
    let record = fixed_record();
    for format in [
        LogFormat::Common,
        LogFormat::CommonVhost,
        LogFormat::Combined,
        LogFormat::Referer,
        LogFormat::Agent,
    ] {
        let line = format.render(&record);
        assert!(line.ends_with('\n'), "{format:?} must end with a newline");
        assert_eq!(line.matches('\n').count(), 1, "{format:?} must be one line");
    }
}
