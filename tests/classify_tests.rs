use logsift::classify::{classify, Dialect};

#[test]
fn iso_line_with_level_token() {
    assert_eq!(
        classify("2024-02-01T10:15:23.456Z ERROR [api] Connection timeout"),
        Dialect::Iso
    );
    assert_eq!(
        classify("2024-02-01 10:15:23 WARN disk usage at 91%"),
        Dialect::Iso
    );
}

#[test]
fn iso_timestamp_without_level_is_not_iso() {
    // A leading timestamp alone is not enough; the level token is required.
    assert_eq!(
        classify("2024-02-01T10:15:23Z something happened"),
        Dialect::Unstructured
    );
}

#[test]
fn json_object_with_log_keys() {
    assert_eq!(
        classify(r#"{"level":"info","message":"started"}"#),
        Dialect::Json
    );
    assert_eq!(
        classify(r#"{"severity":"warn","msg":"low disk"}"#),
        Dialect::Json
    );
}

#[test]
fn json_object_without_log_keys_falls_through() {
    assert_eq!(classify(r#"{"foo":1,"bar":2}"#), Dialect::Unstructured);
    assert_eq!(classify("{not json}"), Dialect::Unstructured);
}

#[test]
fn syslog_shape() {
    assert_eq!(
        classify("Sep 05 14:20:00 web-1 nginx[123]: upstream timed out"),
        Dialect::Syslog
    );
}

#[test]
fn access_log_shape() {
    assert_eq!(
        classify(r#"192.168.1.10 - - [01/Feb/2024:10:15:23 +0000] "GET /api/users HTTP/1.1" 200 1024"#),
        Dialect::Access
    );
}

#[test]
fn anything_else_is_unstructured() {
    assert_eq!(classify("hello world"), Dialect::Unstructured);
    assert_eq!(classify("   "), Dialect::Unstructured);
}
