use logsift::export::{to_csv, to_json, to_text};
use logsift::store::LogStore;

#[test]
fn text_export_is_the_raw_lines() {
    let mut store = LogStore::new();
    store.load("2024-02-01T10:00:00Z INFO [api] one\nplain two");
    assert_eq!(
        to_text(store.all()),
        "2024-02-01T10:00:00Z INFO [api] one\nplain two"
    );
}

#[test]
fn json_export_carries_the_stable_field_set() {
    let mut store = LogStore::new();
    store.load("2024-02-01T10:00:00Z ERROR [api] failed request_id=abc-123");
    let out = to_json(store.all()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["timestamp"], "2024-02-01T10:00:00.000Z");
    assert_eq!(rows[0]["level"], "ERROR");
    assert_eq!(rows[0]["service"], "api");
    assert_eq!(rows[0]["requestId"], "abc-123");
    assert!(rows[0]["message"].as_str().unwrap().contains("failed"));
}

#[test]
fn csv_export_quotes_and_doubles_embedded_quotes() {
    let mut store = LogStore::new();
    store.load(r#"2024-02-01T10:00:00Z WARN [db] bad value "x" rejected"#);
    let out = to_csv(store.all());
    let mut lines = out.lines();
    assert_eq!(
        lines.next(),
        Some("Timestamp,Level,Service,Message,Request ID")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("\"2024-02-01T10:00:00.000Z\",\"WARN\",\"db\","));
    assert!(row.contains(r#"bad value ""x"" rejected"#));
    assert!(row.ends_with(",\"\""));
}

#[test]
fn csv_export_doubles_quotes_inside_request_ids() {
    let mut store = LogStore::new();
    store.load(r#"{"level":"info","message":"x","request_id":"a\"b"}"#);
    let out = to_csv(store.all());
    let row = out.lines().nth(1).unwrap();
    assert!(row.ends_with(r#","a""b""#));
    assert!(!row.ends_with(r#","a"b""#));
}

#[test]
fn exports_accept_a_filtered_view() {
    let mut store = LogStore::new();
    store.load(
        "2024-02-01T10:00:00Z ERROR [api] boom\n\
         2024-02-01T10:00:01Z INFO [db] fine",
    );
    let spec = logsift::filter::FilterSpec {
        search: "boom".to_string(),
        ..Default::default()
    };
    let matched = store.apply_filter(&spec);
    let out = to_text(matched.iter().copied());
    assert_eq!(out, "2024-02-01T10:00:00Z ERROR [api] boom");
}
