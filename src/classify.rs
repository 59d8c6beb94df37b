use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// A recognized raw-line shape, used to pick the extraction strategy.
/// Detection is per line with no schema; the order of `classify` is a
/// fixed priority list, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Iso,
    Json,
    Syslog,
    Access,
    Unstructured,
}

// RFC3339-ish timestamp at line start, then a level token (optionally
// bracketed), then an optional [service] tag.
// Supports: 2024-02-01T10:15:23.456Z, 2024-02-01 10:15:23+01:00
pub(crate) static RE_ISO_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<ts>\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d{1,9})?(?:Z|[+-]\d{2}:?\d{2})?)\s+\[?(?P<level>(?i:ERROR|ERR|FATAL|CRITICAL|CRIT|WARN|WARNING|INFO|NOTICE|DEBUG|TRACE))\b\]?:?\s*(?:\[(?P<svc>[^\]]+)\]:?\s*)?(?P<rest>.*)$"#,
    )
    .unwrap()
});

// `Sep 05 14:20:00 host app[123]: message`
pub(crate) static RE_SYSLOG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<mon>Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+(?P<day>\d{1,2})\s+(?P<time>\d{2}:\d{2}:\d{2})\s+(?P<host>\S+)\s+(?P<proc>[^:\s]+):\s?(?P<rest>.*)$",
    )
    .unwrap()
});

// Combined/common access log: `ip - - [date] "METHOD path proto" status size`
pub(crate) static RE_ACCESS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<ip>\d{1,3}(?:\.\d{1,3}){3})\s+\S+\s+\S+\s+\[(?P<ts>[^\]]+)\]\s+"(?P<method>[A-Z]+)\s+(?P<path>\S+)\s+(?P<proto>[^"]*)"\s+(?P<status>\d{3})\s+(?P<size>\S+)"#,
    )
    .unwrap()
});

fn looks_like_json_log(trimmed: &str) -> bool {
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return false;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => ["level", "severity", "message", "msg"]
            .iter()
            .any(|k| map.contains_key(*k)),
        _ => false,
    }
}

/// Pure function of the line content; unstructured fallback always succeeds.
pub fn classify(line: &str) -> Dialect {
    let t = line.trim();
    if RE_ISO_LINE.is_match(t) {
        return Dialect::Iso;
    }
    if looks_like_json_log(t) {
        return Dialect::Json;
    }
    if RE_SYSLOG_LINE.is_match(t) {
        return Dialect::Syslog;
    }
    if RE_ACCESS_LINE.is_match(t) {
        return Dialect::Access;
    }
    Dialect::Unstructured
}
