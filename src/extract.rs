use crate::classify::{Dialect, RE_ACCESS_LINE, RE_ISO_LINE, RE_SYSLOG_LINE};
use crate::record::{LogLevel, LogRecord};
use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

/// Extraction output before the store assigns `id` and `line_number`.
#[derive(Debug, Clone)]
pub struct DraftRecord {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub service: String,
    pub message: String,
    pub request_id: Option<String>,
    pub metadata: BTreeMap<String, String>,
    pub raw_line: String,
}

impl DraftRecord {
    pub fn into_record(self, id: u64, line_number: usize) -> LogRecord {
        LogRecord {
            id,
            line_number,
            timestamp: self.timestamp,
            level: self.level,
            service: self.service,
            message: self.message,
            request_id: self.request_id,
            metadata: self.metadata,
            raw_line: self.raw_line,
        }
    }
}

pub const UNKNOWN_SERVICE: &str = "unknown";

static RE_UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b")
        .unwrap()
});

// `request_id=abc-123`, `req_id: abc`, `"requestId":"abc"` all match.
static RE_REQ_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\breq(?:uest)?[_-]?id\b["']?\s*[:=]\s*["'\[]?(?P<id>[A-Za-z0-9][A-Za-z0-9._-]*)"#)
        .unwrap()
});

// Generic `key=value` / `key: value` scan for auxiliary fields.
static RE_KV_AUX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?P<key>ip|status(?:_?code)?|duration(?:_?ms)?|url|uri)\s*[:=]\s*"?(?P<val>[^\s,;"']+)"#)
        .unwrap()
});

static RE_BARE_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+(?:\.\d+)?(?:ms|µs|us|ns|s)\b").unwrap()
});

static RE_BARE_IPV4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\b")
        .unwrap()
});

static RE_BARE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b[a-zA-Z][a-zA-Z0-9+.-]*://[^\s"']+"#).unwrap()
});

static RE_LEVEL_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(ERROR|ERR|FATAL|CRITICAL|CRIT|WARN|WARNING|INFO|NOTICE|DEBUG|TRACE)\b")
        .unwrap()
});

/// Extract all fields a line carries for its dialect. Never fails: missing
/// or malformed pieces fall back to defaults (`ingested_at`, `Info`,
/// `"unknown"`), so every required field is always present.
pub fn extract(line: &str, dialect: Dialect, ingested_at: DateTime<Utc>) -> DraftRecord {
    let trimmed = line.trim();
    let mut draft = match dialect {
        Dialect::Iso => extract_iso(trimmed, ingested_at),
        Dialect::Json => extract_json(trimmed, ingested_at),
        Dialect::Syslog => extract_syslog(trimmed, ingested_at),
        Dialect::Access => extract_access(trimmed, ingested_at),
        Dialect::Unstructured => extract_unstructured(trimmed, ingested_at),
    };
    draft.raw_line = line.to_string();
    if draft.request_id.is_none() {
        draft.request_id = detect_request_id(trimmed);
    }
    let residual = draft.message.clone();
    scan_aux_metadata(&residual, &mut draft.metadata);
    draft
}

/// UUID-shaped token first, then a labelled `request_id`/`req_id` token;
/// first match wins, case-insensitive.
pub fn detect_request_id(line: &str) -> Option<String> {
    if let Some(m) = RE_UUID.find(line) {
        return Some(m.as_str().to_string());
    }
    RE_REQ_LABEL
        .captures(line)
        .map(|c| c["id"].to_string())
}

// Secondary generic scan over the residual message; dialect-extracted
// values are never overwritten.
fn scan_aux_metadata(message: &str, metadata: &mut BTreeMap<String, String>) {
    for caps in RE_KV_AUX.captures_iter(message) {
        let key = match caps["key"].to_ascii_lowercase().as_str() {
            "ip" => "ip",
            "url" | "uri" => "url",
            k if k.starts_with("status") => "statusCode",
            k if k.starts_with("duration") => "duration",
            _ => continue,
        };
        metadata
            .entry(key.to_string())
            .or_insert_with(|| caps["val"].to_string());
    }
    if !metadata.contains_key("duration") {
        if let Some(m) = RE_BARE_DURATION.find(message) {
            metadata.insert("duration".to_string(), m.as_str().to_string());
        }
    }
    if !metadata.contains_key("ip") {
        if let Some(m) = RE_BARE_IPV4.find(message) {
            metadata.insert("ip".to_string(), m.as_str().to_string());
        }
    }
    if !metadata.contains_key("url") {
        if let Some(m) = RE_BARE_URL.find(message) {
            metadata.insert("url".to_string(), m.as_str().to_string());
        }
    }
}

fn empty_draft(ingested_at: DateTime<Utc>) -> DraftRecord {
    DraftRecord {
        timestamp: ingested_at,
        level: LogLevel::Info,
        service: UNKNOWN_SERVICE.to_string(),
        message: String::new(),
        request_id: None,
        metadata: BTreeMap::new(),
        raw_line: String::new(),
    }
}

fn extract_iso(line: &str, ingested_at: DateTime<Utc>) -> DraftRecord {
    let mut draft = empty_draft(ingested_at);
    let Some(caps) = RE_ISO_LINE.captures(line) else {
        draft.message = line.to_string();
        return draft;
    };
    if let Some(ts) = parse_timestamp(&caps["ts"]) {
        draft.timestamp = ts;
    }
    draft.level = LogLevel::parse_token(&caps["level"]).unwrap_or(LogLevel::Info);
    if let Some(svc) = caps.name("svc") {
        draft.service = svc.as_str().to_string();
    }
    draft.message = caps["rest"].to_string();
    draft
}

fn extract_json(line: &str, ingested_at: DateTime<Utc>) -> DraftRecord {
    let mut draft = empty_draft(ingested_at);
    let Ok(v @ Value::Object(_)) = serde_json::from_str::<Value>(line) else {
        draft.message = line.to_string();
        return draft;
    };
    let mut flat = BTreeMap::new();
    flatten_json("", &v, &mut flat);

    if let Some(lvl) = first_of(&flat, &["level", "severity", "log.level", "lvl"])
        .and_then(|s| LogLevel::parse_token(s))
    {
        draft.level = lvl;
    }
    draft.message = first_of(&flat, &["message", "msg"])
        .map(|s| s.to_string())
        .unwrap_or_else(|| line.to_string());
    if let Some(svc) = first_of(
        &flat,
        &["service", "app", "application", "component", "logger", "service.name"],
    ) {
        draft.service = svc.to_string();
    }
    draft.request_id = first_of(&flat, &["request_id", "requestId", "req_id", "reqId"])
        .map(|s| s.to_string());

    // timestamp: hinted keys first, then any value that parses
    for key in ["timestamp", "time", "ts", "@timestamp", "datetime"] {
        if let Some(t) = flat.get(key).and_then(|s| parse_ts_candidate(s)) {
            draft.timestamp = t;
            break;
        }
    }

    for (key, flat_keys) in [
        ("ip", &["ip", "client_ip", "remote_addr"][..]),
        ("statusCode", &["status", "status_code", "statusCode"][..]),
        ("duration", &["duration", "duration_ms", "elapsed"][..]),
        ("url", &["url", "uri", "path"][..]),
        ("host", &["host", "hostname"][..]),
    ] {
        if let Some(val) = first_of(&flat, flat_keys) {
            draft.metadata.insert(key.to_string(), val.to_string());
        }
    }
    draft
}

fn extract_syslog(line: &str, ingested_at: DateTime<Utc>) -> DraftRecord {
    let mut draft = empty_draft(ingested_at);
    let Some(caps) = RE_SYSLOG_LINE.captures(line) else {
        draft.message = line.to_string();
        return draft;
    };
    let candidate = format!(
        "{} {} {} {}",
        ingested_at.year(),
        &caps["mon"],
        &caps["day"],
        &caps["time"]
    );
    if let Ok(naive) = NaiveDateTime::parse_from_str(&candidate, "%Y %b %d %H:%M:%S") {
        draft.timestamp = Utc.from_utc_datetime(&naive);
    }
    let proc = &caps["proc"];
    draft.service = match proc.find('[') {
        Some(pos) => proc[..pos].to_string(),
        None => proc.to_string(),
    };
    draft
        .metadata
        .insert("host".to_string(), caps["host"].to_string());
    let rest = caps["rest"].to_string();
    if let Some(lvl) = RE_LEVEL_TOKEN
        .find(&rest)
        .and_then(|m| LogLevel::parse_token(m.as_str()))
    {
        draft.level = lvl;
    }
    draft.message = rest;
    draft
}

fn extract_access(line: &str, ingested_at: DateTime<Utc>) -> DraftRecord {
    let mut draft = empty_draft(ingested_at);
    let Some(caps) = RE_ACCESS_LINE.captures(line) else {
        draft.message = line.to_string();
        return draft;
    };
    // `01/Feb/2024:10:15:23 +0000`
    if let Ok(dt) = DateTime::parse_from_str(&caps["ts"], "%d/%b/%Y:%H:%M:%S %z") {
        draft.timestamp = dt.with_timezone(&Utc);
    }
    let status = caps["status"].to_string();
    draft.level = match status.as_bytes().first() {
        Some(b'5') => LogLevel::Error,
        Some(b'4') => LogLevel::Warn,
        _ => LogLevel::Info,
    };
    draft.service = "access".to_string();
    draft.message = format!("{} {} {}", &caps["method"], &caps["path"], status);
    draft.metadata.insert("ip".to_string(), caps["ip"].to_string());
    draft.metadata.insert("statusCode".to_string(), status);
    draft
        .metadata
        .insert("url".to_string(), caps["path"].to_string());
    if &caps["size"] != "-" {
        draft
            .metadata
            .insert("size".to_string(), caps["size"].to_string());
    }
    draft
}

fn extract_unstructured(line: &str, ingested_at: DateTime<Utc>) -> DraftRecord {
    let mut draft = empty_draft(ingested_at);
    draft.message = line.to_string();
    if let Some(ts) = detect_timestamp_in_text(line) {
        draft.timestamp = ts;
    }
    if let Some(lvl) = RE_LEVEL_TOKEN
        .find(line)
        .and_then(|m| LogLevel::parse_token(m.as_str()))
    {
        draft.level = lvl;
    }
    draft
}

fn first_of<'a>(flat: &'a BTreeMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| flat.get(*k).map(|s| s.as_str()).filter(|s| !s.is_empty()))
}

fn flatten_json(prefix: &str, v: &Value, out: &mut BTreeMap<String, String>) {
    match v {
        Value::Object(map) => {
            for (k, v) in map.iter() {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten_json(&key, v, out);
            }
        }
        Value::Array(arr) => {
            for (idx, item) in arr.iter().enumerate() {
                let key = if prefix.is_empty() {
                    idx.to_string()
                } else {
                    format!("{prefix}.{idx}")
                };
                flatten_json(&key, item, out);
            }
        }
        Value::Null => {
            out.insert(prefix.to_string(), "null".to_string());
        }
        Value::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        Value::Number(n) => {
            out.insert(prefix.to_string(), n.to_string());
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
    }
}

fn parse_ts_candidate(s: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(s).or_else(|| parse_epoch_string(s))
}

/// RFC3339 first, then common timestamp layouts; naive values are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let tz_fmts = [
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
    ];
    for f in tz_fmts.iter() {
        if let Ok(dt) = DateTime::parse_from_str(s, f) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    let naive_fmts = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];
    for f in naive_fmts.iter() {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, f) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    None
}

fn parse_epoch_string(s: &str) -> Option<DateTime<Utc>> {
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match s.len() {
        10 => s
            .parse::<i64>()
            .ok()
            .and_then(|sec| DateTime::<Utc>::from_timestamp(sec, 0)),
        13 => s.parse::<i64>().ok().and_then(|ms| {
            DateTime::<Utc>::from_timestamp(ms / 1000, ((ms % 1000) as u32) * 1_000_000)
        }),
        16 => s.parse::<i64>().ok().and_then(|us| {
            DateTime::<Utc>::from_timestamp(us / 1_000_000, ((us % 1_000_000) as u32) * 1_000)
        }),
        _ => None,
    }
}

static RE_ISO_ANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d{1,9})?(?:Z|[+-]\d{2}:?\d{2})?\b",
    )
    .unwrap()
});

/// Best-effort timestamp search anywhere in an unstructured line.
pub fn detect_timestamp_in_text(s: &str) -> Option<DateTime<Utc>> {
    RE_ISO_ANY
        .find(s)
        .and_then(|m| parse_timestamp(m.as_str()))
}
