use crate::record::{LogLevel, LogRecord};
use chrono::SecondsFormat;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

/// JSON export shape: ISO-8601 timestamp plus a stable field set, so exports
/// stay diffable across runs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRecord<'a> {
    timestamp: String,
    level: LogLevel,
    service: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<&'a str>,
    metadata: &'a BTreeMap<String, String>,
}

impl<'a> From<&'a LogRecord> for ExportRecord<'a> {
    fn from(r: &'a LogRecord) -> Self {
        ExportRecord {
            timestamp: r.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            level: r.level,
            service: &r.service,
            message: &r.message,
            request_id: r.request_id.as_deref(),
            metadata: &r.metadata,
        }
    }
}

/// Raw lines, newline-joined.
pub fn to_text<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    records.into_iter().map(|r| r.raw_line.as_str()).join("\n")
}

pub fn to_json<'a, I>(records: I) -> serde_json::Result<String>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let rows: Vec<ExportRecord> = records.into_iter().map(ExportRecord::from).collect();
    serde_json::to_string_pretty(&rows)
}

/// All fields quoted, embedded quotes doubled.
pub fn to_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut out = String::from("Timestamp,Level,Service,Message,Request ID\n");
    let rows = records
        .into_iter()
        .map(|r| {
            format!(
                "\"{}\",\"{}\",\"{}\",\"{}\",\"{}\"",
                r.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                r.level,
                csv_escape(&r.service),
                csv_escape(&r.message),
                csv_escape(r.request_id.as_deref().unwrap_or("")),
            )
        })
        .join("\n");
    out.push_str(&rows);
    out
}

fn csv_escape(field: &str) -> String {
    field.replace('"', "\"\"")
}
