use chrono::{Duration, TimeZone, Utc};
use std::fmt::Write;

/// Deterministic multi-dialect demo corpus, used by the CLI `--sample` flag
/// and by tests that need a realistic mixed batch. Fixed timestamps, no
/// randomness, so repeated loads produce identical stores.
pub fn sample_corpus() -> String {
    let base = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();
    let services = ["api", "auth", "db", "cache", "worker"];
    let mut out = String::new();

    for i in 0..40u32 {
        let ts = base + Duration::seconds(i as i64 * 15);
        let svc = services[(i as usize) % services.len()];
        let stamp = ts.format("%Y-%m-%dT%H:%M:%S%.3fZ");
        match i % 10 {
            0 => {
                let _ = writeln!(
                    out,
                    "{stamp} ERROR [{svc}] Connection timeout after {}ms request_id=req-{:04}",
                    1500 + i * 100,
                    i
                );
            }
            1 => {
                let _ = writeln!(
                    out,
                    "{stamp} WARN [{svc}] Slow query detected duration={}ms",
                    200 + i * 7
                );
            }
            2 => {
                let _ = writeln!(
                    out,
                    "{stamp} INFO [auth] User login succeeded ip=10.0.{}.{} request_id=req-{:04}",
                    i % 4,
                    10 + i,
                    i
                );
            }
            3 => {
                let _ = writeln!(
                    out,
                    r#"{{"timestamp":"{}","level":"info","service":"{svc}","message":"heartbeat ok","request_id":"req-{:04}"}}"#,
                    ts.to_rfc3339(),
                    i
                );
            }
            4 => {
                let _ = writeln!(
                    out,
                    "{} prod-{} {svc}[{}]: checkpoint complete in {}ms",
                    ts.format("%b %d %H:%M:%S"),
                    1 + i % 3,
                    1000 + i,
                    30 + i
                );
            }
            5 => {
                let _ = writeln!(
                    out,
                    "10.1.2.{} - - [{}] \"GET /api/items/{} HTTP/1.1\" {} 512",
                    i % 250,
                    ts.format("%d/%b/%Y:%H:%M:%S +0000"),
                    i,
                    if i % 20 == 5 { 500 } else { 200 }
                );
            }
            6 => {
                let _ = writeln!(
                    out,
                    "{stamp} DEBUG [{svc}] cache miss for key user:{} url=https://internal/{svc}/lookup",
                    i * 13
                );
            }
            7 => {
                let _ = writeln!(
                    out,
                    "{stamp} ERROR [auth] Authentication failed for user u{} ip=192.168.1.{}",
                    i,
                    i % 250
                );
            }
            8 => {
                let _ = writeln!(
                    out,
                    "{stamp} TRACE [{svc}] span 550e8400-e29b-41d4-a716-4466554400{:02} entered",
                    i % 100
                );
            }
            _ => {
                let _ = writeln!(out, "{stamp} INFO [{svc}] request handled status=200");
            }
        }
    }
    out
}
