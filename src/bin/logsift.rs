use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::Parser;
use logsift::filter::{FilterSpec, Heuristics};
use logsift::record::LogLevel;
use logsift::store::LogStore;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, BufRead, Read};

#[derive(Parser, Debug)]
#[command(name = "logsift", version, about = "In-memory log parsing and triage")]
struct Cli {
    /// Input files (`-` for stdin). May be repeated.
    #[arg(required = false)]
    input: Vec<String>,

    /// Load the built-in demo corpus instead of reading input
    #[arg(long = "sample", default_value_t = false)] sample: bool,

    // Filter flags
    /// Substring (or regex, with --regex) matched against raw lines
    #[arg(long = "match")] search: Option<String>,
    #[arg(long = "regex", default_value_t = false)] regex: bool,
    #[arg(long = "case-sensitive", default_value_t = false)] case_sensitive: bool,
    /// Allowed levels (repeatable); all levels when omitted
    #[arg(long = "level")] level: Vec<String>,
    #[arg(long = "critical-only", default_value_t = false)] critical_only: bool,
    /// Lines mentioning slow operations or timeouts
    #[arg(long = "performance", default_value_t = false)] performance: bool,
    /// Lines mentioning auth or security
    #[arg(long = "security", default_value_t = false)] security: bool,
    /// Inclusive time range bounds (RFC3339)
    #[arg(long = "start")] start: Option<String>,
    #[arg(long = "end")] end: Option<String>,

    /// Print only a specific section: logs | summary | timeline
    #[arg(long = "only")] only: Option<String>,
    #[arg(long = "buckets", default_value_t = logsift::stats::DEFAULT_TARGET_BUCKETS)] buckets: usize,
    /// Render the filtered view as txt | json | csv
    #[arg(long = "export")] export: Option<String>,
    /// Print records sharing a correlation id
    #[arg(long = "related")] related: Option<String>,

    /// Follow stdin and emit periodic summaries (live tail)
    #[arg(long = "follow", default_value_t = false)] follow: bool,
    /// Follow-mode summary interval seconds (emitted on arrival of new input)
    #[arg(long = "interval", default_value_t = 5)] interval: u64,
}

#[derive(Serialize)]
struct Overview {
    summary: logsift::stats::Stats,
    timeline: Vec<logsift::stats::TimelineBucket>,
    total: usize,
    matched: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let spec = build_spec(&cli)?;

    if cli.follow {
        return run_follow(spec, cli.interval);
    }

    let mut store = LogStore::new();
    if cli.sample {
        store.load(&logsift::sample::sample_corpus());
    } else {
        load_inputs(&mut store, &cli.input)?;
    }

    if let Some(id) = &cli.related {
        let hits = store.related(id);
        println!("{}", logsift::export::to_json(hits)?);
        return Ok(());
    }

    let matched = store.apply_filter(&spec);

    if let Some(format) = &cli.export {
        let rows = matched.iter().copied();
        match format.as_str() {
            "txt" => println!("{}", logsift::export::to_text(rows)),
            "json" => println!("{}", logsift::export::to_json(rows)?),
            "csv" => println!("{}", logsift::export::to_csv(rows)),
            other => bail!("unknown export format: {other}"),
        }
        return Ok(());
    }

    match cli.only.as_deref() {
        Some("logs") => {
            println!(
                "{}",
                serde_json::to_string_pretty(&matched)?
            );
        }
        Some("summary") => {
            let stats = logsift::stats::summarize(matched.iter().copied());
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Some("timeline") => {
            let buckets = logsift::stats::timeline(matched.iter().copied(), cli.buckets);
            println!("{}", serde_json::to_string_pretty(&buckets)?);
        }
        Some(other) => bail!("unknown section: {other}"),
        None => {
            let out = Overview {
                summary: logsift::stats::summarize(matched.iter().copied()),
                timeline: logsift::stats::timeline(matched.iter().copied(), cli.buckets),
                total: store.len(),
                matched: matched.len(),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn build_spec(cli: &Cli) -> anyhow::Result<FilterSpec> {
    let mut spec = FilterSpec::default();
    if let Some(s) = &cli.search {
        spec.search = s.clone();
    }
    spec.use_regex = cli.regex;
    spec.case_sensitive = cli.case_sensitive;
    if !cli.level.is_empty() {
        let mut levels = BTreeSet::new();
        for raw in &cli.level {
            let lvl = LogLevel::parse_token(raw)
                .with_context(|| format!("unknown level: {raw}"))?;
            levels.insert(lvl);
        }
        spec.levels = levels;
    }
    spec.heuristics = Heuristics {
        critical_only: cli.critical_only,
        performance_issues: cli.performance,
        security_events: cli.security,
        user_actions: false,
    };
    spec.time_range = match (&cli.start, &cli.end) {
        (None, None) => None,
        (start, end) => {
            let lower = match start {
                Some(s) => parse_bound(s)?,
                None => DateTime::<Utc>::MIN_UTC,
            };
            let upper = match end {
                Some(s) => parse_bound(s)?,
                None => DateTime::<Utc>::MAX_UTC,
            };
            Some((lower, upper))
        }
    };
    Ok(spec)
}

fn parse_bound(s: &str) -> anyhow::Result<DateTime<Utc>> {
    logsift::extract::parse_timestamp(s).with_context(|| format!("bad timestamp: {s}"))
}

fn load_inputs(store: &mut LogStore, inputs: &[String]) -> anyhow::Result<()> {
    if inputs.is_empty() {
        bail!("no input given (pass files, `-` for stdin, or --sample)");
    }
    for (i, path) in inputs.iter().enumerate() {
        let bytes = if path == "-" {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            buf
        } else {
            fs::read(path).with_context(|| format!("reading {path}"))?
        };
        let result = if i == 0 {
            store.load_bytes(&bytes)?
        } else {
            store.append_bytes(&bytes)?
        };
        eprintln!("[logsift] {path}: {} records", result.count);
    }
    Ok(())
}

fn run_follow(spec: FilterSpec, interval_secs: u64) -> anyhow::Result<()> {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    let running = Arc::new(AtomicBool::new(true));
    {
        let r = running.clone();
        let _ = ctrlc::set_handler(move || {
            r.store(false, Ordering::SeqCst);
        });
    }

    let mut store = LogStore::new();
    let stdin = io::stdin();
    let mut reader = stdin.lock().lines();
    let mut last_emit = Instant::now();
    loop {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        match reader.next() {
            Some(Ok(line)) => {
                store.append(&line);
                if last_emit.elapsed() >= Duration::from_secs(interval_secs) {
                    emit_status(&store, &spec);
                    last_emit = Instant::now();
                }
            }
            Some(Err(_)) => {}
            None => {
                std::thread::sleep(Duration::from_millis(200));
                if last_emit.elapsed() >= Duration::from_secs(interval_secs) {
                    emit_status(&store, &spec);
                    last_emit = Instant::now();
                }
            }
        }
    }
    let matched = store.apply_filter(&spec);
    let out = Overview {
        summary: logsift::stats::summarize(matched.iter().copied()),
        timeline: logsift::stats::timeline(
            matched.iter().copied(),
            logsift::stats::DEFAULT_TARGET_BUCKETS,
        ),
        total: store.len(),
        matched: matched.len(),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn emit_status(store: &LogStore, spec: &FilterSpec) {
    let matched = store.apply_filter(spec).len();
    let stats = store.summarize();
    eprintln!(
        "[tail] lines={} matched={} errors={} rate={:.2}%",
        stats.total_logs, matched, stats.error_count, stats.error_rate
    );
}
