//! logsift - single-pass access-log analytics.
//!
//! Reads one chronologically ordered access log and writes four reports:
//! busiest hosts, busiest 60-minute windows, heaviest resources by bytes
//! transferred, and every request rejected by the failed-login rate limiter.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

mod cli;
mod errors;
mod limiter;
mod models;
mod report;
mod tally;
mod window;

use cli::Cli;
use errors::LogsiftError;
use limiter::RateLimiter;
use models::LogRecord;
use tally::Tally;
use window::{BusyWindowTracker, DEFAULT_TOP_N, WindowCount};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    analyze(&cli)
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Everything accumulated by one pass over the stream, minus the blocked
/// lines (those are appended to their report as they happen).
#[derive(Debug)]
struct Analysis {
    /// host → request count
    hosts: Tally,
    /// resource → bytes transferred
    bandwidth: Tally,
    /// busiest windows, count descending then start ascending
    windows: Vec<WindowCount>,
    /// UTC offset of the first record, reused for window formatting
    tz_offset: Option<String>,
    /// records processed
    records: u64,
    /// records written to the blocked report
    blocked: u64,
}

/// One pass over the input: feed every record to the two tallies, the
/// window tracker, and the rate limiter, appending blocked lines verbatim
/// to `blocked_out` in arrival order.
///
/// An empty input is a valid run; the tracker is built lazily on the first
/// record, so every report simply comes out empty.
fn process<R: BufRead, W: Write>(reader: R, blocked_out: &mut W) -> Result<Analysis, LogsiftError> {
    let mut hosts = Tally::new();
    let mut bandwidth = Tally::new();
    let mut limiter = RateLimiter::new();
    let mut tracker: Option<BusyWindowTracker> = None;
    let mut tz_offset: Option<String> = None;
    let mut records = 0u64;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx as u64 + 1;
        let record = LogRecord::parse(&line, line_no)?;

        hosts.add(&record.host, 1);
        bandwidth.add(record.resource(line_no)?, record.bytes);

        tracker
            .get_or_insert_with(|| BusyWindowTracker::new(record.timestamp, DEFAULT_TOP_N))
            .observe(record.timestamp);
        if tz_offset.is_none() {
            tz_offset = Some(record.tz_offset.clone());
        }

        if limiter
            .observe(&record.host, record.timestamp, &record.reply_code)
            .is_blocked()
        {
            writeln!(blocked_out, "{}", record.raw)?;
        }

        records += 1;
    }

    debug!(
        "pass complete: {} records, {} hosts with limiter state",
        records,
        limiter.tracked_hosts()
    );

    Ok(Analysis {
        hosts,
        bandwidth,
        windows: tracker.map(BusyWindowTracker::finish).unwrap_or_default(),
        tz_offset,
        records,
        blocked: limiter.total_blocked(),
    })
}

/// Open the input and the four report files, run the pass, write results.
fn analyze(cli: &Cli) -> Result<()> {
    let input = File::open(&cli.input)
        .with_context(|| format!("failed to open input {}", cli.input.display()))?;

    let mut blocked_out = BufWriter::new(
        File::create(&cli.blocked_out)
            .with_context(|| format!("failed to create {}", cli.blocked_out.display()))?,
    );

    let analysis = process(BufReader::new(input), &mut blocked_out)?;
    blocked_out
        .flush()
        .context("failed to flush blocked report")?;

    info!(
        "{} records: {} hosts, {} resources, {} windows retained, {} blocked lines",
        analysis.records,
        analysis.hosts.len(),
        analysis.bandwidth.len(),
        analysis.windows.len(),
        analysis.blocked
    );

    let mut hosts_out = BufWriter::new(
        File::create(&cli.hosts_out)
            .with_context(|| format!("failed to create {}", cli.hosts_out.display()))?,
    );
    report::write_hosts(&mut hosts_out, &analysis.hosts.top(DEFAULT_TOP_N))
        .context("failed to write hosts report")?;
    hosts_out.flush().context("failed to flush hosts report")?;
    debug!("wrote {}", cli.hosts_out.display());

    let mut hours_out = BufWriter::new(
        File::create(&cli.hours_out)
            .with_context(|| format!("failed to create {}", cli.hours_out.display()))?,
    );
    report::write_windows(
        &mut hours_out,
        &analysis.windows,
        analysis.tz_offset.as_deref().unwrap_or("+0000"),
    )
    .context("failed to write windows report")?;
    hours_out.flush().context("failed to flush windows report")?;
    debug!("wrote {}", cli.hours_out.display());

    let mut resources_out = BufWriter::new(
        File::create(&cli.resources_out)
            .with_context(|| format!("failed to create {}", cli.resources_out.display()))?,
    );
    report::write_resources(&mut resources_out, &analysis.bandwidth.top(DEFAULT_TOP_N))
        .context("failed to write resources report")?;
    resources_out
        .flush()
        .context("failed to flush resources report")?;
    debug!("wrote {}", cli.resources_out.display());

    Ok(())
}
