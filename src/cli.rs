//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing. All five paths are required
//! positionals; clap rejects any other argument count with a usage message
//! before any file is opened.

use std::path::PathBuf;

use clap::Parser;

/// Single-pass access-log analytics.
///
/// Reads one access log in chronological order and writes four reports:
/// busiest hosts, busiest 60-minute windows, heaviest resources by bytes,
/// and every request rejected by the failed-login block.
#[derive(Parser, Debug)]
#[command(name = "logsift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input access log (chronologically ordered)
    pub input: PathBuf,

    /// Output path for the top-10 hosts report
    pub hosts_out: PathBuf,

    /// Output path for the top-10 busiest-windows report
    pub hours_out: PathBuf,

    /// Output path for the top-10 resources-by-bytes report
    pub resources_out: PathBuf,

    /// Output path for the blocked-requests report
    pub blocked_out: PathBuf,

    /// Enable verbose debug logging
    #[arg(long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_paths_parse() {
        let cli = Cli::try_parse_from([
            "logsift",
            "log.txt",
            "hosts.txt",
            "hours.txt",
            "resources.txt",
            "blocked.txt",
        ])
        .expect("five positionals must parse");

        assert_eq!(cli.input, PathBuf::from("log.txt"));
        assert_eq!(cli.blocked_out, PathBuf::from("blocked.txt"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_wrong_arity_is_usage_error() {
        assert!(Cli::try_parse_from(["logsift", "log.txt"]).is_err());
        assert!(Cli::try_parse_from([
            "logsift", "a", "b", "c", "d", "e", "f"
        ])
        .is_err());
    }
}
