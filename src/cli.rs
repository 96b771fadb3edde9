//! CLI arguments for the procusage binary.
//!
//! This module defines the command-line interface structure using the clap
//! library.

use clap::{Parser, ValueEnum};

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "procusage",
    about = "Report a process's CPU utilization and resident memory",
    long_about = "Report a process's CPU utilization and resident memory.\n\n\
                  A single invocation reports the lifetime-average CPU percentage. With \
                  --interval the target is polled repeatedly and every sample after the \
                  first reports CPU over the window since the previous sample.",
    author = "Michael Moll <exporter@herakles.now> - Herakles",
    version = "0.1.0"
)]
pub struct Args {
    /// Process ID to look up
    pub pid: u32,

    /// Poll every N seconds (windowed CPU after the first sample)
    #[arg(short = 'i', long)]
    pub interval: Option<u64>,

    /// Stop after N samples (only with --interval; default: run until killed)
    #[arg(short = 'n', long)]
    pub count: Option<u64>,

    /// Emit one JSON object per sample instead of human-readable text
    #[arg(long)]
    pub json: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["procusage", "1234"]).expect("pid only");
        assert_eq!(args.pid, 1234);
        assert!(args.interval.is_none());
        assert!(!args.json);
    }

    #[test]
    fn test_parse_polling() {
        let args = Args::try_parse_from(["procusage", "1234", "-i", "2", "-n", "5", "--json"])
            .expect("polling flags");
        assert_eq!(args.interval, Some(2));
        assert_eq!(args.count, Some(5));
        assert!(args.json);
    }

    #[test]
    fn test_pid_is_required() {
        assert!(Args::try_parse_from(["procusage"]).is_err());
    }
}
