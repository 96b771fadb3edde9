//! procusage - version 0.1.0
//!
//! Command-line wrapper around the usage library: look up one PID's CPU and
//! memory once, or poll it at an interval with history enabled.

mod cli;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

use cli::{Args, LogLevel};
use procusage::{LookupOptions, UsageMonitor, UsageResult};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_sample(pid: u32, usage: &UsageResult, json: bool) -> anyhow::Result<()> {
    if json {
        let line = serde_json::to_string(usage).context("serialize usage result")?;
        println!("{}", line);
    } else {
        println!(
            "pid {}: cpu {:.2}%  memory {} bytes ({:.1} MiB)",
            pid,
            usage.cpu,
            usage.memory,
            usage.memory as f64 / (1024.0 * 1024.0)
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(&args);

    let monitor = UsageMonitor::new();

    let Some(interval) = args.interval else {
        let usage = monitor.lookup(args.pid, LookupOptions::default()).await?;
        return print_sample(args.pid, &usage, args.json);
    };

    // Polling mode: keep history so every sample after the first reports
    // CPU over the window since the previous one.
    let opts = LookupOptions { keep_history: true };
    let mut remaining = args.count;
    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));

    loop {
        ticker.tick().await;
        let usage = monitor.lookup(args.pid, opts).await?;
        print_sample(args.pid, &usage, args.json)?;

        if let Some(n) = remaining.as_mut() {
            *n = n.saturating_sub(1);
            if *n == 0 {
                break;
            }
        }
    }

    Ok(())
}
