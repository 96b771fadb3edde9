//! Provider for platforms without a virtual process filesystem.
//!
//! Invokes the system `ps` command and parses its tabular output. Column
//! order varies across OS releases, so the header row is parsed into a
//! name-to-index mapping instead of assuming fixed positions.

use tokio::process::Command;
use tracing::debug;

use crate::calc::UsageResult;
use crate::error::UsageError;
use crate::providers::LookupOptions;

/// ps reports RSS in kilobytes.
const RSS_COLUMN_KB: u64 = 1024;

/// Usage lookups backed by `ps -o pid,rss,pcpu -p <pid>`.
///
/// The kernel already recency-weights the pcpu column, so `keep_history` is
/// accepted but has no effect and `clear_history` is a no-op.
#[derive(Debug, Default)]
pub struct PsProvider;

impl PsProvider {
    pub fn new() -> Self {
        Self
    }

    /// Single point query via the external status command.
    pub async fn lookup(&self, pid: u32, _options: LookupOptions) -> Result<UsageResult, UsageError> {
        let output = Command::new("ps")
            .args(["-o", "pid,rss,pcpu", "-p", &pid.to_string()])
            .output()
            .await?;

        // ps exits non-zero when the PID does not exist.
        if !output.status.success() {
            debug!("ps exited with {:?} for pid {}", output.status.code(), pid);
            return Err(UsageError::NoSuchProcess(pid));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_ps_table(&stdout, pid)
    }
}

/// Parses a header line plus exactly one data row into a usage result,
/// verifying the row belongs to the requested PID.
pub fn parse_ps_table(output: &str, expected_pid: u32) -> Result<UsageResult, UsageError> {
    let mut lines = output.lines().filter(|l| !l.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| UsageError::Format("status command produced no output".to_string()))?;
    let columns: Vec<&str> = header.split_whitespace().collect();
    let column = |name: &str| -> Result<usize, UsageError> {
        columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                UsageError::Format(format!("status header {:?} has no {} column", header, name))
            })
    };
    let pid_col = column("PID")?;
    let rss_col = column("RSS")?;
    let cpu_col = column("%CPU")?;

    let row = lines.next().ok_or(UsageError::NoSuchProcess(expected_pid))?;
    let fields: Vec<&str> = row.split_whitespace().collect();
    let field = |index: usize, name: &str| -> Result<&str, UsageError> {
        fields.get(index).copied().ok_or_else(|| {
            UsageError::Parse(format!("status row {:?} has no {} field", row, name))
        })
    };

    let pid: u32 = field(pid_col, "PID")?
        .parse()
        .map_err(|e| UsageError::Parse(format!("PID field is not an integer: {}", e)))?;
    if pid != expected_pid {
        return Err(UsageError::InvalidPid {
            expected: expected_pid,
            actual: pid,
        });
    }

    let rss_kb: u64 = field(rss_col, "RSS")?
        .parse()
        .map_err(|e| UsageError::Parse(format!("RSS field is not an integer: {}", e)))?;
    let cpu: f64 = field(cpu_col, "%CPU")?
        .parse()
        .map_err(|e| UsageError::Parse(format!("%CPU field is not a number: {}", e)))?;

    Ok(UsageResult {
        cpu,
        memory: rss_kb * RSS_COLUMN_KB,
    })
}
