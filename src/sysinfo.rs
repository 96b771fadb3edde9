//! Host-wide constants and boot-relative uptime.
//!
//! Clock ticks per second and the memory page size are fixed for the life of
//! the host process, so they are queried once at provider construction and
//! reused by every calculation.

use std::path::Path;

use tracing::warn;

use crate::error::UsageError;

/// Fallback when sysconf cannot report the scheduler tick rate.
const DEFAULT_HERTZ: u64 = 100;

/// Fallback when sysconf cannot report the page size.
const DEFAULT_PAGE_SIZE: u64 = 4096;

/// Host-wide constants needed to normalize raw tick/page counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemInfo {
    /// Kernel scheduler ticks per second (usually 100, but can vary).
    pub hertz: u64,
    /// Memory page size in bytes.
    pub page_size: u64,
}

impl SystemInfo {
    /// Queries hertz and page size from the host via sysconf.
    ///
    /// Falls back to the common defaults (100 Hz, 4096-byte pages) when the
    /// query fails, which keeps construction total on exotic hosts.
    pub fn host() -> Self {
        Self {
            hertz: sysconf_positive(libc::_SC_CLK_TCK, DEFAULT_HERTZ, "_SC_CLK_TCK"),
            page_size: sysconf_positive(libc::_SC_PAGESIZE, DEFAULT_PAGE_SIZE, "_SC_PAGESIZE"),
        }
    }
}

fn sysconf_positive(name: libc::c_int, fallback: u64, label: &str) -> u64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with a valid _SC_* constant.
        // Returns -1 on error, 0 if undefined - both handled by the > 0 check
        let value = unsafe { libc::sysconf(name) };
        if value > 0 {
            return value as u64;
        }
        warn!("sysconf({}) unavailable, using fallback {}", label, fallback);
    }
    fallback
}

/// Reads uptime (fractional seconds since boot) from a single-line
/// "<uptime> <idle>" source such as /proc/uptime.
pub async fn read_uptime(path: &Path) -> Result<f64, UsageError> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_uptime(&content)
}

/// Parses the first whitespace-delimited token of an uptime line.
pub fn parse_uptime(content: &str) -> Result<f64, UsageError> {
    let token = content
        .split_whitespace()
        .next()
        .ok_or_else(|| UsageError::Format("uptime source is empty".to_string()))?;

    token
        .parse::<f64>()
        .map_err(|e| UsageError::Format(format!("uptime token {:?} is not a number: {}", token, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_constants_are_positive() {
        let info = SystemInfo::host();
        assert!(info.hertz > 0);
        assert!(info.page_size > 0);
    }

    #[test]
    fn test_parse_uptime() {
        // Typical /proc/uptime format: "<uptime_seconds> <idle_seconds>"
        let uptime = parse_uptime("35754.79 1134204.12\n").expect("valid uptime line");
        assert!((uptime - 35754.79).abs() < 1e-9);
    }

    #[test]
    fn test_parse_uptime_single_token() {
        let uptime = parse_uptime("120.5").expect("single token is enough");
        assert!((uptime - 120.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_uptime_empty() {
        let result = parse_uptime("   \n");
        assert!(matches!(result, Err(UsageError::Format(_))));
    }

    #[test]
    fn test_parse_uptime_not_a_number() {
        let result = parse_uptime("up 35754.79");
        assert!(matches!(result, Err(UsageError::Format(_))));
    }

    #[tokio::test]
    async fn test_read_uptime_missing_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = read_uptime(&dir.path().join("uptime")).await;
        assert!(matches!(result, Err(UsageError::Io(_))));
    }
}
