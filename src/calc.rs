//! Turns raw tick/page counts into a normalized usage result.
//!
//! Two CPU semantics coexist: lifetime average (total CPU time over the
//! process age) and windowed/incremental (CPU time delta over the elapsed
//! time since the previous sample). Memory is always point-in-time.

use serde::Serialize;

use crate::error::UsageError;
use crate::history::HistorySnapshot;
use crate::stat::ProcessStat;
use crate::sysinfo::SystemInfo;

/// CPU percentage and resident memory for one lookup.
///
/// `cpu` is unbounded above 100 for multi-threaded processes keeping more
/// than one core busy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsageResult {
    /// CPU utilization in percent.
    pub cpu: f64,
    /// Resident memory in bytes.
    pub memory: u64,
}

/// Cumulative CPU time of a snapshot, in seconds.
pub fn total_cpu_seconds(info: SystemInfo, stat: &ProcessStat) -> f64 {
    (stat.stime + stat.utime) as f64 / info.hertz as f64
}

/// Average CPU utilization since the process started.
///
/// Returns 0.0 when the process age is not strictly positive (just-started
/// process or clock skew): the process genuinely has no measurable age yet,
/// so this is not an error.
pub fn lifetime_cpu_percent(info: SystemInfo, uptime: f64, stat: &ProcessStat) -> f64 {
    let total = total_cpu_seconds(info, stat);
    let age = uptime - stat.start_time as f64 / info.hertz as f64;
    if age <= 0.0 {
        return 0.0;
    }
    total / age * 100.0
}

/// CPU utilization over the window since the previous sample.
///
/// Fails with [`UsageError::InvalidSamplingWindow`] when the elapsed uptime
/// is not strictly positive; unlike the lifetime case that is a caller error
/// (resampling too fast, or a clock regression) and must be surfaced.
pub fn windowed_cpu_percent(
    info: SystemInfo,
    uptime: f64,
    stat: &ProcessStat,
    previous: &HistorySnapshot,
) -> Result<f64, UsageError> {
    let elapsed = uptime - previous.uptime;
    if elapsed <= 0.0 {
        return Err(UsageError::InvalidSamplingWindow { elapsed });
    }
    let delta = total_cpu_seconds(info, stat) - total_cpu_seconds(info, &previous.stat);
    Ok(delta / elapsed * 100.0)
}

/// Resident memory in bytes, independent of any history mode.
pub fn memory_bytes(info: SystemInfo, stat: &ProcessStat) -> u64 {
    stat.rss * info.page_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    const INFO: SystemInfo = SystemInfo {
        hertz: 100,
        page_size: 4096,
    };

    fn stat(stime: u64, utime: u64) -> ProcessStat {
        ProcessStat {
            stime,
            utime,
            start_time: 0,
            rss: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Lifetime-average mode
    // -------------------------------------------------------------------------

    #[test]
    fn test_lifetime_cpu_percent() {
        // 30 ticks of CPU at 100 Hz = 0.3 s, over a 10 s process age = 3%.
        let stat = ProcessStat {
            stime: 10,
            utime: 20,
            start_time: 9000, // started at t=90 s
            rss: 0,
        };
        let cpu = lifetime_cpu_percent(INFO, 100.0, &stat);
        assert!((cpu - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_lifetime_zero_age_is_zero_not_nan() {
        let stat = ProcessStat {
            stime: 5,
            utime: 5,
            start_time: 10_000, // start coincides with current uptime
            rss: 0,
        };
        let cpu = lifetime_cpu_percent(INFO, 100.0, &stat);
        assert_eq!(cpu, 0.0);

        // Clock skew: start time after the observed uptime.
        let cpu = lifetime_cpu_percent(INFO, 50.0, &stat);
        assert_eq!(cpu, 0.0);
    }

    #[test]
    fn test_total_cpu_seconds_non_decreasing() {
        let earlier = total_cpu_seconds(INFO, &stat(10, 10));
        let later = total_cpu_seconds(INFO, &stat(15, 17));
        assert!(earlier >= 0.0);
        assert!(later >= earlier);
    }

    // -------------------------------------------------------------------------
    // Incremental/windowed mode
    // -------------------------------------------------------------------------

    fn snapshot(stime: u64, utime: u64, uptime: f64) -> HistorySnapshot {
        HistorySnapshot {
            timestamp: SystemTime::now(),
            stat: stat(stime, utime),
            uptime,
        }
    }

    #[test]
    fn test_windowed_cpu_percent() {
        // ((15+17-10-10)/100) / (102.0-100.0) * 100 = 6.0
        let previous = snapshot(10, 10, 100.0);
        let cpu = windowed_cpu_percent(INFO, 102.0, &stat(15, 17), &previous)
            .expect("positive window");
        assert!((cpu - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_windowed_zero_elapsed_fails() {
        let previous = snapshot(10, 10, 100.0);
        let result = windowed_cpu_percent(INFO, 100.0, &stat(15, 17), &previous);
        assert!(matches!(
            result,
            Err(UsageError::InvalidSamplingWindow { .. })
        ));
    }

    #[test]
    fn test_windowed_regressed_uptime_fails() {
        let previous = snapshot(10, 10, 100.0);
        let result = windowed_cpu_percent(INFO, 99.5, &stat(15, 17), &previous);
        match result {
            Err(UsageError::InvalidSamplingWindow { elapsed }) => {
                assert!((elapsed + 0.5).abs() < 1e-9)
            }
            other => panic!("expected InvalidSamplingWindow, got {:?}", other),
        }
    }

    // -------------------------------------------------------------------------
    // Memory
    // -------------------------------------------------------------------------

    #[test]
    fn test_memory_bytes() {
        let stat = ProcessStat {
            stime: 0,
            utime: 0,
            start_time: 0,
            rss: 2449,
        };
        assert_eq!(memory_bytes(INFO, &stat), 10_035_200);
    }
}
