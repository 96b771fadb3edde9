//! Provider for platforms with a /proc-style virtual process filesystem.
//!
//! The kernel version banner is read once at construction and bound to a
//! field-offset profile; every lookup then reads the uptime source and the
//! per-PID stat record, parses, and calculates.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::calc::{lifetime_cpu_percent, memory_bytes, windowed_cpu_percent, UsageResult};
use crate::dispatch::ProfileTable;
use crate::error::UsageError;
use crate::history::{HistorySnapshot, HistoryStore};
use crate::providers::LookupOptions;
use crate::stat::{parse_stat_record, StatProfile};
use crate::sysinfo::{read_uptime, SystemInfo};

/// Usage lookups backed by a proc filesystem root (normally `/proc`).
pub struct ProcProvider {
    root: PathBuf,
    info: SystemInfo,
    kernel_version: String,
    profile: Option<StatProfile>,
    history: HistoryStore,
}

impl ProcProvider {
    /// Provider over the host's /proc with the built-in profile table.
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Provider over an alternate proc root (test fixtures, containers).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::with_table(root, &ProfileTable::builtin())
    }

    /// Provider with a caller-supplied profile table, for kernels the
    /// built-in table does not know yet.
    pub fn with_table(root: impl Into<PathBuf>, table: &ProfileTable) -> Self {
        let root = root.into();
        let kernel_version = match std::fs::read_to_string(root.join("version")) {
            Ok(banner) => banner.trim_end().to_string(),
            Err(e) => {
                warn!("cannot read version banner under {:?}: {}", root, e);
                String::new()
            }
        };
        let profile = table.select(&kernel_version);
        if profile.is_none() {
            warn!("no stat profile matches kernel banner {:?}", kernel_version);
        }

        Self {
            root,
            info: SystemInfo::host(),
            kernel_version,
            profile,
            history: HistoryStore::new(),
        }
    }

    /// Kernel version banner captured at construction.
    pub fn kernel_version(&self) -> &str {
        &self.kernel_version
    }

    fn stat_path(&self, pid: u32) -> PathBuf {
        self.root.join(pid.to_string()).join("stat")
    }

    async fn read_stat_record(&self, pid: u32) -> Result<String, UsageError> {
        match tokio::fs::read_to_string(self.stat_path(pid)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(UsageError::NoSuchProcess(pid)),
            Err(e) => Err(e.into()),
        }
    }

    /// Single point query of one process's CPU percentage and memory.
    ///
    /// With `keep_history`, CPU is windowed against the previous sample when
    /// one exists (lifetime average otherwise) and the history entry is
    /// overwritten afterwards either way, so the *next* call always has a
    /// snapshot to diff against.
    pub async fn lookup(&self, pid: u32, options: LookupOptions) -> Result<UsageResult, UsageError> {
        let Some(profile) = self.profile else {
            return Err(UsageError::UnsupportedPlatform {
                os: std::env::consts::OS.to_string(),
                kernel: self.kernel_version.clone(),
            });
        };

        // Both values are needed before calculation; uptime first so the
        // sampling window never runs ahead of the stat snapshot.
        let uptime = read_uptime(&self.root.join("uptime")).await?;
        let raw = self.read_stat_record(pid).await?;
        let stat = parse_stat_record(&raw, &profile)?;

        let cpu = match self.history.get(pid).filter(|_| options.keep_history) {
            Some(previous) => windowed_cpu_percent(self.info, uptime, &stat, &previous)?,
            None => lifetime_cpu_percent(self.info, uptime, &stat),
        };

        if options.keep_history {
            self.history.put(
                pid,
                HistorySnapshot {
                    timestamp: SystemTime::now(),
                    stat,
                    uptime,
                },
            );
        }

        debug!("pid {} cpu={:.2}% rss={} pages", pid, cpu, stat.rss);
        Ok(UsageResult {
            cpu,
            memory: memory_bytes(self.info, &stat),
        })
    }

    /// Drops one PID's history, or everything when `pid` is None.
    pub fn clear_history(&self, pid: Option<u32>) {
        match pid {
            Some(pid) => self.history.remove(pid),
            None => self.history.clear(),
        }
    }

    /// Overrides the host constants, e.g. when sampling a proc tree whose
    /// kernel runs at a different tick rate than the local sysconf reports.
    pub fn with_system_info(mut self, info: SystemInfo) -> Self {
        self.info = info;
        self
    }
}

impl Default for ProcProvider {
    fn default() -> Self {
        Self::new()
    }
}
