//! procusage - per-process CPU utilization and resident memory.
//!
//! Reports a process's CPU percentage and memory in bytes given its PID, by
//! reading kernel-exposed accounting data (a /proc-style filesystem where one
//! exists, the system `ps` command otherwise). Each lookup is a single
//! asynchronous point query; there is no sampling daemon.
//!
//! # CPU semantics
//!
//! Two legitimate definitions of "CPU usage" coexist:
//!
//! - **Lifetime average** (default): total CPU time over the process age.
//!   Becomes less sensitive to recent activity as the process ages.
//! - **Windowed/incremental** (`keep_history: true`): CPU time delta over the
//!   elapsed time since the previous sample, appropriate for polling callers.
//!
//! # Usage
//!
//! ```no_run
//! use procusage::{LookupOptions, UsageMonitor};
//!
//! # async fn demo() -> Result<(), procusage::UsageError> {
//! let monitor = UsageMonitor::new();
//!
//! // Lifetime-average CPU since the process started.
//! let usage = monitor.lookup(1234, LookupOptions::default()).await?;
//! println!("cpu: {:.1}%  memory: {} bytes", usage.cpu, usage.memory);
//!
//! // Poll with history: subsequent samples report CPU over the window
//! // since the previous call.
//! let opts = LookupOptions { keep_history: true };
//! let _first = monitor.lookup(1234, opts).await?;
//! let windowed = monitor.lookup(1234, opts).await?;
//! println!("recent cpu: {:.1}%", windowed.cpu);
//!
//! monitor.clear_history(Some(1234));
//! # Ok(())
//! # }
//! ```

pub mod calc;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod providers;
pub mod stat;
pub mod sysinfo;

// Re-export main types for convenience
pub use calc::UsageResult;
pub use dispatch::ProfileTable;
pub use error::UsageError;
pub use history::{HistorySnapshot, HistoryStore};
pub use providers::{
    LookupOptions, ProcProvider, Provider, ProviderRegistry, PsProvider, StubProvider,
    UsageMonitor,
};
pub use stat::{ProcessStat, StatProfile};
pub use sysinfo::SystemInfo;
