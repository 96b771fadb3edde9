//! Error taxonomy for usage lookups.
//!
//! Every failure carries a stable categorical kind plus a descriptive message.
//! Lookups never retry internally and never return a partial result alongside
//! an error; retry/polling policy belongs to the caller.

/// Errors produced by providers, the stat parser, and the usage calculator.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// No provider for this OS, or no field-offset profile matching the
    /// kernel version banner. The message carries both identifiers so a
    /// maintainer can add a new profile.
    #[error("unsupported platform: os={os}, kernel={kernel:?}")]
    UnsupportedPlatform { os: String, kernel: String },

    /// Platform is acknowledged but its data source is not built.
    #[error("{os} provider is not implemented")]
    NotImplemented { os: String },

    /// Target process does not exist (or its record vanished mid-lookup).
    #[error("no such process: {0}")]
    NoSuchProcess(u32),

    /// The process-status command reported a different PID than requested.
    #[error("status command returned pid {actual}, expected {expected}")]
    InvalidPid { expected: u32, actual: u32 },

    /// Process record content is malformed (too few fields, or a field that
    /// is not a non-negative integer).
    #[error("malformed process record: {0}")]
    Parse(String),

    /// Uptime source or command output does not have the expected shape.
    #[error("malformed input: {0}")]
    Format(String),

    /// Incremental sampling requires a strictly positive window; the caller
    /// resampled too fast or the clock regressed.
    #[error("non-positive sampling window ({elapsed} s)")]
    InvalidSamplingWindow { elapsed: f64 },

    /// Underlying read or command invocation failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
