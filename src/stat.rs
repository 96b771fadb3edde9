//! Parsing of kernel per-process accounting records.
//!
//! A /proc/<pid>/stat record is a single line of space-separated fields where
//! field 1 is the command name wrapped in parentheses. The name may itself
//! contain parentheses and spaces, so the only safe split point is the *last*
//! `)` in the line. Field offsets beyond the name shift across kernel
//! versions, which is why the parser is driven by a [`StatProfile`] selected
//! per kernel (see `dispatch`).

use crate::error::UsageError;

/// Immutable accounting snapshot of one process at one instant.
///
/// Times are raw scheduler ticks, memory is resident pages; normalization to
/// seconds/bytes happens in `calc` using [`crate::SystemInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStat {
    /// Kernel-mode CPU time, in clock ticks.
    pub stime: u64,
    /// User-mode CPU time, in clock ticks.
    pub utime: u64,
    /// Process start time, in ticks since boot.
    pub start_time: u64,
    /// Resident set size, in pages.
    pub rss: u64,
}

/// Field offsets into a stat record, counted over the whole record with the
/// PID at index 0 and the parenthesized name at index 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatProfile {
    pub stime: usize,
    pub utime: usize,
    pub start_time: usize,
    pub rss: usize,
}

impl StatProfile {
    /// Largest offset this profile reads; records with fewer fields fail.
    pub fn max_offset(&self) -> usize {
        self.stime
            .max(self.utime)
            .max(self.start_time)
            .max(self.rss)
    }
}

/// Extracts a [`ProcessStat`] from one raw stat record using the given
/// field-offset profile.
///
/// Pure function, no I/O. Fails with [`UsageError::Parse`] when the record
/// has fewer fields than the profile's maximum offset or when a selected
/// field is not a non-negative integer.
pub fn parse_stat_record(raw: &str, profile: &StatProfile) -> Result<ProcessStat, UsageError> {
    let raw = raw.trim_end();

    // The command name is the only field that can contain spaces or ')';
    // everything after the last ')' is plain unlabeled integers.
    let close = raw
        .rfind(')')
        .ok_or_else(|| UsageError::Parse("record has no closing ')' for the name field".into()))?;
    let tail = raw[close + 1..].trim_start();
    let fields: Vec<&str> = tail.split(' ').collect();

    // Tail index 0 is whole-record index 2 (the state field).
    let field = |offset: usize| -> Result<u64, UsageError> {
        let index = offset.checked_sub(2).ok_or_else(|| {
            UsageError::Parse(format!("profile offset {} points inside the name field", offset))
        })?;
        let value = fields.get(index).ok_or_else(|| {
            UsageError::Parse(format!(
                "record has {} fields after the name, profile needs offset {}",
                fields.len(),
                offset
            ))
        })?;
        value.parse::<u64>().map_err(|e| {
            UsageError::Parse(format!(
                "field at offset {} ({:?}) is not a non-negative integer: {}",
                offset, value, e
            ))
        })
    };

    Ok(ProcessStat {
        stime: field(profile.stime)?,
        utime: field(profile.utime)?,
        start_time: field(profile.start_time)?,
        rss: field(profile.rss)?,
    })
}
