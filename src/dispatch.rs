//! Kernel-version dispatch to field-offset profiles.
//!
//! All stat fields are plain unlabeled integers, so picking the wrong offset
//! table silently misparses every value. The table therefore never falls back
//! to a default profile: an unmatched version banner is a typed no-match that
//! the provider surfaces as `UnsupportedPlatform`.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::stat::StatProfile;

/// Offsets valid for mainline kernels since 2.6 (and every Ubuntu build the
/// original offset tables were derived from).
pub const LINUX_26_PROFILE: StatProfile = StatProfile {
    stime: 13,
    utime: 14,
    start_time: 21,
    rss: 23,
};

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

struct ProfileEntry {
    name: &'static str,
    predicate: Predicate,
    profile: StatProfile,
}

/// Ordered table of (predicate, profile) pairs evaluated in priority order.
///
/// First match wins. New kernel families are added with [`register`], not by
/// editing call sites.
///
/// [`register`]: ProfileTable::register
pub struct ProfileTable {
    entries: Vec<ProfileEntry>,
}

impl ProfileTable {
    /// Empty table, for callers building a fully custom dispatch.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Table preloaded with the known kernel families.
    pub fn builtin() -> Self {
        static UBUNTU: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"(?i)ubuntu").expect("static regex"));
        static LINUX_VERSION: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"Linux version (\d+)\.(\d+)").expect("static regex"));

        let mut table = Self::new();
        table.register("ubuntu", |banner| UBUNTU.is_match(banner), LINUX_26_PROFILE);
        table.register(
            "linux-2.6+",
            |banner| {
                let Some(caps) = LINUX_VERSION.captures(banner) else {
                    return false;
                };
                let major: u64 = caps[1].parse().unwrap_or(0);
                let minor: u64 = caps[2].parse().unwrap_or(0);
                major > 2 || (major == 2 && minor >= 6)
            },
            LINUX_26_PROFILE,
        );
        table
    }

    /// Appends an entry; earlier registrations take priority.
    pub fn register<F>(&mut self, name: &'static str, predicate: F, profile: StatProfile)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.entries.push(ProfileEntry {
            name,
            predicate: Box::new(predicate),
            profile,
        });
    }

    /// Returns the first profile whose predicate matches the version banner,
    /// or None when no registered kernel family applies.
    pub fn select(&self, banner: &str) -> Option<StatProfile> {
        for entry in &self.entries {
            if (entry.predicate)(banner) {
                debug!("kernel banner matched profile {:?}", entry.name);
                return Some(entry.profile);
            }
        }
        None
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ubuntu_banner_matches() {
        let banner = "Linux version 3.0.0-12-generic (buildd@crested) (gcc version 4.6.1 (Ubuntu/Linaro 4.6.1-9ubuntu3) ) #20-Ubuntu SMP Fri Oct 7 14:56:25 UTC 2011";
        let profile = ProfileTable::builtin().select(banner).expect("ubuntu matches");
        assert_eq!(profile, LINUX_26_PROFILE);
    }

    #[test]
    fn test_old_ec2_banner_matches() {
        // 2.6 kernel without "generic" markers, as seen on old EC2 images.
        let banner = "Linux version 2.6.32-350-ec2 (buildd@batsu) (gcc version 4.4.3 (Ubuntu 4.4.3-4ubuntu5.1) ) #57-Ubuntu SMP Thu Nov 15 15:59:03 UTC 2012";
        assert!(ProfileTable::builtin().select(banner).is_some());
    }

    #[test]
    fn test_modern_kernel_matches() {
        let banner = "Linux version 6.8.0-41-generic (buildd@lcy02-amd64-100) #41";
        assert!(ProfileTable::builtin().select(banner).is_some());
    }

    #[test]
    fn test_unmatched_banner_is_none() {
        // Must be a typed no-match, never a parsed-but-wrong profile.
        assert!(ProfileTable::builtin()
            .select("Linux version 0.0.1-nonexistent")
            .is_none());
        assert!(ProfileTable::builtin().select("FreeBSD 14.1-RELEASE").is_none());
        assert!(ProfileTable::builtin().select("").is_none());
    }

    #[test]
    fn test_registration_order_wins() {
        let custom = StatProfile {
            stime: 11,
            utime: 12,
            start_time: 19,
            rss: 21,
        };
        let mut table = ProfileTable::new();
        table.register("custom", |b| b.contains("custom-distro"), custom);
        table.register("fallback", |_| true, LINUX_26_PROFILE);

        assert_eq!(
            table.select("Linux version 5.4.0 custom-distro"),
            Some(custom)
        );
        assert_eq!(table.select("anything else"), Some(LINUX_26_PROFILE));
    }
}
