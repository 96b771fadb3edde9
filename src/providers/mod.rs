//! Per-platform orchestration and the OS-to-provider registry.
//!
//! One polymorphic [`Provider`] covers every platform family: proc-filesystem
//! hosts, ps-command hosts, and acknowledged-but-unbuilt platforms that fail
//! uniformly with a typed capability error. Unknown OS identifiers fall
//! through the registry to `UnsupportedPlatform`.

pub mod proc;
pub mod ps;

use ahash::AHashMap as HashMap;

use crate::calc::UsageResult;
use crate::error::UsageError;

pub use proc::ProcProvider;
pub use ps::PsProvider;

/// Per-lookup options.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupOptions {
    /// Record this sample so the next lookup for the same PID reports
    /// windowed (recency-sensitive) CPU instead of the lifetime average.
    pub keep_history: bool,
}

/// Placeholder for platforms whose data source is not built. Fails
/// immediately with `NotImplemented`; never attempts partial work.
#[derive(Debug, Clone)]
pub struct StubProvider {
    os: String,
}

impl StubProvider {
    pub fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }

    pub async fn lookup(&self, _pid: u32, _options: LookupOptions) -> Result<UsageResult, UsageError> {
        Err(UsageError::NotImplemented {
            os: self.os.clone(),
        })
    }
}

/// A platform-specific usage provider.
pub enum Provider {
    /// Virtual process filesystem (Linux-like hosts).
    Proc(ProcProvider),
    /// External process-status command (hosts without /proc, e.g. macOS).
    Ps(PsProvider),
    /// Acknowledged platform without an implemented data source.
    Stub(StubProvider),
}

impl Provider {
    /// Fetches CPU percentage and resident memory for one PID.
    pub async fn lookup(&self, pid: u32, options: LookupOptions) -> Result<UsageResult, UsageError> {
        match self {
            Provider::Proc(p) => p.lookup(pid, options).await,
            Provider::Ps(p) => p.lookup(pid, options).await,
            Provider::Stub(p) => p.lookup(pid, options).await,
        }
    }

    /// Drops stored history; a no-op for providers that keep none.
    pub fn clear_history(&self, pid: Option<u32>) {
        if let Provider::Proc(p) = self {
            p.clear_history(pid);
        }
    }
}

/// Maps OS identifiers (the `std::env::consts::OS` vocabulary) to providers.
pub struct ProviderRegistry {
    providers: HashMap<String, Provider>,
}

impl ProviderRegistry {
    /// Empty registry; every lookup fails `UnsupportedPlatform` until
    /// providers are registered.
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Registry preloaded with the built-in platform families.
    pub fn host_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("linux", Provider::Proc(ProcProvider::new()));
        registry.register("macos", Provider::Ps(PsProvider::new()));
        registry.register("windows", Provider::Stub(StubProvider::new("windows")));
        registry.register("solaris", Provider::Stub(StubProvider::new("solaris")));
        registry
    }

    /// Registers (or replaces) the provider for an OS identifier.
    pub fn register(&mut self, os: impl Into<String>, provider: Provider) {
        self.providers.insert(os.into(), provider);
    }

    pub fn get(&self, os: &str) -> Option<&Provider> {
        self.providers.get(os)
    }

    /// Resolves the provider for an OS identifier and performs the lookup.
    /// Unknown identifiers fail with `UnsupportedPlatform` naming the OS id.
    pub async fn lookup(
        &self,
        os: &str,
        pid: u32,
        options: LookupOptions,
    ) -> Result<UsageResult, UsageError> {
        match self.get(os) {
            Some(provider) => provider.lookup(pid, options).await,
            None => Err(UsageError::UnsupportedPlatform {
                os: os.to_string(),
                kernel: "unknown".to_string(),
            }),
        }
    }

    /// Clears history across one OS entry or all of them.
    pub fn clear_history(&self, os: &str, pid: Option<u32>) {
        if let Some(provider) = self.get(os) {
            provider.clear_history(pid);
        }
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level handle: a registry bound to one OS identifier, owning its own
/// history. Independent monitors never share state, so several can poll the
/// same PID without corrupting each other's sampling windows.
pub struct UsageMonitor {
    registry: ProviderRegistry,
    os: String,
}

impl UsageMonitor {
    /// Monitor for the host OS with the built-in provider set.
    pub fn new() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    /// Monitor that resolves providers as if running on `os`; mainly for
    /// tests and for wrapping a custom registry.
    pub fn for_os(os: impl Into<String>) -> Self {
        Self::with_registry(ProviderRegistry::host_defaults(), os)
    }

    pub fn with_registry(registry: ProviderRegistry, os: impl Into<String>) -> Self {
        Self {
            registry,
            os: os.into(),
        }
    }

    /// Looks up CPU percentage and resident memory for a PID.
    pub async fn lookup(&self, pid: u32, options: LookupOptions) -> Result<UsageResult, UsageError> {
        self.registry.lookup(&self.os, pid, options).await
    }

    /// Removes one PID's history entry, or resets the whole store.
    pub fn clear_history(&self, pid: Option<u32>) {
        self.registry.clear_history(&self.os, pid);
    }
}

impl Default for UsageMonitor {
    fn default() -> Self {
        Self::new()
    }
}
