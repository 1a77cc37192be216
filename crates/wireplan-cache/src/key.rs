//! SHA-256 cache keys for scan configurations.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use wireplan_common::config::WireplanConfig;

/// Identifies the definition produced by one scan configuration.
///
/// The key depends on the set of scanned directories, not their order, and
/// on the identity of the definition provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives a key from scan directories and an optional provider identity.
    #[must_use]
    pub fn new(scan_directories: &[PathBuf], definition_provider: Option<&str>) -> Self {
        let mut directories: Vec<String> = scan_directories
            .iter()
            .map(|d| d.to_string_lossy().into_owned())
            .collect();
        directories.sort();
        directories.dedup();

        let mut hasher = Sha256::new();
        for directory in &directories {
            hasher.update(directory.as_bytes());
            hasher.update([0]);
        }
        hasher.update([0xff]);
        if let Some(provider) = definition_provider {
            hasher.update(provider.as_bytes());
        }
        let mut hex = String::with_capacity(64);
        for byte in hasher.finalize() {
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }

    /// Derives the key of a configuration.
    #[must_use]
    pub fn from_config(config: &WireplanConfig) -> Self {
        Self::new(&config.scan_directories, config.definition_provider.as_deref())
    }

    /// Returns the hex-encoded digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
