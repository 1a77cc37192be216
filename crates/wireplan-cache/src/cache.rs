//! Container definition caches.
//!
//! A cache maps a [`CacheKey`] to a serialized definition. Entries written
//! by another serializer version are discarded on read and reported as a
//! miss, so callers simply analyze again.

use std::path::{Path, PathBuf};

use wireplan_common::config::WireplanConfig;
use wireplan_common::constants::CACHE_FILE_EXTENSION;
use wireplan_common::error::{Result, WireplanError};
use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::types::TypeFactory;

use crate::key::CacheKey;
use crate::serializer::ContainerDefinitionSerializer;

/// Storage for analyzed container definitions.
pub trait ContainerDefinitionCache {
    /// Returns the cached definition for `key`, or `None` on a miss.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry exists but cannot be read.
    fn get(&self, key: &CacheKey, types: &mut TypeFactory) -> Result<Option<ContainerDefinition>>;

    /// Stores `definition` under `key`, replacing any earlier entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written.
    fn set(&self, key: &CacheKey, definition: &ContainerDefinition) -> Result<()>;

    /// Removes the entry for `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing entry cannot be deleted.
    fn remove(&self, key: &CacheKey) -> Result<()>;
}

/// Keeps one JSON document per key in a directory.
#[derive(Debug)]
pub struct FileBackedContainerDefinitionCache {
    root: PathBuf,
    serializer: ContainerDefinitionSerializer,
}

impl FileBackedContainerDefinitionCache {
    /// Opens or creates a cache directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_serializer(root, ContainerDefinitionSerializer::new())
    }

    /// Opens a cache directory using a specific serializer.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_serializer(
        root: impl Into<PathBuf>,
        serializer: ContainerDefinitionSerializer,
    ) -> Result<Self> {
        let root = root.into();
        tracing::info!(path = %root.display(), version = serializer.version(), "opening definition cache");
        std::fs::create_dir_all(&root).map_err(|e| io_error(&root, e))?;
        Ok(Self { root, serializer })
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file holding the entry for `key`.
    #[must_use]
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(format!("{key}.{CACHE_FILE_EXTENSION}"))
    }
}

impl ContainerDefinitionCache for FileBackedContainerDefinitionCache {
    fn get(&self, key: &CacheKey, types: &mut TypeFactory) -> Result<Option<ContainerDefinition>> {
        let path = self.entry_path(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(key = %key, "definition cache miss");
                return Ok(None);
            }
            Err(e) => return Err(io_error(&path, e)),
        };

        match self.serializer.deserialize(&content, types) {
            Ok(definition) => {
                tracing::debug!(key = %key, "definition cache hit");
                Ok(Some(definition))
            }
            Err(WireplanError::MismatchedSerializerVersions { expected, actual }) => {
                tracing::warn!(
                    key = %key,
                    expected = %expected,
                    actual = %actual,
                    "discarding cached definition written by another version"
                );
                self.remove(key)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &CacheKey, definition: &ContainerDefinition) -> Result<()> {
        let path = self.entry_path(key);
        let document = self.serializer.serialize(definition)?;
        let staging = path.with_extension(format!("{CACHE_FILE_EXTENSION}.tmp"));
        std::fs::write(&staging, document).map_err(|e| io_error(&staging, e))?;
        std::fs::rename(&staging, &path).map_err(|e| io_error(&path, e))?;
        tracing::debug!(
            key = %key,
            services = definition.service_definitions().len(),
            "stored definition in cache"
        );
        Ok(())
    }

    fn remove(&self, key: &CacheKey) -> Result<()> {
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

/// A cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullContainerDefinitionCache;

impl ContainerDefinitionCache for NullContainerDefinitionCache {
    fn get(&self, _key: &CacheKey, _types: &mut TypeFactory) -> Result<Option<ContainerDefinition>> {
        Ok(None)
    }

    fn set(&self, _key: &CacheKey, _definition: &ContainerDefinition) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &CacheKey) -> Result<()> {
        Ok(())
    }
}

/// Returns the cache a configuration asks for.
///
/// A configuration without a cache directory disables caching.
///
/// # Errors
///
/// Returns an error if the cache directory cannot be created.
pub fn cache_for_config(config: &WireplanConfig) -> Result<Box<dyn ContainerDefinitionCache>> {
    match &config.cache_dir {
        Some(dir) => Ok(Box::new(FileBackedContainerDefinitionCache::open(dir)?)),
        None => Ok(Box::new(NullContainerDefinitionCache)),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> WireplanError {
    WireplanError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn key() -> CacheKey {
        CacheKey::new(&[PathBuf::from("src")], None)
    }

    #[test]
    fn open_creates_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("nested").join("cache");
        let cache = FileBackedContainerDefinitionCache::open(&root).expect("open");
        assert!(cache.root().is_dir());
    }

    #[test]
    fn entry_path_uses_key_and_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = FileBackedContainerDefinitionCache::open(dir.path()).expect("open");
        let path = cache.entry_path(&key());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
        assert!(path.starts_with(dir.path()));
    }

    #[test]
    fn missing_entry_is_a_miss() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = FileBackedContainerDefinitionCache::open(dir.path()).expect("open");
        let mut types = TypeFactory::new();
        assert!(cache.get(&key(), &mut types).expect("get").is_none());
        cache.remove(&key()).expect("remove missing");
    }

    #[test]
    fn null_cache_never_hits() {
        let cache = NullContainerDefinitionCache;
        let mut types = TypeFactory::new();
        cache.set(&key(), &ContainerDefinition::default()).expect("set");
        assert!(cache.get(&key(), &mut types).expect("get").is_none());
    }

    #[test]
    fn config_without_directory_disables_caching() {
        let config = WireplanConfig {
            cache_dir: None,
            ..WireplanConfig::default()
        };
        let cache = cache_for_config(&config).expect("cache");
        let mut types = TypeFactory::new();
        cache.set(&key(), &ContainerDefinition::default()).expect("set");
        assert!(cache.get(&key(), &mut types).expect("get").is_none());
    }
}
