//! Named external sources of inject values.
//!
//! An inject definition that names a store has its value treated as a key
//! into that store. Stores are looked up by name when the factory state is
//! built, so an unknown store fails the build up front.

use std::collections::BTreeMap;
use std::sync::Arc;

use wireplan_common::constants::ENV_PARAMETER_STORE;
use wireplan_common::error::Result;
use wireplan_definition::inject::InjectValue;
use wireplan_definition::types::DeclaredType;

/// Fetches string-keyed values for a declared type.
pub trait ParameterStore: Send + Sync {
    /// Name inject definitions use to refer to this store.
    fn name(&self) -> &str;

    /// Fetches the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot produce a value.
    fn fetch(&self, declared_type: &DeclaredType, key: &str) -> Result<InjectValue>;
}

/// Stores available to a container build, keyed by store name.
pub type ParameterStoreMap = BTreeMap<String, Arc<dyn ParameterStore>>;

/// Builds a [`ParameterStoreMap`] keyed by each store's own name.
///
/// A later store replaces an earlier one with the same name.
pub fn parameter_store_map<I>(stores: I) -> ParameterStoreMap
where
    I: IntoIterator<Item = Arc<dyn ParameterStore>>,
{
    stores
        .into_iter()
        .map(|store| (store.name().to_owned(), store))
        .collect()
}

/// Reads values from the process environment.
///
/// Unset variables yield `Null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentParameterStore;

impl ParameterStore for EnvironmentParameterStore {
    fn name(&self) -> &str {
        ENV_PARAMETER_STORE
    }

    fn fetch(&self, _declared_type: &DeclaredType, key: &str) -> Result<InjectValue> {
        Ok(std::env::var(key).map_or(InjectValue::Null, InjectValue::String))
    }
}

/// An in-memory store, mostly useful for tests and fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct MapParameterStore {
    name: String,
    values: BTreeMap<String, InjectValue>,
}

impl MapParameterStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Adds a value under `key`.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<InjectValue>) -> Self {
        let _ = self.values.insert(key.into(), value.into());
        self
    }
}

impl ParameterStore for MapParameterStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, _declared_type: &DeclaredType, key: &str) -> Result<InjectValue> {
        Ok(self.values.get(key).cloned().unwrap_or_default())
    }
}
