//! Alias definitions binding abstract types to concrete implementations.

use crate::types::Type;

/// Records that `concrete_service` satisfies `abstract_service`.
///
/// Several aliases may share an abstract type (an ambiguity the alias
/// resolver settles) and one concrete type may satisfy several abstracts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasDefinition {
    abstract_service: Type,
    concrete_service: Type,
}

impl AliasDefinition {
    /// Creates an alias.
    #[must_use]
    pub const fn new(abstract_service: Type, concrete_service: Type) -> Self {
        Self {
            abstract_service,
            concrete_service,
        }
    }

    /// Returns the abstract side.
    #[must_use]
    pub const fn abstract_service(&self) -> &Type {
        &self.abstract_service
    }

    /// Returns the concrete side.
    #[must_use]
    pub const fn concrete_service(&self) -> &Type {
        &self.concrete_service
    }
}
