//! Type kind lookups standing in for runtime reflection.

use std::collections::HashMap;

use wireplan_definition::container::ContainerDefinition;
use wireplan_definition::types::Type;

/// Kind of a named class-like type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// An instantiable class.
    Class,
    /// An interface or abstract class.
    Interface,
    /// An enumeration; enum-typed string values are never service references.
    Enum,
}

/// Answers what kind of type a name refers to.
pub trait TypeIntrospector {
    /// Returns the kind of `ty`, or `None` for scalars and unknown names.
    fn kind_of(&self, ty: &Type) -> Option<ClassKind>;
}

/// A [`TypeIntrospector`] backed by an explicit table.
#[derive(Debug, Clone, Default)]
pub struct ClassCatalog {
    kinds: HashMap<Type, ClassKind>,
}

impl ClassCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a catalog from every type a definition mentions.
    ///
    /// Abstract services and alias targets count as interfaces; concrete
    /// services, alias implementations, and delegate factories as classes.
    #[must_use]
    pub fn from_definition(definition: &ContainerDefinition) -> Self {
        let mut catalog = Self::new();
        for service in definition.service_definitions() {
            let kind = if service.is_abstract() {
                ClassKind::Interface
            } else {
                ClassKind::Class
            };
            catalog.register(service.service_type().clone(), kind);
        }
        for alias in definition.alias_definitions() {
            catalog.register_if_absent(alias.abstract_service(), ClassKind::Interface);
            catalog.register_if_absent(alias.concrete_service(), ClassKind::Class);
        }
        for delegate in definition.service_delegate_definitions() {
            catalog.register_if_absent(delegate.delegate_type(), ClassKind::Class);
        }
        catalog
    }

    /// Records `ty` as `kind`, replacing any earlier entry.
    pub fn register(&mut self, ty: Type, kind: ClassKind) {
        if ty.is_scalar() {
            return;
        }
        let _ = self.kinds.insert(ty, kind);
    }

    /// Records `ty` as `kind` and returns the catalog.
    #[must_use]
    pub fn with_type(mut self, ty: Type, kind: ClassKind) -> Self {
        self.register(ty, kind);
        self
    }

    fn register_if_absent(&mut self, ty: &Type, kind: ClassKind) {
        if !self.kinds.contains_key(ty) {
            self.register(ty.clone(), kind);
        }
    }

    /// Returns the number of known types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no type is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl TypeIntrospector for ClassCatalog {
    fn kind_of(&self, ty: &Type) -> Option<ClassKind> {
        self.kinds.get(ty).copied()
    }
}
