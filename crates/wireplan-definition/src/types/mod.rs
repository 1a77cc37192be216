//! Value-type descriptors for declared types.
//!
//! A [`Type`] names one scalar or class type. [`TypeUnion`] and
//! [`TypeIntersect`] are unordered bags of member types. All three compare
//! structurally: two handles naming the same class are interchangeable,
//! and compound types compare by the set of their member names.

mod factory;
mod lexer;
mod parser;

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use wireplan_common::constants::SCALAR_TYPE_NAMES;

pub use self::factory::TypeFactory;

#[derive(Debug)]
struct TypeInner {
    name: String,
    scalar: bool,
}

/// A single scalar or class type.
///
/// Handles are cheap to clone. Equality, ordering, and hashing only look at
/// [`Type::name`]; use [`Type::ptr_eq`] to check whether two handles were
/// interned by the same [`TypeFactory`] entry.
#[derive(Debug, Clone)]
pub struct Type(Arc<TypeInner>);

impl Type {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let scalar = SCALAR_TYPE_NAMES.contains(&name.as_str());
        Self(Arc::new(TypeInner { name, scalar }))
    }

    /// Returns the canonical type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns `true` for scalar and pseudo types such as `int` or `mixed`.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.0.scalar
    }

    /// Returns `true` if both handles share one interned instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Type {}

impl PartialOrd for Type {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Type {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name().cmp(other.name())
    }
}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compound type members shared by unions and intersections.
#[derive(Debug, Clone)]
struct Members {
    types: Vec<DeclaredType>,
    name: String,
}

impl Members {
    fn new(types: Vec<DeclaredType>, separator: char) -> Self {
        let name = types
            .iter()
            .map(|member| match member {
                DeclaredType::Single(ty) => ty.name().to_owned(),
                compound => format!("({})", compound.name()),
            })
            .collect::<Vec<_>>()
            .join(&separator.to_string());
        Self { types, name }
    }

    fn name_set(&self) -> BTreeSet<&str> {
        self.types.iter().map(DeclaredType::name).collect()
    }
}

impl PartialEq for Members {
    fn eq(&self, other: &Self) -> bool {
        self.name_set() == other.name_set()
    }
}

impl Eq for Members {}

impl Hash for Members {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for name in self.name_set() {
            name.hash(state);
        }
    }
}

/// A union of two or more member types, e.g. `int|string`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeUnion(Members);

impl TypeUnion {
    pub(crate) fn new(types: Vec<DeclaredType>) -> Self {
        Self(Members::new(types, '|'))
    }

    /// Returns the printed union, compound members parenthesized.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the members in declaration order.
    #[must_use]
    pub fn types(&self) -> &[DeclaredType] {
        &self.0.types
    }
}

/// An intersection of two or more member types, e.g. `Countable&Traversable`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeIntersect(Members);

impl TypeIntersect {
    pub(crate) fn new(types: Vec<DeclaredType>) -> Self {
        Self(Members::new(types, '&'))
    }

    /// Returns the printed intersection, compound members parenthesized.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the members in declaration order.
    #[must_use]
    pub fn types(&self) -> &[DeclaredType] {
        &self.0.types
    }
}

/// The declared type of an injectable parameter or property.
///
/// Cross-kind comparisons are always unequal: `int` never equals a union,
/// and a union never equals an intersection with the same members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    /// A single scalar or class type.
    Single(Type),
    /// A union of member types.
    Union(TypeUnion),
    /// An intersection of member types.
    Intersect(TypeIntersect),
}

impl DeclaredType {
    /// Returns the canonical printed form.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Single(ty) => ty.name(),
            Self::Union(union) => union.name(),
            Self::Intersect(intersect) => intersect.name(),
        }
    }

    /// Returns the single type, if this is not a compound type.
    #[must_use]
    pub const fn as_single(&self) -> Option<&Type> {
        match self {
            Self::Single(ty) => Some(ty),
            Self::Union(_) | Self::Intersect(_) => None,
        }
    }

    /// Returns `true` if `null` is an accepted value.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Single(ty) => matches!(ty.name(), "null" | "mixed"),
            Self::Union(union) => union.types().iter().any(Self::is_nullable),
            Self::Intersect(_) => false,
        }
    }
}

impl From<Type> for DeclaredType {
    fn from(ty: Type) -> Self {
        Self::Single(ty)
    }
}

impl From<TypeUnion> for DeclaredType {
    fn from(union: TypeUnion) -> Self {
        Self::Union(union)
    }
}

impl From<TypeIntersect> for DeclaredType {
    fn from(intersect: TypeIntersect) -> Self {
        Self::Intersect(intersect)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
