//! Method metadata reported by the analyzer.

use std::fmt;

/// Visibility of a prepare or delegate method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MethodVisibility {
    /// Callable by the container.
    #[default]
    Public,
    /// Not callable by the container.
    Protected,
    /// Not callable by the container.
    Private,
}

impl MethodVisibility {
    /// Returns `true` if the container may invoke the method.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

impl fmt::Display for MethodVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Protected => write!(f, "protected"),
            Self::Private => write!(f, "private"),
        }
    }
}

impl std::str::FromStr for MethodVisibility {
    type Err = wireplan_common::error::WireplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "protected" => Ok(Self::Protected),
            "private" => Ok(Self::Private),
            other => Err(Self::Err::InvalidDefinition {
                message: format!("unknown method visibility \"{other}\""),
            }),
        }
    }
}
