//! Violation records produced by logical constraint checks.

use std::fmt;

/// How seriously a violation should be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// The container will fail or misbehave at runtime.
    Critical,
    /// Likely a mistake, but the container can still be built.
    Warning,
    /// Informational.
    Notice,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Warning => write!(f, "warning"),
            Self::Notice => write!(f, "notice"),
        }
    }
}

/// A single problem found in a container definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalConstraintViolation {
    severity: Severity,
    message: String,
}

impl LogicalConstraintViolation {
    /// Creates a critical violation.
    #[must_use]
    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Critical,
            message: message.into(),
        }
    }

    /// Creates a warning.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Creates a notice.
    #[must_use]
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Notice,
            message: message.into(),
        }
    }

    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for LogicalConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// An ordered collection of violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalConstraintViolationCollection {
    violations: Vec<LogicalConstraintViolation>,
}

impl LogicalConstraintViolationCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a violation.
    pub fn add(&mut self, violation: LogicalConstraintViolation) {
        self.violations.push(violation);
    }

    /// Appends every violation of `other`.
    pub fn merge(&mut self, other: Self) {
        self.violations.extend(other.violations);
    }

    /// Returns the number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` if there are no violations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Iterates violations in the order they were added.
    pub fn iter(&self) -> std::slice::Iter<'_, LogicalConstraintViolation> {
        self.violations.iter()
    }

    /// Returns the violations of one severity.
    #[must_use]
    pub fn with_severity(&self, severity: Severity) -> Vec<&LogicalConstraintViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Returns `true` if any violation is critical.
    #[must_use]
    pub fn has_critical(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Critical)
    }
}

impl IntoIterator for LogicalConstraintViolationCollection {
    type Item = LogicalConstraintViolation;
    type IntoIter = std::vec::IntoIter<LogicalConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a LogicalConstraintViolationCollection {
    type Item = &'a LogicalConstraintViolation;
    type IntoIter = std::slice::Iter<'a, LogicalConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<LogicalConstraintViolation> for LogicalConstraintViolationCollection {
    fn from_iter<I: IntoIterator<Item = LogicalConstraintViolation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}
