//! # wireplan-cache
//!
//! Persistence of analyzed container definitions.
//!
//! Handles:
//! - **Serializer**: a versioned, field-by-field JSON document for
//!   [`wireplan_definition::container::ContainerDefinition`].
//! - **Key**: content-derived cache keys for a scan configuration.
//! - **Cache**: file-backed and disabled cache implementations.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod cache;
pub mod key;
pub mod serializer;
