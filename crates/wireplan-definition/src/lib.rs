//! # wireplan-definition
//!
//! The data model every other wireplan crate speaks.
//!
//! Handles:
//! - **Types**: value-type descriptors for scalar, class, union, and
//!   intersection types, plus a memoizing [`types::TypeFactory`].
//! - **Profiles**: the active profile set and its priority scoring.
//! - **Definitions**: services, aliases, delegates, prepares, and injects,
//!   aggregated into an immutable [`container::ContainerDefinition`].
//! - **Provider**: the functional API definition providers use to add
//!   facts the analyzer cannot discover.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod alias;
pub mod attribute;
pub mod container;
pub mod delegate;
pub mod inject;
pub mod method;
pub mod prepare;
pub mod profiles;
pub mod provider;
pub mod service;
pub mod types;
