//! # wireplan-resolve
//!
//! The resolution engine.
//!
//! Handles:
//! - **Alias**: choosing the one concrete implementation bound to an
//!   abstract service.
//! - **Prioritize**: choosing the one inject definition applied to each
//!   parameter under the active profiles.
//! - **State**: the per-profile [`state::ContainerFactoryState`] and the
//!   construction plans it materializes.
//! - **Graph**: instantiation order of services.
//! - **Logical**: independent checks reporting duplicate or illegal
//!   configurations.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod alias;
pub mod graph;
pub mod introspect;
pub mod logical;
pub mod parameter_store;
pub mod plan;
pub mod prioritize;
pub mod state;
pub mod value;
