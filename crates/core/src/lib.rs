//! Domain core: error values, field validation, and the request mediator.
//!
//! This crate has no database or transport dependencies so it can be used
//! by the repository layer, the application layer, and any future worker
//! or CLI tooling.

pub mod error;
pub mod mediator;
pub mod types;
pub mod validation;
