//! Application layer: configuration, telemetry, file storage, and the
//! template commands wired into the request mediator.
//!
//! Transport concerns (HTTP routing, authentication) live outside this
//! workspace; callers construct requests and dispatch them through the
//! mediator returned by [`wiring::build_mediator`].

pub mod config;
pub mod files;
pub mod telemetry;
pub mod templates;
pub mod wiring;
