//! Row types and insert DTOs, one module per table.

pub mod template;

pub use template::{CreateTemplate, CreateTemplateVersion, Template};
