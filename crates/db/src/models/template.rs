//! Template model and insert DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vellum_core::types::{DbId, Timestamp};

/// A row from the `templates` table: one row per version of a lineage.
///
/// A lineage is the sequence of versions sharing `(name, template_type)`;
/// `version` starts at 1 and is gapless within a lineage.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub template_type: String,
    pub version: i32,
    pub is_active: bool,
    pub original_file_name: String,
    pub mime_type: String,
    pub file_size_bytes: i64,
    pub file_path: String,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// DTO for inserting version 1 of a new lineage.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    pub description: Option<String>,
    pub template_type: String,
    pub original_file_name: String,
    pub mime_type: String,
    pub file_size_bytes: i64,
    pub file_path: String,
}

/// DTO for appending a new version to an existing lineage.
///
/// The description is carried over from the latest version; the version
/// number is assigned by the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateVersion {
    pub name: String,
    pub template_type: String,
    pub original_file_name: String,
    pub mime_type: String,
    pub file_size_bytes: i64,
    pub file_path: String,
}
