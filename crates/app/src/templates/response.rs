//! Read model returned by every template operation.

use serde::Serialize;
use vellum_core::types::{DbId, Timestamp};
use vellum_db::models::template::Template;

/// One template version as exposed to callers. The storage location of
/// the document stays internal.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateResponse {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub template_type: String,
    pub version: i32,
    pub is_active: bool,
    pub original_file_name: String,
    pub mime_type: String,
    pub file_size_bytes: i64,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl From<Template> for TemplateResponse {
    fn from(row: Template) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            template_type: row.template_type,
            version: row.version,
            is_active: row.is_active,
            original_file_name: row.original_file_name,
            mime_type: row.mime_type,
            file_size_bytes: row.file_size_bytes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
