//! Template command and query DTOs with their field rules.
//!
//! Rules declared here run in the pipeline's validation stage; an
//! invalid request never reaches its handler.

use serde::Deserialize;
use validator::{Validate, ValidationError};
use vellum_core::mediator::Request;
use vellum_core::types::DbId;

use super::response::TemplateResponse;
use super::MAX_TEMPLATE_FILE_BYTES;

/// An uploaded document payload plus its client-supplied metadata.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FileUpload {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub original_file_name: String,
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub mime_type: String,
    #[validate(custom(function = "payload_within_limits"))]
    pub bytes: Vec<u8>,
}

fn payload_within_limits(bytes: &[u8]) -> Result<(), ValidationError> {
    if bytes.is_empty() {
        let mut err = ValidationError::new("length");
        err.message = Some("must not be empty".into());
        return Err(err);
    }
    if bytes.len() as u64 > MAX_TEMPLATE_FILE_BYTES {
        let mut err = ValidationError::new("length");
        err.message = Some(format!("must not exceed {MAX_TEMPLATE_FILE_BYTES} bytes").into());
        return Err(err);
    }
    Ok(())
}

/// Create a new template lineage at version 1.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub template_type: String,
    pub description: Option<String>,
    #[validate(nested)]
    pub file: FileUpload,
}

impl Request for CreateTemplateRequest {
    type Response = TemplateResponse;

    fn name() -> &'static str {
        "CreateTemplateRequest"
    }
}

/// Append a new version to an existing lineage. Does not change which
/// version is active.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UploadNewVersionRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub template_type: String,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(nested)]
    pub file: FileUpload,
}

impl Request for UploadNewVersionRequest {
    type Response = TemplateResponse;

    fn name() -> &'static str {
        "UploadNewVersionRequest"
    }
}

/// Make one version the active one for its template type.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ActivateTemplateRequest {
    pub template_id: DbId,
}

impl Request for ActivateTemplateRequest {
    type Response = TemplateResponse;

    fn name() -> &'static str {
        "ActivateTemplateRequest"
    }
}

/// Take a version out of service.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeactivateTemplateRequest {
    pub template_id: DbId,
}

impl Request for DeactivateTemplateRequest {
    type Response = TemplateResponse;

    fn name() -> &'static str {
        "DeactivateTemplateRequest"
    }
}

/// List all template versions, optionally restricted to one type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTemplatesRequest {
    pub template_type: Option<String>,
}

impl Request for ListTemplatesRequest {
    type Response = Vec<TemplateResponse>;

    fn name() -> &'static str {
        "ListTemplatesRequest"
    }
}
