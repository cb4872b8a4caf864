//! Handlers for template commands and queries.
//!
//! Expected failures come back as `DomainError` values with the stable
//! `Template.*` codes; underlying storage errors are logged here and
//! never leak to callers.

use std::sync::Arc;

use async_trait::async_trait;
use vellum_core::error::{codes as mediator_codes, DomainError, DomainResult};
use vellum_core::mediator::{RequestContext, RequestHandler};
use vellum_core::types::DbId;
use vellum_db::models::template::{CreateTemplate, CreateTemplateVersion};
use vellum_db::repositories::TemplateRepo;
use vellum_db::DbPool;

use crate::files::FileStore;

use super::codes;
use super::requests::{
    ActivateTemplateRequest, CreateTemplateRequest, DeactivateTemplateRequest,
    ListTemplatesRequest, UploadNewVersionRequest,
};
use super::response::TemplateResponse;

fn not_found(template_id: DbId) -> DomainError {
    DomainError::not_found(
        codes::NOT_FOUND,
        format!("no template with id {template_id}"),
    )
}

fn lineage_not_found(name: &str, template_type: &str) -> DomainError {
    DomainError::not_found(
        codes::NOT_FOUND,
        format!("no template lineage named '{name}' of type '{template_type}'"),
    )
}

fn storage_failed(what: &str) -> DomainError {
    DomainError::failure(codes::STORAGE_FAILED, format!("failed to persist {what}"))
}

/// Handlers bail out before touching storage once the caller's token is
/// tripped; in-flight statements are left to the pool to resolve.
fn ensure_not_cancelled(ctx: &RequestContext) -> DomainResult<()> {
    if ctx.cancellation.is_cancelled() {
        return Err(DomainError::failure(
            mediator_codes::REQUEST_CANCELLED,
            "request cancelled before completion",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

pub struct CreateTemplateHandler {
    pool: DbPool,
    files: Arc<FileStore>,
}

impl CreateTemplateHandler {
    pub fn new(pool: DbPool, files: Arc<FileStore>) -> Self {
        Self { pool, files }
    }
}

#[async_trait]
impl RequestHandler<CreateTemplateRequest> for CreateTemplateHandler {
    async fn handle(
        &self,
        request: CreateTemplateRequest,
        ctx: &RequestContext,
    ) -> DomainResult<TemplateResponse> {
        ensure_not_cancelled(ctx)?;

        let stored = self
            .files
            .store(
                &request.template_type,
                &request.file.original_file_name,
                &request.file.bytes,
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Template document write failed");
                storage_failed("the template document")
            })?;

        let input = CreateTemplate {
            name: request.name,
            description: request.description,
            template_type: request.template_type,
            original_file_name: request.file.original_file_name,
            mime_type: request.file.mime_type,
            file_size_bytes: stored.size_bytes,
            file_path: stored.path.clone(),
        };

        match TemplateRepo::create(&self.pool, &input).await {
            Ok(row) => Ok(row.into()),
            Err(e) => {
                tracing::error!(error = %e, "Template row insert failed");
                if let Err(cleanup) = self.files.remove(&stored.path).await {
                    tracing::warn!(
                        error = %cleanup,
                        path = %stored.path,
                        "Orphaned template document left behind"
                    );
                }
                Err(storage_failed("the template record"))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Upload new version
// ---------------------------------------------------------------------------

pub struct UploadNewVersionHandler {
    pool: DbPool,
    files: Arc<FileStore>,
}

impl UploadNewVersionHandler {
    pub fn new(pool: DbPool, files: Arc<FileStore>) -> Self {
        Self { pool, files }
    }
}

#[async_trait]
impl RequestHandler<UploadNewVersionRequest> for UploadNewVersionHandler {
    async fn handle(
        &self,
        request: UploadNewVersionRequest,
        ctx: &RequestContext,
    ) -> DomainResult<TemplateResponse> {
        // Version continuity requires a base: refuse before writing the
        // document anywhere.
        let existing =
            TemplateRepo::find_latest(&self.pool, &request.name, &request.template_type)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Template lineage lookup failed");
                    storage_failed("the template record")
                })?;
        if existing.is_none() {
            return Err(lineage_not_found(&request.name, &request.template_type));
        }

        ensure_not_cancelled(ctx)?;

        let stored = self
            .files
            .store(
                &request.template_type,
                &request.file.original_file_name,
                &request.file.bytes,
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Template document write failed");
                storage_failed("the template document")
            })?;

        let input = CreateTemplateVersion {
            name: request.name,
            template_type: request.template_type,
            original_file_name: request.file.original_file_name,
            mime_type: request.file.mime_type,
            file_size_bytes: stored.size_bytes,
            file_path: stored.path.clone(),
        };

        match TemplateRepo::create_next_version(&self.pool, &input).await {
            Ok(Some(row)) => Ok(row.into()),
            Ok(None) => {
                if let Err(cleanup) = self.files.remove(&stored.path).await {
                    tracing::warn!(
                        error = %cleanup,
                        path = %stored.path,
                        "Orphaned template document left behind"
                    );
                }
                Err(lineage_not_found(&input.name, &input.template_type))
            }
            Err(e) => {
                tracing::error!(error = %e, "Template version insert failed");
                if let Err(cleanup) = self.files.remove(&stored.path).await {
                    tracing::warn!(
                        error = %cleanup,
                        path = %stored.path,
                        "Orphaned template document left behind"
                    );
                }
                Err(storage_failed("the template version"))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Activate / deactivate
// ---------------------------------------------------------------------------

pub struct ActivateTemplateHandler {
    pool: DbPool,
}

impl ActivateTemplateHandler {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestHandler<ActivateTemplateRequest> for ActivateTemplateHandler {
    async fn handle(
        &self,
        request: ActivateTemplateRequest,
        ctx: &RequestContext,
    ) -> DomainResult<TemplateResponse> {
        ensure_not_cancelled(ctx)?;

        match TemplateRepo::activate(&self.pool, request.template_id).await {
            Ok(Some(row)) => Ok(row.into()),
            Ok(None) => Err(not_found(request.template_id)),
            Err(e) => {
                tracing::error!(error = %e, template_id = %request.template_id, "Activation failed");
                Err(DomainError::failure(
                    codes::ACTIVATION_FAILED,
                    "failed to switch the active version",
                ))
            }
        }
    }
}

pub struct DeactivateTemplateHandler {
    pool: DbPool,
}

impl DeactivateTemplateHandler {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestHandler<DeactivateTemplateRequest> for DeactivateTemplateHandler {
    async fn handle(
        &self,
        request: DeactivateTemplateRequest,
        ctx: &RequestContext,
    ) -> DomainResult<TemplateResponse> {
        ensure_not_cancelled(ctx)?;

        match TemplateRepo::deactivate(&self.pool, request.template_id).await {
            Ok(Some(row)) => Ok(row.into()),
            Ok(None) => Err(not_found(request.template_id)),
            Err(e) => {
                tracing::error!(error = %e, template_id = %request.template_id, "Deactivation failed");
                Err(DomainError::failure(
                    codes::ACTIVATION_FAILED,
                    "failed to deactivate the version",
                ))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

pub struct ListTemplatesHandler {
    pool: DbPool,
}

impl ListTemplatesHandler {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestHandler<ListTemplatesRequest> for ListTemplatesHandler {
    async fn handle(
        &self,
        request: ListTemplatesRequest,
        _ctx: &RequestContext,
    ) -> DomainResult<Vec<TemplateResponse>> {
        let rows = TemplateRepo::list(&self.pool, request.template_type.as_deref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Template list query failed");
                DomainError::failure(codes::STORAGE_FAILED, "failed to read templates")
            })?;
        Ok(rows.into_iter().map(TemplateResponse::from).collect())
    }
}
