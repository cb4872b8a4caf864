//! Mediator assembly: behaviors, handlers, and rule sets registered
//! once at startup.

use std::sync::Arc;

use vellum_core::error::DomainResult;
use vellum_core::mediator::{LoggingBehavior, Mediator};
use vellum_core::validation::schema_violations;
use vellum_db::DbPool;

use crate::files::FileStore;
use crate::templates::handlers::{
    ActivateTemplateHandler, CreateTemplateHandler, DeactivateTemplateHandler,
    ListTemplatesHandler, UploadNewVersionHandler,
};
use crate::templates::requests::{
    ActivateTemplateRequest, CreateTemplateRequest, DeactivateTemplateRequest,
    ListTemplatesRequest, UploadNewVersionRequest,
};

/// Build the fully wired mediator.
///
/// Logging wraps everything, validation runs immediately before the
/// handler, and the chain is identical for every request type. Fails if
/// any request type ends up with more than one handler or rule set.
pub fn build_mediator(pool: DbPool, files: Arc<FileStore>) -> DomainResult<Mediator> {
    Mediator::builder()
        .behavior(LoggingBehavior::new())
        .handler::<CreateTemplateRequest>(CreateTemplateHandler::new(pool.clone(), files.clone()))
        .validator::<CreateTemplateRequest>(schema_violations::<CreateTemplateRequest>)
        .handler::<UploadNewVersionRequest>(UploadNewVersionHandler::new(pool.clone(), files))
        .validator::<UploadNewVersionRequest>(schema_violations::<UploadNewVersionRequest>)
        .handler::<ActivateTemplateRequest>(ActivateTemplateHandler::new(pool.clone()))
        .handler::<DeactivateTemplateRequest>(DeactivateTemplateHandler::new(pool.clone()))
        .handler::<ListTemplatesRequest>(ListTemplatesHandler::new(pool))
        .build()
}
