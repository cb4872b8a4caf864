//! Request mediator: routes a typed request to its single registered
//! handler through an ordered chain of cross-cutting behaviors.
//!
//! Commands and queries are plain structs implementing [`Request`];
//! binding to a handler is by type, resolved once at startup on
//! [`Mediator::builder`]. Behaviors (logging, validation) wrap every
//! request uniformly; there is no per-request opt-out.

use std::any::Any;
use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::DomainResult;

pub mod behavior;
pub mod dispatcher;
mod erased;
pub mod logging;
pub mod validate;

pub use behavior::{Next, PipelineBehavior, RequestContext};
pub use dispatcher::{Mediator, MediatorBuilder};
pub use logging::LoggingBehavior;
pub use validate::RequestValidator;

/// A request travelling through the pipeline, type-erased.
pub type BoxedRequest = Box<dyn Any + Send>;

/// A handler response travelling back up the pipeline, type-erased.
pub type BoxedResponse = Box<dyn Any + Send>;

/// Marker trait for requests (commands and queries).
///
/// A request is an immutable payload identified solely by its type; it
/// does not know its handler.
pub trait Request: Debug + Send + 'static {
    /// Value produced by the handler on success.
    type Response: Send + 'static;

    /// Stable name used in log records and configuration errors.
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Executes the domain logic for one request type.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    async fn handle(&self, request: R, ctx: &RequestContext) -> DomainResult<R::Response>;
}
