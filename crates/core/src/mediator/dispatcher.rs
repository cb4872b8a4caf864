//! The dispatcher: handler registry, chain assembly, and dispatch.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{codes, DomainError, DomainResult};

use super::behavior::{Next, PipelineBehavior, RequestContext};
use super::erased::{ErasedHandler, HandlerAdapter};
use super::validate::{RequestValidator, ValidationBehavior, ValidatorRegistry};
use super::{Request, RequestHandler};

/// Routes a request to its single registered handler through the
/// behavior chain. Stateless per call; cheap to clone and share.
#[derive(Clone)]
pub struct Mediator {
    behaviors: Arc<[Arc<dyn PipelineBehavior>]>,
    handlers: Arc<HashMap<TypeId, Arc<dyn ErasedHandler>>>,
}

impl std::fmt::Debug for Mediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mediator")
            .field("behaviors", &self.behaviors.len())
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Mediator {
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::default()
    }

    /// Dispatch a request with a fresh (never-cancelled) token.
    pub async fn send<R: Request>(&self, request: R) -> DomainResult<R::Response> {
        self.send_with(request, CancellationToken::new()).await
    }

    /// Dispatch a request under a caller-supplied cancellation token.
    ///
    /// The token travels the chain inside the [`RequestContext`];
    /// behaviors pass it through untouched.
    pub async fn send_with<R: Request>(
        &self,
        request: R,
        cancellation: CancellationToken,
    ) -> DomainResult<R::Response> {
        let handler = self.handlers.get(&TypeId::of::<R>()).ok_or_else(|| {
            DomainError::failure(
                codes::HANDLER_MISSING,
                format!("no handler registered for {}", R::name()),
            )
        })?;

        let ctx = RequestContext::new(R::name(), cancellation);
        let next = Next {
            behaviors: &self.behaviors[..],
            handler: handler.as_ref(),
        };
        let response = next.run(&ctx, Box::new(request)).await?;

        response.downcast::<R::Response>().map(|b| *b).map_err(|_| {
            DomainError::failure(
                codes::TYPE_MISMATCH,
                format!("handler for {} produced an unexpected response type", R::name()),
            )
        })
    }
}

/// Startup-time registration of behaviors, handlers, and validators.
///
/// Behaviors wrap in insertion order, outermost first; the validation
/// stage is always appended innermost so no handler ever sees an
/// invalid request. Registering a second handler or rule set for the
/// same request type makes [`MediatorBuilder::build`] fail, since
/// dispatch must be unambiguous.
#[derive(Default)]
pub struct MediatorBuilder {
    behaviors: Vec<Arc<dyn PipelineBehavior>>,
    handlers: HashMap<TypeId, Arc<dyn ErasedHandler>>,
    validators: ValidatorRegistry,
    misconfiguration: Option<String>,
}

impl MediatorBuilder {
    /// Append a behavior to the chain (outermost first).
    pub fn behavior(mut self, behavior: impl PipelineBehavior) -> Self {
        self.behaviors.push(Arc::new(behavior));
        self
    }

    /// Register the handler for a request type.
    pub fn handler<R: Request>(mut self, handler: impl RequestHandler<R>) -> Self {
        let previous = self
            .handlers
            .insert(TypeId::of::<R>(), Arc::new(HandlerAdapter::new(handler)));
        if previous.is_some() && self.misconfiguration.is_none() {
            self.misconfiguration = Some(format!("duplicate handler for {}", R::name()));
        }
        self
    }

    /// Register the rule set for a request type (at most one).
    pub fn validator<R: Request>(mut self, validator: impl RequestValidator<R>) -> Self {
        if !self.validators.insert::<R>(validator) && self.misconfiguration.is_none() {
            self.misconfiguration = Some(format!("duplicate validator for {}", R::name()));
        }
        self
    }

    pub fn build(mut self) -> DomainResult<Mediator> {
        if let Some(detail) = self.misconfiguration {
            return Err(DomainError::failure(codes::DUPLICATE_REGISTRATION, detail));
        }

        self.behaviors
            .push(Arc::new(ValidationBehavior::new(self.validators)));

        Ok(Mediator {
            behaviors: self.behaviors.into(),
            handlers: Arc::new(self.handlers),
        })
    }
}
