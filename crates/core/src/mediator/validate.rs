//! The validation stage: per-request-type rule sets resolved by `TypeId`.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::{codes, DomainError, DomainResult};
use crate::validation::FieldViolation;

use super::behavior::{Next, PipelineBehavior, RequestContext};
use super::{BoxedRequest, BoxedResponse, Request};

/// Produces field violations for one request type. Pure: no side
/// effects, no I/O.
pub trait RequestValidator<R: Request>: Send + Sync + 'static {
    fn validate(&self, request: &R) -> Vec<FieldViolation>;
}

impl<R, F> RequestValidator<R> for F
where
    R: Request,
    F: Fn(&R) -> Vec<FieldViolation> + Send + Sync + 'static,
{
    fn validate(&self, request: &R) -> Vec<FieldViolation> {
        self(request)
    }
}

/// Object-safe validator facade, keyed by the request's `TypeId`.
trait ErasedValidator: Send + Sync {
    fn validate(&self, request: &(dyn Any + Send)) -> Vec<FieldViolation>;
}

struct ValidatorAdapter<R, V> {
    validator: V,
    _marker: PhantomData<fn(R)>,
}

impl<R, V> ErasedValidator for ValidatorAdapter<R, V>
where
    R: Request,
    V: RequestValidator<R>,
{
    fn validate(&self, request: &(dyn Any + Send)) -> Vec<FieldViolation> {
        // Keyed by TypeId, so the downcast cannot miss; an empty result
        // keeps a registry mismatch from failing a valid request.
        match request.downcast_ref::<R>() {
            Some(request) => self.validator.validate(request),
            None => Vec::new(),
        }
    }
}

/// Registered rule sets, at most one per request type.
#[derive(Default)]
pub(crate) struct ValidatorRegistry {
    validators: HashMap<TypeId, Box<dyn ErasedValidator>>,
}

impl ValidatorRegistry {
    /// Register a rule set. Returns `false` if the type already had one.
    pub(crate) fn insert<R: Request>(&mut self, validator: impl RequestValidator<R>) -> bool {
        self.validators
            .insert(
                TypeId::of::<R>(),
                Box::new(ValidatorAdapter {
                    validator,
                    _marker: PhantomData,
                }),
            )
            .is_none()
    }
}

/// Runs the registered rule set for the incoming request type and
/// short-circuits the chain on any violation. Requests with no rule set
/// pass straight through.
pub(crate) struct ValidationBehavior {
    registry: ValidatorRegistry,
}

impl ValidationBehavior {
    pub(crate) fn new(registry: ValidatorRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl PipelineBehavior for ValidationBehavior {
    async fn handle(
        &self,
        ctx: &RequestContext,
        request: BoxedRequest,
        next: Next<'_>,
    ) -> DomainResult<BoxedResponse> {
        let type_id = (*request).type_id();
        if let Some(validator) = self.registry.validators.get(&type_id) {
            let violations = validator.validate(request.as_ref());
            if !violations.is_empty() {
                return Err(violations_error(ctx.request_name, &violations));
            }
        }
        next.run(ctx, request).await
    }
}

/// Build the short-circuit error: all violations, concatenated.
fn violations_error(request_name: &str, violations: &[FieldViolation]) -> DomainError {
    let detail = violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ");
    DomainError::validation(
        codes::REQUEST_INVALID,
        format!("{request_name} rejected: {detail}"),
    )
}
