//! Type erasure for handler storage.
//!
//! Rust does not allow generic methods on `dyn Trait`, so handlers are
//! stored behind an object-safe wrapper that downcasts the request back
//! to its concrete type before delegating.

use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::{codes, DomainError, DomainResult};

use super::behavior::RequestContext;
use super::{BoxedRequest, BoxedResponse, Request, RequestHandler};

/// Object-safe handler facade keyed by the request's `TypeId`.
#[async_trait]
pub(crate) trait ErasedHandler: Send + Sync {
    async fn handle(
        &self,
        request: BoxedRequest,
        ctx: &RequestContext,
    ) -> DomainResult<BoxedResponse>;
}

/// Adapts a concrete [`RequestHandler`] to [`ErasedHandler`].
pub(crate) struct HandlerAdapter<R, H> {
    handler: H,
    _marker: PhantomData<fn(R)>,
}

impl<R, H> HandlerAdapter<R, H> {
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<R, H> ErasedHandler for HandlerAdapter<R, H>
where
    R: Request,
    H: RequestHandler<R>,
{
    async fn handle(
        &self,
        request: BoxedRequest,
        ctx: &RequestContext,
    ) -> DomainResult<BoxedResponse> {
        // The dispatcher looks handlers up by the request's TypeId, so a
        // failed downcast means registry corruption, not caller error.
        let request = request.downcast::<R>().map_err(|_| {
            DomainError::failure(
                codes::TYPE_MISMATCH,
                format!("request does not match handler for {}", R::name()),
            )
        })?;
        let response = self.handler.handle(*request, ctx).await?;
        Ok(Box::new(response) as BoxedResponse)
    }
}
