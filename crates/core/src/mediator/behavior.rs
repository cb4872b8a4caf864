//! The behavior chain: cross-cutting wrappers composed around handler
//! execution.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::DomainResult;

use super::erased::ErasedHandler;
use super::{BoxedRequest, BoxedResponse};

/// Per-dispatch state visible to behaviors and handlers.
///
/// The cancellation token is caller-supplied and passed through the
/// chain opaquely; stages never inspect it, handlers honor it at
/// storage seams.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Stable name of the request type being dispatched.
    pub request_name: &'static str,
    /// Correlation id stamped on every log record for this dispatch.
    pub correlation_id: Uuid,
    /// Caller-supplied cancellation signal.
    pub cancellation: CancellationToken,
}

impl RequestContext {
    pub(crate) fn new(request_name: &'static str, cancellation: CancellationToken) -> Self {
        Self {
            request_name,
            correlation_id: Uuid::new_v4(),
            cancellation,
        }
    }
}

/// A cross-cutting stage wrapped around handler execution.
///
/// Behaviors run in the fixed order configured at build time and apply
/// uniformly to every request type. A behavior forwards the request via
/// [`Next::run`] and must pass the result through unaltered unless
/// short-circuiting is its entire point (validation).
#[async_trait]
pub trait PipelineBehavior: Send + Sync + 'static {
    async fn handle(
        &self,
        ctx: &RequestContext,
        request: BoxedRequest,
        next: Next<'_>,
    ) -> DomainResult<BoxedResponse>;
}

/// The remainder of the chain: zero or more behaviors, then the handler.
pub struct Next<'a> {
    pub(crate) behaviors: &'a [Arc<dyn PipelineBehavior>],
    pub(crate) handler: &'a dyn ErasedHandler,
}

impl<'a> Next<'a> {
    /// Invoke the rest of the chain.
    pub fn run<'b>(
        self,
        ctx: &'b RequestContext,
        request: BoxedRequest,
    ) -> BoxFuture<'b, DomainResult<BoxedResponse>>
    where
        'a: 'b,
    {
        match self.behaviors.split_first() {
            Some((first, rest)) => first.handle(
                ctx,
                request,
                Next {
                    behaviors: rest,
                    handler: self.handler,
                },
            ),
            None => self.handler.handle(request, ctx),
        }
    }
}
