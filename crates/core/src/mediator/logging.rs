//! Structured logging around handler execution.

use std::time::Instant;

use async_trait::async_trait;

use crate::error::DomainResult;

use super::behavior::{Next, PipelineBehavior, RequestContext};
use super::{BoxedRequest, BoxedResponse};

/// Records a start/end pair for every dispatch, with elapsed duration
/// and the error code on failure.
///
/// The measured duration covers everything inside this behavior,
/// including validation when this stage is registered outermost.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBehavior;

impl LoggingBehavior {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineBehavior for LoggingBehavior {
    async fn handle(
        &self,
        ctx: &RequestContext,
        request: BoxedRequest,
        next: Next<'_>,
    ) -> DomainResult<BoxedResponse> {
        tracing::debug!(
            request.name = ctx.request_name,
            correlation_id = %ctx.correlation_id,
            "Request received"
        );
        let start = Instant::now();

        let result = next.run(ctx, request).await;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                tracing::info!(
                    request.name = ctx.request_name,
                    correlation_id = %ctx.correlation_id,
                    duration.ms = elapsed_ms,
                    "Request completed"
                );
            }
            Err(error) => {
                tracing::warn!(
                    request.name = ctx.request_name,
                    correlation_id = %ctx.correlation_id,
                    duration.ms = elapsed_ms,
                    error.code = %error.code,
                    "Request failed"
                );
            }
        }

        result
    }
}
