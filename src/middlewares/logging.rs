//! Request logging middleware.

use async_trait::async_trait;
use tracing::debug;

use super::chain::{Middleware, Next, RequestEnvelope, ResponseEnvelope};
use crate::error::HandlerError;

/// Logs each request by name before and after the rest of the pipeline runs.
#[derive(Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        request: RequestEnvelope,
        next: Next<'_>,
    ) -> Result<ResponseEnvelope, HandlerError> {
        let name = request.name();
        debug!(request = name, "handling request");
        let response = next.run(request).await?;
        debug!(request = name, "request handled");
        Ok(response)
    }
}
