//! Onion composition of middlewares around a request handler.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::HandlerError;
use crate::requests::Request;
use crate::short_type_name;

/// Type-erased view of an in-flight request.
///
/// Middlewares receive the request through this envelope so one middleware
/// can serve every request type. A middleware that knows a concrete type may
/// inspect or rewrite it through the downcast accessors; everything else
/// passes the envelope along untouched.
pub struct RequestEnvelope {
    name: &'static str,
    payload: Box<dyn Any + Send>,
}

impl RequestEnvelope {
    pub(crate) fn new<R: Request>(request: R) -> Self {
        Self {
            name: short_type_name(std::any::type_name::<R>()),
            payload: Box::new(request),
        }
    }

    /// Short type name of the request in flight.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// View the request as a concrete type.
    pub fn downcast_ref<R: Request>(&self) -> Option<&R> {
        self.payload.downcast_ref::<R>()
    }

    /// Mutably view the request as a concrete type.
    pub fn downcast_mut<R: Request>(&mut self) -> Option<&mut R> {
        self.payload.downcast_mut::<R>()
    }

    pub(crate) fn into_request<R: Request>(self) -> Result<R, HandlerError> {
        let name = self.name;
        match self.payload.downcast::<R>() {
            Ok(request) => Ok(*request),
            Err(_) => Err(HandlerError::other(format!(
                "a middleware replaced request {} with a different type",
                name
            ))),
        }
    }
}

/// Type-erased response produced by the pipeline.
pub struct ResponseEnvelope {
    payload: Box<dyn Any + Send>,
}

impl ResponseEnvelope {
    /// Wrap a concrete response value.
    pub fn new<Resp: Send + 'static>(response: Resp) -> Self {
        Self {
            payload: Box::new(response),
        }
    }

    /// View the response as a concrete type.
    pub fn downcast_ref<Resp: 'static>(&self) -> Option<&Resp> {
        self.payload.downcast_ref::<Resp>()
    }

    /// Mutably view the response as a concrete type.
    pub fn downcast_mut<Resp: 'static>(&mut self) -> Option<&mut Resp> {
        self.payload.downcast_mut::<Resp>()
    }

    pub(crate) fn into_response<Resp: 'static>(self) -> Option<Resp> {
        self.payload.downcast::<Resp>().ok().map(|boxed| *boxed)
    }
}

/// The innermost callable of a wrapped pipeline: the handler's entry point.
pub type Endpoint =
    dyn Fn(RequestEnvelope) -> BoxFuture<'static, Result<ResponseEnvelope, HandlerError>>
        + Send
        + Sync;

/// A composable wrapper around request handling.
///
/// Each middleware receives the in-flight request and the next callable in
/// the chain, and must invoke `next.run(request)` to continue; returning
/// without doing so short-circuits every downstream middleware and the
/// handler itself. Middlewares may fail to abort the dispatch.
///
/// ## Example
///
/// ```ignore
/// struct Stamp;
///
/// #[async_trait]
/// impl Middleware for Stamp {
///     async fn handle(
///         &self,
///         mut request: RequestEnvelope,
///         next: Next<'_>,
///     ) -> Result<ResponseEnvelope, HandlerError> {
///         if let Some(cmd) = request.downcast_mut::<CreateUser>() {
///             cmd.source = Some("api".into());
///         }
///         next.run(request).await
///     }
/// }
/// ```
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Wrap the rest of the pipeline.
    async fn handle(
        &self,
        request: RequestEnvelope,
        next: Next<'_>,
    ) -> Result<ResponseEnvelope, HandlerError>;
}

/// The remainder of a wrapped pipeline: zero or more middlewares, then the
/// handler's entry point.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    endpoint: &'a Endpoint,
}

impl<'a> Next<'a> {
    /// Continue the pipeline with the given request.
    pub async fn run(self, request: RequestEnvelope) -> Result<ResponseEnvelope, HandlerError> {
        match self.chain.split_first() {
            Some((head, rest)) => {
                head.handle(
                    request,
                    Next {
                        chain: rest,
                        endpoint: self.endpoint,
                    },
                )
                .await
            }
            None => (self.endpoint)(request).await,
        }
    }
}

/// Ordered middleware list composed around a handler entry point at wrap time.
///
/// Registration order is invocation order: the first middleware added runs
/// its pre-logic first and its post-logic last. Wrapping with an empty chain
/// yields the endpoint itself.
#[derive(Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware to the end of the chain.
    pub fn add(&mut self, middleware: impl Middleware + 'static) {
        self.middlewares.push(Arc::new(middleware));
    }

    /// Replace the chain's middlewares wholesale.
    pub fn set(&mut self, middlewares: Vec<Arc<dyn Middleware>>) {
        self.middlewares = middlewares;
    }

    /// Compose the chain around an endpoint into a single callable.
    pub fn wrap<'a>(&'a self, endpoint: &'a Endpoint) -> Next<'a> {
        Next {
            chain: &self.middlewares,
            endpoint,
        }
    }
}
