//! Error types for dispatch and handler execution.

use std::error::Error;
use std::fmt;

use crate::brokers::PublishError;
use crate::container::ResolveError;

/// Error type for mediator and dispatcher operations.
///
/// The dispatch layer performs no local recovery: everything a container,
/// middleware, handler, or emitter fails with is carried to the original
/// caller of `send` inside one of these variants.
#[derive(Debug)]
pub enum DispatchError {
    /// No handler bound for this request type.
    UnknownRequest(&'static str),
    /// The container could not produce a handler instance.
    Resolve(ResolveError),
    /// A handler or middleware failed.
    Handler(HandlerError),
    /// The pipeline returned a response the dispatcher could not read as the
    /// request's response type (a middleware replaced it).
    UnexpectedResponse(&'static str),
    /// The event emitter failed to publish to the message broker.
    Publish(PublishError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnknownRequest(name) => {
                write!(f, "no request handler bound for {}", name)
            }
            DispatchError::Resolve(e) => write!(f, "resolution failed: {}", e),
            DispatchError::Handler(e) => write!(f, "handler failed: {}", e),
            DispatchError::UnexpectedResponse(name) => {
                write!(f, "pipeline returned an unexpected response type for {}", name)
            }
            DispatchError::Publish(e) => write!(f, "publish failed: {}", e),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DispatchError::Resolve(e) => Some(e),
            DispatchError::Handler(e) => Some(e),
            DispatchError::Publish(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResolveError> for DispatchError {
    fn from(err: ResolveError) -> Self {
        DispatchError::Resolve(err)
    }
}

impl From<HandlerError> for DispatchError {
    fn from(err: HandlerError) -> Self {
        DispatchError::Handler(err)
    }
}

/// Error type returned by request handlers, event handlers, and middlewares.
#[derive(Debug)]
pub enum HandlerError {
    /// Business logic rejected the message (validation, invariant violation).
    Rejected(String),
    /// A resource the handler needed was not found.
    NotFound(String),
    /// Other error.
    Other(Box<dyn Error + Send + Sync>),
}

impl HandlerError {
    /// Wrap any error (or message string) as a handler failure.
    pub fn other(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        HandlerError::Other(err.into())
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Rejected(msg) => write!(f, "rejected: {}", msg),
            HandlerError::NotFound(id) => write!(f, "not found: {}", id),
            HandlerError::Other(e) => write!(f, "handler error: {}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
