//! Middleware pipeline applied around command handling.
//!
//! Middlewares wrap the request handler's entry point in registration order:
//! the first middleware added sees the request first and the response last
//! (onion composition). The event path carries no middleware.

mod chain;
mod logging;

pub use chain::{Endpoint, Middleware, MiddlewareChain, Next, RequestEnvelope, ResponseEnvelope};
pub use logging::LoggingMiddleware;
