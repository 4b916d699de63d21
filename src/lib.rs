mod brokers;
mod container;
mod dispatcher;
mod error;
mod events;
mod mediator;
mod middlewares;
mod requests;

pub mod bootstrap;

pub use brokers::{DevnullMessageBroker, Message, MessageBroker, PublishError};
pub use container::{Container, FactoryContainer, HandlerId, ResolveError};
pub use dispatcher::{DispatchResult, EventDispatcher, RequestDispatcher};
pub use error::{DispatchError, HandlerError};
pub use events::{
    BrokerEventEmitter, EcstEvent, Event, EventEmitter, EventHandler, EventKind, EventMap,
    NotificationEvent,
};
pub use mediator::{EventMediator, RequestMediator};
pub use middlewares::{
    Endpoint, LoggingMiddleware, Middleware, MiddlewareChain, Next, RequestEnvelope,
    ResponseEnvelope,
};
pub use requests::{Request, RequestHandler, RequestMap};

/// Strip the module path off a `std::any::type_name` result.
///
/// Routing logs and error messages name messages the way callers wrote them
/// (`CreateUser`), not as full paths (`my_app::commands::CreateUser`).
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    full.rsplit("::").next().unwrap_or(full)
}
