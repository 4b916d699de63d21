//! The request handler capability.

use async_trait::async_trait;

use super::request::Request;
use crate::error::HandlerError;
use crate::events::Event;

/// Handles one request type, answering with its response.
///
/// Handlers are resolved fresh from the container for every dispatch and
/// dropped when it completes. Domain events recorded while handling are
/// surfaced through [`drain_events`](RequestHandler::drain_events), which the
/// dispatcher calls exactly once after `handle` returns; the mediator then
/// forwards whatever was drained to the configured event emitter.
///
/// ## Example
///
/// ```ignore
/// struct CreateUserHandler {
///     users: UserStore,
///     events: Vec<Box<dyn Event>>,
/// }
///
/// #[async_trait]
/// impl RequestHandler<CreateUser> for CreateUserHandler {
///     async fn handle(&mut self, request: CreateUser) -> Result<UserCreated, HandlerError> {
///         let id = self.users.insert(&request.name).await?;
///         self.events.push(Box::new(UserCreatedEvent { id }));
///         Ok(UserCreated { id })
///     }
///
///     fn drain_events(&mut self) -> Vec<Box<dyn Event>> {
///         std::mem::take(&mut self.events)
///     }
/// }
/// ```
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    /// Handle the request. May suspend; failures abort the dispatch.
    async fn handle(&mut self, request: R) -> Result<R::Response, HandlerError>;

    /// Take the events recorded during the preceding `handle` call, in
    /// production order. Handlers that record nothing keep the default.
    fn drain_events(&mut self) -> Vec<Box<dyn Event>> {
        Vec::new()
    }
}
