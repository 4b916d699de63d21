//! The event handler capability.

use async_trait::async_trait;

use super::event::Event;
use crate::error::HandlerError;

/// Handles one event type. Many handlers may bind to the same event.
///
/// Unlike request handlers, event handlers answer nothing and record no
/// outgoing events. Fan-out stops with them.
///
/// ## Example
///
/// ```ignore
/// struct NotifyHandler {
///     mailer: Mailer,
/// }
///
/// #[async_trait]
/// impl EventHandler<UserCreatedEvent> for NotifyHandler {
///     async fn handle(&mut self, event: &UserCreatedEvent) -> Result<(), HandlerError> {
///         self.mailer.send_welcome(event.id).await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler<E: Event>: Send + Sync {
    /// Handle the event. May suspend; a failure aborts the handlers still
    /// queued for the same dispatch.
    async fn handle(&mut self, event: &E) -> Result<(), HandlerError>;
}
