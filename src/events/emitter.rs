//! Event emitter: the seam between handler-produced events and the world.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::event::{Event, EventKind};
use super::map::EventMap;
use crate::brokers::{MessageBroker, PublishError};
use crate::container::Container;
use crate::dispatcher::EventDispatcher;
use crate::error::DispatchError;

/// Receives every event a request handler recorded, one at a time.
///
/// The request mediator awaits each `emit` before handing over the next
/// event. Whether emission means local dispatch, publication to a broker, or
/// both is the emitter's decision.
#[async_trait]
pub trait EventEmitter: Send + Sync {
    /// Emit one event. May suspend; failures surface to the `send` caller.
    async fn emit(&self, event: Box<dyn Event>) -> Result<(), DispatchError>;
}

/// Default emitter policy: domain events are re-dispatched locally, while
/// notification and ECST events are serialized and handed to the message
/// broker.
pub struct BrokerEventEmitter<C> {
    dispatcher: EventDispatcher<C>,
    message_broker: Arc<dyn MessageBroker>,
}

impl<C: Container> BrokerEventEmitter<C> {
    /// Create an emitter dispatching locally through `event_map`/`container`
    /// and publishing through `message_broker`.
    pub fn new(event_map: EventMap, container: C, message_broker: Arc<dyn MessageBroker>) -> Self {
        Self {
            dispatcher: EventDispatcher::new(event_map, container),
            message_broker,
        }
    }
}

#[async_trait]
impl<C: Container> EventEmitter for BrokerEventEmitter<C> {
    async fn emit(&self, event: Box<dyn Event>) -> Result<(), DispatchError> {
        debug!(event = event.name(), "emitting event");
        match event.kind() {
            EventKind::Domain => self.dispatcher.dispatch(event.as_ref()).await,
            EventKind::Notification | EventKind::Ecst => {
                let message = event.to_message().ok_or_else(|| {
                    DispatchError::Publish(PublishError::SerializationFailed(
                        event.name().to_string(),
                    ))
                })?;
                self.message_broker
                    .send_message(message)
                    .await
                    .map_err(DispatchError::Publish)
            }
        }
    }
}
