//! The event contract and the built-in event value types.

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::brokers::Message;
use crate::short_type_name;

/// How an event leaves the process that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Consumed inside this process by locally bound handlers.
    Domain,
    /// Published to the message broker to notify other services.
    Notification,
    /// Published to the message broker carrying state (event-carried state
    /// transfer).
    Ecst,
}

/// A fact that occurred.
///
/// An event's identity is its concrete type, reached through
/// [`as_any`](Event::as_any). Events are produced either by a request handler
/// as a side effect of handling, or externally and submitted straight to the
/// event mediator. Plain domain events only need `as_any`:
///
/// ```ignore
/// struct UserCreatedEvent {
///     id: u64,
/// }
///
/// impl Event for UserCreatedEvent {
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
pub trait Event: Any + Send + Sync {
    /// Short name of this event, used in routing logs and broker messages.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// How this event is delivered. Domain events stay local.
    fn kind(&self) -> EventKind {
        EventKind::Domain
    }

    /// The event as `Any`, for typed fan-out to its handlers.
    fn as_any(&self) -> &dyn Any;

    /// Broker representation of this event. `None` for local-only events.
    fn to_message(&self) -> Option<Message> {
        None
    }
}

/// An event published to other services, carrying a minimal payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent<P> {
    pub event_id: Uuid,
    pub event_timestamp: DateTime<Utc>,
    pub event_name: String,
    pub payload: P,
}

impl<P> NotificationEvent<P> {
    pub fn new(event_name: impl Into<String>, payload: P) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_timestamp: Utc::now(),
            event_name: event_name.into(),
            payload,
        }
    }
}

impl<P> Event for NotificationEvent<P>
where
    P: Serialize + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.event_name
    }

    fn kind(&self) -> EventKind {
        EventKind::Notification
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_message(&self) -> Option<Message> {
        Some(Message {
            message_type: "notification_event".into(),
            message_name: self.event_name.clone(),
            message_id: self.event_id,
            payload: serde_json::to_value(&self.payload).ok()?,
        })
    }
}

/// An event published to other services, carrying the full state other
/// services would otherwise have to query back for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcstEvent<P> {
    pub event_id: Uuid,
    pub event_timestamp: DateTime<Utc>,
    pub event_name: String,
    pub payload: P,
}

impl<P> EcstEvent<P> {
    pub fn new(event_name: impl Into<String>, payload: P) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_timestamp: Utc::now(),
            event_name: event_name.into(),
            payload,
        }
    }
}

impl<P> Event for EcstEvent<P>
where
    P: Serialize + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.event_name
    }

    fn kind(&self) -> EventKind {
        EventKind::Ecst
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_message(&self) -> Option<Message> {
        Some(Message {
            message_type: "ecst_event".into(),
            message_name: self.event_name.clone(),
            message_id: self.event_id,
            payload: serde_json::to_value(&self.payload).ok()?,
        })
    }
}
