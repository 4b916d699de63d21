//! Message broker seam for externally published events.
//!
//! The core never talks to a transport itself: broker-bound events are turned
//! into a [`Message`] and handed to whatever implements [`MessageBroker`].
//! Retries, connection management, and delivery guarantees belong to the
//! implementation behind the trait.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Wire form of an externally published event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Kind of event this message carries (e.g. "notification_event").
    pub message_type: String,
    /// The event's name.
    pub message_name: String,
    /// The event's unique id.
    pub message_id: Uuid,
    /// JSON payload.
    pub payload: serde_json::Value,
}

/// Error type for broker publish operations.
#[derive(Debug)]
pub enum PublishError {
    /// Connection to the broker failed.
    ConnectionFailed(String),
    /// The event could not be serialized into a message.
    SerializationFailed(String),
    /// The broker rejected the message.
    Rejected(String),
    /// Other error.
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::ConnectionFailed(msg) => write!(f, "connection failed: {}", msg),
            PublishError::SerializationFailed(name) => {
                write!(f, "could not serialize {} into a message", name)
            }
            PublishError::Rejected(msg) => write!(f, "message rejected: {}", msg),
            PublishError::Other(e) => write!(f, "publish error: {}", e),
        }
    }
}

impl Error for PublishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PublishError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// Client for an external message transport.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Publish one message. May suspend.
    async fn send_message(&self, message: Message) -> Result<(), PublishError>;
}

/// Broker that drops every message with a warning. The default wiring until a
/// real transport is configured.
pub struct DevnullMessageBroker;

#[async_trait]
impl MessageBroker for DevnullMessageBroker {
    async fn send_message(&self, message: Message) -> Result<(), PublishError> {
        warn!(message = %message.message_name, "message dropped by devnull broker");
        Ok(())
    }
}
