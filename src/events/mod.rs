//! Event side: event contract, handler capability, routing map, and emitter.

mod emitter;
mod event;
mod handler;
mod map;

pub use emitter::{BrokerEventEmitter, EventEmitter};
pub use event::{EcstEvent, Event, EventKind, NotificationEvent};
pub use handler::EventHandler;
pub use map::EventMap;
