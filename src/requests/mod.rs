//! Command/query side: request contract, handler capability, and routing map.

mod handler;
mod map;
mod request;

pub use handler::RequestHandler;
pub use map::RequestMap;
pub use request::Request;
