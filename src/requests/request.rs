//! The request contract.

/// A message expecting exactly one response, routed to exactly one handler.
///
/// Requests model both commands and queries; a request's identity is its
/// concrete type. Commands that answer nothing use `Response = ()`.
///
/// ## Example
///
/// ```ignore
/// struct CreateUser {
///     name: String,
/// }
///
/// impl Request for CreateUser {
///     type Response = UserCreated;
/// }
/// ```
pub trait Request: Send + 'static {
    /// The value a handler answers this request with.
    type Response: Send + 'static;
}
