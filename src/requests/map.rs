//! Request routing map.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;

use super::handler::RequestHandler;
use super::request::Request;
use crate::container::{HandlerId, ResolveError};
use crate::dispatcher::DispatchResult;
use crate::error::{DispatchError, HandlerError};
use crate::events::Event;
use crate::middlewares::{MiddlewareChain, RequestEnvelope, ResponseEnvelope};
use crate::short_type_name;

/// Invokes a resolved handler instance against a typed request, running the
/// middleware chain around it. Captured at bind time, where the concrete
/// handler type is still known.
pub(crate) type RequestInvoke<R> = Arc<
    dyn for<'a> Fn(
            Box<dyn Any + Send + Sync>,
            R,
            &'a MiddlewareChain,
        ) -> BoxFuture<
            'a,
            Result<DispatchResult<<R as Request>::Response>, DispatchError>,
        > + Send
        + Sync,
>;

struct RequestBinding {
    handler: HandlerId,
    invoke: Box<dyn Any + Send + Sync>,
}

/// Maps each request type to exactly one handler type.
///
/// Built once at startup and read-only afterwards. Binding a second handler
/// to the same request type silently overwrites the first (last bind wins).
#[derive(Default)]
pub struct RequestMap {
    bindings: HashMap<TypeId, RequestBinding>,
}

impl RequestMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a request type to its handler type.
    pub fn bind<R, H>(&mut self)
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let invoke: RequestInvoke<R> = Arc::new(invoke_handler::<R, H>);
        self.bindings.insert(
            TypeId::of::<R>(),
            RequestBinding {
                handler: HandlerId::of::<H>(),
                invoke: Box::new(invoke),
            },
        );
    }

    /// The bound handler id and invoke function for a request type.
    pub(crate) fn get<R: Request>(&self) -> Option<(HandlerId, RequestInvoke<R>)> {
        let binding = self.bindings.get(&TypeId::of::<R>())?;
        let invoke = binding.invoke.downcast_ref::<RequestInvoke<R>>()?;
        Some((binding.handler, Arc::clone(invoke)))
    }

    /// Whether any handler is bound for a request type.
    pub fn contains<R: Request>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<R>())
    }
}

fn invoke_handler<'a, R, H>(
    instance: Box<dyn Any + Send + Sync>,
    request: R,
    chain: &'a MiddlewareChain,
) -> BoxFuture<'a, Result<DispatchResult<R::Response>, DispatchError>>
where
    R: Request,
    H: RequestHandler<R> + 'static,
{
    Box::pin(async move {
        let request_name = short_type_name(std::any::type_name::<R>());
        let handler = instance.downcast::<H>().map_err(|_| {
            ResolveError::InstanceMismatch(short_type_name(std::any::type_name::<H>()))
        })?;

        // The handler moves into the endpoint closure through this slot and
        // stays there until the chain reaches it; recorded events come back
        // out through the sink once `handle` returns.
        let slot = Arc::new(Mutex::new(Some(handler)));
        let sink: Arc<Mutex<Vec<Box<dyn Event>>>> = Arc::new(Mutex::new(Vec::new()));

        let endpoint = {
            let slot = Arc::clone(&slot);
            let sink = Arc::clone(&sink);
            move |envelope: RequestEnvelope| -> BoxFuture<'static, Result<ResponseEnvelope, HandlerError>> {
                let slot = Arc::clone(&slot);
                let sink = Arc::clone(&sink);
                Box::pin(async move {
                    let request = envelope.into_request::<R>()?;
                    let mut handler = match lock(&slot).take() {
                        Some(handler) => handler,
                        None => {
                            return Err(HandlerError::other(
                                "request handler invoked more than once in one dispatch",
                            ))
                        }
                    };
                    let response = handler.handle(request).await?;
                    lock(&sink).extend(handler.drain_events());
                    Ok(ResponseEnvelope::new(response))
                })
            }
        };

        let envelope = RequestEnvelope::new(request);
        let response = chain.wrap(&endpoint).run(envelope).await?;
        let response = response
            .into_response::<R::Response>()
            .ok_or(DispatchError::UnexpectedResponse(request_name))?;
        let events = std::mem::take(&mut *lock(&sink));
        Ok(DispatchResult { response, events })
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
