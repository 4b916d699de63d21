mod support;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cqrs_rust::bootstrap;
use cqrs_rust::{
    DispatchError, FactoryContainer, HandlerError, Middleware, MiddlewareChain, Next,
    RequestEnvelope, RequestMap, RequestMediator, ResolveError, ResponseEnvelope,
};

use support::{
    AuditHandler, CountingContainer, CreateUserCommand, CreateUserHandler, Log, NotifyHandler,
    RecordStepsCommand, RecordStepsHandler, RecordingEmitter, RejectedCommand, RejectingHandler,
    StepEvent, UserCreatedEvent, UserCreatedResponse,
};

fn user_container(log: Log) -> FactoryContainer {
    FactoryContainer::new().register(move || CreateUserHandler {
        log: Arc::clone(&log),
        events: Vec::new(),
    })
}

// =============================================================================
// Responses
// =============================================================================

#[tokio::test]
async fn send_returns_the_handler_response() {
    let log: Log = Arc::default();
    let mut request_map = RequestMap::new();
    request_map.bind::<CreateUserCommand, CreateUserHandler>();
    let mediator = RequestMediator::new(request_map, user_container(Arc::clone(&log)));

    let response = mediator
        .send(CreateUserCommand {
            user_id: 42,
            status: None,
        })
        .await
        .unwrap();

    assert_eq!(
        response,
        UserCreatedResponse {
            user_id: 42,
            status: None,
        }
    );
    assert_eq!(*log.lock().unwrap(), vec!["create-user"]);
}

#[tokio::test]
async fn commands_without_a_response_answer_unit() {
    let mut request_map = RequestMap::new();
    request_map.bind::<RecordStepsCommand, RecordStepsHandler>();
    let container =
        FactoryContainer::new().register(|| RecordStepsHandler { events: Vec::new() });
    let mediator = RequestMediator::new(request_map, container);

    mediator.send(RecordStepsCommand { steps: 0 }).await.unwrap();
}

// =============================================================================
// Event forwarding
// =============================================================================

#[tokio::test]
async fn recorded_events_reach_the_emitter_most_recent_first() {
    let mut request_map = RequestMap::new();
    request_map.bind::<RecordStepsCommand, RecordStepsHandler>();
    let container =
        FactoryContainer::new().register(|| RecordStepsHandler { events: Vec::new() });
    let emitter = RecordingEmitter::default();
    let emitted = Arc::clone(&emitter.emitted);
    let mediator =
        RequestMediator::new(request_map, container).with_event_emitter(Arc::new(emitter));

    mediator.send(RecordStepsCommand { steps: 3 }).await.unwrap();

    let seqs: Vec<u8> = emitted
        .lock()
        .unwrap()
        .iter()
        .map(|event| event.as_any().downcast_ref::<StepEvent>().unwrap().seq)
        .collect();
    assert_eq!(seqs, vec![3, 2, 1]);
}

#[tokio::test]
async fn events_are_discarded_without_an_emitter() {
    let mut request_map = RequestMap::new();
    request_map.bind::<RecordStepsCommand, RecordStepsHandler>();
    let container =
        FactoryContainer::new().register(|| RecordStepsHandler { events: Vec::new() });
    let mediator = RequestMediator::new(request_map, container);

    let result = mediator.send(RecordStepsCommand { steps: 3 }).await;

    assert!(result.is_ok());
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn unbound_request_fails_without_consulting_the_container() {
    let resolutions = Arc::new(Mutex::new(0));
    let container = CountingContainer {
        inner: FactoryContainer::new(),
        resolutions: Arc::clone(&resolutions),
    };
    let mediator = RequestMediator::new(RequestMap::new(), container);

    let result = mediator
        .send(CreateUserCommand {
            user_id: 42,
            status: None,
        })
        .await;

    assert!(matches!(
        result,
        Err(DispatchError::UnknownRequest("CreateUserCommand"))
    ));
    assert_eq!(*resolutions.lock().unwrap(), 0);
}

#[tokio::test]
async fn bound_request_resolves_exactly_one_handler() {
    let log: Log = Arc::default();
    let resolutions = Arc::new(Mutex::new(0));
    let container = CountingContainer {
        inner: user_container(Arc::clone(&log)),
        resolutions: Arc::clone(&resolutions),
    };
    let mut request_map = RequestMap::new();
    request_map.bind::<CreateUserCommand, CreateUserHandler>();
    let mediator = RequestMediator::new(request_map, container);

    mediator
        .send(CreateUserCommand {
            user_id: 1,
            status: None,
        })
        .await
        .unwrap();

    assert_eq!(*resolutions.lock().unwrap(), 1);
    assert_eq!(*log.lock().unwrap(), vec!["create-user"]);
}

#[tokio::test]
async fn handler_failure_propagates_unmodified() {
    let mut request_map = RequestMap::new();
    request_map.bind::<RejectedCommand, RejectingHandler>();
    let container = FactoryContainer::new().register(|| RejectingHandler);
    let mediator = RequestMediator::new(request_map, container);

    let result = mediator.send(RejectedCommand).await;

    assert!(matches!(
        result,
        Err(DispatchError::Handler(HandlerError::Rejected(ref msg)))
            if msg == "user quota exceeded"
    ));
}

#[tokio::test]
async fn resolution_failure_propagates() {
    let mut request_map = RequestMap::new();
    request_map.bind::<RejectedCommand, RejectingHandler>();
    // Bound in the map, never registered in the container.
    let mediator = RequestMediator::new(request_map, FactoryContainer::new());

    let result = mediator.send(RejectedCommand).await;

    assert!(matches!(
        result,
        Err(DispatchError::Resolve(ResolveError::NotRegistered(
            "RejectingHandler"
        )))
    ));
}

// =============================================================================
// Middleware
// =============================================================================

struct StatusMiddleware;

#[async_trait]
impl Middleware for StatusMiddleware {
    async fn handle(
        &self,
        mut request: RequestEnvelope,
        next: Next<'_>,
    ) -> Result<ResponseEnvelope, HandlerError> {
        if let Some(command) = request.downcast_mut::<CreateUserCommand>() {
            command.status = Some("REQ".into());
        }
        let mut response = next.run(request).await?;
        if let Some(created) = response.downcast_mut::<UserCreatedResponse>() {
            created.status = Some("RES".into());
        }
        Ok(response)
    }
}

#[tokio::test]
async fn middleware_transforms_request_and_response() {
    let log: Log = Arc::default();
    let mut request_map = RequestMap::new();
    request_map.bind::<CreateUserCommand, CreateUserHandler>();
    let mut chain = MiddlewareChain::new();
    chain.add(StatusMiddleware);
    let mediator = RequestMediator::new(request_map, user_container(log))
        .with_middleware_chain(chain);

    let response = mediator
        .send(CreateUserCommand {
            user_id: 1,
            status: None,
        })
        .await
        .unwrap();

    // The handler saw the middleware's request rewrite, the caller sees the
    // response rewrite.
    assert_eq!(response.status, Some("RES".to_string()));
    assert_eq!(response.user_id, 1);
}

// =============================================================================
// End to end
// =============================================================================

#[tokio::test]
async fn created_user_fans_out_to_notify_then_audit() {
    let log: Log = Arc::default();
    let notify_log = Arc::clone(&log);
    let audit_log = Arc::clone(&log);
    let create_log = Arc::clone(&log);
    let container = Arc::new(
        FactoryContainer::new()
            .register(move || CreateUserHandler {
                log: Arc::clone(&create_log),
                events: Vec::new(),
            })
            .register(move || NotifyHandler {
                log: Arc::clone(&notify_log),
            })
            .register(move || AuditHandler {
                log: Arc::clone(&audit_log),
            }),
    );

    let mediator = bootstrap::request_mediator(
        container,
        |requests| {
            requests.bind::<CreateUserCommand, CreateUserHandler>();
        },
        |_requests| {},
        |events| {
            events.bind::<UserCreatedEvent, NotifyHandler>();
            events.bind::<UserCreatedEvent, AuditHandler>();
        },
        Vec::new(),
        None,
    );

    let response = mediator
        .send(CreateUserCommand {
            user_id: 42,
            status: None,
        })
        .await
        .unwrap();

    assert_eq!(response.user_id, 42);
    assert_eq!(*log.lock().unwrap(), vec!["create-user", "notify", "audit"]);
}
