//! Fixtures for the request mediator tests.

use std::any::Any;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cqrs_rust::{
    Container, DispatchError, Event, EventHandler, HandlerError, HandlerId, Request,
    RequestHandler, ResolveError,
};

pub type Log = Arc<Mutex<Vec<&'static str>>>;

// --- User creation scenario ---

pub struct CreateUserCommand {
    pub user_id: u64,
    pub status: Option<String>,
}

impl Request for CreateUserCommand {
    type Response = UserCreatedResponse;
}

#[derive(Debug, PartialEq)]
pub struct UserCreatedResponse {
    pub user_id: u64,
    pub status: Option<String>,
}

pub struct UserCreatedEvent {
    pub user_id: u64,
}

impl Event for UserCreatedEvent {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct CreateUserHandler {
    pub log: Log,
    pub events: Vec<Box<dyn Event>>,
}

#[async_trait]
impl RequestHandler<CreateUserCommand> for CreateUserHandler {
    async fn handle(
        &mut self,
        request: CreateUserCommand,
    ) -> Result<UserCreatedResponse, HandlerError> {
        self.log.lock().unwrap().push("create-user");
        self.events.push(Box::new(UserCreatedEvent {
            user_id: request.user_id,
        }));
        Ok(UserCreatedResponse {
            user_id: request.user_id,
            status: request.status,
        })
    }

    fn drain_events(&mut self) -> Vec<Box<dyn Event>> {
        std::mem::take(&mut self.events)
    }
}

pub struct NotifyHandler {
    pub log: Log,
}

#[async_trait]
impl EventHandler<UserCreatedEvent> for NotifyHandler {
    async fn handle(&mut self, _event: &UserCreatedEvent) -> Result<(), HandlerError> {
        self.log.lock().unwrap().push("notify");
        Ok(())
    }
}

pub struct AuditHandler {
    pub log: Log,
}

#[async_trait]
impl EventHandler<UserCreatedEvent> for AuditHandler {
    async fn handle(&mut self, _event: &UserCreatedEvent) -> Result<(), HandlerError> {
        self.log.lock().unwrap().push("audit");
        Ok(())
    }
}

// --- Multi-event recording scenario ---

pub struct RecordStepsCommand {
    pub steps: u8,
}

impl Request for RecordStepsCommand {
    type Response = ();
}

pub struct StepEvent {
    pub seq: u8,
}

impl Event for StepEvent {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct RecordStepsHandler {
    pub events: Vec<Box<dyn Event>>,
}

#[async_trait]
impl RequestHandler<RecordStepsCommand> for RecordStepsHandler {
    async fn handle(&mut self, request: RecordStepsCommand) -> Result<(), HandlerError> {
        for seq in 1..=request.steps {
            self.events.push(Box::new(StepEvent { seq }));
        }
        Ok(())
    }

    fn drain_events(&mut self) -> Vec<Box<dyn Event>> {
        std::mem::take(&mut self.events)
    }
}

// --- Failing handler scenario ---

pub struct RejectedCommand;

impl Request for RejectedCommand {
    type Response = ();
}

pub struct RejectingHandler;

#[async_trait]
impl RequestHandler<RejectedCommand> for RejectingHandler {
    async fn handle(&mut self, _request: RejectedCommand) -> Result<(), HandlerError> {
        Err(HandlerError::Rejected("user quota exceeded".into()))
    }
}

// --- Test collaborators ---

/// Emitter that keeps every emitted event for inspection.
#[derive(Default)]
pub struct RecordingEmitter {
    pub emitted: Arc<Mutex<Vec<Box<dyn Event>>>>,
}

#[async_trait]
impl cqrs_rust::EventEmitter for RecordingEmitter {
    async fn emit(&self, event: Box<dyn Event>) -> Result<(), DispatchError> {
        self.emitted.lock().unwrap().push(event);
        Ok(())
    }
}

/// Container wrapper that counts resolutions.
pub struct CountingContainer<C> {
    pub inner: C,
    pub resolutions: Arc<Mutex<usize>>,
}

#[async_trait]
impl<C: Container> Container for CountingContainer<C> {
    async fn resolve(
        &self,
        handler: HandlerId,
    ) -> Result<Box<dyn Any + Send + Sync>, ResolveError> {
        *self.resolutions.lock().unwrap() += 1;
        self.inner.resolve(handler).await
    }
}
