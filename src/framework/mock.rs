//! # Mock Framework
//!
//! Utilities for testing clients and actors in isolation.
//!
//! | | MockClient | Real Actor |
//! |---|---|---|
//! | **State** | None, canned responses | Real store |
//! | **Use Case** | Logic *around* a client (e.g. `StockClient` defaults) or an actor's dependencies | The actor itself or the whole system |
//! | **Error Injection** | `return_err(FrameworkError::ActorClosed)` | Needs specific state |
//!
//! Two styles are available:
//!
//! - [`MockClient`]: queue expectations up front, hand out `mock.client()`, then
//!   `mock.verify()` at the end.
//! - [`create_mock_client`] plus the `expect_*` helpers: receive each request yourself
//!   and answer it through its responder, which lets a test inspect the payload.
//!
//! ```rust,ignore
//! let mut stock = MockClient::<StockItem>::new();
//! stock.expect_get(ProductId(1)).return_ok(Some(item));
//! let (order_actor, order_client) = order_actor::new(32);
//! tokio::spawn(order_actor.run(OrderContext::enforcing(StockClient::new(stock.client()))));
//! // ... place an order ...
//! stock.verify();
//! ```

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// One queued request the mock expects to receive, with its canned response.
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Put {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Get { .. } => "get",
            Expectation::Create { .. } => "create",
            Expectation::Put { .. } => "put",
            Expectation::List { .. } => "list",
            Expectation::Action { .. } => "action",
        }
    }
}

struct MockState<T: ActorEntity> {
    expectations: VecDeque<Expectation<T>>,
    failures: Vec<String>,
}

type SharedState<T> = Arc<Mutex<MockState<T>>>;

fn lock<T: ActorEntity>(state: &SharedState<T>) -> MutexGuard<'_, MockState<T>> {
    // a panicking test thread must not hide the original failure behind PoisonError
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A mock client with expectation tracking for fluent testing.
///
/// Requests are matched against expectations in FIFO order. A request of the wrong
/// kind, or for the wrong id, is recorded as a failure and its responder is dropped,
/// so the caller sees [`FrameworkError::ActorDropped`]. [`MockClient::verify`] panics on
/// any recorded failure or unmet expectation.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    state: SharedState<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let state: SharedState<T> = Arc::new(Mutex::new(MockState {
            expectations: VecDeque::new(),
            failures: Vec::new(),
        }));
        let task_state = state.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                // held until the failure is recorded so verify() cannot race ahead of it
                let mut state = lock(&task_state);
                let expectation = state.expectations.pop_front();
                if let Err(failure) = Self::answer(request, expectation) {
                    state.failures.push(failure);
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            state,
            _handle: handle,
        }
    }

    fn answer(
        request: ResourceRequest<T>,
        expectation: Option<Expectation<T>>,
    ) -> Result<(), String> {
        fn reply<R>(respond_to: Response<R>, response: Result<R, FrameworkError>) {
            let _ = respond_to.send(response);
        }
        fn check_id<I: PartialEq + std::fmt::Display>(expected: &I, actual: &I) -> Result<(), String> {
            if expected == actual {
                Ok(())
            } else {
                Err(format!("expected id {expected}, got {actual}"))
            }
        }

        match (request, expectation) {
            (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response })) => {
                check_id(&want, &id)?;
                reply(respond_to, response);
            }
            (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                reply(respond_to, response);
            }
            (ResourceRequest::Put { id, respond_to, .. }, Some(Expectation::Put { id: want, response })) => {
                check_id(&want, &id)?;
                reply(respond_to, response);
            }
            (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                reply(respond_to, response);
            }
            (
                ResourceRequest::Action { id, respond_to, .. },
                Some(Expectation::Action { id: want, response }),
            ) => {
                check_id(&want, &id)?;
                reply(respond_to, response);
            }
            (request, Some(expected)) => {
                return Err(format!(
                    "expected {} request, got {}",
                    expected.name(),
                    request_name(&request)
                ));
            }
            (request, None) => {
                return Err(format!("unexpected {} request", request_name(&request)));
            }
        }
        Ok(())
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(self.state.clone(), move |response| Expectation::Get { id, response })
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        ExpectationBuilder::new(self.state.clone(), |response| Expectation::Create { response })
    }

    /// Expects a `put` operation.
    pub fn expect_put(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(self.state.clone(), move |response| Expectation::Put { id, response })
    }

    /// Expects a `list` operation.
    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.state.clone(), |response| Expectation::List { response })
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        ExpectationBuilder::new(self.state.clone(), move |response| Expectation::Action { id, response })
    }

    /// Verifies that all expectations were met and no request was unexpected.
    pub fn verify(&self) {
        let state = lock(&self.state);
        if !state.failures.is_empty() {
            panic!("Mock received unexpected requests: {:?}", state.failures);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

fn request_name<T: ActorEntity>(request: &ResourceRequest<T>) -> &'static str {
    match request {
        ResourceRequest::Get { .. } => "get",
        ResourceRequest::Create { .. } => "create",
        ResourceRequest::Put { .. } => "put",
        ResourceRequest::List { .. } => "list",
        ResourceRequest::Action { .. } => "action",
    }
}

/// Builder that finishes one expectation with its canned response.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    state: SharedState<T>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn new(
        state: SharedState<T>,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            state,
            make: Box::new(make),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.make)(Ok(value));
        lock(&self.state).expectations.push_back(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.make)(Err(error));
        lock(&self.state).expectations.push_back(expectation);
    }
}

// =============================================================================
// CHANNEL-LEVEL HELPERS
// =============================================================================

/// Creates a client whose requests arrive on the returned receiver.
///
/// The test answers each request through its responder, so it can assert on the exact
/// payload a wrapper sent before deciding what the "actor" replies.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Put request
pub async fn expect_put<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Create, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Put {
            id,
            params,
            respond_to,
        }) => Some((id, params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: u32,
        text: String,
    }

    #[derive(Debug)]
    struct NoteCreate {
        text: String,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("note error")]
    struct NoteError;

    #[async_trait]
    impl ActorEntity for Note {
        type Id = u32;
        type Create = NoteCreate;
        type Action = std::convert::Infallible;
        type ActionResult = ();
        type Context = ();
        type Error = NoteError;

        fn from_create_params(id: u32, params: NoteCreate) -> Result<Self, NoteError> {
            Ok(Self { id, text: params.text })
        }

        async fn handle_action(&mut self, action: Self::Action, _ctx: &()) -> Result<(), NoteError> {
            match action {}
        }
    }

    #[tokio::test]
    async fn test_channel_helpers_expose_payload() {
        let (client, mut receiver) = create_mock_client::<Note>(10);

        let put_task = tokio::spawn(async move {
            client.put(3, NoteCreate { text: "hello".into() }).await
        });

        let (id, params, responder) = expect_put(&mut receiver).await.expect("Expected Put request");
        assert_eq!(id, 3);
        assert_eq!(params.text, "hello");
        responder.send(Ok(None)).unwrap();

        assert!(put_task.await.unwrap().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_create().return_ok(1);
        mock.expect_get(1).return_ok(Some(Note { id: 1, text: "hi".into() }));
        mock.expect_list().return_err(FrameworkError::ActorClosed);

        let client = mock.client();
        assert_eq!(client.create(NoteCreate { text: "hi".into() }).await.unwrap(), 1);
        assert_eq!(client.get(1).await.unwrap().unwrap().text, "hi");
        assert!(matches!(client.list().await, Err(FrameworkError::ActorClosed)));

        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "unexpected requests")]
    async fn test_verify_reports_wrong_id() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_get(1).return_ok(None);

        let result = mock.client().get(2).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));

        mock.verify();
    }
}
