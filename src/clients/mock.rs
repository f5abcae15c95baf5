//! # Mock Collaborators
//!
//! Utilities for testing the locator, menu cache and cart in isolation.
//!
//! [`MockOrderingApi`] works on an expectation queue: every call pops the next
//! expectation and panics if the call does not match it (or if the queue is
//! empty). That makes caching easy to assert: expect one lookup, call twice,
//! and an unexpected second lookup fails the test.
//!
//! # Example
//! ```ignore
//! let mock = MockOrderingApi::new();
//! mock.expect_nearest_store().return_ok(store);
//! mock.expect_fetch_menu().return_ok(menu);
//!
//! // ... exercise code that takes `&dyn OrderingApi` ...
//! mock.verify(); // Ensures all expectations were met
//! ```

use crate::clients::{ApiError, Clock, OrderingApi};
use crate::model::{Address, Menu, ServiceMethod, Store};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected call to the mock API and the response to give back.
#[derive(Debug)]
enum Expectation {
    NearestStore { response: Result<Store, ApiError> },
    FetchMenu { response: Result<Menu, ApiError> },
    StoreCandidates { response: Result<Vec<Store>, ApiError> },
}

impl Expectation {
    fn kind(&self) -> &'static str {
        match self {
            Expectation::NearestStore { .. } => "find_nearest_store",
            Expectation::FetchMenu { .. } => "fetch_menu",
            Expectation::StoreCandidates { .. } => "store_candidates",
        }
    }
}

/// Expectation-driven mock of the ordering API.
#[derive(Clone, Default)]
pub struct MockOrderingApi {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl MockOrderingApi {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `find_nearest_store` call.
    pub fn expect_nearest_store(&self) -> NearestStoreExpectationBuilder {
        NearestStoreExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `fetch_menu` call.
    pub fn expect_fetch_menu(&self) -> FetchMenuExpectationBuilder {
        FetchMenuExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `store_candidates` call.
    pub fn expect_store_candidates(&self) -> StoreCandidatesExpectationBuilder {
        StoreCandidatesExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Names of the API methods called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("mock calls poisoned").clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().expect("mock expectations poisoned");
        if !exps.is_empty() {
            let pending: Vec<_> = exps.iter().map(Expectation::kind).collect();
            panic!("Not all expectations were met. {} remaining: {:?}", exps.len(), pending);
        }
    }

    fn next(&self, call: &'static str) -> Expectation {
        self.calls.lock().expect("mock calls poisoned").push(call);
        let mut exps = self.expectations.lock().expect("mock expectations poisoned");
        match exps.pop_front() {
            Some(exp) => exp,
            None => panic!("Unexpected call to {call}: no expectations left"),
        }
    }
}

#[async_trait]
impl OrderingApi for MockOrderingApi {
    async fn find_nearest_store(
        &self,
        _address: &Address,
        _method: ServiceMethod,
    ) -> Result<Store, ApiError> {
        match self.next("find_nearest_store") {
            Expectation::NearestStore { response } => response,
            other => panic!("Expected {}, got find_nearest_store", other.kind()),
        }
    }

    async fn fetch_menu(&self, _store: &Store) -> Result<Menu, ApiError> {
        match self.next("fetch_menu") {
            Expectation::FetchMenu { response } => response,
            other => panic!("Expected {}, got fetch_menu", other.kind()),
        }
    }

    async fn store_candidates(
        &self,
        _address: &Address,
        _method: ServiceMethod,
    ) -> Result<Vec<Store>, ApiError> {
        match self.next("store_candidates") {
            Expectation::StoreCandidates { response } => response,
            other => panic!("Expected {}, got store_candidates", other.kind()),
        }
    }
}

/// Builder for `find_nearest_store` expectations.
pub struct NearestStoreExpectationBuilder {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl NearestStoreExpectationBuilder {
    pub fn return_ok(self, store: Store) {
        self.push(Ok(store));
    }

    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Store, ApiError>) {
        self.expectations
            .lock()
            .expect("mock expectations poisoned")
            .push_back(Expectation::NearestStore { response });
    }
}

/// Builder for `fetch_menu` expectations.
pub struct FetchMenuExpectationBuilder {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl FetchMenuExpectationBuilder {
    pub fn return_ok(self, menu: Menu) {
        self.push(Ok(menu));
    }

    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Menu, ApiError>) {
        self.expectations
            .lock()
            .expect("mock expectations poisoned")
            .push_back(Expectation::FetchMenu { response });
    }
}

/// Builder for `store_candidates` expectations.
pub struct StoreCandidatesExpectationBuilder {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl StoreCandidatesExpectationBuilder {
    pub fn return_ok(self, stores: Vec<Store>) {
        self.push(Ok(stores));
    }

    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Vec<Store>, ApiError>) {
        self.expectations
            .lock()
            .expect("mock expectations poisoned")
            .push_back(Expectation::StoreCandidates { response });
    }
}

// =============================================================================
// MANUAL CLOCK
// =============================================================================

/// A clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> Address {
        Address::new("1 Main St", "Springfield", "IL", "62701")
    }

    #[tokio::test]
    async fn test_mock_returns_expectations_in_order() {
        let mock = MockOrderingApi::new();
        let store = Store::new("4336", addr(), ServiceMethod::Carryout);
        mock.expect_nearest_store().return_ok(store.clone());
        mock.expect_fetch_menu().return_err(ApiError::Transport("timeout".into()));

        let found = mock
            .find_nearest_store(&addr(), ServiceMethod::Carryout)
            .await
            .unwrap();
        assert_eq!(found, store);

        let menu = mock.fetch_menu(&store).await;
        assert_eq!(menu, Err(ApiError::Transport("timeout".into())));

        assert_eq!(mock.calls(), vec!["find_nearest_store", "fetch_menu"]);
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected call")]
    async fn test_mock_panics_on_unexpected_call() {
        let mock = MockOrderingApi::new();
        let _ = mock.store_candidates(&addr(), ServiceMethod::Delivery).await;
    }

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), start + Duration::minutes(5));
    }
}
