//! Store locator: service method selection and memoized nearest-store lookup.
//!
//! The nearest store is memoized on the [`User`] in a [`StoreMemo`] keyed by
//! the (default address, service method) pair it was computed for. A call with
//! a different pair replaces the memo; a call with the same pair returns the
//! same `Arc<Store>` without touching the ordering API.

pub mod error;

pub use error::*;

use crate::clients::OrderingApi;
use crate::model::{ServiceMethod, Store, StoreMemo, User};
use std::sync::Arc;
use tracing::{debug, info, instrument};

impl User {
    /// Selects the service method from user input.
    ///
    /// Fails with [`LocatorError::BadServiceMethod`] for anything other than
    /// `delivery` or `carryout`, leaving the current method untouched.
    pub fn set_service_method(&mut self, method: &str) -> Result<ServiceMethod, LocatorError> {
        let method: ServiceMethod = method.parse()?;
        self.select_service_method(method);
        Ok(method)
    }

    /// Typed variant of [`User::set_service_method`].
    pub fn select_service_method(&mut self, method: ServiceMethod) {
        if self.service_method != Some(method) {
            debug!(%method, "Service method changed");
            self.store_memo = None;
        }
        self.service_method = Some(method);
    }

    /// Resolves the store nearest to the default address for `method`.
    ///
    /// The first call for a given (address, method) pair queries the ordering
    /// API. Later calls with the same pair return the memoized handle, so
    /// `Arc::ptr_eq` holds between them.
    #[instrument(skip(self, api))]
    pub async fn nearest_store(
        &mut self,
        api: &dyn OrderingApi,
        method: ServiceMethod,
    ) -> Result<Arc<Store>, LocatorError> {
        let address = self.default_address().ok_or(LocatorError::NoAddress)?.clone();

        if let Some(memo) = &self.store_memo {
            if memo.matches(&address, method) {
                debug!(store_id = %memo.store.id, "Nearest store cache hit");
                return Ok(memo.store.clone());
            }
        }

        let mut store = api.find_nearest_store(&address, method).await?;
        store.user_address = address.clone();
        store.service_method = method;
        let store = Arc::new(store);

        info!(store_id = %store.id, %address, "Nearest store resolved");
        self.store_memo = Some(StoreMemo {
            address,
            service_method: method,
            store: store.clone(),
        });
        Ok(store)
    }

    /// Lists candidate stores for the default address and selected method.
    ///
    /// Requires an address ([`LocatorError::NoAddress`]) and a method chosen
    /// earlier with [`User::set_service_method`] ([`LocatorError::NoServiceMethod`]).
    /// Every returned store carries the address and method it was found with.
    #[instrument(skip(self, api))]
    pub async fn stores_near_me(&self, api: &dyn OrderingApi) -> Result<Vec<Store>, LocatorError> {
        let address = self.default_address().ok_or(LocatorError::NoAddress)?;
        let method = self.service_method.ok_or(LocatorError::NoServiceMethod)?;

        let stores = api.store_candidates(address, method).await?;
        debug!(count = stores.len(), "Store candidates");
        Ok(stores
            .into_iter()
            .map(|mut store| {
                store.user_address = address.clone();
                store.service_method = method;
                store
            })
            .collect())
    }
}
