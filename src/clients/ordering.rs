//! # Ordering API
//!
//! The remote ordering service is an external collaborator. This crate never
//! talks HTTP itself; it goes through the [`OrderingApi`] trait so the HTTP
//! client (with its own timeouts and retries) can be swapped for a mock.

use crate::model::{Address, Menu, ServiceMethod, Store};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by the ordering API collaborator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// No store serves the given address with the given method.
    #[error("No store found for {address} ({service_method})")]
    NoStoreFound {
        address: String,
        service_method: ServiceMethod,
    },

    /// The upstream service rejected the request.
    #[error("Ordering API rejected request: {0}")]
    Rejected(String),

    /// The request could not be completed (network, timeout, bad payload).
    #[error("Ordering API transport error: {0}")]
    Transport(String),
}

/// Narrow interface to the upstream ordering service.
#[async_trait]
pub trait OrderingApi: Send + Sync {
    /// Proximity lookup of the single nearest store able to serve `method` at `address`.
    async fn find_nearest_store(
        &self,
        address: &Address,
        method: ServiceMethod,
    ) -> Result<Store, ApiError>;

    /// Downloads the product catalog of `store`.
    async fn fetch_menu(&self, store: &Store) -> Result<Menu, ApiError>;

    /// All stores near `address` that offer `method`.
    async fn store_candidates(
        &self,
        address: &Address,
        method: ServiceMethod,
    ) -> Result<Vec<Store>, ApiError>;
}
