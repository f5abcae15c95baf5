//! Error types for the store locator.

use crate::clients::ApiError;
use thiserror::Error;

/// Errors that can occur while selecting a service method or resolving a store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocatorError {
    /// The supplied service method is not `delivery` or `carryout`.
    #[error("Bad service method: {0:?} (expected Delivery or Carryout)")]
    BadServiceMethod(String),

    /// An operation needed a service method but none has been set.
    #[error("No service method has been set")]
    NoServiceMethod,

    /// The user has no address to search from.
    #[error("User has no address")]
    NoAddress,

    /// The ordering API failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
