//! Error types for the menu cache.

use crate::clients::ApiError;
use crate::model::StoreId;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while fetching, caching or searching a menu.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    /// The code does not name a variant in the store's catalog.
    #[error("Variant {code:?} not found on the menu of {store_id}")]
    VariantNotFound { code: String, store_id: StoreId },

    /// Fetching the catalog from the ordering API failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading or writing the cached catalog failed.
    #[error("Menu cache storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cached catalog could not be encoded.
    #[error("Menu cache serialization error: {0}")]
    Serialization(String),
}
