//! Error types for the cart.

use crate::locator::LocatorError;
use crate::menu::MenuError;
use crate::order::OrderError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while loading, editing or saving orders in the cart.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// A current-order operation was called before an order was loaded.
    #[error("Cart has no current order set")]
    NoCurrentOrder,

    /// No saved order has this name.
    #[error("Could not find order {0:?}")]
    OrderNotFound(String),

    /// The current order was deleted; it has to be reloaded before editing.
    #[error("Order {0:?} was deleted")]
    OrderDeleted(String),

    /// The name is empty or collides with the storage prefix.
    #[error("Invalid order name: {0:?}")]
    InvalidOrderName(String),

    /// Toppings were given for a new order without any products.
    #[error("Cannot add toppings without products")]
    ToppingsWithoutProducts,

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Menu(#[from] MenuError),

    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error("Cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// A saved order could not be encoded or decoded.
    #[error("Order serialization error: {0}")]
    Serialization(String),
}
