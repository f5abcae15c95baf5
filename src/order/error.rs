//! Error types for order mutation and validation.

use thiserror::Error;

/// Errors that can occur while editing or validating an order.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// A topping spec did not match `name[:side[:amount]]`.
    #[error("Invalid topping format: {0:?} (expected name[:side[:amount]])")]
    InvalidToppingFormat(String),

    /// `remove_product` found no item with the given code.
    #[error("Product {code:?} not found in order {order:?}")]
    ProductNotFound { order: String, code: String },

    /// A topping edit targeted an item that is not in the order.
    #[error("Cannot find {code:?} in the {order:?} order")]
    ItemNotFound { order: String, code: String },

    /// The order cannot be submitted as is.
    #[error("Order validation error: {0}")]
    ValidationError(String),
}
