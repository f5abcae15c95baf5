//! Represents a named customer order.
//!
//! # Persistence
//! The order name is the only persistence key. The [`Cart`](crate::cart::Cart)
//! stores the order under `user_order_<name>` and re-stamps the name on load,
//! so the serialized `name` field is informational.
//!
//! Mutation rules (adding/removing products, applying toppings, validation)
//! live in [`crate::order`].

use crate::model::{Address, ProductItem, ServiceMethod, StoreId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_method: Option<ServiceMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    #[serde(default)]
    pub products: Vec<ProductItem>,
}

impl Order {
    /// Creates a new, empty Order.
    ///
    /// # Arguments
    /// * `name` - Name of the order inside the cart (case-sensitive)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
