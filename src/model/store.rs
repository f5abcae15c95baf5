use crate::model::{Address, ServiceMethod};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreId(pub String);

impl From<&str> for StoreId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StoreId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store_{}", self.0)
    }
}

/// A fulfilling store as returned by the ordering API.
///
/// The store remembers the address and service method that were used to
/// select it. Two stores are only interchangeable when both were derived
/// from the same pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub user_address: Address,
    pub service_method: ServiceMethod,
    #[serde(default)]
    pub is_open: bool,
}

impl Store {
    pub fn new(id: impl Into<StoreId>, user_address: Address, service_method: ServiceMethod) -> Self {
        Self {
            id: id.into(),
            user_address,
            service_method,
            is_open: true,
        }
    }

    /// Returns true if this store was selected for the given address and method.
    pub fn selected_for(&self, address: &Address, method: ServiceMethod) -> bool {
        self.service_method == method && &self.user_address == address
    }
}
