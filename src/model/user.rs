use crate::model::{Address, ServiceMethod, Store};
use std::sync::Arc;

/// Memoized result of a nearest-store lookup.
///
/// The entry records the exact (address, service method) pair the lookup was
/// made with. It is only reused while both still match.
#[derive(Debug, Clone)]
pub struct StoreMemo {
    pub address: Address,
    pub service_method: ServiceMethod,
    pub store: Arc<Store>,
}

impl StoreMemo {
    pub fn matches(&self, address: &Address, method: ServiceMethod) -> bool {
        self.service_method == method && &self.address == address
    }
}

/// Represents the customer placing orders.
///
/// Store resolution ([`User::nearest_store`], [`User::stores_near_me`]) and
/// service method selection are implemented in [`crate::locator`].
#[derive(Debug, Clone, Default)]
pub struct User {
    pub(crate) addresses: Vec<Address>,
    pub(crate) service_method: Option<ServiceMethod>,
    pub(crate) store_memo: Option<StoreMemo>,
}

impl User {
    /// Creates a new User with no addresses and no service method.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.add_address(address);
        self
    }

    /// Appends an address. The first address added becomes the default.
    pub fn add_address(&mut self, address: Address) {
        self.addresses.push(address);
    }

    /// Replaces the whole address book. Drops the memoized store when the
    /// default address changes as a result.
    pub fn set_addresses(&mut self, addresses: Vec<Address>) {
        self.addresses = addresses;
        let stale = match (&self.store_memo, self.addresses.first()) {
            (Some(memo), Some(default)) => &memo.address != default,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if stale {
            self.store_memo = None;
        }
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Returns the first address, or `None` when the user has no addresses.
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.first()
    }

    /// The selected service method, `None` until one has been set.
    pub fn service_method(&self) -> Option<ServiceMethod> {
        self.service_method
    }

    /// The memoized store, if a lookup has been made.
    pub fn cached_store(&self) -> Option<&Arc<Store>> {
        self.store_memo.as_ref().map(|memo| &memo.store)
    }
}
