//! The cart: named orders persisted in a key-value store.
//!
//! Every saved order lives under [`ORDER_PREFIX`] + name. The cart also keeps
//! one *current* order that product and topping edits apply to:
//!
//! ```text
//! (none) --set_current_order--> Loaded --add/remove--> Mutated --save--> Saved
//!                                  \                       \
//!                                   +----delete_order------+--> Deleted
//! ```
//!
//! Edits to a `Deleted` order fail with [`CartError::OrderDeleted`] until the
//! order is loaded (or started) again.

pub mod error;

pub use error::*;

use crate::clients::OrderingApi;
use crate::locator::LocatorError;
use crate::menu::{MenuCache, MENU_CACHE_KEY};
use crate::model::{Order, ServiceMethod, Store, Topping, User};
use crate::order::Validation;
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Prefix of every key holding a saved order.
pub const ORDER_PREFIX: &str = "user_order_";

/// Where the current order stands relative to its saved copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
    /// Read from the store, not changed since.
    Loaded,
    /// Changed in memory and not yet saved.
    Mutated,
    /// Written to the store.
    Saved,
    /// Removed from the store.
    Deleted,
}

struct CurrentOrder {
    order: Order,
    state: OrderState,
}

/// The user's collection of saved orders.
///
/// The key-value store and ordering API are injected at construction; the
/// cart owns the [`User`] (for address and store lookup) and the
/// [`MenuCache`] used to resolve product codes.
pub struct Cart {
    kv: Arc<dyn KeyValueStore>,
    api: Arc<dyn OrderingApi>,
    user: User,
    menu: MenuCache,
    default_service: Option<ServiceMethod>,
    current: Option<CurrentOrder>,
}

impl Cart {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        api: Arc<dyn OrderingApi>,
        user: User,
        menu: MenuCache,
    ) -> Self {
        Self {
            kv,
            api,
            user,
            menu,
            default_service: None,
            current: None,
        }
    }

    /// Service method to use when the user has not picked one.
    pub fn with_default_service(mut self, method: Option<ServiceMethod>) -> Self {
        self.default_service = method;
        self
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_mut(&mut self) -> &mut User {
        &mut self.user
    }

    pub fn menu_cache(&self) -> &MenuCache {
        &self.menu
    }

    /// The store orders are placed with: the user's nearest store for their
    /// service method (or the configured default).
    pub async fn store(&mut self) -> Result<Arc<Store>, CartError> {
        let method = self
            .user
            .service_method()
            .or(self.default_service)
            .ok_or(LocatorError::NoServiceMethod)?;
        Ok(self.user.nearest_store(self.api.as_ref(), method).await?)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Loads the order saved as `name`.
    ///
    /// The stored address is replaced by the user's current default address
    /// (when the user has one), so an order always reflects the live profile
    /// rather than the address it was saved with.
    // NOTE: the re-stamp means a reload can silently move a delivery; kept for
    // compatibility with existing carts, pending product review.
    #[instrument(skip(self))]
    pub async fn get_order(&self, name: &str) -> Result<Order, CartError> {
        let raw = self
            .kv
            .get(&order_key(name))
            .await?
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| CartError::OrderNotFound(name.to_string()))?;

        let mut order: Order =
            serde_json::from_slice(&raw).map_err(|e| CartError::Serialization(e.to_string()))?;
        order.set_name(name);
        if let Some(address) = self.user.default_address() {
            order.address = Some(address.clone());
        }
        debug!(products = order.products.len(), "Order loaded");
        Ok(order)
    }

    /// Writes `order` under its name, replacing whatever was saved there.
    #[instrument(skip(self, order), fields(order = %order.name()))]
    pub async fn save_order(&self, order: &Order) -> Result<(), CartError> {
        validate_name(order.name())?;
        let raw = serde_json::to_vec(order).map_err(|e| CartError::Serialization(e.to_string()))?;
        self.kv.put(&order_key(order.name()), raw).await?;
        info!(products = order.products.len(), "Order saved");
        Ok(())
    }

    /// Removes the order saved as `name`. Removing an absent order succeeds.
    #[instrument(skip(self))]
    pub async fn delete_order(&mut self, name: &str) -> Result<(), CartError> {
        self.kv.delete(&order_key(name)).await?;
        if let Some(current) = self.current.as_mut() {
            if current.order.name() == name {
                current.state = OrderState::Deleted;
            }
        }
        info!("Order deleted");
        Ok(())
    }

    /// Names of all saved orders, in the store's iteration order.
    pub async fn list_orders(&self) -> Result<Vec<String>, CartError> {
        let keys = self.kv.list_keys().await?;
        Ok(keys
            .into_iter()
            .filter_map(|key| key.strip_prefix(ORDER_PREFIX).map(str::to_string))
            .collect())
    }

    /// Creates and saves a new order.
    ///
    /// Each product code is resolved against the menu; the i-th topping code,
    /// if given, is put on the i-th product over the whole item.
    #[instrument(skip(self))]
    pub async fn new_order(
        &mut self,
        name: &str,
        products: &[&str],
        toppings: &[&str],
    ) -> Result<Order, CartError> {
        validate_name(name)?;
        if products.is_empty() && !toppings.is_empty() {
            return Err(CartError::ToppingsWithoutProducts);
        }

        let mut order = self.blank_order(name).await?;
        if !products.is_empty() {
            let store = self.store().await?;
            self.menu.update_if_stale(MENU_CACHE_KEY, &store).await?;
            let menu = self.menu.menu(&store).await?;
            for (i, code) in products.iter().enumerate() {
                let mut item = menu.get_variant(code)?;
                if let Some(topping) = toppings.get(i) {
                    item.toppings.set(*topping, Topping::default());
                }
                order.add_product(item);
            }
        }

        self.save_order(&order).await?;
        Ok(order)
    }

    // =========================================================================
    // Current order
    // =========================================================================

    /// Loads `name` as the current order.
    pub async fn set_current_order(&mut self, name: &str) -> Result<(), CartError> {
        let order = self.get_order(name).await?;
        self.current = Some(CurrentOrder {
            order,
            state: OrderState::Loaded,
        });
        Ok(())
    }

    /// Starts an empty, unsaved current order stamped with the user's address
    /// and service method.
    pub async fn start_order(&mut self, name: &str) -> Result<(), CartError> {
        validate_name(name)?;
        let order = self.blank_order(name).await?;
        self.current = Some(CurrentOrder {
            order,
            state: OrderState::Mutated,
        });
        Ok(())
    }

    pub fn current_order(&self) -> Option<&Order> {
        self.current.as_ref().map(|current| &current.order)
    }

    pub fn current_state(&self) -> Option<OrderState> {
        self.current.as_ref().map(|current| current.state)
    }

    /// Saves the current order.
    pub async fn save(&mut self) -> Result<(), CartError> {
        let current = self.current.as_ref().ok_or(CartError::NoCurrentOrder)?;
        if current.state == OrderState::Deleted {
            return Err(CartError::OrderDeleted(current.order.name().to_string()));
        }
        self.save_order(&current.order).await?;
        if let Some(current) = self.current.as_mut() {
            current.state = OrderState::Saved;
        }
        Ok(())
    }

    /// Saves the current order and clears it, even if the save fails, so it
    /// cannot be edited by accident afterwards.
    pub async fn save_and_reset(&mut self) -> Result<(), CartError> {
        let result = self.save().await;
        self.current = None;
        result
    }

    /// Validates the current order. Warnings are logged and count as success.
    pub fn validate(&self) -> Result<Validation, CartError> {
        let current = self.current.as_ref().ok_or(CartError::NoCurrentOrder)?;
        info!(order = %current.order.name(), "Validating order");
        let validation = current.order.validate()?;
        if let Validation::Warning(warnings) = &validation {
            for warning in warnings {
                warn!(order = %current.order.name(), %warning, "Validation warning");
            }
        }
        Ok(validation)
    }

    /// Loads and validates a saved order without touching the current one.
    pub async fn validate_order(&self, name: &str) -> Result<Validation, CartError> {
        let order = self.get_order(name).await?;
        Ok(order.validate()?)
    }

    /// Resolves every code against a fresh menu and appends the items to the
    /// current order. Nothing is added unless every code resolves.
    #[instrument(skip(self, codes))]
    pub async fn add_products<S: AsRef<str>>(&mut self, codes: &[S]) -> Result<(), CartError> {
        self.editable()?;
        let store = self.store().await?;
        self.menu.update_if_stale(MENU_CACHE_KEY, &store).await?;
        let menu = self.menu.menu(&store).await?;
        let items = codes
            .iter()
            .map(|code| menu.get_variant(code.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let current = self.editable()?;
        current.order.store_id = Some(store.id.clone());
        for item in items {
            current.order.add_product(item);
        }
        current.state = OrderState::Mutated;
        Ok(())
    }

    /// Applies topping specs (`name[:side[:amount]]`) to `product` in the
    /// current order. Nothing is applied unless every spec parses and the
    /// product is in the order.
    #[instrument(skip(self, specs))]
    pub async fn add_toppings<S: AsRef<str>>(
        &mut self,
        product: &str,
        specs: &[S],
    ) -> Result<(), CartError> {
        self.editable()?;
        let store = self.store().await?;
        self.menu.update_if_stale(MENU_CACHE_KEY, &store).await?;

        let current = self.editable()?;
        current.order.apply_toppings(product, specs)?;
        current.state = OrderState::Mutated;
        Ok(())
    }

    /// Removes the first `code` item from the current order.
    pub fn remove_product(&mut self, code: &str) -> Result<(), CartError> {
        let current = self.editable()?;
        current.order.remove_product(code)?;
        current.state = OrderState::Mutated;
        Ok(())
    }

    /// Removes `topping` from `product` in the current order. Returns whether
    /// the topping was present.
    pub fn remove_topping(&mut self, product: &str, topping: &str) -> Result<bool, CartError> {
        let current = self.editable()?;
        let removed = current.order.remove_topping(product, topping)?.is_some();
        if removed {
            current.state = OrderState::Mutated;
        }
        Ok(removed)
    }

    fn editable(&mut self) -> Result<&mut CurrentOrder, CartError> {
        let current = self.current.as_mut().ok_or(CartError::NoCurrentOrder)?;
        if current.state == OrderState::Deleted {
            return Err(CartError::OrderDeleted(current.order.name().to_string()));
        }
        Ok(current)
    }

    async fn blank_order(&mut self, name: &str) -> Result<Order, CartError> {
        let mut order = Order::new(name);
        order.address = self.user.default_address().cloned();
        order.service_method = self.user.service_method().or(self.default_service);
        if order.address.is_some() && order.service_method.is_some() {
            order.store_id = Some(self.store().await?.id.clone());
        }
        Ok(order)
    }
}

fn order_key(name: &str) -> String {
    format!("{ORDER_PREFIX}{name}")
}

fn validate_name(name: &str) -> Result<(), CartError> {
    if name.is_empty() || name.starts_with(ORDER_PREFIX) {
        return Err(CartError::InvalidOrderName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::{ManualClock, MockOrderingApi};
    use crate::menu::MenuError;
    use crate::model::{Address, Menu, ProductItem, ToppingPlacement, Variant};
    use crate::order::OrderError;
    use crate::storage::{KvActor, KvClient};
    use chrono::{Duration, Utc};

    fn home() -> Address {
        Address::new("1600 Pennsylvania Ave NW", "Washington", "DC", "20500")
    }

    fn store() -> Store {
        Store::new("4336", home(), ServiceMethod::Delivery)
    }

    fn menu() -> Menu {
        Menu::new("4336")
            .with_variant(Variant::new("14SCREEN", "Large Hand Tossed", "13.99", "S_PIZZA").with_size("14"))
            .with_variant(Variant::new("20BCOKE", "20oz Coke", "2.39", "F_COKE"))
    }

    struct Harness {
        cart: Cart,
        api: MockOrderingApi,
        clock: ManualClock,
        kv: KvClient,
    }

    fn harness() -> Harness {
        let (actor, kv) = KvActor::new(10);
        tokio::spawn(actor.run());
        let api = MockOrderingApi::new();
        let clock = ManualClock::new(Utc::now());
        let menu = MenuCache::new(
            Arc::new(kv.clone()),
            Arc::new(api.clone()),
            Arc::new(clock.clone()),
            Duration::hours(1),
        );
        let mut user = User::new().with_address(home());
        user.set_service_method("delivery").unwrap();
        let cart = Cart::new(Arc::new(kv.clone()), Arc::new(api.clone()), user, menu);
        Harness {
            cart,
            api,
            clock,
            kv,
        }
    }

    fn saved_order(name: &str) -> Order {
        let mut order = Order::new(name);
        order.address = Some(Address::new("350 5th Ave", "New York", "NY", "10118"));
        order.service_method = Some(ServiceMethod::Delivery);
        order.add_product(ProductItem::new("14SCREEN").with_size("14"));
        order.apply_toppings("14SCREEN", &["P", "X:left:1.5"]).unwrap();
        order
    }

    #[tokio::test]
    async fn test_save_then_load_restamps_address() {
        let h = harness();
        let order = saved_order("pizza1");
        h.cart.save_order(&order).await.unwrap();

        let loaded = h.cart.get_order("pizza1").await.unwrap();
        assert_eq!(loaded.name(), "pizza1");
        assert_eq!(loaded.products, order.products);
        assert_eq!(loaded.address, Some(home()));
        assert!(h.kv.get("user_order_pizza1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_order() {
        let h = harness();
        assert_eq!(
            h.cart.get_order("nope").await.unwrap_err(),
            CartError::OrderNotFound("nope".into())
        );
        h.kv.put("user_order_blank", Vec::new()).await.unwrap();
        assert_eq!(
            h.cart.get_order("blank").await.unwrap_err(),
            CartError::OrderNotFound("blank".into())
        );
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let mut h = harness();
        h.cart.save_order(&saved_order("a")).await.unwrap();
        h.cart.save_order(&saved_order("b")).await.unwrap();
        h.kv.put("menu", b"{}".to_vec()).await.unwrap();

        let mut names = h.cart.list_orders().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);

        h.cart.delete_order("a").await.unwrap();
        h.cart.delete_order("never-saved").await.unwrap();
        assert_eq!(h.cart.list_orders().await.unwrap(), vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_names_are_rejected() {
        let h = harness();
        for name in ["", "user_order_x"] {
            let order = Order::new(name);
            assert_eq!(
                h.cart.save_order(&order).await.unwrap_err(),
                CartError::InvalidOrderName(name.into())
            );
        }
    }

    #[tokio::test]
    async fn test_add_products_refreshes_menu() {
        let mut h = harness();
        h.cart.save_order(&saved_order("pizza1")).await.unwrap();
        h.cart.set_current_order("pizza1").await.unwrap();
        assert_eq!(h.cart.current_state(), Some(OrderState::Loaded));

        h.api.expect_nearest_store().return_ok(store());
        h.api.expect_fetch_menu().return_ok(menu());
        h.cart.add_products(&["20BCOKE"]).await.unwrap();
        h.api.verify();

        // Within the window: no refetch.
        h.clock.advance(Duration::minutes(30));
        h.cart.add_products(&["14SCREEN"]).await.unwrap();
        h.api.verify();

        // Past the window: refetched before resolving.
        h.clock.advance(Duration::minutes(31));
        h.api.expect_fetch_menu().return_ok(menu());
        h.cart.add_products(&["20BCOKE"]).await.unwrap();
        h.api.verify();

        let order = h.cart.current_order().unwrap();
        let codes: Vec<_> = order.products.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["14SCREEN", "20BCOKE", "14SCREEN", "20BCOKE"]);
        assert_eq!(h.cart.current_state(), Some(OrderState::Mutated));
    }

    #[tokio::test]
    async fn test_unknown_variant_adds_nothing() {
        let mut h = harness();
        h.cart.save_order(&saved_order("pizza1")).await.unwrap();
        h.cart.set_current_order("pizza1").await.unwrap();
        h.api.expect_nearest_store().return_ok(store());
        h.api.expect_fetch_menu().return_ok(menu());

        let err = h.cart.add_products(&["20BCOKE", "NOPE"]).await.unwrap_err();
        assert!(matches!(err, CartError::Menu(MenuError::VariantNotFound { .. })));
        assert_eq!(h.cart.current_order().unwrap().products.len(), 1);
        assert_eq!(h.cart.current_state(), Some(OrderState::Loaded));
    }

    #[tokio::test]
    async fn test_add_toppings_to_missing_product() {
        let mut h = harness();
        h.cart.save_order(&saved_order("pizza1")).await.unwrap();
        h.cart.set_current_order("pizza1").await.unwrap();
        let before = h.cart.current_order().unwrap().clone();

        h.api.expect_nearest_store().return_ok(store());
        h.api.expect_fetch_menu().return_ok(menu());
        let err = h.cart.add_toppings("W08PHOTW", &["P"]).await.unwrap_err();
        assert!(matches!(err, CartError::Order(OrderError::ItemNotFound { .. })));
        assert_eq!(h.cart.current_order().unwrap(), &before);

        h.cart.add_toppings("14SCREEN", &["P:right"]).await.unwrap();
        h.cart.save().await.unwrap();
        assert_eq!(h.cart.current_state(), Some(OrderState::Saved));

        let loaded = h.cart.get_order("pizza1").await.unwrap();
        let topping = loaded.find_item("14SCREEN").unwrap().toppings.get("P").unwrap();
        assert_eq!(topping.placement, ToppingPlacement::RightHalf);
    }

    #[tokio::test]
    async fn test_current_order_required() {
        let mut h = harness();
        assert_eq!(h.cart.validate().unwrap_err(), CartError::NoCurrentOrder);
        assert_eq!(h.cart.save().await.unwrap_err(), CartError::NoCurrentOrder);
        assert_eq!(
            h.cart.add_products(&["14SCREEN"]).await.unwrap_err(),
            CartError::NoCurrentOrder
        );
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_current_order_must_be_reloaded() {
        let mut h = harness();
        h.cart.save_order(&saved_order("pizza1")).await.unwrap();
        h.cart.set_current_order("pizza1").await.unwrap();
        h.cart.delete_order("pizza1").await.unwrap();

        assert_eq!(h.cart.current_state(), Some(OrderState::Deleted));
        assert_eq!(
            h.cart.remove_product("14SCREEN").unwrap_err(),
            CartError::OrderDeleted("pizza1".into())
        );
        assert_eq!(
            h.cart.save().await.unwrap_err(),
            CartError::OrderDeleted("pizza1".into())
        );
        assert!(h.cart.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_and_save_and_reset() {
        let mut h = harness();
        h.cart.save_order(&saved_order("pizza1")).await.unwrap();
        h.cart.set_current_order("pizza1").await.unwrap();

        assert!(h.cart.remove_topping("14SCREEN", "X").unwrap());
        assert!(!h.cart.remove_topping("14SCREEN", "X").unwrap());
        h.cart.remove_product("14SCREEN").unwrap();
        assert!(matches!(
            h.cart.remove_product("14SCREEN"),
            Err(CartError::Order(OrderError::ProductNotFound { .. }))
        ));

        h.cart.save_and_reset().await.unwrap();
        assert!(h.cart.current_order().is_none());
        assert!(h.cart.get_order("pizza1").await.unwrap().products.is_empty());
    }

    #[tokio::test]
    async fn test_new_order() {
        let mut h = harness();
        assert_eq!(
            h.cart.new_order("x", &[], &["P"]).await.unwrap_err(),
            CartError::ToppingsWithoutProducts
        );

        h.api.expect_nearest_store().return_ok(store());
        h.api.expect_fetch_menu().return_ok(menu());
        let order = h
            .cart
            .new_order("dinner", &["14SCREEN", "20BCOKE"], &["P"])
            .await
            .unwrap();
        h.api.verify();

        assert_eq!(order.store_id, Some(store().id));
        assert_eq!(order.products[0].toppings.get("P"), Some(&Topping::default()));
        assert!(order.products[1].toppings.is_empty());
        assert_eq!(h.cart.get_order("dinner").await.unwrap().products, order.products);
    }

    #[tokio::test]
    async fn test_store_requires_service_method() {
        let (actor, kv) = KvActor::new(10);
        tokio::spawn(actor.run());
        let api = MockOrderingApi::new();
        let menu = MenuCache::new(
            Arc::new(kv.clone()),
            Arc::new(api.clone()),
            Arc::new(ManualClock::new(Utc::now())),
            Duration::hours(1),
        );
        let user = User::new().with_address(home());
        let mut cart = Cart::new(Arc::new(kv), Arc::new(api.clone()), user, menu);

        assert_eq!(
            cart.store().await.unwrap_err(),
            CartError::Locator(LocatorError::NoServiceMethod)
        );

        let mut cart = cart.with_default_service(Some(ServiceMethod::Carryout));
        api.expect_nearest_store()
            .return_ok(Store::new("9", home(), ServiceMethod::Carryout));
        let found = cart.store().await.unwrap();
        assert_eq!(found.service_method, ServiceMethod::Carryout);
    }

    #[tokio::test]
    async fn test_validate_order_warning_is_success() {
        let mut h = harness();
        let mut order = saved_order("odd");
        order.apply_topping("14SCREEN", "Z:middle").unwrap();
        h.cart.save_order(&order).await.unwrap();

        assert!(h.cart.validate_order("odd").await.unwrap().is_warning());
        h.cart.set_current_order("odd").await.unwrap();
        assert!(h.cart.validate().unwrap().is_warning());
    }
}
