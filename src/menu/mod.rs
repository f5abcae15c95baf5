//! Time-bounded cache of a store's catalog.
//!
//! The [`MenuCache`] keeps the last fetched [`Menu`] together with the store it
//! belongs to and when it was fetched. The entry is mirrored into the
//! key-value store so another process can reuse a still-fresh catalog.
//!
//! An entry is stale when it belongs to a different store, or when more than
//! the configured update window has elapsed since it was fetched.

pub mod error;

pub use error::*;

use crate::clients::{Clock, OrderingApi};
use crate::model::{Menu, ProductItem, Store, StoreId};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Key the catalog is cached under.
pub const MENU_CACHE_KEY: &str = "menu";

impl Menu {
    /// Resolves `code` to an orderable item.
    ///
    /// `code` is either a variant code (`14SCREEN`) or a product code with a
    /// size suffix (`S_PIZZA:14`), which picks the variant of that product in
    /// that size.
    pub fn get_variant(&self, code: &str) -> Result<ProductItem, MenuError> {
        let variant = self.variants.get(code).or_else(|| {
            let (product, size) = code.split_once(':')?;
            self.variants
                .values()
                .find(|v| v.product_code == product && v.size_code.as_deref() == Some(size))
        });

        match variant {
            Some(variant) => {
                let item = ProductItem::new(variant.code.clone());
                Ok(match &variant.size_code {
                    Some(size) => item.with_size(size.clone()),
                    None => item,
                })
            }
            None => Err(MenuError::VariantNotFound {
                code: code.to_string(),
                store_id: self.store_id.clone(),
            }),
        }
    }
}

/// A cached catalog and when it was fetched.
#[derive(Debug, Clone)]
pub struct MenuCacheEntry {
    pub store_id: StoreId,
    pub refreshed_at: DateTime<Utc>,
    pub menu: Arc<Menu>,
}

/// Serialized form of [`MenuCacheEntry`].
#[derive(Serialize, Deserialize)]
struct StoredEntry {
    store_id: StoreId,
    refreshed_at: DateTime<Utc>,
    menu: Menu,
}

/// Catalog cache with an injected freshness window.
pub struct MenuCache {
    kv: Arc<dyn KeyValueStore>,
    api: Arc<dyn OrderingApi>,
    clock: Arc<dyn Clock>,
    update_after: Duration,
    entries: HashMap<String, MenuCacheEntry>,
}

impl MenuCache {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        api: Arc<dyn OrderingApi>,
        clock: Arc<dyn Clock>,
        update_after: Duration,
    ) -> Self {
        Self {
            kv,
            api,
            clock,
            update_after,
            entries: HashMap::new(),
        }
    }

    /// The cached entry under [`MENU_CACHE_KEY`], if one has been loaded.
    pub fn entry(&self) -> Option<&MenuCacheEntry> {
        self.entries.get(MENU_CACHE_KEY)
    }

    /// Returns the catalog of `store`, fetching it only if nothing is cached for it.
    pub async fn menu(&mut self, store: &Store) -> Result<Arc<Menu>, MenuError> {
        if let Some(entry) = self.entries.get(MENU_CACHE_KEY) {
            if entry.store_id == store.id {
                return Ok(entry.menu.clone());
            }
        }
        let (menu, _) = self.refresh_if_stale(MENU_CACHE_KEY, store).await?;
        Ok(menu)
    }

    /// Re-fetches the catalog under `key` if it is absent, belongs to another
    /// store, or is older than the update window. Returns `true` if a fetch
    /// happened.
    pub async fn update_if_stale(&mut self, key: &str, store: &Store) -> Result<bool, MenuError> {
        let (_, refreshed) = self.refresh_if_stale(key, store).await?;
        Ok(refreshed)
    }

    #[instrument(skip(self, store), fields(store_id = %store.id))]
    async fn refresh_if_stale(
        &mut self,
        key: &str,
        store: &Store,
    ) -> Result<(Arc<Menu>, bool), MenuError> {
        if !self.entries.contains_key(key) {
            if let Some(entry) = self.load(key).await? {
                self.entries.insert(key.to_string(), entry);
            }
        }

        let now = self.clock.now();
        if let Some(entry) = self.entries.get(key) {
            let age = now - entry.refreshed_at;
            if entry.store_id == store.id && age <= self.update_after {
                debug!(age_secs = age.num_seconds(), "Menu is fresh");
                return Ok((entry.menu.clone(), false));
            }
        }

        let stored = StoredEntry {
            store_id: store.id.clone(),
            refreshed_at: now,
            menu: self.api.fetch_menu(store).await?,
        };
        let raw = serde_json::to_vec(&stored).map_err(|e| MenuError::Serialization(e.to_string()))?;
        self.kv.put(key, raw).await?;
        info!(variants = stored.menu.variants.len(), "Menu refreshed");

        let menu = Arc::new(stored.menu);
        self.entries.insert(
            key.to_string(),
            MenuCacheEntry {
                store_id: stored.store_id,
                refreshed_at: stored.refreshed_at,
                menu: menu.clone(),
            },
        );
        Ok((menu, true))
    }

    /// Resolves `code` against the catalog of `store`.
    pub async fn get_variant(&mut self, store: &Store, code: &str) -> Result<ProductItem, MenuError> {
        self.menu(store).await?.get_variant(code)
    }

    async fn load(&self, key: &str) -> Result<Option<MenuCacheEntry>, MenuError> {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_slice::<StoredEntry>(&raw) {
            Ok(stored) => Ok(Some(MenuCacheEntry {
                store_id: stored.store_id,
                refreshed_at: stored.refreshed_at,
                menu: Arc::new(stored.menu),
            })),
            Err(e) => {
                warn!(key, error = %e, "Discarding unreadable cached menu");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::{ManualClock, MockOrderingApi};
    use crate::model::{Address, ServiceMethod, Variant};
    use crate::storage::{KvActor, KvClient};

    fn store(id: &str) -> Store {
        Store::new(
            id,
            Address::new("1 Main St", "Springfield", "IL", "62701"),
            ServiceMethod::Delivery,
        )
    }

    fn menu(id: &str) -> Menu {
        Menu::new(id)
            .with_variant(Variant::new("14SCREEN", "Large Hand Tossed", "13.99", "S_PIZZA").with_size("14"))
            .with_variant(Variant::new("12SCREEN", "Medium Hand Tossed", "11.99", "S_PIZZA").with_size("12"))
            .with_variant(Variant::new("20BCOKE", "20oz Coke", "2.39", "F_COKE"))
    }

    fn setup() -> (MenuCache, MockOrderingApi, ManualClock, KvClient) {
        let (actor, kv) = KvActor::new(10);
        tokio::spawn(actor.run());
        let api = MockOrderingApi::new();
        let clock = ManualClock::new(Utc::now());
        let cache = MenuCache::new(
            Arc::new(kv.clone()),
            Arc::new(api.clone()),
            Arc::new(clock.clone()),
            Duration::hours(1),
        );
        (cache, api, clock, kv)
    }

    #[test]
    fn test_get_variant() {
        let menu = menu("4336");
        let item = menu.get_variant("14SCREEN").unwrap();
        assert_eq!(item.code, "14SCREEN");
        assert_eq!(item.size.as_deref(), Some("14"));

        let sized = menu.get_variant("S_PIZZA:12").unwrap();
        assert_eq!(sized.code, "12SCREEN");

        assert_eq!(menu.get_variant("20BCOKE").unwrap().size, None);
        assert!(matches!(
            menu.get_variant("S_PIZZA:99"),
            Err(MenuError::VariantNotFound { .. })
        ));
        assert!(matches!(
            menu.get_variant("NOPE"),
            Err(MenuError::VariantNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_refresh_only_after_window() {
        let (mut cache, api, clock, _kv) = setup();
        api.expect_fetch_menu().return_ok(menu("4336"));

        assert!(cache.update_if_stale(MENU_CACHE_KEY, &store("4336")).await.unwrap());
        clock.advance(Duration::minutes(59));
        assert!(!cache.update_if_stale(MENU_CACHE_KEY, &store("4336")).await.unwrap());
        api.verify();

        api.expect_fetch_menu().return_ok(menu("4336"));
        clock.advance(Duration::minutes(2));
        assert!(cache.update_if_stale(MENU_CACHE_KEY, &store("4336")).await.unwrap());
        assert_eq!(cache.entry().unwrap().refreshed_at, clock.now());
        api.verify();
    }

    #[tokio::test]
    async fn test_store_change_invalidates() {
        let (mut cache, api, _clock, _kv) = setup();
        api.expect_fetch_menu().return_ok(menu("4336"));
        api.expect_fetch_menu().return_ok(menu("7001"));

        let first = cache.menu(&store("4336")).await.unwrap();
        let again = cache.menu(&store("4336")).await.unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        let other = cache.menu(&store("7001")).await.unwrap();
        assert_eq!(other.store_id, StoreId::from("7001"));
        api.verify();
    }

    #[tokio::test]
    async fn test_persisted_entry_is_reused() {
        let (mut cache, api, clock, kv) = setup();
        api.expect_fetch_menu().return_ok(menu("4336"));
        cache.menu(&store("4336")).await.unwrap();
        assert!(kv.get(MENU_CACHE_KEY).await.unwrap().is_some());

        // A second cache over the same store starts cold but finds the snapshot.
        let mut fresh = MenuCache::new(
            Arc::new(kv.clone()),
            Arc::new(api.clone()),
            Arc::new(clock.clone()),
            Duration::hours(1),
        );
        let item = fresh.get_variant(&store("4336"), "20BCOKE").await.unwrap();
        assert_eq!(item.code, "20BCOKE");
        api.verify();
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_old_entry() {
        let (mut cache, api, clock, _kv) = setup();
        api.expect_fetch_menu().return_ok(menu("4336"));
        cache.menu(&store("4336")).await.unwrap();

        clock.advance(Duration::hours(2));
        api.expect_fetch_menu()
            .return_err(crate::clients::ApiError::Transport("timeout".into()));
        let result = cache.update_if_stale(MENU_CACHE_KEY, &store("4336")).await;
        assert!(matches!(result, Err(MenuError::Api(_))));
        assert!(cache.entry().is_some());
    }
}
