use crate::cart::Cart;
use crate::clients::{Clock, OrderingApi, SystemClock};
use crate::lifecycle::{CartConfig, ConfigError};
use crate::menu::MenuCache;
use crate::model::User;
use crate::storage::{KvActor, KvClient};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// Contents of the key-value store, as handed back on shutdown.
pub type Snapshot = HashMap<String, Vec<u8>>;

/// The runtime orchestrator for a user's cart.
///
/// `CartSystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping the key-value actor
/// - **Dependency Wiring**: Handing the cart and menu cache the same store, API and clock
///
/// # Example
///
/// ```ignore
/// let config = CartConfig::from_env()?;
/// let mut system = CartSystem::new(&config, api, user)?;
///
/// system.cart.new_order("dinner", &["14SCREEN"], &["P"]).await?;
///
/// // Returns whatever the store held when the actor stopped
/// let snapshot = system.shutdown().await?;
/// ```
pub struct CartSystem {
    /// The cart, wired to the running store
    pub cart: Cart,

    kv: KvClient,
    handle: tokio::task::JoinHandle<Snapshot>,
}

impl CartSystem {
    /// Starts an empty store and wires a cart for `user` against it, using the
    /// system clock.
    pub fn new(
        config: &CartConfig,
        api: Arc<dyn OrderingApi>,
        user: User,
    ) -> Result<Self, ConfigError> {
        Self::restore(config, api, user, Arc::new(SystemClock), Snapshot::new())
    }

    /// Starts a store pre-loaded with `snapshot` (e.g. from a previous
    /// [`CartSystem::shutdown`]) and wires a cart for `user` against it.
    pub fn restore(
        config: &CartConfig,
        api: Arc<dyn OrderingApi>,
        user: User,
        clock: Arc<dyn Clock>,
        snapshot: Snapshot,
    ) -> Result<Self, ConfigError> {
        let update_after = config.update_window()?;

        // 1. Start the store
        let (actor, kv) = KvActor::with_entries(config.store_buffer, snapshot);
        let handle = tokio::spawn(actor.run());

        // 2. Wire the cart
        let menu = MenuCache::new(Arc::new(kv.clone()), api.clone(), clock, update_after);
        let cart = Cart::new(Arc::new(kv.clone()), api, user, menu)
            .with_default_service(config.default_service);

        info!(
            update_after_secs = update_after.num_seconds(),
            buffer = config.store_buffer,
            "Cart system started"
        );
        Ok(Self { cart, kv, handle })
    }

    /// A handle to the running store.
    ///
    /// Every handle must be dropped before [`CartSystem::shutdown`] can finish.
    pub fn store_client(&self) -> KvClient {
        self.kv.clone()
    }

    /// Gracefully shuts down the system.
    ///
    /// Drops the cart and the system's store handle, which closes the actor's
    /// channel once no other handle is alive, then waits for the actor task.
    ///
    /// # Returns
    ///
    /// - `Ok(snapshot)` with the final store contents
    /// - `Err(String)` if the actor task failed or panicked
    pub async fn shutdown(self) -> Result<Snapshot, String> {
        info!("Shutting down cart system...");

        drop(self.cart);
        drop(self.kv);

        match self.handle.await {
            Ok(snapshot) => {
                info!(keys = snapshot.len(), "Cart system shutdown complete.");
                Ok(snapshot)
            }
            Err(e) => {
                error!("Storage actor failed: {:?}", e);
                Err(format!("Storage actor failed: {:?}", e))
            }
        }
    }
}
