//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a `tracing_subscriber` formatter filtered by
//! `RUST_LOG`, in the compact format without the module prefix.
//!
//! ## What Gets Traced
//!
//! - **Store lookups**: nearest-store resolution and memo hits
//! - **Menu cache**: freshness checks and refreshes, with `store_id`
//! - **Cart operations**: saves, deletes and loads, with the order name
//! - **Permissive input**: unknown topping sides and validation warnings at `warn`
//!
//! ```bash
//! RUST_LOG=info     # saves, refreshes, store resolution
//! RUST_LOG=debug    # plus cache hits, parsed toppings and storage requests
//! ```
//!
//! With `RUST_LOG=info` an order session reads like:
//!
//! ```text
//! INFO nearest_store: Nearest store resolved store_id=store_4336 address=1 Main St, Springfield, IL 62701
//! INFO refresh_if_stale: Menu refreshed store_id=store_4336 variants=2
//! INFO save_order: Order saved order=dinner products=2
//! ```

/// Installs the global subscriber. Later calls are no-ops, so tests may call
/// it freely.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
