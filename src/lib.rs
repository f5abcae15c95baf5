//! # Pizza Cart
//!
//! > **A store locator, order model and persistent cart for a pizza ordering client.**
//!
//! A user names an address and a service method; the crate finds the nearest
//! store, keeps that store's menu cached for a bounded time, and lets the user
//! build named orders (products plus per-product toppings) that are saved in a
//! key-value store and reloaded by name.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! Plain serde types: [`Address`](model::Address), [`Store`](model::Store),
//! [`Order`](model::Order), [`ProductItem`](model::ProductItem), [`Menu`](model::Menu)
//! and [`User`](model::User).
//!
//! ### 2. The Rules ([`order`], [`locator`], [`menu`])
//! - [`order`] parses topping specs like `P:left:1.5` and mutates orders atomically.
//! - [`locator`] resolves and memoizes the user's nearest store.
//! - [`menu`] caches a store's catalog and refreshes it once it goes stale.
//!
//! ### 3. The Cart ([`cart`])
//! Saves, loads, lists and deletes orders under `user_order_<name>`, and keeps
//! a *current* order that product and topping edits apply to.
//!
//! ### 4. The Seams ([`clients`], [`storage`])
//! - [`OrderingApi`](clients::OrderingApi) and [`Clock`](clients::Clock) abstract the
//!   network and the wall clock; [`clients::mock`] has test doubles for both.
//! - [`KeyValueStore`](storage::KeyValueStore) abstracts persistence;
//!   [`KvActor`](storage::KvActor) serves one from a Tokio task.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! [`CartSystem`](lifecycle::CartSystem) starts the store, wires the cart and
//! shuts everything down; [`CartConfig`](lifecycle::CartConfig) reads settings
//! from the environment.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### Type-Safe Error Handling
//! Each component defines its own error type (`LocatorError`, `OrderError`,
//! `MenuError`, `CartError`). Lower-level errors convert with `#[from]`, so a
//! `CartError` still tells you whether the menu, the locator or storage failed.
//!
//! ### Observability
//! `tracing` is used throughout; see [`lifecycle::tracing`].
//!
//! ```bash
//! RUST_LOG=debug cargo test
//! ```

pub mod cart;
pub mod clients;
pub mod lifecycle;
pub mod locator;
pub mod menu;
pub mod model;
pub mod order;
pub mod storage;
