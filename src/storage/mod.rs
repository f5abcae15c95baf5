//! Persistence seam for saved orders and the menu cache.
//!
//! The cart and menu cache only see the [`KeyValueStore`] trait. The crate ships
//! an in-process implementation, [`KvActor`] + [`KvClient`], served by a Tokio task.

pub mod kv;

pub use kv::*;
