//! Runtime orchestration and lifecycle management.
//!
//! # Main Components
//!
//! - [`CartConfig`] - Runtime settings, read from the environment
//! - [`CartSystem`] - Starts the key-value actor and wires the cart against it
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod cart_system;
pub mod config;
pub mod tracing;

pub use cart_system::*;
pub use config::*;
pub use self::tracing::*;
