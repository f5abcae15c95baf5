//! Narrow interfaces to the external collaborators: the ordering API and the clock.
//!
//! See [`mock`] for test doubles of both.

pub mod clock;
pub mod mock;
pub mod ordering;

pub use clock::*;
pub use ordering::*;
