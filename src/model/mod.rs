//! Pure data structures (DTOs) shared by the locator, order, menu and cart modules.

pub mod address;
pub mod menu;
pub mod order;
pub mod product;
pub mod store;
pub mod user;

pub use address::*;
pub use menu::*;
pub use order::*;
pub use product::*;
pub use store::*;
pub use user::*;
