//! Domain models for the API.
//!
//! These are plain data types with no embedded persistence logic; totals and
//! other derived values are computed by free functions over them.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartLine};
pub use order::{NewOrder, Order, OrderLine};
pub use product::Product;
pub use session::{CurrentUser, Session};
pub use user::User;
