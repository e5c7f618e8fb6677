//! Read-only views over the store's collections

pub mod id;
pub mod inventory;
pub mod order;
pub mod product;
pub mod user;

pub use id::{CategoryId, InventoryId, OrderId, ProductId, UserId};
pub use inventory::InventoryItem;
pub use order::{LineItem, Order, OrderStatus, ShippingAddress};
pub use product::{Category, Product, ProductStatus};
pub use user::{User, UserContact, UserRole};
