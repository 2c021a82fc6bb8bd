// src/models/mod.rs

//! Data structures shared by the cart store, the service, and the HTTP layer.

pub mod cart;
pub mod cart_item;

// Re-export the model structs for convenient access
pub use cart::Cart;
pub use cart_item::{CartItem, CartItemUpdate, NewCartItem, PlanType};
