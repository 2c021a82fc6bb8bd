// src/lib.rs

//! Shopping-cart backend for a telecom product catalog.
//!
//! Per-user carts hold plan and data add-on line items; the service exposes
//! get-or-create retrieval, item add/update/remove, cart clearing, and a
//! running total. Carts are created lazily on first access and one cart
//! exists per user.
//!
//! Layering (each layer depends only on the one below it):
//!
//! ```text
//! web handlers (actix-web)  →  CartService  →  CartStore (trait)
//!                                                 ├── MemoryCartStore
//!                                                 └── PgCartStore
//! ```

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use services::CartService;
pub use state::AppState;
