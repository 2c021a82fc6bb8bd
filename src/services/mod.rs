// src/services/mod.rs

//! Domain services. The cart service owns cart and item lifecycle; the HTTP
//! layer above it is a thin adapter.

pub mod cart_service;

pub use cart_service::CartService;
