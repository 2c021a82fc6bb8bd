// src/web/mod.rs

//! The HTTP adapter: a thin actix-web layer mapping requests onto the cart
//! service and service errors onto response codes.

pub mod handlers;
pub mod routes;
