// src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::web::handlers::cart_handlers;

/// Liveness probe; answers as long as the process is up (no store check).
async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json("OK")
}

/// Self-description document enumerating the API surface.
async fn index_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({
    "message": "Telecom Cart Experience API",
    "version": env!("CARGO_PKG_VERSION"),
    "endpoints": {
      "cart": "/api/cart/:userId",
      "addItem": "POST /api/cart/:userId/items",
      "updateItem": "PUT /api/cart/:userId/items/:itemId",
      "removeItem": "DELETE /api/cart/:userId/items/:itemId",
      "clearCart": "DELETE /api/cart/:userId",
      "getTotal": "GET /api/cart/:userId/total",
    }
  }))
}

// Called in `main.rs` (and by the HTTP tests) to configure the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.route("/", web::get().to(index_handler)).service(
    web::scope("/api")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/cart")
          .route("/{user_id}", web::get().to(cart_handlers::get_cart_handler))
          .route("/{user_id}", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/{user_id}/items", web::post().to(cart_handlers::add_item_handler))
          .route(
            "/{user_id}/items/{item_id}",
            web::put().to(cart_handlers::update_item_handler),
          )
          .route(
            "/{user_id}/items/{item_id}",
            web::delete().to(cart_handlers::remove_item_handler),
          )
          .route("/{user_id}/total", web::get().to(cart_handlers::cart_total_handler)),
      ),
  );
}
