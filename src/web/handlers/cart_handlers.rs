// src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CartItemUpdate, NewCartItem, PlanType};
use crate::state::AppState;

// --- Request DTOs ---

/// Add-item body. Required fields are `Option` so the handler can report
/// which ones are missing with a 400 before the service is ever invoked.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddItemPayload {
  pub product_id: Option<String>,
  pub product_name: Option<String>,
  pub quantity: Option<i32>,
  pub price: Option<f64>,
  pub plan_type: Option<PlanType>,
  pub data_allowance: Option<String>,
}

impl AddItemPayload {
  fn into_new_item(self) -> Result<NewCartItem, AppError> {
    let mut missing = Vec::new();
    if self.product_id.is_none() {
      missing.push("productId");
    }
    if self.product_name.is_none() {
      missing.push("productName");
    }
    if self.quantity.is_none() {
      missing.push("quantity");
    }
    if self.price.is_none() {
      missing.push("price");
    }
    if !missing.is_empty() {
      return Err(AppError::Validation(format!(
        "Missing required fields: {}",
        missing.join(", ")
      )));
    }

    Ok(NewCartItem {
      product_id: self.product_id.unwrap_or_default(),
      product_name: self.product_name.unwrap_or_default(),
      quantity: self.quantity.unwrap_or_default(),
      price: self.price.unwrap_or_default(),
      plan_type: self.plan_type,
      data_allowance: self.data_allowance,
    })
  }
}

/// Item ids are opaque to callers, so a path segment that is not a
/// well-formed identifier is indistinguishable from an absent item.
fn parse_item_id(raw: &str) -> Result<Uuid, AppError> {
  Uuid::parse_str(raw).map_err(|_| AppError::item_not_found())
}

// --- Handlers ---

#[instrument(name = "handler::get_cart", skip(app_state, path), fields(user_id = %path.as_ref()))]
pub async fn get_cart_handler(app_state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  let cart = app_state.cart_service.get_cart(&user_id).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(name = "handler::add_item", skip(app_state, path, payload), fields(user_id = %path.as_ref()))]
pub async fn add_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<AddItemPayload>,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  let new_item = payload.into_inner().into_new_item()?;

  info!(product_id = %new_item.product_id, "Add-item request accepted.");
  let cart = app_state.cart_service.add_item(&user_id, new_item).await?;
  Ok(HttpResponse::Created().json(cart))
}

#[instrument(name = "handler::update_item", skip(app_state, path, payload))]
pub async fn update_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
  payload: web::Json<CartItemUpdate>,
) -> Result<HttpResponse, AppError> {
  let (user_id, raw_item_id) = path.into_inner();
  let item_id = parse_item_id(&raw_item_id)?;

  let cart = app_state
    .cart_service
    .update_item(&user_id, item_id, payload.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(name = "handler::remove_item", skip(app_state, path))]
pub async fn remove_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
  let (user_id, raw_item_id) = path.into_inner();
  let item_id = parse_item_id(&raw_item_id)?;

  let cart = app_state.cart_service.remove_item(&user_id, item_id).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(name = "handler::clear_cart", skip(app_state, path), fields(user_id = %path.as_ref()))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  let cart = app_state.cart_service.clear_cart(&user_id).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(name = "handler::cart_total", skip(app_state, path), fields(user_id = %path.as_ref()))]
pub async fn cart_total_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  let total = app_state.cart_service.cart_total(&user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "userId": user_id, "total": total })))
}
