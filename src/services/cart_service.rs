// src/services/cart_service.rs

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{Cart, CartItem, CartItemUpdate, NewCartItem};
use crate::store::CartStore;

/// The cart domain service: six operations keyed by `user_id`, layered over
/// an injected [`CartStore`]. The service itself is stateless
/// request-response logic, except for a non-authoritative snapshot cache
/// that keeps reads available through transient store failures.
pub struct CartService {
  store: Arc<dyn CartStore>,
  /// Last successfully read cart per user. Advisory only: overwritten after
  /// every successful store read, never consulted on the write path, and
  /// never authoritative once the store recovers.
  snapshots: RwLock<HashMap<String, Cart>>,
}

impl CartService {
  pub fn new(store: Arc<dyn CartStore>) -> Self {
    Self {
      store,
      snapshots: RwLock::new(HashMap::new()),
    }
  }

  fn remember(&self, cart: &Cart) {
    self.snapshots.write().insert(cart.user_id.clone(), cart.clone());
  }

  fn last_snapshot(&self, user_id: &str) -> Option<Cart> {
    self.snapshots.read().get(user_id).cloned()
  }

  async fn get_or_create(&self, user_id: &str) -> Result<Cart> {
    match self.store.find_cart_by_user(user_id).await? {
      Some(cart) => Ok(cart),
      None => self.store.create_cart(user_id).await,
    }
  }

  /// Get-or-create lookup. Never reports "not found": a user with no cart
  /// gets a fresh empty one.
  #[instrument(name = "cart_service::get_cart", skip(self))]
  pub async fn get_cart(&self, user_id: &str) -> Result<Cart> {
    match self.get_or_create(user_id).await {
      Ok(cart) => {
        self.remember(&cart);
        Ok(cart)
      }
      Err(err @ AppError::Store(_)) => match self.last_snapshot(user_id) {
        Some(snapshot) => {
          warn!(error = %err, user_id, "Store unavailable; serving the last known cart snapshot.");
          Ok(snapshot)
        }
        None => Err(err),
      },
      Err(err) => Err(err),
    }
  }

  /// Adds a line item to the user's cart, creating the cart if needed.
  #[instrument(name = "cart_service::add_item", skip(self, item), fields(product_id = %item.product_id))]
  pub async fn add_item(&self, user_id: &str, item: NewCartItem) -> Result<Cart> {
    validate_new_item(&item)?;

    let cart = self.get_or_create(user_id).await?;
    let stored = self.store.insert_item(cart.id, item).await?;
    info!(item_id = %stored.id, "Item added to cart.");

    let refreshed = self.store.reload(user_id).await?;
    self.remember(&refreshed);
    Ok(refreshed)
  }

  /// Applies a partial update (`quantity` and/or `price`) to an item the
  /// user owns. A missing item and another user's item fail identically.
  #[instrument(name = "cart_service::update_item", skip(self, update))]
  pub async fn update_item(&self, user_id: &str, item_id: Uuid, update: CartItemUpdate) -> Result<Cart> {
    validate_update(&update)?;

    self.check_ownership(user_id, item_id).await?;
    self.store.update_item(item_id, update).await?;

    let refreshed = self.store.reload(user_id).await?;
    self.remember(&refreshed);
    Ok(refreshed)
  }

  /// Removes one item the user owns; the same not-found policy as
  /// [`update_item`](Self::update_item) applies.
  #[instrument(name = "cart_service::remove_item", skip(self))]
  pub async fn remove_item(&self, user_id: &str, item_id: Uuid) -> Result<Cart> {
    self.check_ownership(user_id, item_id).await?;
    self.store.delete_item(item_id).await?;
    info!(%item_id, "Item removed from cart.");

    let refreshed = self.store.reload(user_id).await?;
    self.remember(&refreshed);
    Ok(refreshed)
  }

  /// Deletes every item in the user's cart. The cart record itself
  /// survives and keeps its identity.
  #[instrument(name = "cart_service::clear_cart", skip(self))]
  pub async fn clear_cart(&self, user_id: &str) -> Result<Cart> {
    let cart = self.get_or_create(user_id).await?;
    self.store.delete_all_items(cart.id).await?;

    let refreshed = self.store.reload(user_id).await?;
    self.remember(&refreshed);
    Ok(refreshed)
  }

  /// Sum of `price * quantity` over the cart's current items, in plain
  /// `f64` arithmetic with no rounding. An empty cart totals exactly 0.
  #[instrument(name = "cart_service::cart_total", skip(self))]
  pub async fn cart_total(&self, user_id: &str) -> Result<f64> {
    // Reuses get_cart, so the total inherits both get-or-create semantics
    // and the snapshot read fallback.
    let cart = self.get_cart(user_id).await?;
    Ok(cart.total())
  }

  /// Ownership-checked lookup: the item must exist *and* belong to this
  /// user's cart. Both failures produce the same error so callers cannot
  /// probe for other users' item ids.
  async fn check_ownership(&self, user_id: &str, item_id: Uuid) -> Result<CartItem> {
    match self.store.find_item_with_owner(item_id).await? {
      Some((item, owner)) if owner == user_id => Ok(item),
      _ => Err(AppError::item_not_found()),
    }
  }
}

/// Value-level validation, beyond the adapter's presence check. Rejecting
/// non-positive quantities and non-finite or negative prices is what keeps
/// cart totals non-negative and meaningful.
fn validate_new_item(item: &NewCartItem) -> Result<()> {
  if item.product_id.trim().is_empty() {
    return Err(AppError::Validation("productId must not be blank".to_string()));
  }
  if item.product_name.trim().is_empty() {
    return Err(AppError::Validation("productName must not be blank".to_string()));
  }
  validate_quantity(item.quantity)?;
  validate_price(item.price)
}

fn validate_update(update: &CartItemUpdate) -> Result<()> {
  if let Some(quantity) = update.quantity {
    validate_quantity(quantity)?;
  }
  if let Some(price) = update.price {
    validate_price(price)?;
  }
  Ok(())
}

fn validate_quantity(quantity: i32) -> Result<()> {
  if quantity < 1 {
    return Err(AppError::Validation(format!(
      "quantity must be a positive integer, got {}",
      quantity
    )));
  }
  Ok(())
}

fn validate_price(price: f64) -> Result<()> {
  if !price.is_finite() || price < 0.0 {
    return Err(AppError::Validation(format!(
      "price must be a finite non-negative number, got {}",
      price
    )));
  }
  Ok(())
}
