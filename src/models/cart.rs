// src/models/cart.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::cart_item::CartItem;

/// A per-user cart. Exactly one cart exists per `user_id`; it is created
/// lazily on first access and never deleted (clearing removes items only).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
  pub id: Uuid,
  pub user_id: String,
  /// Line items in insertion order. Not a table column; filled in by the
  /// store after the cart row is fetched.
  #[sqlx(skip)]
  pub items: Vec<CartItem>,
  pub created_at: DateTime<Utc>,
  /// Stamped on every mutation; never decreases and never precedes
  /// `created_at`.
  pub updated_at: DateTime<Utc>,
}

impl Cart {
  /// Sum of `price * quantity` over all items, in plain `f64` arithmetic.
  /// No rounding is applied.
  pub fn total(&self) -> f64 {
    self
      .items
      .iter()
      .map(|item| item.price * f64::from(item.quantity))
      .sum()
  }
}
