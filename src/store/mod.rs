// src/store/mod.rs

//! Keyed storage for carts and their items.
//!
//! The service only ever talks to the [`CartStore`] trait; which backend sits
//! behind it is a deployment choice made from `DATABASE_URL` at startup. The
//! in-process backend keeps everything in per-process maps (ephemeral), the
//! Postgres backend persists through sqlx.

pub mod memory;
pub mod postgres;

pub use memory::MemoryCartStore;
pub use postgres::PgCartStore;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{Cart, CartItem, CartItemUpdate, NewCartItem};

/// Read/write contract every cart store backend satisfies.
///
/// Mutating operations stamp the owning cart's `updated_at` (clamped so it
/// never decreases) as part of the same unit of work.
#[async_trait]
pub trait CartStore: Send + Sync {
  /// The cart with its items, or `None` when the user has none yet. Absence
  /// is not an error at this level.
  async fn find_cart_by_user(&self, user_id: &str) -> Result<Option<Cart>>;

  /// Creates an empty cart for the user. At most one cart may ever exist per
  /// user: when a concurrent creation races, the store resolves the conflict
  /// itself by handing back the winning row, so callers never observe it.
  async fn create_cart(&self, user_id: &str) -> Result<Cart>;

  /// Fetches an item together with the `user_id` owning its cart, for
  /// ownership checks before a mutation.
  async fn find_item_with_owner(&self, item_id: Uuid) -> Result<Option<(CartItem, String)>>;

  /// Appends an item to the cart and assigns its identifier.
  async fn insert_item(&self, cart_id: Uuid, item: NewCartItem) -> Result<CartItem>;

  /// Applies the provided fields to an existing item. Fails with the
  /// not-found error when the item is absent.
  async fn update_item(&self, item_id: Uuid, update: CartItemUpdate) -> Result<()>;

  /// Deletes one item. Fails with the not-found error when absent.
  async fn delete_item(&self, item_id: Uuid) -> Result<()>;

  /// Deletes every item under the cart. The cart record itself survives.
  async fn delete_all_items(&self, cart_id: Uuid) -> Result<()>;

  /// The cart with its current items, used after a mutation to return a
  /// consistent snapshot. The cart is expected to exist by this point.
  async fn reload(&self, user_id: &str) -> Result<Cart>;
}

/// Picks a store backend from the configured locator.
pub async fn connect(database_url: &str) -> Result<Arc<dyn CartStore>> {
  if database_url.starts_with("memory:") {
    tracing::info!("Using the in-process cart store (ephemeral).");
    Ok(Arc::new(MemoryCartStore::new()))
  } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
    let store = PgCartStore::connect(database_url).await?;
    tracing::info!("Connected to the Postgres cart store.");
    Ok(Arc::new(store))
  } else {
    Err(AppError::Config(format!(
      "Unsupported DATABASE_URL '{}': expected a memory:// or postgres:// locator",
      database_url
    )))
  }
}
