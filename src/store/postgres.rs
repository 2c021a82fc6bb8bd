// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{Cart, CartItem, CartItemUpdate, NewCartItem};
use crate::store::CartStore;

/// Durable store backed by Postgres through sqlx. Selected for
/// `postgres://` / `postgresql://` locators.
///
/// Queries use the runtime API (no compile-time checked macros), so the
/// crate builds without a live database. Each item mutation and the owning
/// cart's `updated_at` stamp run in one transaction.
pub struct PgCartStore {
  pool: PgPool,
}

/// Item row joined with the `user_id` of its owning cart.
#[derive(FromRow)]
struct OwnedItemRow {
  #[sqlx(flatten)]
  item: CartItem,
  owner_user_id: String,
}

impl PgCartStore {
  /// Connects to the database and applies the embedded migrations.
  pub async fn connect(database_url: &str) -> Result<Self> {
    let pool = PgPool::connect(database_url).await?;
    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .map_err(|e| AppError::Config(format!("Failed to run database migrations: {}", e)))?;
    Ok(Self { pool })
  }

  async fn items_for(&self, cart_id: Uuid) -> Result<Vec<CartItem>> {
    let items = sqlx::query_as::<_, CartItem>(
      "SELECT id, product_id, product_name, quantity, price, plan_type, data_allowance \
       FROM cart_items WHERE cart_id = $1 ORDER BY position",
    )
    .bind(cart_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(items)
  }

  /// Moves the cart's `updated_at` forward within an open transaction.
  /// GREATEST keeps the stamp non-decreasing if the clock regressed.
  async fn touch_cart(tx: &mut Transaction<'_, Postgres>, cart_id: Uuid) -> Result<()> {
    let result = sqlx::query("UPDATE carts SET updated_at = GREATEST(updated_at, now()) WHERE id = $1")
      .bind(cart_id)
      .execute(&mut **tx)
      .await?;
    if result.rows_affected() == 0 {
      return Err(AppError::Internal(format!(
        "cart {} not found while stamping updated_at",
        cart_id
      )));
    }
    Ok(())
  }
}

#[async_trait]
impl CartStore for PgCartStore {
  async fn find_cart_by_user(&self, user_id: &str) -> Result<Option<Cart>> {
    let cart = sqlx::query_as::<_, Cart>("SELECT id, user_id, created_at, updated_at FROM carts WHERE user_id = $1")
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?;

    match cart {
      Some(mut cart) => {
        cart.items = self.items_for(cart.id).await?;
        Ok(Some(cart))
      }
      None => Ok(None),
    }
  }

  async fn create_cart(&self, user_id: &str) -> Result<Cart> {
    let inserted = sqlx::query_as::<_, Cart>(
      "INSERT INTO carts (id, user_id, created_at, updated_at) VALUES ($1, $2, now(), now()) \
       ON CONFLICT (user_id) DO NOTHING \
       RETURNING id, user_id, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;

    match inserted {
      Some(cart) => Ok(cart), // fresh cart, items are empty
      // Lost the uniqueness race; re-read the winning row instead of
      // surfacing the conflict.
      None => self.reload(user_id).await,
    }
  }

  async fn find_item_with_owner(&self, item_id: Uuid) -> Result<Option<(CartItem, String)>> {
    let row = sqlx::query_as::<_, OwnedItemRow>(
      "SELECT i.id, i.product_id, i.product_name, i.quantity, i.price, i.plan_type, i.data_allowance, \
              c.user_id AS owner_user_id \
       FROM cart_items i JOIN carts c ON c.id = i.cart_id \
       WHERE i.id = $1",
    )
    .bind(item_id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(|r| (r.item, r.owner_user_id)))
  }

  async fn insert_item(&self, cart_id: Uuid, item: NewCartItem) -> Result<CartItem> {
    let mut tx = self.pool.begin().await?;

    let stored = sqlx::query_as::<_, CartItem>(
      "INSERT INTO cart_items (id, cart_id, product_id, product_name, quantity, price, plan_type, data_allowance) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
       RETURNING id, product_id, product_name, quantity, price, plan_type, data_allowance",
    )
    .bind(Uuid::new_v4())
    .bind(cart_id)
    .bind(&item.product_id)
    .bind(&item.product_name)
    .bind(item.quantity)
    .bind(item.price)
    .bind(item.plan_type)
    .bind(&item.data_allowance)
    .fetch_one(&mut *tx)
    .await?;

    Self::touch_cart(&mut tx, cart_id).await?;
    tx.commit().await?;
    Ok(stored)
  }

  async fn update_item(&self, item_id: Uuid, update: CartItemUpdate) -> Result<()> {
    let mut tx = self.pool.begin().await?;

    // COALESCE leaves a column untouched when the field was not provided.
    let cart_id = sqlx::query_scalar::<_, Uuid>(
      "UPDATE cart_items \
       SET quantity = COALESCE($2, quantity), price = COALESCE($3, price) \
       WHERE id = $1 \
       RETURNING cart_id",
    )
    .bind(item_id)
    .bind(update.quantity)
    .bind(update.price)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(AppError::item_not_found)?;

    Self::touch_cart(&mut tx, cart_id).await?;
    tx.commit().await?;
    Ok(())
  }

  async fn delete_item(&self, item_id: Uuid) -> Result<()> {
    let mut tx = self.pool.begin().await?;

    let cart_id = sqlx::query_scalar::<_, Uuid>("DELETE FROM cart_items WHERE id = $1 RETURNING cart_id")
      .bind(item_id)
      .fetch_optional(&mut *tx)
      .await?
      .ok_or_else(AppError::item_not_found)?;

    Self::touch_cart(&mut tx, cart_id).await?;
    tx.commit().await?;
    Ok(())
  }

  async fn delete_all_items(&self, cart_id: Uuid) -> Result<()> {
    let mut tx = self.pool.begin().await?;

    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
      .bind(cart_id)
      .execute(&mut *tx)
      .await?;

    Self::touch_cart(&mut tx, cart_id).await?;
    tx.commit().await?;
    Ok(())
  }

  async fn reload(&self, user_id: &str) -> Result<Cart> {
    match self.find_cart_by_user(user_id).await? {
      Some(cart) => Ok(cart),
      None => Err(AppError::Internal(format!(
        "cart for user '{}' disappeared during reload",
        user_id
      ))),
    }
  }
}
