// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{Cart, CartItem, CartItemUpdate, NewCartItem};
use crate::store::CartStore;

/// Ephemeral per-process store. Selected for `memory://` locators (the
/// default); everything lives for the lifetime of the process and no longer.
///
/// A single lock guards the cart map and the two lookup indexes, so every
/// operation is atomic with respect to the others. Items keep their
/// insertion order inside the cart's `Vec`.
#[derive(Default)]
pub struct MemoryCartStore {
  state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
  carts: HashMap<Uuid, Cart>,
  /// user id -> cart id; enforces the one-cart-per-user invariant.
  cart_by_user: HashMap<String, Uuid>,
  /// item id -> owning cart id.
  cart_by_item: HashMap<Uuid, Uuid>,
}

impl MemoryCartStore {
  pub fn new() -> Self {
    Self::default()
  }
}

/// Stamps the cart's `updated_at`, clamped so it never moves backwards even
/// if the wall clock does.
fn touch(cart: &mut Cart) {
  let now = Utc::now();
  if now > cart.updated_at {
    cart.updated_at = now;
  }
}

#[async_trait]
impl CartStore for MemoryCartStore {
  async fn find_cart_by_user(&self, user_id: &str) -> Result<Option<Cart>> {
    let state = self.state.read();
    let cart = state
      .cart_by_user
      .get(user_id)
      .and_then(|cart_id| state.carts.get(cart_id))
      .cloned();
    Ok(cart)
  }

  async fn create_cart(&self, user_id: &str) -> Result<Cart> {
    let mut state = self.state.write();
    if let Some(cart_id) = state.cart_by_user.get(user_id).copied() {
      // Lost a creation race; hand back the winning cart instead of
      // surfacing the conflict.
      if let Some(existing) = state.carts.get(&cart_id) {
        return Ok(existing.clone());
      }
    }

    let now = Utc::now();
    let cart = Cart {
      id: Uuid::new_v4(),
      user_id: user_id.to_string(),
      items: Vec::new(),
      created_at: now,
      updated_at: now,
    };
    state.cart_by_user.insert(cart.user_id.clone(), cart.id);
    state.carts.insert(cart.id, cart.clone());
    Ok(cart)
  }

  async fn find_item_with_owner(&self, item_id: Uuid) -> Result<Option<(CartItem, String)>> {
    let state = self.state.read();
    let found = state
      .cart_by_item
      .get(&item_id)
      .and_then(|cart_id| state.carts.get(cart_id))
      .and_then(|cart| {
        cart
          .items
          .iter()
          .find(|item| item.id == item_id)
          .map(|item| (item.clone(), cart.user_id.clone()))
      });
    Ok(found)
  }

  async fn insert_item(&self, cart_id: Uuid, item: NewCartItem) -> Result<CartItem> {
    let mut state = self.state.write();
    let cart = match state.carts.get_mut(&cart_id) {
      Some(cart) => cart,
      None => {
        return Err(AppError::Internal(format!(
          "cart {} not found while inserting an item",
          cart_id
        )))
      }
    };

    let stored = CartItem {
      id: Uuid::new_v4(),
      product_id: item.product_id,
      product_name: item.product_name,
      quantity: item.quantity,
      price: item.price,
      plan_type: item.plan_type,
      data_allowance: item.data_allowance,
    };
    cart.items.push(stored.clone());
    touch(cart);
    state.cart_by_item.insert(stored.id, cart_id);
    Ok(stored)
  }

  async fn update_item(&self, item_id: Uuid, update: CartItemUpdate) -> Result<()> {
    let mut state = self.state.write();
    let cart_id = match state.cart_by_item.get(&item_id).copied() {
      Some(cart_id) => cart_id,
      None => return Err(AppError::item_not_found()),
    };
    let cart = match state.carts.get_mut(&cart_id) {
      Some(cart) => cart,
      None => return Err(AppError::Internal(format!("ownership index points at missing cart {}", cart_id))),
    };
    let item = match cart.items.iter_mut().find(|item| item.id == item_id) {
      Some(item) => item,
      None => return Err(AppError::item_not_found()),
    };

    if let Some(quantity) = update.quantity {
      item.quantity = quantity;
    }
    if let Some(price) = update.price {
      item.price = price;
    }
    touch(cart);
    Ok(())
  }

  async fn delete_item(&self, item_id: Uuid) -> Result<()> {
    let mut state = self.state.write();
    let cart_id = match state.cart_by_item.get(&item_id).copied() {
      Some(cart_id) => cart_id,
      None => return Err(AppError::item_not_found()),
    };
    let cart = match state.carts.get_mut(&cart_id) {
      Some(cart) => cart,
      None => return Err(AppError::Internal(format!("ownership index points at missing cart {}", cart_id))),
    };
    let position = match cart.items.iter().position(|item| item.id == item_id) {
      Some(position) => position,
      None => return Err(AppError::item_not_found()),
    };

    // Vec::remove keeps the order of the remaining items intact.
    cart.items.remove(position);
    touch(cart);
    state.cart_by_item.remove(&item_id);
    Ok(())
  }

  async fn delete_all_items(&self, cart_id: Uuid) -> Result<()> {
    let mut state = self.state.write();
    let cart = match state.carts.get_mut(&cart_id) {
      Some(cart) => cart,
      None => {
        return Err(AppError::Internal(format!(
          "cart {} not found while clearing its items",
          cart_id
        )))
      }
    };

    let removed: Vec<Uuid> = cart.items.drain(..).map(|item| item.id).collect();
    touch(cart);
    for item_id in removed {
      state.cart_by_item.remove(&item_id);
    }
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
