// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use uuid::Uuid;

use telecart::errors::{AppError, Result};
use telecart::models::{Cart, CartItem, CartItemUpdate, NewCartItem, PlanType};
use telecart::services::CartService;
use telecart::store::{CartStore, MemoryCartStore};

static TRACING: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init()
    .ok();
});

/// One-time tracing init shared by every test binary.
pub fn init_tracing() {
  Lazy::force(&TRACING);
}

/// Service over a fresh in-memory store, the deterministic substitute used
/// by the service-level tests.
pub fn memory_service() -> CartService {
  CartService::new(Arc::new(MemoryCartStore::new()))
}

// --- Item builders ---

pub fn item(product_id: &str, product_name: &str, quantity: i32, price: f64) -> NewCartItem {
  NewCartItem {
    product_id: product_id.to_string(),
    product_name: product_name.to_string(),
    quantity,
    price,
    plan_type: None,
    data_allowance: None,
  }
}

pub fn premium_plan() -> NewCartItem {
  NewCartItem {
    product_id: "prod-001".to_string(),
    product_name: "Premium Data Plan".to_string(),
    quantity: 1,
    price: 49.99,
    plan_type: Some(PlanType::Postpaid),
    data_allowance: Some("50GB".to_string()),
  }
}

pub fn basic_plan() -> NewCartItem {
  item("prod-002", "Basic Plan", 2, 19.99)
}

// --- Failure injector ---

/// Store wrapper that can be switched into a failing mode where every
/// operation reports a store failure, for exercising the service's
/// snapshot read fallback.
pub struct FlakyStore {
  inner: MemoryCartStore,
  failing: AtomicBool,
}

impl FlakyStore {
  pub fn new() -> Self {
    Self {
      inner: MemoryCartStore::new(),
      failing: AtomicBool::new(false),
    }
  }

  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  fn check(&self) -> Result<()> {
    if self.failing.load(Ordering::SeqCst) {
      Err(AppError::Store(sqlx::Error::PoolTimedOut))
    } else {
      Ok(())
    }
  }
}

#[async_trait]
impl CartStore for FlakyStore {
  async fn find_cart_by_user(&self, user_id: &str) -> Result<Option<Cart>> {
    self.check()?;
    self.inner.find_cart_by_user(user_id).await
  }

  async fn create_cart(&self, user_id: &str) -> Result<Cart> {
    self.check()?;
    self.inner.create_cart(user_id).await
  }

  async fn find_item_with_owner(&self, item_id: Uuid) -> Result<Option<(CartItem, String)>> {
    self.check()?;
    self.inner.find_item_with_owner(item_id).await
  }

  async fn insert_item(&self, cart_id: Uuid, item: NewCartItem) -> Result<CartItem> {
    self.check()?;
    self.inner.insert_item(cart_id, item).await
  }

  async fn update_item(&self, item_id: Uuid, update: CartItemUpdate) -> Result<()> {
    self.check()?;
    self.inner.update_item(item_id, update).await
  }

  async fn delete_item(&self, item_id: Uuid) -> Result<()> {
    self.check()?;
    self.inner.delete_item(item_id).await
  }

  async fn delete_all_items(&self, cart_id: Uuid) -> Result<()> {
    self.check()?;
    self.inner.delete_all_items(cart_id).await
  }

  async fn reload(&self, user_id: &str) -> Result<Cart> {
    self.check()?;
    self.inner.reload(user_id).await
  }
}
