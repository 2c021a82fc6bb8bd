// src/models/cart_item.rs

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Subscription model of a plan line item.
///
/// Parsed case-insensitively at the input edge; the canonical form used on
/// the wire and in the database enum is upper-case (`PREPAID` / `POSTPAID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "plan_type_enum", rename_all = "UPPERCASE")]
pub enum PlanType {
  Prepaid,
  Postpaid,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid plan type '{0}', expected 'prepaid' or 'postpaid'")]
pub struct InvalidPlanType(String);

impl PlanType {
  pub fn as_str(&self) -> &'static str {
    match self {
      PlanType::Prepaid => "PREPAID",
      PlanType::Postpaid => "POSTPAID",
    }
  }
}

impl fmt::Display for PlanType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PlanType {
  type Err = InvalidPlanType;

  fn from_str(raw: &str) -> Result<Self, Self::Err> {
    if raw.eq_ignore_ascii_case("prepaid") {
      Ok(PlanType::Prepaid)
    } else if raw.eq_ignore_ascii_case("postpaid") {
      Ok(PlanType::Postpaid)
    } else {
      Err(InvalidPlanType(raw.to_string()))
    }
  }
}

impl Serialize for PlanType {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for PlanType {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(de::Error::custom)
  }
}

/// One line item (a plan or data add-on) inside a cart. Belongs to exactly
/// one cart for its whole lifetime; only `quantity` and `price` are mutable
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub id: Uuid,
  pub product_id: String,
  pub product_name: String,
  pub quantity: i32,
  /// Unit price; totals are computed as `price * quantity`.
  pub price: f64,
  pub plan_type: Option<PlanType>,
  /// Free-form quota label, e.g. "50GB". Absent means no quota constraint.
  pub data_allowance: Option<String>,
}

/// Input for adding an item. The store assigns the item id.
#[derive(Debug, Clone)]
pub struct NewCartItem {
  pub product_id: String,
  pub product_name: String,
  pub quantity: i32,
  pub price: f64,
  pub plan_type: Option<PlanType>,
  pub data_allowance: Option<String>,
}

/// Partial update for an existing item; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemUpdate {
  pub quantity: Option<i32>,
  pub price: Option<f64>,
}
