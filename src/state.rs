// src/state.rs

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::CartService;

/// Shared application state handed to every handler. Cheap to clone; the
/// actual service and config are behind Arcs.
#[derive(Clone)]
pub struct AppState {
  pub cart_service: Arc<CartService>,
  pub config: Arc<AppConfig>,
}
