//! Application state shared across handlers.

use std::sync::Arc;

use devico_core::{BasePath, Catalog};
use tower_sessions::MemoryStore;

use crate::config::StorefrontConfig;
use crate::services::{CheckoutSlots, OrderService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Per-visitor state lives in
/// the visitor's session, not here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    checkouts: CheckoutSlots,
    orders: OrderService,
    sessions: MemoryStore,
}

impl AppState {
    /// Create a new application state with the built-in catalog.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let orders = OrderService::new(config.order_delay);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Catalog::default(),
                checkouts: CheckoutSlots::default(),
                orders,
                sessions: MemoryStore::default(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The deployment base path.
    #[must_use]
    pub fn base(&self) -> &BasePath {
        &self.inner.config.base_path
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Per-session checkout wizards.
    #[must_use]
    pub fn checkouts(&self) -> &CheckoutSlots {
        &self.inner.checkouts
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    /// Session store backing the session layer.
    #[must_use]
    pub fn sessions(&self) -> &MemoryStore {
        &self.inner.sessions
    }
}
