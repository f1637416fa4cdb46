//! Shared application state.
//!
//! Holds the configuration, the PostgreSQL pool and the adapters every
//! domain service is built from. Cloning is cheap: only `Arc`s and the pool
//! handle are copied.

use block_storage::BlockStorage;
use domain_menu::EventSink;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: database::postgres::DatabaseConnection,
    /// Blob store for logos, banners and pictures
    pub storage: Arc<dyn BlockStorage>,
    pub events: Arc<dyn EventSink>,
}
