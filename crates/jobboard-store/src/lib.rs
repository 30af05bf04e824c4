//! Job board store - document store backends
//!
//! Provides the SurrealDB-backed store used in production and an in-memory
//! store for tests and local development. Both implement every collection
//! trait from `jobboard-core` and are handed out as `Arc<dyn DocumentStore>`.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use jobboard_core::{DatabaseConfig, DocumentStore, Result, StoreBackend};

pub mod memory;
pub mod surrealdb_store;

pub use memory::MemoryStore;
pub use surrealdb_store::SurrealDbStore;

/// Open the backend selected by configuration
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::SurrealDb => {
            let store = SurrealDbStore::new(config).await?;
            store.init_schema().await?;
            tracing::info!(
                url = %config.surrealdb_url,
                namespace = %config.surrealdb_namespace,
                database = %config.surrealdb_database,
                "Connected to SurrealDB"
            );
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
