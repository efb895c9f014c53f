//! Document store provider
//!
//! The provider is the composition-root object the host application
//! registers as its singleton factory. The first `get` runs the whole
//! chain (resolution, certificate loading, construction, initialization)
//! and caches the resulting handle for the process lifetime. A failed
//! attempt leaves the slot empty, so a later `get` retries from scratch.

use crate::domain::result::Result;
use crate::store::client::DocumentStore;
use crate::store::factory::build_document_store;
use crate::store::options::{resolve, HostEnvironment, StoreOptions};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Lazily-initialized provider of the process-wide document store
///
/// Concurrent callers during the uninitialized window block until the
/// first build completes or fails; on success they all receive the same
/// shared handle.
///
/// ```rust,no_run
/// use quay::store::{DocumentStoreProvider, HostEnvironment};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(config::Config::builder().build()?);
/// let environment = HostEnvironment::new(config, "/srv/app");
///
/// let provider = DocumentStoreProvider::configure(environment, |options| {
///     options.section_name("Database");
/// });
///
/// let store = provider.get().await?;
/// println!("connected to {}", store.database());
/// # Ok(())
/// # }
/// ```
pub struct DocumentStoreProvider {
    environment: HostEnvironment,
    overrides: StoreOptions,
    slot: OnceCell<Arc<DocumentStore>>,
}

impl DocumentStoreProvider {
    /// Create a provider with no overrides
    pub fn new(environment: HostEnvironment) -> Self {
        Self {
            environment,
            overrides: StoreOptions::new(),
            slot: OnceCell::new(),
        }
    }

    /// Create a provider, applying caller overrides at registration time
    ///
    /// The configure closure runs once, immediately; resolution and
    /// construction still wait for the first `get`.
    pub fn configure(
        environment: HostEnvironment,
        configure: impl FnOnce(&mut StoreOptions),
    ) -> Self {
        let mut overrides = StoreOptions::new();
        configure(&mut overrides);
        Self {
            environment,
            overrides,
            slot: OnceCell::new(),
        }
    }

    /// Get the shared document store, building it on first access
    ///
    /// # Errors
    ///
    /// Propagates resolution and construction errors. A failure does not
    /// poison the slot; the next call attempts construction again.
    pub async fn get(&self) -> Result<Arc<DocumentStore>> {
        self.slot
            .get_or_try_init(|| async {
                tracing::debug!("First document store access, starting bootstrap");
                let resolved = resolve(self.overrides.clone(), &self.environment)?;
                let store = build_document_store(&resolved).await?;
                Ok(Arc::new(store))
            })
            .await
            .map(Arc::clone)
    }

    /// The store, if it has already been built
    pub fn try_get(&self) -> Option<Arc<DocumentStore>> {
        self.slot.get().cloned()
    }
}
