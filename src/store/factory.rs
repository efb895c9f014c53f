//! Client factory
//!
//! Turns fully resolved options into an initialized [`DocumentStore`].
//! Invoked at most once per process through the provider's singleton
//! slot; performs no retries of its own.

use crate::domain::errors::QuayError;
use crate::domain::result::Result;
use crate::store::client::DocumentStore;
use crate::store::options::ResolvedOptions;

/// Builds and initializes a document store from resolved options
///
/// Validates the required settings, constructs the uninitialized handle
/// through the bound builder, attaches the client certificate, runs the
/// pre-initialization hook exactly once, and initializes the handle. The
/// hook sees the same handle that is ultimately returned, strictly before
/// `initialize()` runs.
///
/// # Errors
///
/// Returns `QuayError::Configuration` when the database name or URL list
/// is empty (detected before any construction), and propagates
/// `QuayError::ClientInitialization` from `initialize()` unchanged.
pub async fn build_document_store(resolved: &ResolvedOptions) -> Result<DocumentStore> {
    let settings = resolved.settings();

    if settings.database_name.is_empty() {
        return Err(QuayError::Configuration(
            "missing database name".to_string(),
        ));
    }
    if settings.urls.is_empty() {
        return Err(QuayError::Configuration(
            "missing database urls".to_string(),
        ));
    }

    let mut store = (resolved.client_builder())(settings)?;

    if let Some(certificate) = resolved.certificate() {
        store.set_certificate(certificate.clone());
    }

    if let Some(hook) = resolved.before_init() {
        hook(&mut store);
    }

    store.initialize().await?;

    tracing::info!(
        database = %store.database(),
        urls = store.urls().len(),
        "Document store created"
    );

    Ok(store)
}
