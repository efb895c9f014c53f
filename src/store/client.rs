//! Document store client handle
//!
//! This module provides the opaque handle the rest of the application
//! holds onto. The handle is mutable while it is being assembled and
//! freezes once `initialize()` has built the underlying HTTP transport.

use crate::domain::errors::QuayError;
use crate::domain::result::Result;
use crate::tls::CertificateHandle;
use std::time::Duration;
use url::Url;

/// Client-wide conventions, mutable until the store is initialized
///
/// The pre-initialization hook is the intended place to adjust these.
#[derive(Debug, Clone)]
pub struct Conventions {
    /// Total timeout applied to each request made through the transport
    pub request_timeout: Duration,

    /// Whether server TLS certificates are verified
    ///
    /// Disable only against development servers with self-signed
    /// certificates.
    pub tls_verify: bool,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            tls_verify: true,
        }
    }
}

/// Document database client handle
///
/// Created uninitialized from server URLs and a database name, optionally
/// given a client certificate, then initialized exactly once. After
/// `initialize()` succeeds the handle owns a TLS-capable HTTP transport
/// and no further mutation is possible through the public API.
pub struct DocumentStore {
    urls: Vec<String>,
    database: String,
    certificate: Option<CertificateHandle>,
    conventions: Conventions,
    transport: Option<reqwest::Client>,
}

impl DocumentStore {
    /// Create a new, uninitialized document store handle
    ///
    /// # Arguments
    ///
    /// * `urls` - Server URLs in failover order
    /// * `database` - Name of the database to open
    pub fn new(urls: Vec<String>, database: impl Into<String>) -> Self {
        Self {
            urls,
            database: database.into(),
            certificate: None,
            conventions: Conventions::default(),
            transport: None,
        }
    }

    /// Server URLs this store connects to
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Name of the database this store opens
    pub fn database(&self) -> &str {
        &self.database
    }

    /// The client certificate attached to this store, if any
    pub fn certificate(&self) -> Option<&CertificateHandle> {
        self.certificate.as_ref()
    }

    /// Attach a client certificate
    ///
    /// Must happen before `initialize()`; the identity is baked into the
    /// TLS connector when the transport is built.
    pub fn set_certificate(&mut self, certificate: CertificateHandle) {
        self.certificate = Some(certificate);
    }

    /// Client-wide conventions
    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Mutable access to conventions, for pre-initialization tuning
    pub fn conventions_mut(&mut self) -> &mut Conventions {
        &mut self.conventions
    }

    /// Whether `initialize()` has completed successfully
    pub fn is_initialized(&self) -> bool {
        self.transport.is_some()
    }

    /// Initialize the store
    ///
    /// Validates the configured URLs and builds the HTTP transport,
    /// attaching the client certificate to the TLS connector when one is
    /// present. May be called only once; conventions are frozen from this
    /// point on.
    ///
    /// # Errors
    ///
    /// Returns `QuayError::ClientInitialization` if the store is already
    /// initialized, a URL does not parse, or the TLS connector or
    /// transport cannot be built.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.transport.is_some() {
            return Err(QuayError::ClientInitialization(
                "document store is already initialized".to_string(),
            ));
        }

        for url in &self.urls {
            Url::parse(url).map_err(|e| {
                QuayError::ClientInitialization(format!("invalid database url '{url}': {e}"))
            })?;
        }

        let mut tls = native_tls::TlsConnector::builder();
        if let Some(certificate) = &self.certificate {
            tls.identity(certificate.identity().clone());
        }
        if !self.conventions.tls_verify {
            tls.danger_accept_invalid_certs(true);
        }
        let connector = tls.build().map_err(|e| {
            QuayError::ClientInitialization(format!("failed to build TLS connector: {e}"))
        })?;

        let transport = reqwest::Client::builder()
            .use_preconfigured_tls(connector)
            .timeout(self.conventions.request_timeout)
            .build()
            .map_err(|e| {
                QuayError::ClientInitialization(format!("failed to build HTTP transport: {e}"))
            })?;

        self.transport = Some(transport);

        tracing::info!(
            database = %self.database,
            urls = self.urls.len(),
            certificate = self.certificate.is_some(),
            "Document store initialized"
        );

        Ok(())
    }

    /// Test the connection to the first configured server
    ///
    /// Issues a single HTTP request through the store's transport to
    /// verify reachability. Never called during bootstrap; intended for
    /// startup health checks.
    ///
    /// # Errors
    ///
    /// Returns `QuayError::ClientInitialization` if the store has not been
    /// initialized or the server cannot be reached.
    pub async fn test_connection(&self) -> Result<()> {
        let transport = self.transport.as_ref().ok_or_else(|| {
            QuayError::ClientInitialization("document store is not initialized".to_string())
        })?;

        let url = self.urls.first().ok_or_else(|| {
            QuayError::Configuration("missing database urls".to_string())
        })?;

        transport.get(url).send().await.map_err(|e| {
            QuayError::ClientInitialization(format!("connection test failed: {e}"))
        })?;

        tracing::info!(url = %url, "Document store connection test successful");
        Ok(())
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("urls", &self.urls)
            .field("database", &self.database)
            .field("certificate", &self.certificate)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
