//! Client certificate loading
//!
//! This is the only part of the crate that touches the filesystem. A
//! certificate is optional: when no path is configured the loader returns
//! `None` and the store connects without a client identity.

use crate::config::SecretString;
use crate::domain::errors::QuayError;
use crate::domain::result::Result;
use native_tls::Identity;
use secrecy::ExposeSecret;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A loaded client certificate and private key
///
/// Wraps the parsed TLS identity together with the absolute path it was
/// loaded from. The key material itself never appears in Debug output.
#[derive(Clone)]
pub struct CertificateHandle {
    identity: Identity,
    path: PathBuf,
}

impl CertificateHandle {
    /// Wrap an identity the caller parsed themselves
    ///
    /// Useful when the certificate comes from somewhere other than the
    /// filesystem (a secrets vault, say) and is handed to the options as
    /// a pre-set override.
    pub fn new(identity: Identity, path: impl Into<PathBuf>) -> Self {
        Self {
            identity,
            path: path.into(),
        }
    }

    /// The parsed certificate + private key identity
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Absolute path the bundle was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for CertificateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateHandle")
            .field("path", &self.path)
            .field("identity", &"[REDACTED]")
            .finish()
    }
}

/// Loads an optional client certificate from the filesystem
///
/// Joins `root_path` and `relative_path` into an absolute path and parses
/// the file as a password-protected PKCS#12 certificate+key bundle.
///
/// # Arguments
///
/// * `relative_path` - Bundle path relative to the host content root; an
///   empty or absent path means no certificate is required
/// * `root_path` - Host content root used to resolve the relative path
/// * `password` - Password for the bundle's private key; absent means empty
///
/// # Errors
///
/// Returns `QuayError::Configuration` if the file does not exist at the
/// joined path, cannot be read, or does not parse as a PKCS#12 bundle.
/// A wrong password and a corrupt bundle are indistinguishable to the
/// parser and surface as the same error.
pub fn load_certificate(
    relative_path: Option<&str>,
    root_path: &Path,
    password: Option<&SecretString>,
) -> Result<Option<CertificateHandle>> {
    let Some(relative_path) = relative_path.filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    let path = root_path.join(relative_path);
    if !path.exists() {
        return Err(QuayError::Configuration(format!(
            "certificate file missing: {}",
            path.display()
        )));
    }

    let bytes = fs::read(&path).map_err(|e| {
        QuayError::Configuration(format!(
            "failed to read certificate file {}: {e}",
            path.display()
        ))
    })?;

    let password = password.map(|p| p.expose_secret().as_ref()).unwrap_or("");
    let identity = Identity::from_pkcs12(&bytes, password).map_err(|e| {
        QuayError::Configuration(format!("certificate invalid: {}: {e}", path.display()))
    })?;

    tracing::info!(path = %path.display(), "Loaded client certificate");

    Ok(Some(CertificateHandle { identity, path }))
}
