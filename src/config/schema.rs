//! Configuration schema types
//!
//! This module defines the connection settings record that the external
//! configuration source binds into.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Connection settings for the document database
///
/// Bound from a named section of the external configuration source.
/// Fields absent in the source stay empty; no validation happens at bind
/// time. The required-field checks (`urls`, `database_name`) run when the
/// client is built, so an incomplete record is representable but never
/// reaches a live connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server URLs, in failover order
    pub urls: Vec<String>,

    /// Name of the database to open
    pub database_name: String,

    /// Path to a PKCS#12 client certificate bundle, relative to the host
    /// content root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file_path: Option<String>,

    /// Password for the certificate bundle
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_password: Option<SecretString>,
}

impl Settings {
    /// Returns the certificate path if one is configured and non-empty
    pub fn certificate_path(&self) -> Option<&str> {
        self.cert_file_path.as_deref().filter(|p| !p.is_empty())
    }
}
