// Quay - Document database client bootstrap
// Copyright (c) 2025 Quay Contributors
// Licensed under the MIT License

//! # Quay - Document Database Client Bootstrap
//!
//! Quay resolves a layered configuration for connecting to a document
//! database and hands the host application a single, lazily-initialized
//! client handle.
//!
//! ## Overview
//!
//! The crate covers the stretch between "the application has a
//! configuration source" and "the application holds a ready client":
//!
//! - **Binding** a named settings section from an external
//!   [`config::Config`] source
//! - **Resolving** caller overrides against environment defaults with
//!   fill-if-absent semantics (caller-provided values always win)
//! - **Loading** an optional PKCS#12 client certificate from the
//!   filesystem
//! - **Constructing** and initializing the client exactly once per
//!   process, with a pre-initialization hook for tuning conventions
//!
//! It deliberately stops there: the database wire protocol, connection
//! pooling, and query APIs belong to whatever sits on top of the handle.
//!
//! ## Architecture
//!
//! - [`config`] - settings schema and section binding
//! - [`tls`] - client certificate loading
//! - [`store`] - options resolution, factory, provider, and the handle
//! - [`domain`] - error taxonomy and result alias
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quay::store::{DocumentStoreProvider, HostEnvironment};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(
//!         config::Config::builder()
//!             .add_source(config::File::with_name("appsettings"))
//!             .build()?,
//!     );
//!     let environment = HostEnvironment::from_current_dir(config)?;
//!
//!     let provider = DocumentStoreProvider::configure(environment, |options| {
//!         options.before_init(|store| {
//!             store.conventions_mut().request_timeout = std::time::Duration::from_secs(30);
//!         });
//!     });
//!
//!     // First access runs resolution, certificate loading, and
//!     // initialization; every later access returns the same handle.
//!     let store = provider.get().await?;
//!     println!("connected to {}", store.database());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`] with a
//! [`domain::QuayError`] splitting failures into configuration problems
//! (detected before any network activity) and client initialization
//! failures. A failed bootstrap never poisons the provider; the next
//! access retries from scratch.
//!
//! ## Logging
//!
//! Quay emits structured `tracing` events and installs no subscriber;
//! the host application owns logging setup.

pub mod config;
pub mod domain;
pub mod store;
pub mod tls;

// Re-export the main entry points at the crate root
pub use crate::config::{Settings, DEFAULT_SECTION};
pub use crate::domain::{QuayError, Result};
pub use crate::store::{DocumentStore, DocumentStoreProvider, HostEnvironment, StoreOptions};
pub use crate::tls::CertificateHandle;
