//! Document store bootstrap
//!
//! The pieces of the client-bootstrap pipeline, in dependency order:
//!
//! - [`options`] - option overrides, the host environment, and the
//!   fill-if-absent resolution pipeline
//! - [`factory`] - turns resolved options into an initialized handle
//! - [`provider`] - the singleton slot the host registers
//! - [`client`] - the [`DocumentStore`] handle itself

pub mod client;
pub mod factory;
pub mod options;
pub mod provider;

// Re-export commonly used types
pub use client::{Conventions, DocumentStore};
pub use factory::build_document_store;
pub use options::{resolve, HostEnvironment, ResolvedOptions, StoreOptions};
pub use provider::DocumentStoreProvider;
