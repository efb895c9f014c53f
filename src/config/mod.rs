//! Configuration management for Quay.
//!
//! Quay does not parse configuration files itself. The host application
//! builds a [`config::Config`] however it likes (files, environment
//! layers, in-memory overrides) and Quay binds one named section of it
//! into a typed [`Settings`] record.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use quay::config::{load_settings, DEFAULT_SECTION};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = config::Config::builder()
//!     .add_source(config::File::with_name("appsettings"))
//!     .build()?;
//!
//! let settings = load_settings(&source, DEFAULT_SECTION)?;
//! println!("database: {}", settings.database_name);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Section
//!
//! ```toml
//! [settings]
//! urls = ["https://db-a.example.com:8080"]
//! database_name = "orders"
//! cert_file_path = "certs/client.pfx"
//! cert_password = "${QUAY_CERT_PASSWORD}"
//! ```
//!
//! Credential fields are wrapped in [`SecretString`] so they are zeroized
//! on drop and redacted from Debug output.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_settings, DEFAULT_SECTION};
pub use schema::Settings;
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
