//! Settings binding from the external configuration source
//!
//! The external key/value source is a [`config::Config`]; this module only
//! binds one named section of it into a [`Settings`] record. Whatever file
//! formats or layering the host wired into that `Config` are its business.

use super::schema::Settings;
use crate::domain::errors::QuayError;
use crate::domain::result::Result;
use config::{Config, ConfigError};

/// Default name of the configuration section holding connection settings.
///
/// Key lookup in the configuration source is case-insensitive, so a
/// `[settings]` TOML table or a `"Settings"` JSON object both bind.
pub const DEFAULT_SECTION: &str = "Settings";

/// Binds the named section of the configuration source into [`Settings`]
///
/// A section that is absent from the source yields an empty `Settings`
/// record; fields absent within the section keep their defaults. No
/// validation happens here; required-field checks are deferred to client
/// construction, which is the first point where incomplete settings
/// become an error.
///
/// # Arguments
///
/// * `source` - External key/value configuration source
/// * `section_name` - Name of the section to bind
///
/// # Errors
///
/// Returns `QuayError::Configuration` if the section exists but cannot be
/// coerced into `Settings` (for example a scalar where a list is expected).
pub fn load_settings(source: &Config, section_name: &str) -> Result<Settings> {
    match source.get::<Settings>(section_name) {
        Ok(settings) => {
            tracing::debug!(section = section_name, "Bound connection settings");
            Ok(settings)
        }
        Err(ConfigError::NotFound(_)) => {
            tracing::debug!(
                section = section_name,
                "Settings section absent, using empty settings"
            );
            Ok(Settings::default())
        }
        Err(e) => Err(QuayError::Configuration(format!(
            "failed to bind settings section '{section_name}': {e}"
        ))),
    }
}
