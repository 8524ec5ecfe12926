//! The `config` module loads layered settings and resolves the named
//! profiles a `Sender` connects with.

mod resolver;
mod settings;

use config::{Config, Environment, File};

use crate::utils::error::ConfigError;
use settings::PartialSettings;

pub use resolver::{ProfileResolver, ResolvedProfile, SettingsResolver};
pub use settings::{LogSettings, ProfileSettings, ServerSettings, Settings, StoreSettings};

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::with_prefix("COURIER").separator("__"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(Settings::merge(partial))
}
