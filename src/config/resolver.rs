use std::sync::Arc;

use crate::config::Settings;
use crate::transport::{ConnectionFactory, Destination, WsConnectionFactory};
use crate::utils::error::ConfigError;

/// What a profile resolves to: a way to open connections and the place
/// messages are sent to.
#[derive(Clone)]
pub struct ResolvedProfile {
    pub factory: Arc<dyn ConnectionFactory>,
    pub destination: Destination,
}

impl std::fmt::Debug for ResolvedProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProfile")
            .field("factory", &"dyn ConnectionFactory")
            .field("destination", &self.destination)
            .finish()
    }
}

/// Looks up the connection factory and destination for a named profile.
pub trait ProfileResolver: Send + Sync {
    fn resolve(&self, profile: &str) -> Result<ResolvedProfile, ConfigError>;
}

/// Resolves profiles from the `[profiles.<name>]` tables of `Settings`
/// into WebSocket connection factories.
#[derive(Debug, Clone)]
pub struct SettingsResolver {
    settings: Settings,
}

impl SettingsResolver {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl ProfileResolver for SettingsResolver {
    fn resolve(&self, profile: &str) -> Result<ResolvedProfile, ConfigError> {
        let found = self
            .settings
            .profiles
            .get(profile)
            .ok_or_else(|| ConfigError::UnknownProfile(profile.to_string()))?;

        let invalid = |reason: &str| ConfigError::InvalidProfile {
            profile: profile.to_string(),
            reason: reason.to_string(),
        };
        if found.url.trim().is_empty() {
            return Err(invalid("url is empty"));
        }
        if found.queue.trim().is_empty() {
            return Err(invalid("queue is empty"));
        }

        Ok(ResolvedProfile {
            factory: Arc::new(WsConnectionFactory::new(found.url.clone())),
            destination: Destination::new(found.queue.clone()),
        })
    }
}
