use std::collections::HashMap;

use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes the HTTP server, the person store, logging and the named
/// profiles the message sender can connect with.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub log: LogSettings,
    pub profiles: HashMap<String, ProfileSettings>,
}

/// Configuration settings for the server.
///
/// Defines the host and port the edit form will be served on.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Where the person documents live on disk.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// A named sender profile: which broker to dial and which queue to target.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ProfileSettings {
    pub url: String,
    pub queue: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub store: Option<PartialStoreSettings>,
    pub log: Option<PartialLogSettings>,
    pub profiles: Option<HashMap<String, ProfileSettings>>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialStoreSettings {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Settings {
    /// Fills every value missing from `partial` with the default.
    ///
    /// Profiles are merged by name, so a file can add profiles without
    /// losing `default`.
    pub fn merge(partial: PartialSettings) -> Self {
        let default = Settings::default();

        let mut profiles = default.profiles;
        profiles.extend(partial.profiles.unwrap_or_default());

        Settings {
            server: ServerSettings {
                host: partial
                    .server
                    .as_ref()
                    .and_then(|s| s.host.clone())
                    .unwrap_or(default.server.host),
                port: partial
                    .server
                    .as_ref()
                    .and_then(|s| s.port)
                    .unwrap_or(default.server.port),
            },
            store: StoreSettings {
                path: partial
                    .store
                    .and_then(|s| s.path)
                    .unwrap_or(default.store.path),
            },
            log: LogSettings {
                level: partial
                    .log
                    .and_then(|l| l.level)
                    .unwrap_or(default.log.level),
            },
            profiles,
        }
    }
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            "default".to_string(),
            ProfileSettings {
                url: "ws://127.0.0.1:9001".to_string(),
                queue: "QUEUE".to_string(),
            },
        );

        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            store: StoreSettings {
                path: "courier_db".to_string(),
            },
            log: LogSettings {
                level: "info".to_string(),
            },
            profiles,
        }
    }
}
