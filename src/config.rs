//! Controller configuration model and defaults.

use log::info;

/// Runtime tuning persisted to `tunedeck.toml`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Progress poll cadence in milliseconds.
    pub poll_interval_ms: u64,
    /// Broadcast bus depth shared by store and sink traffic.
    pub bus_capacity: usize,
    /// Folder used when a download gesture leaves the target empty.
    pub default_download_folder: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            bus_capacity: 1_024,
            default_download_folder: "downloads".to_string(),
        }
    }
}

/// Clamps configured values into ranges the controller can run with.
pub fn sanitize_config(config: ControllerConfig) -> ControllerConfig {
    ControllerConfig {
        poll_interval_ms: config.poll_interval_ms.clamp(100, 60_000),
        bus_capacity: config.bus_capacity.clamp(16, 65_536),
        default_download_folder: if config.default_download_folder.trim().is_empty() {
            ControllerConfig::default().default_download_folder
        } else {
            config.default_download_folder
        },
    }
}

/// Loads `tunedeck.toml` from the user config directory, writing the default
/// config first when none exists.
pub fn load_or_create() -> ControllerConfig {
    let Some(config_dir) = dirs::config_dir() else {
        return ControllerConfig::default();
    };
    let config_file = config_dir.join("tunedeck.toml");

    if !config_file.exists() {
        let default_config = ControllerConfig::default();
        info!(
            "Config file not found. Creating default config. path={}",
            config_file.display()
        );
        match toml::to_string(&default_config) {
            Ok(config_text) => {
                if let Err(error) = std::fs::write(&config_file, config_text) {
                    log::error!(
                        "Failed to write default config to {}: {}",
                        config_file.display(),
                        error
                    );
                }
            }
            Err(error) => log::error!("Failed to serialize default config: {}", error),
        }
        return default_config;
    }

    let content = std::fs::read_to_string(&config_file).unwrap_or_default();
    sanitize_config(toml::from_str::<ControllerConfig>(&content).unwrap_or_default())
}
