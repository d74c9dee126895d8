pub mod behaviourconfig;
pub mod keybindings;
pub mod keyparser;
pub mod localkeybinds;
pub mod pathconfig;
pub mod serverconfig;

use std::time::Duration;

use color_eyre::Result;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    action::globalaction::GlobalAction,
    config::{
        behaviourconfig::BehaviourConfig,
        keybindings::KeyBindings,
        localkeybinds::LocalKeyBinds,
        pathconfig::{PathConfig, PROJECT_NAME},
        serverconfig::ServerConfig,
    },
};

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub behaviour: BehaviourConfig,
    #[serde(default)]
    pub keybindings: KeyBindings<GlobalAction>,
    #[serde(default)]
    pub local: LocalKeyBinds,
    #[serde(skip)]
    pub paths: PathConfig,
}

impl Config {
    /// Loads the preset, then the config files found in the config directory, then environment
    /// variables such as `STREAMVAULT__SERVER__HOST`. Without a config directory only the preset is
    /// used.
    pub fn new(paths: PathConfig) -> Result<Self, config::ConfigError> {
        let Some(config_dir) = paths.config.clone() else {
            let mut cfg: Self = json5::from_str(CONFIG)
                .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
            cfg.paths = paths;
            return Ok(cfg);
        };

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true;
            }
        }
        if found_config {
            info!("Loaded configuration from {}", config_dir.display());
        } else {
            warn!(
                "No configuration file found in {}, using the preset",
                config_dir.display()
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix(&PROJECT_NAME)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.paths = paths;
        Ok(cfg)
    }

    /// Replaces the configured server
    pub fn with_host(mut self, host: Option<String>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        self
    }

    pub fn undo_timeout(&self) -> Duration {
        Duration::from_millis(self.behaviour.undo_timeout_ms)
    }

    /// The preset alone
    #[cfg(test)]
    pub fn preset() -> Self {
        use crate::config::pathconfig::PathType;
        Self::new(PathConfig::new(PathType::None, PathType::None)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        action::localaction::ListAction,
        config::{keyparser::KeyParser, pathconfig::PathType},
    };
    use color_eyre::eyre::eyre;

    #[test]
    fn test_preset() -> Result<()> {
        let c = Config::new(PathConfig::new(PathType::None, PathType::None))?;
        assert_eq!(c.server, ServerConfig::default());
        assert_eq!(c.behaviour, BehaviourConfig::default());
        assert_eq!(c.undo_timeout(), Duration::from_millis(2000));
        Ok(())
    }

    #[test]
    fn test_preset_keybindings() -> Result<()> {
        let c = Config::new(PathConfig::new(PathType::None, PathType::None))?;
        let q = KeyParser::parse_key_sequence("<q>").map_err(|e| eyre!(e))?;
        let gg = KeyParser::parse_key_sequence("<g><g>").map_err(|e| eyre!(e))?;
        assert_eq!(c.keybindings.get(&q), Some(&GlobalAction::Quit));
        assert_eq!(c.local.list.get(&gg), Some(&ListAction::Top));
        assert_eq!(
            c.keybindings.find_action_str(&GlobalAction::Undo).as_deref(),
            Some("<u>")
        );
        Ok(())
    }

    #[test]
    fn test_host_override() -> Result<()> {
        let c = Config::new(PathConfig::new(PathType::None, PathType::None))?
            .with_host(Some("https://vault.example.com".to_string()));
        assert_eq!(c.server.host, "https://vault.example.com");
        Ok(())
    }

    #[test]
    fn test_user_file_on_top_of_preset() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("streamvault-config-{}", std::process::id()));
        fs::create_dir_all(&dir)?;
        fs::write(
            dir.join("config.json5"),
            r#"{ behaviour: { undo_timeout_ms: 5000 }, keybindings: { "<x>": "Quit" } }"#,
        )?;
        let c = Config::new(PathConfig::new(PathType::None, PathType::Custom(dir.clone())))?;
        fs::remove_dir_all(&dir)?;
        assert_eq!(c.behaviour.undo_timeout_ms, 5000);
        // Keys missing from the user file come from the preset
        assert!(c.behaviour.refetch_after_toggle);
        assert_eq!(c.server.host, "http://localhost:8000");
        let x = KeyParser::parse_key_sequence("<x>").map_err(|e| eyre!(e))?;
        let q = KeyParser::parse_key_sequence("<q>").map_err(|e| eyre!(e))?;
        assert_eq!(c.keybindings.get(&x), Some(&GlobalAction::Quit));
        assert_eq!(c.keybindings.get(&q), Some(&GlobalAction::Quit));
        Ok(())
    }
}
