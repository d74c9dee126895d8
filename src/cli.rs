use clap::Parser;

use crate::config::pathconfig::{PathConfig, PathType};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 30.0)]
    pub frame_rate: f64,

    /// Specifies the *directory* of the config to load. This directory is expected to contain
    /// files like "config.json5".
    #[arg(short, long)]
    pub config: Option<String>,

    /// Specifies the *directory* of the data store. The log file is written there.
    #[arg(short, long)]
    pub data: Option<String>,

    /// Do not use any config other than the preset. Incompatible with --config.
    #[arg(long, default_value_t = false)]
    pub no_config: bool,

    /// Do not write anything to disk. Incompatible with --data.
    #[arg(long, default_value_t = false)]
    pub no_data: bool,

    /// Backend to connect to, e.g. "https://vault.example.com". Overrides the config.
    #[arg(long, value_name = "URL")]
    pub host: Option<String>,
}

impl Cli {
    pub fn is_valid(&self) -> Option<String> {
        if self.config.is_some() && self.no_config {
            return Some("Incompatible flags set: --config and --no-config".to_string());
        };
        if self.data.is_some() && self.no_data {
            return Some("Incompatible flags set: --data and --no-data".to_string());
        };
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Some("--tick-rate must be a positive number".to_string());
        }
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Some("--frame-rate must be a positive number".to_string());
        }
        None
    }

    pub fn paths(&self) -> PathConfig {
        PathConfig::new(
            PathType::from_args(self.data.clone(), self.no_data),
            PathType::from_args(self.config.clone(), self.no_config),
        )
    }
}

const VERSION_MESSAGE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "-",
    env!("VERGEN_GIT_DESCRIBE"),
    " (",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

pub fn version() -> String {
    let author = clap::crate_authors!();

    let config_dir_path = PathConfig::get_config_dir().display().to_string();
    let data_dir_path = PathConfig::get_data_dir().display().to_string();

    format!(
        "\
{VERSION_MESSAGE}

Authors: {author}

Config directory: {config_dir_path}
Data directory: {data_dir_path}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicting_flags() {
        let cli = Cli::parse_from(["streamvault", "--config", "/tmp", "--no-config"]);
        assert!(cli.is_valid().is_some());
        let cli = Cli::parse_from(["streamvault", "--tick-rate", "0"]);
        assert!(cli.is_valid().is_some());
        let cli = Cli::parse_from(["streamvault", "--frame-rate", "0"]);
        assert!(cli.is_valid().is_some());
        let cli = Cli::parse_from(["streamvault", "--host", "http://localhost:9000"]);
        assert!(cli.is_valid().is_none());
        assert_eq!(cli.host.as_deref(), Some("http://localhost:9000"));
    }
}
