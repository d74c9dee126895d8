use std::{env, path::PathBuf};

use directories::ProjectDirs;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathType {
    /// Use whatever the environment suggests
    Default,
    Custom(PathBuf),
    /// Do not use this directory at all
    None,
}

impl PathType {
    pub fn from_args(path: Option<String>, disabled: bool) -> Self {
        match (path, disabled) {
            (_, true) => PathType::None,
            (Some(p), false) => PathType::Custom(PathBuf::from(p)),
            (None, false) => PathType::Default,
        }
    }
}

/// Resolved directories. `None` means the directory is disabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathConfig {
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Path priority:
/// 1. Path specified via --data or --config
/// 2. Environment variable set via STREAMVAULT_DATA or STREAMVAULT_CONFIG
/// 3. XDG paths
/// 4. ./.data and ./.config
impl PathConfig {
    pub fn get_data_dir() -> PathBuf {
        if let Some(s) = DATA_FOLDER.clone() {
            s
        } else if let Some(proj_dirs) = Self::project_directory() {
            proj_dirs.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".").join(".data")
        }
    }

    pub fn get_config_dir() -> PathBuf {
        if let Some(s) = CONFIG_FOLDER.clone() {
            s
        } else if let Some(proj_dirs) = Self::project_directory() {
            proj_dirs.config_local_dir().to_path_buf()
        } else {
            PathBuf::from(".").join(".config")
        }
    }

    fn project_directory() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "streamvault", env!("CARGO_PKG_NAME"))
    }

    pub fn new(data: PathType, config: PathType) -> Self {
        let data = match data {
            PathType::Default => Some(Self::get_data_dir()),
            PathType::Custom(p) => Some(p),
            PathType::None => None,
        };
        let config = match config {
            PathType::Default => Some(Self::get_config_dir()),
            PathType::Custom(p) => Some(p),
            PathType::None => None,
        };
        Self { data, config }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self::new(PathType::Default, PathType::Default)
    }
}
