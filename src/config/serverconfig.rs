use serde::Deserialize;

fn default_host() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Base URL of the backend, e.g. `https://vault.example.com`
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            request_timeout_secs: default_timeout(),
        }
    }
}
