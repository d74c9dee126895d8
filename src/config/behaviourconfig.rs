use serde::Deserialize;

fn default_true() -> bool {
    true
}

fn default_undo_timeout() -> u64 {
    2000
}

fn default_refetch_delay() -> usize {
    1
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct BehaviourConfig {
    /// How long, in milliseconds, a playlist change can be undone
    #[serde(default = "default_undo_timeout")]
    pub undo_timeout_ms: u64,
    /// Reload the playlists after every add or remove, so that changes made elsewhere show up
    #[serde(default = "default_true")]
    pub refetch_after_toggle: bool,
    /// Number of ticks to wait before reloading. Changes made in quick succession share one
    /// reload.
    #[serde(default = "default_refetch_delay")]
    pub refetch_delay_ticks: usize,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            undo_timeout_ms: default_undo_timeout(),
            refetch_after_toggle: true,
            refetch_delay_ticks: default_refetch_delay(),
        }
    }
}
