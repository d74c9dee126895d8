use crate::svclient::types::ChannelID;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleSubscribeParams {
    pub channel: ChannelID,
    /// Identifies the optimistic update this request belongs to
    pub generation: u64,
}
