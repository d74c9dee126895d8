use crate::svclient::types::VideoID;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleLikeParams {
    pub video: VideoID,
    /// Identifies the optimistic update this request belongs to
    pub generation: u64,
}
