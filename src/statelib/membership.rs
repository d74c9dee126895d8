use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::svclient::{
    response::playlist::RemotePlaylist,
    types::{PlaylistID, VideoID, Visibility},
};

/// Whether a single video is part of a single playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum MembershipState {
    NotMember,
    Member,
}

impl From<bool> for MembershipState {
    fn from(is_member: bool) -> Self {
        if is_member {
            MembershipState::Member
        } else {
            MembershipState::NotMember
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Intent {
    Add,
    Remove,
}

impl Intent {
    pub fn reversed(self) -> Self {
        match self {
            Intent::Add => Intent::Remove,
            Intent::Remove => Intent::Add,
        }
    }

    /// State the pair ends up in once the request is accepted
    pub fn target(self) -> MembershipState {
        match self {
            Intent::Add => MembershipState::Member,
            Intent::Remove => MembershipState::NotMember,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipKey {
    pub playlist: PlaylistID,
    pub video: VideoID,
}

impl MembershipKey {
    pub fn new(playlist: PlaylistID, video: VideoID) -> Self {
        Self { playlist, video }
    }
}

/// Where a toggle came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleOrigin {
    User,
    Undo,
    /// First video of a playlist that was just created
    Create,
}

impl ToggleOrigin {
    pub fn offers_undo(self) -> bool {
        matches!(self, ToggleOrigin::User)
    }
}

/// View of one playlist from the perspective of one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistDescriptor {
    pub id: PlaylistID,
    pub title: String,
    pub visibility: Visibility,
    pub is_video_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: PlaylistID,
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    pub videos: Vec<VideoID>,
}

impl Playlist {
    pub fn contains(&self, video: &VideoID) -> bool {
        self.videos.iter().any(|v| v == video)
    }

    pub fn describe(&self, video: &VideoID) -> PlaylistDescriptor {
        PlaylistDescriptor {
            id: self.id.clone(),
            title: self.title.clone(),
            visibility: self.visibility,
            is_video_available: self.contains(video),
        }
    }

    fn set_membership(&mut self, video: &VideoID, state: MembershipState) {
        match state {
            MembershipState::Member => {
                if !self.contains(video) {
                    self.videos.push(video.clone());
                }
            }
            MembershipState::NotMember => self.videos.retain(|v| v != video),
        }
    }
}

impl From<RemotePlaylist> for Playlist {
    fn from(remote: RemotePlaylist) -> Self {
        Self {
            id: remote.id,
            title: remote.title,
            description: remote.description,
            visibility: remote.visibility,
            videos: remote.videos.iter().map(|v| v.id().clone()).collect(),
        }
    }
}

/// A membership change that has been handed to the query worker but not settled yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingToggle {
    pub key: MembershipKey,
    pub title: String,
    pub intent: Intent,
    pub generation: u64,
    pub origin: ToggleOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Server accepted the change, and the flag now holds the given state
    Applied(MembershipState),
    /// Server refused the change, or it never reached the server. Nothing was changed.
    Rejected,
    /// A newer toggle for the same pair exists. The response is ignored.
    Stale,
}

/// Local copy of the user's playlists, plus the bookkeeping needed to keep concurrent toggles on
/// the same pair from overwriting each other.
///
/// Every toggle gets a generation number that is unique for its [`MembershipKey`]. Only the
/// response carrying the latest generation is allowed to change the flag.
#[derive(Debug, Default)]
pub struct PlaylistBook {
    playlists: Vec<Playlist>,
    generations: HashMap<MembershipKey, u64>,
    in_flight: HashMap<MembershipKey, usize>,
}

impl PlaylistBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn clear(&mut self) {
        self.playlists.clear();
    }

    /// Replaces the whole collection with a fresh listing from the server. Pairs that still have a
    /// request in flight keep their local state, since the listing may predate that request.
    pub fn replace_all(&mut self, remote: Vec<RemotePlaylist>) {
        let held: Vec<(MembershipKey, Option<bool>)> = self
            .in_flight
            .keys()
            .map(|key| (key.clone(), self.is_member(&key.playlist, &key.video)))
            .collect();
        self.playlists = remote.into_iter().map(Playlist::from).collect();
        for (key, local) in held {
            let Some(local) = local else {
                continue;
            };
            if let Some(playlist) = self.playlists.iter_mut().find(|p| p.id == key.playlist) {
                playlist.set_membership(&key.video, MembershipState::from(local));
            }
        }
    }

    pub fn push(&mut self, playlist: Playlist) {
        self.playlists.push(playlist);
    }

    pub fn descriptors(&self, video: &VideoID) -> Vec<PlaylistDescriptor> {
        self.playlists.iter().map(|p| p.describe(video)).collect()
    }

    pub fn descriptor(&self, playlist: &PlaylistID, video: &VideoID) -> Option<PlaylistDescriptor> {
        self.playlists
            .iter()
            .find(|p| &p.id == playlist)
            .map(|p| p.describe(video))
    }

    pub fn is_member(&self, playlist: &PlaylistID, video: &VideoID) -> Option<bool> {
        self.playlists
            .iter()
            .find(|p| &p.id == playlist)
            .map(|p| p.contains(video))
    }

    pub fn is_in_flight(&self, key: &MembershipKey) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Starts a toggle from what the descriptor says: a member is removed, anything else is added
    pub fn begin(
        &mut self,
        descriptor: &PlaylistDescriptor,
        video: &VideoID,
        origin: ToggleOrigin,
    ) -> PendingToggle {
        let intent = if descriptor.is_video_available {
            Intent::Remove
        } else {
            Intent::Add
        };
        self.begin_with(
            MembershipKey::new(descriptor.id.clone(), video.clone()),
            descriptor.title.clone(),
            intent,
            origin,
        )
    }

    /// Starts a toggle with an explicit intent
    pub fn begin_with(
        &mut self,
        key: MembershipKey,
        title: String,
        intent: Intent,
        origin: ToggleOrigin,
    ) -> PendingToggle {
        let generation = self.generations.entry(key.clone()).or_insert(0);
        *generation += 1;
        let generation = *generation;
        *self.in_flight.entry(key.clone()).or_insert(0) += 1;
        PendingToggle {
            key,
            title,
            intent,
            generation,
            origin,
        }
    }

    pub fn settle(&mut self, pending: &PendingToggle, accepted: bool) -> Settlement {
        let latest = self.generations.get(&pending.key) == Some(&pending.generation);
        self.finish(&pending.key);
        if !latest {
            return Settlement::Stale;
        }
        if !accepted {
            return Settlement::Rejected;
        }
        let target = pending.intent.target();
        if let Some(playlist) = self
            .playlists
            .iter_mut()
            .find(|p| p.id == pending.key.playlist)
        {
            playlist.set_membership(&pending.key.video, target);
        }
        Settlement::Applied(target)
    }

    /// Counts one answer for the pair. With nothing left in flight no response can carry an older
    /// generation, so the counter is dropped.
    fn finish(&mut self, key: &MembershipKey) {
        let Some(count) = self.in_flight.get_mut(key) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.in_flight.remove(key);
            self.generations.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svclient::response::playlist::PlaylistVideoRef;
    use pretty_assertions::assert_eq;

    fn remote(id: &str, videos: &[&str]) -> RemotePlaylist {
        RemotePlaylist {
            id: PlaylistID::from(id),
            title: format!("Playlist {id}"),
            description: String::new(),
            visibility: Visibility::Public,
            videos: videos
                .iter()
                .map(|v| PlaylistVideoRef::Id(VideoID::from(*v)))
                .collect(),
            updated_at: None,
        }
    }

    fn book(playlists: Vec<RemotePlaylist>) -> PlaylistBook {
        let mut book = PlaylistBook::new();
        book.replace_all(playlists);
        book
    }

    #[test]
    fn descriptors_reflect_listing() {
        let book = book(vec![remote("p1", &["v1"]), remote("p2", &[])]);
        let flags: Vec<bool> = book
            .descriptors(&VideoID::from("v1"))
            .iter()
            .map(|d| d.is_video_available)
            .collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn intent_follows_flag() {
        let mut book = book(vec![remote("p1", &["v1"]), remote("p2", &[])]);
        let v1 = VideoID::from("v1");
        let member = book.descriptor(&PlaylistID::from("p1"), &v1).unwrap();
        let other = book.descriptor(&PlaylistID::from("p2"), &v1).unwrap();
        assert_eq!(book.begin(&member, &v1, ToggleOrigin::User).intent, Intent::Remove);
        assert_eq!(book.begin(&other, &v1, ToggleOrigin::User).intent, Intent::Add);
    }

    #[test]
    fn accepted_toggle_flips_flag() {
        let mut book = book(vec![remote("p1", &[])]);
        let (p1, v1) = (PlaylistID::from("p1"), VideoID::from("v1"));
        let desc = book.descriptor(&p1, &v1).unwrap();
        let pending = book.begin(&desc, &v1, ToggleOrigin::User);
        assert_eq!(
            book.settle(&pending, true),
            Settlement::Applied(MembershipState::Member)
        );
        assert_eq!(book.is_member(&p1, &v1), Some(true));

        let desc = book.descriptor(&p1, &v1).unwrap();
        let pending = book.begin(&desc, &v1, ToggleOrigin::User);
        assert_eq!(
            book.settle(&pending, true),
            Settlement::Applied(MembershipState::NotMember)
        );
        assert_eq!(book.is_member(&p1, &v1), Some(false));
    }

    #[test]
    fn rejected_toggle_keeps_flag() {
        let mut book = book(vec![remote("p1", &["v1"])]);
        let (p1, v1) = (PlaylistID::from("p1"), VideoID::from("v1"));
        let desc = book.descriptor(&p1, &v1).unwrap();
        let pending = book.begin(&desc, &v1, ToggleOrigin::User);
        assert_eq!(book.settle(&pending, false), Settlement::Rejected);
        assert_eq!(book.is_member(&p1, &v1), Some(true));
        assert!(!book.is_in_flight(&pending.key));
    }

    #[test]
    fn superseded_response_is_stale() {
        let mut book = book(vec![remote("p1", &[])]);
        let (p1, v1) = (PlaylistID::from("p1"), VideoID::from("v1"));
        let key = MembershipKey::new(p1.clone(), v1.clone());
        let first = book.begin_with(key.clone(), "P".into(), Intent::Add, ToggleOrigin::User);
        let second = book.begin_with(key, "P".into(), Intent::Remove, ToggleOrigin::User);

        // The second toggle settles first; the late answer to the first must not win
        assert_eq!(
            book.settle(&second, true),
            Settlement::Applied(MembershipState::NotMember)
        );
        assert_eq!(book.settle(&first, true), Settlement::Stale);
        assert_eq!(book.is_member(&p1, &v1), Some(false));
    }

    #[test]
    fn settled_pairs_are_forgotten() {
        let mut book = book(vec![remote("p1", &[])]);
        let key = MembershipKey::new(PlaylistID::from("p1"), VideoID::from("v1"));
        let first = book.begin_with(key.clone(), "P".into(), Intent::Add, ToggleOrigin::User);
        let second = book.begin_with(key.clone(), "P".into(), Intent::Remove, ToggleOrigin::User);
        book.settle(&first, true);
        assert_eq!(book.generations.get(&key), Some(&2));
        book.settle(&second, true);
        assert!(book.generations.is_empty());
        assert!(book.in_flight.is_empty());

        let again = book.begin_with(key, "P".into(), Intent::Add, ToggleOrigin::User);
        assert_eq!(again.generation, 1);
        assert_eq!(
            book.settle(&again, true),
            Settlement::Applied(MembershipState::Member)
        );
        assert!(book.generations.is_empty());
    }

    #[test]
    fn refetch_keeps_in_flight_pairs() {
        let mut book = book(vec![remote("p1", &[]), remote("p2", &[])]);
        let v1 = VideoID::from("v1");
        let key = MembershipKey::new(PlaylistID::from("p1"), v1.clone());
        let pending = book.begin_with(key.clone(), "P".into(), Intent::Add, ToggleOrigin::User);
        let done = book.begin_with(
            MembershipKey::new(PlaylistID::from("p2"), v1.clone()),
            "Q".into(),
            Intent::Add,
            ToggleOrigin::User,
        );
        book.settle(&done, true);

        // Listing taken before either request landed
        book.replace_all(vec![remote("p1", &["v1"]), remote("p2", &[])]);
        assert_eq!(book.is_member(&PlaylistID::from("p1"), &v1), Some(false));
        assert_eq!(book.is_member(&PlaylistID::from("p2"), &v1), Some(false));

        book.settle(&pending, true);
        assert_eq!(book.is_member(&PlaylistID::from("p1"), &v1), Some(true));
    }

    #[test]
    fn order_of_videos_is_kept() {
        let mut book = book(vec![remote("p1", &["a", "b", "c"])]);
        let key = MembershipKey::new(PlaylistID::from("p1"), VideoID::from("b"));
        let pending = book.begin_with(key, "P".into(), Intent::Remove, ToggleOrigin::User);
        book.settle(&pending, true);
        let ids: Vec<&str> = book.playlists()[0]
            .videos
            .iter()
            .map(|v| v.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
