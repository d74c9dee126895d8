use std::fmt::Display;

use derive_deref::Deref;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Clone, Deref)]
pub struct VideoID(pub String);

#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Clone, Deref)]
pub struct PlaylistID(pub String);

#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Clone, Deref)]
pub struct ChannelID(pub String);

#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Clone, Deref)]
pub struct UserID(pub String);

impl From<&str> for VideoID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for PlaylistID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ChannelID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for VideoID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Display for PlaylistID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Display for ChannelID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listings report visibility as a boolean (`true` meaning public), while playlist creation uses
/// the strings `"public"` and `"private"`. Both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawVisibility {
    Flag(bool),
    Name(String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawVisibility", rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

impl From<RawVisibility> for Visibility {
    fn from(raw: RawVisibility) -> Self {
        match raw {
            RawVisibility::Flag(true) => Visibility::Public,
            RawVisibility::Flag(false) => Visibility::Private,
            RawVisibility::Name(name) if name.eq_ignore_ascii_case("public") => Visibility::Public,
            RawVisibility::Name(_) => Visibility::Private,
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Private => f.write_str("private"),
        }
    }
}
