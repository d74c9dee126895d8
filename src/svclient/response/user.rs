use serde::Deserialize;

use crate::svclient::types::UserID;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    #[serde(rename = "_id")]
    pub id: UserID,
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub subscribers_count: u64,
    #[serde(default)]
    pub subscribed_count: u64,
}

/// Owner summary embedded in videos
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub user_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}
