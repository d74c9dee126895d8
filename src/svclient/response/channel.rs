use serde::Deserialize;

use crate::svclient::types::ChannelID;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteChannel {
    #[serde(rename = "_id")]
    pub id: ChannelID,
    pub user_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Searches report the count as `subscribersCount`
    #[serde(default, alias = "subscribersCount")]
    pub subscribers: u64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subscribed {
    #[serde(default)]
    pub subscribeds: Vec<RemoteChannel>,
}
