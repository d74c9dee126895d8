use crate::svclient::{response::user::RemoteUser, types::UserID};

/// The signed in user. Components that need it get a copy when they are created and every time it
/// changes, so there is no global "current user".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub id: UserID,
    pub user_name: String,
    pub email: String,
    pub full_name: Option<String>,
    pub subscribers_count: u64,
    pub subscribed_count: u64,
}

impl From<RemoteUser> for UserSession {
    fn from(user: RemoteUser) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            email: user.email,
            full_name: user.full_name,
            subscribers_count: user.subscribers_count,
            subscribed_count: user.subscribed_count,
        }
    }
}

impl UserSession {
    pub fn describe(&self) -> String {
        match &self.full_name {
            Some(name) => format!(
                "{} (@{}, {}) {} subscribers, {} subscribed",
                name, self.user_name, self.email, self.subscribers_count, self.subscribed_count
            ),
            None => format!(
                "@{} ({}) {} subscribers, {} subscribed",
                self.user_name, self.email, self.subscribers_count, self.subscribed_count
            ),
        }
    }
}
