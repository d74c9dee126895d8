use crate::session::UserSession;

/// Components whose behaviour depends on who is signed in. The session is pushed into them every
/// time it changes.
pub trait HandleSession {
    fn set_session(&mut self, session: Option<UserSession>);
}
