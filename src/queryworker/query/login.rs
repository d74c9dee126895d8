use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct LoginParams {
    pub user_id: String,
    pub password: String,
}

// Queries are logged at debug level, so the password must not show up there
impl fmt::Debug for LoginParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginParams")
            .field("user_id", &self.user_id)
            .field("password", &"********")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_hidden() {
        let params = LoginParams {
            user_id: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let shown = format!("{params:?}");
        assert!(shown.contains("alice"));
        assert!(!shown.contains("hunter2"));
    }
}
