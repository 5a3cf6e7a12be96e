use serde::{Deserialize, Serialize};

/// The verified caller of an owner-scoped operation. Produced by the authenticator and
/// passed explicitly to every service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
}

impl Principal {
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}
