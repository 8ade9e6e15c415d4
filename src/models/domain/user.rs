use serde::{Deserialize, Serialize};

/// Role asserted by the identity provider. Admins bypass enrollment checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// The authenticated identity a request acts for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub name: String,
    pub role: UserRole,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
