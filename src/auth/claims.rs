use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{Caller, UserRole};

/// Token payload issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn new(user_id: &str, name: &str, role: UserRole, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user_id.to_string(),
            name: name.to_string(),
            role,
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }

    pub fn caller(&self) -> Caller {
        Caller::new(self.sub.clone(), self.name.clone(), self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("user-1", "Ada Lovelace", UserRole::User, 24);

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.name, "Ada Lovelace");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_claims_to_caller() {
        let caller = Claims::new("admin-1", "Root", UserRole::Admin, 1).caller();

        assert_eq!(caller.user_id, "admin-1");
        assert!(caller.is_admin());
    }

    #[test]
    fn test_missing_role_defaults_to_user() {
        let claims: Claims =
            serde_json::from_str(r#"{"sub":"u","name":"U","exp":10,"iat":1}"#).unwrap();
        assert_eq!(claims.role, UserRole::User);
    }
}
