//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_CUSTOMER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Customer,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Storage representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Customer => ROLE_CUSTOMER,
        }
    }
}

impl From<&str> for UserRole {
    /// Unknown values never grant admin access.
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::Customer,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data needed to persist a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Budi Santoso")]
    pub name: String,
    #[schema(example = "budi@mail.com")]
    pub email: String,
    #[schema(example = "customer")]
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_storage_string() {
        assert_eq!(UserRole::from(UserRole::Admin.as_str()), UserRole::Admin);
        assert_eq!(UserRole::from(UserRole::Customer.as_str()), UserRole::Customer);
    }

    #[test]
    fn test_unknown_role_is_customer() {
        assert_eq!(UserRole::from("superuser"), UserRole::Customer);
        assert_eq!(UserRole::from("Admin"), UserRole::Customer);
        assert!(!UserRole::from("").is_admin());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let now = Utc::now();
        let user = User {
            id: 1,
            name: "Sang Admin".into(),
            email: "admin@mail.com".into(),
            password_hash: "secret-hash".into(),
            role: UserRole::Admin,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
