use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Cook,
    Admin,
}

impl UserRole {
    /// Normalize a client-supplied role string. Anything unrecognized (or
    /// absent) falls back to Student.
    pub fn normalize(input: Option<&str>) -> UserRole {
        input
            .and_then(|s| s.parse().ok())
            .unwrap_or(UserRole::Student)
    }

    pub fn is_staff(self) -> bool {
        matches!(self, UserRole::Cook | UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Student => "student",
            UserRole::Cook => "cook",
            UserRole::Admin => "admin",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for UserRole {
    type Err = anyhow::Error;

    // Accepts the canonical names plus the localized aliases that older
    // account data was registered with.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" | "ученик" => Ok(UserRole::Student),
            "cook" | "поваренок" => Ok(UserRole::Cook),
            "admin" | "администратор" => Ok(UserRole::Admin),
            _ => Err(anyhow::anyhow!("Unknown role: {s}")),
        }
    }
}

/// DB row struct — role is stored as TEXT and parsed at the edges.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub allergies: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Request/Response DTOs
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub allergies: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub allergies: String,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role.parse().unwrap_or(UserRole::Student),
            allergies: u.allergies,
        }
    }
}

/// Body for PUT /user/me — students keep their allergy notes current.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub allergies: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_roles_parse() {
        assert_eq!("student".parse::<UserRole>().unwrap(), UserRole::Student);
        assert_eq!("cook".parse::<UserRole>().unwrap(), UserRole::Cook);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
    }

    #[test]
    fn localized_aliases_normalize_to_canonical_variants() {
        assert_eq!("ученик".parse::<UserRole>().unwrap(), UserRole::Student);
        assert_eq!("поваренок".parse::<UserRole>().unwrap(), UserRole::Cook);
        assert_eq!(
            "администратор".parse::<UserRole>().unwrap(),
            UserRole::Admin
        );
    }

    #[test]
    fn unknown_or_missing_role_defaults_to_student() {
        assert_eq!(UserRole::normalize(Some("chef")), UserRole::Student);
        assert_eq!(UserRole::normalize(None), UserRole::Student);
        assert_eq!(UserRole::normalize(Some("admin")), UserRole::Admin);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for role in [UserRole::Student, UserRole::Cook, UserRole::Admin] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn staff_check_covers_cook_and_admin_only() {
        assert!(UserRole::Cook.is_staff());
        assert!(UserRole::Admin.is_staff());
        assert!(!UserRole::Student.is_staff());
    }
}
