use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::error::ApiError;
use crate::models::auth::{AuthenticatedUser, Claims};

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or((StatusCode::UNAUTHORIZED, "Invalid Authorization header format"))?;

        let secret = parts
            .extensions
            .get::<JwtSecret>()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "JWT secret not configured"))?;

        decode_access_token(token, &secret.0)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))
    }
}

/// Extension type to carry the JWT secret through request extensions.
#[derive(Clone)]
pub struct JwtSecret(pub String);

pub fn decode_access_token(token: &str, secret: &str) -> Result<AuthenticatedUser, anyhow::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation)?;
    let claims = data.claims;

    Ok(AuthenticatedUser {
        user_id: claims.sub.parse()?,
        username: claims.username,
        role: claims.role,
    })
}

/// Cook and admin accounts count as kitchen staff.
pub fn require_staff(user: &AuthenticatedUser) -> Result<(), ApiError> {
    if user.role.is_staff() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("staff access required".into()))
    }
}

pub fn require_admin(user: &AuthenticatedUser) -> Result<(), ApiError> {
    match user.role {
        crate::models::user::UserRole::Admin => Ok(()),
        _ => Err(ApiError::Forbidden("admin access required".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{User, UserRole};
    use crate::services::auth::AuthService;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: "petya".to_string(),
            password_hash: String::new(),
            role: role.to_string(),
            allergies: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn access_token_round_trips() {
        let user = sample_user("cook");
        let token = AuthService::generate_access_token(&user, "test-secret", 3600).unwrap();

        let decoded = decode_access_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.user_id, user.id);
        assert_eq!(decoded.username, "petya");
        assert_eq!(decoded.role, UserRole::Cook);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let user = sample_user("student");
        let token = AuthService::generate_access_token(&user, "test-secret", 3600).unwrap();
        assert!(decode_access_token(&token, "other-secret").is_err());
    }

    #[test]
    fn role_guards_enforce_the_hierarchy() {
        let student = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            username: "vasya".into(),
            role: UserRole::Student,
        };
        let cook = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            username: "povar".into(),
            role: UserRole::Cook,
        };
        assert!(require_staff(&student).is_err());
        assert!(require_staff(&cook).is_ok());
        assert!(require_admin(&cook).is_err());
    }
}
