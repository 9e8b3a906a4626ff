use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        auth::Claims,
        user::{LoginResponse, RegisterRequest, User, UserProfile, UserRole},
    },
};

pub struct AuthService;

impl AuthService {
    /// Self-registration. Client-supplied roles are normalized at this
    /// boundary; unknown values land as Student.
    pub async fn register(pool: &PgPool, req: &RegisterRequest) -> Result<UserProfile, ApiError> {
        let username = req
            .username
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::Validation("field \"username\" is required".into()))?;
        let password = req
            .password
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::Validation("field \"password\" is required".into()))?;

        let role = UserRole::normalize(req.role.as_deref());
        let allergies = req.allergies.as_deref().unwrap_or("");

        let password_hash =
            bcrypt::hash(password, 12).map_err(|e| ApiError::Internal(e.to_string()))?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, role, allergies)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (username) DO NOTHING
             RETURNING id, username, password_hash, role, allergies, created_at, updated_at",
        )
        .bind(username)
        .bind(&password_hash)
        .bind(role.to_string())
        .bind(allergies)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::Conflict("username already taken".into()))?;

        Ok(user.into())
    }

    pub async fn login(
        pool: &PgPool,
        username: &str,
        password: &str,
        jwt_secret: &str,
        access_ttl: u64,
    ) -> Result<LoginResponse, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, allergies, created_at, updated_at
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid credentials".into()))?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|_| ApiError::Unauthorized("invalid credentials".into()))?;
        if !valid {
            return Err(ApiError::Unauthorized("invalid credentials".into()));
        }

        let access_token = Self::generate_access_token(&user, jwt_secret, access_ttl)?;
        Ok(LoginResponse {
            access_token,
            user: user.into(),
        })
    }

    pub fn generate_access_token(
        user: &User,
        jwt_secret: &str,
        access_ttl: u64,
    ) -> Result<String, ApiError> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.parse().unwrap_or(UserRole::Student),
            exp: now + access_ttl as usize,
            iat: now,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(jwt_secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(e.to_string()))
    }

    pub async fn profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, allergies, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
        Ok(user.into())
    }

    pub async fn update_allergies(
        pool: &PgPool,
        user_id: Uuid,
        allergies: &str,
    ) -> Result<UserProfile, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET allergies = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING id, username, password_hash, role, allergies, created_at, updated_at",
        )
        .bind(user_id)
        .bind(allergies)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
        Ok(user.into())
    }

    pub async fn find_user(pool: &PgPool, user_id: Uuid) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, allergies, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))
    }
}
