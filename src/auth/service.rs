use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{
    AuthError, AuthResponse, JwtService, LoginRequest, MessageResponse, RegisterRequest,
    UserRole, UserSession,
};
use crate::errors::is_unique_violation;
use crate::models::{User, UserProfile};
use crate::services::goal_service::insert_goal;

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_service: JwtService) -> Self {
        Self { jwt_service, db }
    }

    /// Register a new user together with any goals supplied at sign-up.
    #[tracing::instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        request.validate()?;
        let password_hash = hash_password(&request.password)?;
        let email = request.email.trim().to_lowercase();

        let mut tx = self.db.begin().await?;

        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(&request.username)
        .bind(&email)
        .fetch_one(&mut *tx)
        .await?;
        if taken {
            return Err(AuthError::AccountExists);
        }

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash, role, level, birth_date, height_cm, weight_kg, gender)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(&request.username)
        .bind(&email)
        .bind(&password_hash)
        .bind(UserRole::Member)
        .bind(request.level)
        .bind(request.birth_date)
        .bind(request.height_cm)
        .bind(request.weight_kg)
        .bind(&request.gender)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AuthError::AccountExists
            } else {
                AuthError::Database(err)
            }
        })?;

        for goal in &request.goals {
            insert_goal(&mut *tx, &user, goal).await?;
        }

        tx.commit().await?;
        info!(user_id = %user.id, goals = request.goals.len(), "user registered");

        self.issue_token(&user)
    }

    /// Login with username or email
    #[tracing::instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let identifier = request.identifier.trim();

        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = $1 OR email = lower($1)",
        )
        .bind(identifier)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            warn!(user_id = %user.id, "failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, role = user.role.as_str(), "user logged in");
        self.issue_token(&user)
    }

    pub async fn profile(&self, session: &UserSession) -> Result<UserProfile, AuthError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(session.user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(UserProfile::from(&user))
    }

    /// Revoke the token the caller authenticated with
    #[tracing::instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub async fn logout(&self, session: &UserSession) -> Result<MessageResponse, AuthError> {
        let expires_at = chrono::DateTime::from_timestamp(session.exp as i64, 0)
            .ok_or(AuthError::InvalidToken)?;

        sqlx::query(
            "INSERT INTO token_blacklist (jti, expires_at) VALUES ($1, $2)
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(&session.jti)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        // Expired entries can never match again
        sqlx::query("DELETE FROM token_blacklist WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(&self.db)
            .await?;

        Ok(MessageResponse {
            message: "Successfully logged out".to_string(),
        })
    }

    pub async fn is_token_blacklisted(&self, jti: &str) -> Result<bool, AuthError> {
        let revoked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM token_blacklist WHERE jti = $1 AND expires_at > NOW())",
        )
        .bind(jti)
        .fetch_one(&self.db)
        .await?;

        Ok(revoked)
    }

    /// Validate user session from token
    pub async fn validate_session(&self, token: &str) -> Result<UserSession, AuthError> {
        let session = self.jwt_service.extract_user_session(token)?;

        if self.is_token_blacklisted(&session.jti).await? {
            return Err(AuthError::InvalidToken);
        }

        Ok(session)
    }

    fn issue_token(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let access_token = self
            .jwt_service
            .create_access_token(user.id, &user.username, user.role)?;

        Ok(AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
            user: UserProfile::from(user),
        })
    }
}
