use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthError;
use crate::models::{validate_username, CreateGoalRequest, TrainingLevel, UserProfile};

/// User roles for role-based access control
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Member,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Member => "member",
            UserRole::Admin => "admin",
        }
    }

    /// Check if this role has permission to act as `target_role`
    pub fn can_access(&self, target_role: &UserRole) -> bool {
        match self {
            UserRole::Admin => true,
            UserRole::Member => matches!(target_role, UserRole::Member),
        }
    }
}

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // Subject (user ID)
    pub username: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,      // JWT ID (for revocation)
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub level: Option<TrainingLevel>,
    pub birth_date: Option<NaiveDate>,
    #[validate(range(min = 50, max = 280))]
    pub height_cm: Option<i32>,
    #[validate(range(min = 20.0, max = 500.0))]
    pub weight_kg: Option<f64>,
    #[validate(length(max = 20))]
    pub gender: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub goals: Vec<CreateGoalRequest>,
}

/// Login accepts either the username or the email as identifier.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: usize,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Authenticated caller, placed in request extensions by the JWT middleware.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub jti: String,
    pub exp: usize,
}

impl UserSession {
    pub fn from_claims(claims: &Claims) -> Result<Self, uuid::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub)?,
            username: claims.username.clone(),
            role: claims.role,
            jti: claims.jti.clone(),
            exp: claims.exp,
        })
    }

    pub fn require_role(&self, role: UserRole) -> Result<(), AuthError> {
        if self.role.can_access(&role) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }
}
