//! Authentication service: sign-in, session lookup and sign-out
//!
//! A session is a JWT carrying the session id plus a server-side session row.
//! Signing out deletes the row, which invalidates the token before it expires.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::store::{AccountStore, SessionRow, UserAccount};
use shared::validation::{validate_email, validate_password};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    jwt_secret: String,
    session_expiry: i64,
    hash_cost: u32,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub sid: String, // Session ID
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// A signed-in session
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Session {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Response after successful sign-in
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub session: Session,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(accounts: Arc<dyn AccountStore>, config: &Config) -> Self {
        Self::with_secret(accounts, &config.jwt.secret, config.jwt.session_expiry)
            .with_hash_cost(config.jwt.hash_cost)
    }

    pub fn with_secret(accounts: Arc<dyn AccountStore>, jwt_secret: &str, session_expiry: i64) -> Self {
        Self {
            accounts,
            jwt_secret: jwt_secret.to_string(),
            session_expiry,
            hash_cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt cost (lower costs only make sense in tests)
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Create a login account
    pub async fn create_user(&self, email: &str, password: &str) -> AppResult<UserAccount> {
        let email = email.trim().to_lowercase();
        validate_email(&email).map_err(|m| AppError::validation("email", m))?;
        validate_password(password).map_err(|m| AppError::validation("password", m))?;

        let password_hash = hash(password, self.hash_cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = UserAccount {
            id: Uuid::new_v4(),
            email,
            password_hash,
            is_active: true,
            created_at: Utc::now(),
        };
        self.accounts.insert_user(&user).await?;

        Ok(user)
    }

    /// Create the first account when none exists yet
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> AppResult<bool> {
        if self.accounts.count_users().await? > 0 {
            return Ok(false);
        }
        let user = self.create_user(email, password).await?;
        tracing::info!("Bootstrapped administrator account {}", user.email);
        Ok(true)
    }

    /// Authenticate with email and password and open a session
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<SignInResponse> {
        let user = self
            .accounts
            .find_user_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Check if user is active
        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        self.check_password(&user, password)?;

        let now = Utc::now();
        let row = SessionRow {
            id: Uuid::new_v4(),
            user_id: user.id,
            created_at: now,
            expires_at: now + Duration::seconds(self.session_expiry),
        };
        self.accounts.insert_session(&row).await?;

        let session = Session {
            session_id: row.id,
            user_id: user.id,
            email: user.email,
            expires_at: row.expires_at,
        };
        let access_token = encode_session_token(&session, now, &self.jwt_secret)?;

        tracing::info!("User {} signed in", session.email);
        Ok(SignInResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.session_expiry,
            session,
        })
    }

    /// Resolve a bearer token into its live session
    pub async fn authenticate(&self, token: &str) -> AppResult<Session> {
        let claims = decode_session_token(token, &self.jwt_secret)?;
        let session_id = Uuid::parse_str(&claims.sid).map_err(|_| AppError::InvalidToken)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        let row = self
            .accounts
            .find_session(session_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Session has ended".to_string()))?;

        if row.user_id != user_id {
            return Err(AppError::InvalidToken);
        }
        if row.expires_at <= Utc::now() {
            return Err(AppError::TokenExpired);
        }

        Ok(Session {
            session_id,
            user_id,
            email: claims.email,
            expires_at: row.expires_at,
        })
    }

    /// Current session for a token, or `None` when it is not usable
    pub async fn current_session(&self, token: &str) -> AppResult<Option<Session>> {
        match self.authenticate(token).await {
            Ok(session) => Ok(Some(session)),
            Err(AppError::InvalidToken | AppError::TokenExpired | AppError::Unauthorized(_)) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// End a session
    pub async fn sign_out(&self, session_id: Uuid) -> AppResult<()> {
        self.accounts.delete_session(session_id).await?;
        tracing::info!("Session {} signed out", session_id);
        Ok(())
    }

    /// Re-check a signed-in user's password before a destructive action
    pub async fn verify_password(&self, user_id: Uuid, password: &str) -> AppResult<()> {
        let user = self
            .accounts
            .find_user(user_id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        self.check_password(&user, password)
    }

    fn check_password(&self, user: &UserAccount, password: &str) -> AppResult<()> {
        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }
        Ok(())
    }
}

/// Sign a session token
pub fn encode_session_token(session: &Session, issued_at: DateTime<Utc>, secret: &str) -> AppResult<String> {
    let claims = Claims {
        sub: session.user_id.to_string(),
        sid: session.session_id.to_string(),
        email: session.email.clone(),
        exp: session.expires_at.timestamp(),
        iat: issued_at.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify a session token's signature and expiry
pub fn decode_session_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })
}
