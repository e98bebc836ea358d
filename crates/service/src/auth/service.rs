use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use models::User;

use super::domain::{Caller, Claims, LoginInput, RegisterInput, TokenKind, TokenPair};
use super::errors::AuthError;
use crate::store::{EntityStore, NewUser, StoreError};

/// Token configuration
#[derive(Clone)]
pub struct AuthTokenConfig {
    pub jwt_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

/// Credential service independent of the web framework.
///
/// Owns password hashing and the access/refresh token lifecycle; the
/// store is only touched on register, login and refresh.
pub struct AuthService {
    store: Arc<dyn EntityStore>,
    cfg: AuthTokenConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn EntityStore>, cfg: AuthTokenConfig) -> Self {
        Self { store, cfg }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }

    /// Register a new user and issue a first token pair.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<TokenPair, AuthError> {
        if input.username.trim().is_empty() {
            return Err(AuthError::Validation("username required".into()));
        }
        if input.password.is_empty() {
            return Err(AuthError::Validation("password required".into()));
        }

        let password_hash = self.hash_password(&input.password)?;
        let user = self
            .store
            .create_user(NewUser { username: input.username, password_hash, groups: vec![] })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::Conflict,
                other => AuthError::Store(other.to_string()),
            })?;
        info!(user_id = user.id, username = %user.username, "user_registered");
        self.issue_pair(&user)
    }

    /// Authenticate a user and issue a fresh token pair.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<TokenPair, AuthError> {
        let user = self
            .store
            .find_user_by_username(&input.username)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?
            .ok_or(AuthError::NotFound)?;

        if !self.verify_password(&input.password, &user.password_hash) {
            debug!(username = %input.username, "password mismatch");
            return Err(AuthError::Unauthorized);
        }

        info!(user_id = user.id, username = %user.username, "user_logged_in");
        self.issue_pair(&user)
    }

    /// Exchange a refresh token for a new pair. The user is re-read so
    /// the new tokens pick up current group membership.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.decode(refresh_token, TokenKind::Refresh)?;
        let user = self
            .store
            .get_user(claims.uid)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?
            .ok_or(AuthError::InvalidToken)?;
        self.issue_pair(&user)
    }

    /// Validate an access token and reconstruct the caller from its
    /// claims.
    pub fn validate_access(&self, token: &str) -> Result<Caller, AuthError> {
        let claims = self.decode(token, TokenKind::Access)?;
        Ok(Caller { user_id: claims.uid, username: claims.sub, groups: claims.groups })
    }

    fn issue_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        let access = self.encode(user, TokenKind::Access, self.cfg.access_ttl_secs)?;
        let refresh = self.encode(user, TokenKind::Refresh, self.cfg.refresh_ttl_secs)?;
        Ok(TokenPair { refresh, access })
    }

    fn encode(&self, user: &User, kind: TokenKind, ttl_secs: i64) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.username.clone(),
            uid: user.id,
            groups: user.groups.clone(),
            kind,
            iat: now,
            exp: now + ttl_secs,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    fn decode(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &key, &validation).map_err(|_| AuthError::InvalidToken)?;
        if data.claims.kind != expected {
            return Err(AuthError::InvalidToken);
        }
        Ok(data.claims)
    }
}
