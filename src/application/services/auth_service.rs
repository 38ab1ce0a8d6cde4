//! Account registration, login and bearer token handling.

use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::entities::NewUser;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Default token lifetime: one day.
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 86_400;

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_TTL_SECONDS: u64 = 31_536_000;

/// JWT payload. `sub` is the account email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Service for authenticating API requests via HS256 bearer tokens.
///
/// Passwords are stored as Argon2id PHC strings. Hashing and verification run
/// on the blocking pool.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: u64,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `users` - user repository
    /// - `secret` - HMAC key shared by token issuing and verification
    /// - `ttl_seconds` - lifetime of issued tokens
    pub fn new(users: Arc<dyn UserRepository>, secret: &str, ttl_seconds: u64) -> Self {
        Self {
            users,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    /// Registers an account and returns a token for it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::internal("Password hashing failed", json!({ "reason": e.to_string() })))??;

        let user = self
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                name: name.to_string(),
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        self.issue_token(&user.email)
    }

    /// Checks credentials and returns a fresh token.
    ///
    /// Unknown email and wrong password give the same error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] on bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(Self::invalid_credentials());
        };

        let password = password.to_string();
        let stored = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| AppError::internal("Password check failed", json!({ "reason": e.to_string() })))?;

        if !matches {
            tracing::debug!(user_id = user.id, "Login rejected");
            return Err(Self::invalid_credentials());
        }

        self.issue_token(&user.email)
    }

    /// Signs a token for `email` valid for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the expiry does not fit in a timestamp.
    pub fn issue_token(&self, email: &str) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let exp = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                AppError::internal(
                    "Failed to issue token",
                    json!({ "reason": "token lifetime out of range", "ttl_seconds": self.ttl_seconds }),
                )
            })?;

        let claims = Claims {
            sub: email.to_string(),
            iat: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AppError::internal("Failed to issue token", json!({ "reason": e.to_string() }))
        })
    }

    /// Validates signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for malformed, forged or expired tokens.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                AppError::unauthorized("Unauthorized", json!({ "reason": e.to_string() }))
            })
    }

    fn invalid_credentials() -> AppError {
        AppError::unauthorized("Invalid credentials", json!({}))
    }
}

/// Hashes a password into an Argon2id PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal("Password hashing failed", json!({ "reason": e.to_string() })))
}

/// Checks a password against a stored PHC string. Unparseable hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;
    use crate::domain::repositories::MockUserRepository;

    const SECRET: &str = "test-secret-that-is-at-least-32-chars";

    fn test_user(email: &str, password: &str) -> User {
        User {
            id: 1,
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            name: "Test".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("hunter22").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-phc-string"));
    }

    #[test]
    fn test_token_roundtrip() {
        let service = AuthService::new(Arc::new(MockUserRepository::new()), SECRET, 60);

        let token = service.issue_token("a@example.com").unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "a@example.com");
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn test_oversized_ttl_is_an_error() {
        for ttl in [u64::MAX, i64::MAX as u64] {
            let service = AuthService::new(Arc::new(MockUserRepository::new()), SECRET, ttl);

            assert!(matches!(
                service.issue_token("a@example.com"),
                Err(AppError::Internal { .. })
            ));
        }
    }

    #[test]
    fn test_max_ttl_issues_valid_token() {
        let service = AuthService::new(
            Arc::new(MockUserRepository::new()),
            SECRET,
            MAX_TOKEN_TTL_SECONDS,
        );

        let token = service.issue_token("a@example.com").unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, MAX_TOKEN_TTL_SECONDS as i64);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let issuer = AuthService::new(
            Arc::new(MockUserRepository::new()),
            "another-secret-that-is-at-least-32-chars",
            60,
        );
        let verifier = AuthService::new(Arc::new(MockUserRepository::new()), SECRET, 60);

        let token = issuer.issue_token("a@example.com").unwrap();

        assert!(matches!(
            verifier.verify_token(&token),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = AuthService::new(Arc::new(MockUserRepository::new()), SECRET, 60);
        let claims = Claims {
            sub: "a@example.com".to_string(),
            iat: 1_000,
            exp: 1_060,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service.verify_token(&token).is_err());
        assert!(service.verify_token("garbage").is_err());
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_create()
            .withf(|new_user| {
                new_user.email == "a@example.com"
                    && new_user.password_hash != "secret123"
                    && verify_password("secret123", &new_user.password_hash)
            })
            .times(1)
            .returning(|new_user| {
                Ok(User {
                    id: 7,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    name: new_user.name,
                    created_at: Utc::now(),
                })
            });

        let service = AuthService::new(Arc::new(mock_repo), SECRET, 60);
        let token = service
            .register("a@example.com", "secret123", "Alice")
            .await
            .unwrap();

        assert_eq!(service.verify_token(&token).unwrap().sub, "a@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::conflict("User already exists", json!({}))));

        let service = AuthService::new(Arc::new(mock_repo), SECRET, 60);
        let result = service.register("a@example.com", "secret123", "Alice").await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut mock_repo = MockUserRepository::new();
        let user = test_user("a@example.com", "secret123");

        mock_repo
            .expect_find_by_email()
            .withf(|email| email == "a@example.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(mock_repo), SECRET, 60);
        let token = service.login("a@example.com", "secret123").await.unwrap();

        assert!(service.verify_token(&token).is_ok());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut mock_repo = MockUserRepository::new();
        let user = test_user("a@example.com", "secret123");

        mock_repo
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(mock_repo), SECRET, 60);
        let result = service.login("a@example.com", "wrong").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_email().returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(mock_repo), SECRET, 60);
        let result = service.login("nobody@example.com", "secret123").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }
}
