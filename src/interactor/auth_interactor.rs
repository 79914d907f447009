use crate::auth::password::{hash_password, verify_password};
use crate::auth::{totp, Claims, JwtKeys, UserStore};
use crate::entity::{AppError, UserRecord};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid");
}

/// What a new user needs to enrol an authenticator app
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: UserRecord,
    pub otpauth_url: String,
}

#[async_trait]
pub trait AuthInteractor: Send + Sync {
    async fn register(&self, email: &str, password: &str) -> Result<Registration>;
    /// Returns a signed session token
    async fn login(&self, email: &str, password: &str, totp_code: &str) -> Result<String>;
    fn authenticate(&self, token: &str) -> Result<Claims>;
    fn token_ttl_secs(&self) -> i64;
}

pub struct AuthInteractorImpl {
    users: UserStore,
    jwt: JwtKeys,
    totp_issuer: String,
}

impl AuthInteractorImpl {
    pub fn new(users: UserStore, jwt: JwtKeys, totp_issuer: impl Into<String>) -> Self {
        Self {
            users,
            jwt,
            totp_issuer: totp_issuer.into(),
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AuthInteractor for AuthInteractorImpl {
    async fn register(&self, email: &str, password: &str) -> Result<Registration> {
        let email = normalize_email(email);
        if !EMAIL_RE.is_match(&email) {
            return Err(AppError::InvalidInput("invalid email address".to_string()).into());
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            ))
            .into());
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::UserExists.into());
        }

        let user = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            password_hash: hash_password(password)?,
            totp_secret: totp::generate_secret(),
            created_at: Utc::now(),
        };
        self.users.insert(&user).await?;

        info!("Registered user {}", user.id);

        let otpauth_url = totp::otpauth_url(&self.totp_issuer, &user.email, &user.totp_secret);
        Ok(Registration { user, otpauth_url })
    }

    async fn login(&self, email: &str, password: &str, totp_code: &str) -> Result<String> {
        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(AppError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.password_hash)? {
            warn!("Wrong password for user {}", user.id);
            return Err(AppError::InvalidCredentials.into());
        }

        let now = Utc::now().timestamp().max(0) as u64;
        if !totp::verify_at(&user.totp_secret, totp_code, now)? {
            warn!("Wrong one-time code for user {}", user.id);
            return Err(AppError::InvalidCredentials.into());
        }

        self.jwt.issue(&user)
    }

    fn authenticate(&self, token: &str) -> Result<Claims> {
        self.jwt.verify(token)
    }

    fn token_ttl_secs(&self) -> i64 {
        self.jwt.ttl_secs()
    }
}
