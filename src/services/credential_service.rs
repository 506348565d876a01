use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinError;
use uuid::Uuid;

use crate::auth::Passwords;
use crate::config::PasswordConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, UserSummary};
use crate::database::store::UserStore;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Unknown email and wrong password are deliberately the same error.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    Conflict,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Background task failed: {0}")]
    TaskJoin(#[from] JoinError),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for AuthError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(_) => AuthError::Conflict,
            other => AuthError::Database(other),
        }
    }
}

/// Registers users and checks their passwords.
///
/// Digests are computed on the blocking pool; the async workers never run
/// Argon2 directly.
pub struct CredentialStore {
    users: Arc<dyn UserStore>,
    passwords: Passwords,
    // Verified against when the email is unknown, so both failure paths cost
    // one Argon2 run.
    dummy_digest: String,
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserStore>, config: &PasswordConfig) -> Result<Self, AuthError> {
        let passwords = Passwords::new(config).map_err(|e| AuthError::Hashing(e.to_string()))?;
        let dummy_digest = passwords
            .hash(&Uuid::new_v4().to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(Self {
            users,
            passwords,
            dummy_digest,
        })
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<UserSummary, AuthError> {
        let email = email.trim();
        let name = name.trim();
        require(&[("email", email), ("password", password), ("name", name)])?;

        let passwords = self.passwords.clone();
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await?
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let user = NewUser {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        };
        self.users.insert_user(&user).await?;

        tracing::info!("Registered user {}", user.id);
        Ok(UserSummary::from(&user))
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserSummary, AuthError> {
        let email = email.trim();
        require(&[("email", email), ("password", password)])?;

        let user = self.users.find_user_by_email(email).await?;
        let digest = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_digest.clone(),
        };

        let passwords = self.passwords.clone();
        let password = password.to_string();
        let valid = tokio::task::spawn_blocking(move || passwords.verify(&password, &digest)).await?;

        match user {
            Some(user) if valid => Ok(UserSummary::from(&user)),
            _ => {
                tracing::debug!("Rejected login attempt");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

fn require(fields: &[(&str, &str)]) -> Result<(), AuthError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthError::MissingFields(missing))
    }
}
