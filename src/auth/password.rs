use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};

use crate::config::PasswordConfig;

/// Argon2id digests with configured cost.
#[derive(Clone)]
pub struct Passwords {
    argon2: Argon2<'static>,
}

impl Passwords {
    pub fn new(config: &PasswordConfig) -> Result<Self, argon2::Error> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// PHC-format digest with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(self.argon2.hash_password(password.as_bytes(), &salt)?.to_string())
    }

    /// A malformed digest never verifies.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password digest is malformed: {}", e);
                return false;
            }
        };
        self.argon2.verify_password(password.as_bytes(), &parsed).is_ok()
    }
}
