use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use subtle::ConstantTimeEq;

use super::AdminIdentity;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Admin password cannot be empty")]
    EmptyPassword,

    #[error("Failed to hash admin password: {0}")]
    Hash(String),
}

/// The single admin login, with the password kept only as a salted hash.
#[derive(Clone)]
pub struct AdminCredential {
    username: String,
    password_hash: String,
}

impl AdminCredential {
    /// Hash `password` with a fresh random salt.
    pub fn new(username: impl Into<String>, password: &str) -> Result<Self, CredentialError> {
        if password.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?
            .to_string();

        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Identity on a match, `None` otherwise.
    pub fn verify(&self, username: &str, password: &str) -> Option<AdminIdentity> {
        let user_matches: bool = username.as_bytes().ct_eq(self.username.as_bytes()).into();

        // Always run the hash check so a wrong username costs the same as a wrong password
        let password_matches = match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!(error = %e, "Stored admin password hash is unreadable");
                false
            }
        };

        (user_matches && password_matches).then(|| AdminIdentity {
            username: self.username.clone(),
        })
    }
}

impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredential")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
