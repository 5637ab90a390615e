use std::{error::Error, fmt::Debug};

use argon2::{password_hash::{rand_core::OsRng, SaltString}, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use secrecy::{ExposeSecret, SecretString};

use crate::{telemetry::spawn_blocking_with_tracing, utils::error_fmt_chain};

#[derive(thiserror::Error)]
pub enum PasswordError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to compute password hash")]
    HashError(#[source] argon2::password_hash::Error),
    #[error("Stored password hash is not a valid PHC string")]
    InvalidStoredHash(#[source] argon2::password_hash::Error)
}

impl Debug for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

fn hash_blocking(password: &SecretString) -> Result<SecretString, PasswordError>{
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(PasswordError::HashError)?
        .to_string();

    Ok(SecretString::from(password_hash))
}

// Hashing is cpu heavy, keep it off the executor
#[tracing::instrument(
    "Computing password hash",
    skip_all
)]
pub async fn compute_password_hash(password: SecretString) -> Result<SecretString, PasswordError>{
    spawn_blocking_with_tracing(move || hash_blocking(&password)).await?
}

/// `Ok(false)` means the password did not match, `Err` that verification
/// could not run at all.
#[tracing::instrument(
    "Verifying password against stored hash",
    skip_all
)]
pub async fn verify_password(password: SecretString, stored_hash: SecretString) -> Result<bool, PasswordError>{
    spawn_blocking_with_tracing(move || -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(stored_hash.expose_secret())
            .map_err(PasswordError::InvalidStoredHash)?;

        Ok(Argon2::default()
            .verify_password(password.expose_secret().as_bytes(), &parsed)
            .is_ok())
    })
    .await?
}
