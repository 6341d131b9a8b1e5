use anyhow::Result;
use argon2::{
    Argon2, PasswordVerifier,
    password_hash::{Error as HashError, PasswordHash},
};

/// `Ok(false)` on a wrong password; `Err` only when the stored hash is unusable.
pub async fn verify_pw(password: &str, expected_hash: &str) -> Result<bool> {
    let password = password.to_owned();
    let expected_hash = expected_hash.to_owned();
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&expected_hash)
            .map_err(|e| anyhow::anyhow!("stored password hash is malformed: {e}"))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(anyhow::anyhow!("password verification failed: {e}")),
        }
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::crypto::hash_pw::hash_pw;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_pw("correct horse".to_owned()).await.unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_pw("correct horse", &hash).await.unwrap());
        assert!(!verify_pw("battery staple", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        assert!(verify_pw("whatever", "not-a-phc-string").await.is_err());
    }
}
