//! Password and OTP helpers

use std::sync::LazyLock;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Random 6-digit one-time code
pub fn generate_otp() -> String {
    use rand::Rng;
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

/// Argon2id hash in PHC string format (used for passwords and OTP codes)
pub fn hash_secret(secret: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(secret.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_secret(secret: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok()
}

/// Stand-in hash verified against when the account does not exist
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_secret("aby-unknown-account").ok());

/// Check `secret` against `hash`, or burn one argon2 verification when there is none.
///
/// Unknown and known accounts then cost the same to reject.
pub fn verify_secret_or_dummy(secret: &str, hash: Option<&str>) -> bool {
    match hash {
        Some(hash) => verify_secret(secret, hash),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_secret(secret, dummy);
            }
            false
        }
    }
}

/// Normalize an email for lookups and unique constraints
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
