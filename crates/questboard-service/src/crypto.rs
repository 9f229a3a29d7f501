//! Password hashing.
//!
//! Passwords are stored as `pbkdf2-sha256$<rounds>$<salt hex>$<digest hex>`,
//! the digest being PBKDF2-HMAC-SHA256 over a random 16-byte salt.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use uuid::Uuid;

const SCHEME: &str = "pbkdf2-sha256";

/// Length of the derived key in bytes.
const DIGEST_LEN: usize = 32;

/// Iterations used for new hashes.
pub const HASH_ROUNDS: u32 = 100_000;

/// Hash a password with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4();
    let digest = derive(password, salt.as_bytes(), HASH_ROUNDS);

    format!(
        "{SCHEME}${HASH_ROUNDS}${}${}",
        hex::encode(salt.as_bytes()),
        hex::encode(digest)
    )
}

/// Check a password against a stored hash.
///
/// Malformed hashes never verify.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(SCHEME), Some(rounds), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    let Ok(rounds) = rounds.parse::<u32>() else {
        return false;
    };
    if rounds == 0 {
        return false;
    }
    let Ok(salt) = hex::decode(salt) else {
        return false;
    };

    constant_time_eq(&hex::encode(derive(password, &salt, rounds)), expected)
}

fn derive(password: &str, salt: &[u8], rounds: u32) -> [u8; DIGEST_LEN] {
    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut digest);
    digest
}

/// Constant-time string comparison to prevent timing attacks.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let stored = hash_password("secreto1");
        assert!(stored.starts_with("pbkdf2-sha256$100000$"));
        assert!(verify_password("secreto1", &stored));
        assert!(!verify_password("secreto2", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("same-password");
        let b = hash_password("same-password");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "plain-text"));
        assert!(!verify_password("x", "pbkdf2-sha256$abc$00$00"));
        assert!(!verify_password("x", "md5$1$00$00"));
        assert!(!verify_password("x", "pbkdf2-sha256$1$zz$00"));
        assert!(!verify_password("x", "pbkdf2-sha256$0$00$00"));
    }

    #[test]
    fn derive_matches_pbkdf2_hmac_sha256_vector() {
        // RFC 7914 section 11, first 32 bytes.
        assert_eq!(
            hex::encode(derive("passwd", b"salt", 1)),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
    }

    #[test]
    fn stored_rounds_are_honoured() {
        let salt = [7u8; 16];
        let stored = format!(
            "{SCHEME}$2${}${}",
            hex::encode(salt),
            hex::encode(derive("secreto1", &salt, 2))
        );
        assert!(verify_password("secreto1", &stored));
        assert!(!verify_password("secreto1", &stored.replacen("$2$", "$3$", 1)));
    }

    #[test]
    fn constant_time_eq_equal_strings() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn constant_time_eq_different_strings() {
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "ab"));
        assert!(!constant_time_eq("abc", "ABC"));
    }
}
