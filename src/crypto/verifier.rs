//! bcrypt credential hashing and verification
//!
//! The expensive key schedule (EksBlowfish) comes from the `bcrypt` crate;
//! this module owns the stored format, salt generation and the
//! constant-time digest comparison.

use std::time::Instant;

use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use zeroize::Zeroize;

use super::record::{Cost, HashRecord, Version, DIGEST_LEN, SALT_LEN};
use super::SecureBytes;
use crate::error::{CredentialError, Result};

/// Hashes new credentials at a configured cost and verifies stored ones
///
/// Holds no mutable state; a single instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CredentialVerifier {
    cost: Cost,
}

impl CredentialVerifier {
    pub fn new(cost: Cost) -> Self {
        Self { cost }
    }

    /// Cost used for credentials created by this verifier
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Hash `candidate` with a fresh random salt
    pub fn hash(&self, candidate: &str) -> Result<String> {
        hash(candidate, self.cost)
    }

    /// Hash `candidate` with a caller-chosen salt
    pub fn hash_with_salt(&self, candidate: &str, salt: [u8; SALT_LEN]) -> Result<String> {
        hash_with_salt(candidate, self.cost, salt)
    }

    /// Check `candidate` against an encoded hash. The cost embedded in the
    /// stored hash is used, not the configured one.
    pub fn verify(&self, candidate: &str, stored_hash: &str) -> Result<bool> {
        verify(candidate, stored_hash)
    }

    /// Whether `stored_hash` was made with weaker settings than this verifier
    pub fn needs_rehash(&self, stored_hash: &str) -> Result<bool> {
        let record: HashRecord = stored_hash.parse()?;
        Ok(record.needs_rehash(self.cost))
    }
}

/// Create a new encoded hash for `candidate`
///
/// Every call draws a new salt from the operating system, so two hashes of
/// the same password never compare equal as strings.
pub fn hash(candidate: &str, cost: Cost) -> Result<String> {
    hash_with_salt(candidate, cost, generate_salt()?)
}

/// Create an encoded hash for `candidate` using `salt`
pub fn hash_with_salt(candidate: &str, cost: Cost, salt: [u8; SALT_LEN]) -> Result<String> {
    // Other implementations stop reading at the first NUL
    if candidate.as_bytes().contains(&0) {
        return Err(CredentialError::PasswordContainsNul);
    }

    let started = Instant::now();
    let digest = compute_digest(candidate.as_bytes(), cost, &salt);
    let record = HashRecord::new(Version::CURRENT, cost, salt, digest);

    debug!(
        cost = cost.get(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "hashed credential"
    );

    Ok(record.to_string())
}

/// Verify `candidate` against `stored_hash`
///
/// Returns `Ok(false)` for a wrong password. A stored hash that cannot be
/// parsed is an error, never a mismatch.
pub fn verify(candidate: &str, stored_hash: &str) -> Result<bool> {
    let record = stored_hash.parse::<HashRecord>().map_err(|e| {
        warn!(error = %e, "stored credential failed to parse");
        e
    })?;

    Ok(verify_record(candidate, &record))
}

/// Verify `candidate` against an already parsed record
pub fn verify_record(candidate: &str, record: &HashRecord) -> bool {
    let started = Instant::now();
    let mut digest = compute_digest(candidate.as_bytes(), record.cost(), record.salt());

    let matched: bool = digest.as_slice().ct_eq(record.digest().as_slice()).into();
    digest.zeroize();

    debug!(
        version = record.version().as_str(),
        cost = record.cost().get(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        matched,
        "verified credential"
    );

    matched
}

/// Draw a salt from the OS random source
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| CredentialError::EntropyUnavailable(e.to_string()))?;
    Ok(salt)
}

fn compute_digest(password: &[u8], cost: Cost, salt: &[u8; SALT_LEN]) -> [u8; DIGEST_LEN] {
    let key = SecureBytes::bcrypt_key(password);
    let mut output = bcrypt::bcrypt(cost.get(), *salt, &key);

    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&output[..DIGEST_LEN]);
    output.zeroize();
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "$2a$10$yGTZMMjfWyunReqDn.sZ1uMazm8Q.z7xYJYUkj50TBFKlJcX4X5F2";

    fn cost(value: u32) -> Cost {
        Cost::new(value).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let verifier = CredentialVerifier::new(Cost::MIN);

        for password in ["admin123", "", "correct horse battery staple", "pässwörd"] {
            let stored = verifier.hash(password).unwrap();
            assert!(verifier.verify(password, &stored).unwrap(), "{:?}", password);
        }
    }

    #[test]
    fn test_wrong_password_is_false() {
        let stored = hash("admin123", Cost::MIN).unwrap();

        assert!(!verify("admin124", &stored).unwrap());
        assert!(!verify("", &stored).unwrap());
        assert!(!verify("ADMIN123", &stored).unwrap());
    }

    #[test]
    fn test_hash_is_salted_per_call() {
        let first = hash("admin123", Cost::MIN).unwrap();
        let second = hash("admin123", Cost::MIN).unwrap();

        assert_ne!(first, second);
        assert!(verify("admin123", &first).unwrap());
        assert!(verify("admin123", &second).unwrap());
    }

    #[test]
    fn test_hash_format() {
        let stored = hash("player", cost(5)).unwrap();

        assert_eq!(stored.len(), 60);
        assert!(stored.starts_with("$2b$05$"));
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let err = verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, CredentialError::MalformedHash(_)));

        let err = verify("anything", "").unwrap_err();
        assert!(matches!(err, CredentialError::MalformedHash(_)));
    }

    #[test]
    fn test_unsupported_cost_is_error() {
        let stored = "$2a$32$yGTZMMjfWyunReqDn.sZ1uMazm8Q.z7xYJYUkj50TBFKlJcX4X5F2";
        let err = verify("admin123", stored).unwrap_err();
        assert!(matches!(err, CredentialError::UnsupportedCost(32)));
    }

    #[test]
    fn test_known_vectors() {
        let vectors = [
            ("", "$2a$06$DCq7YPn5Rq63x1Lad4cll.TV4S6ytwfsfvkgY8jIucDrjc8deX1s."),
            ("", "$2a$05$CCCCCCCCCCCCCCCCCCCCC.7uG0VCzI2bS7j6ymqJi9CdcdxiRTWNy"),
            ("U*U", "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW"),
            ("U*U*", "$2a$05$CCCCCCCCCCCCCCCCCCCCC.VGOzA784oUp/Z0DY336zx7pLYAy0lwK"),
            ("admin123", "$2a$04$yGTZMMjfWyunReqDn.sZ1uw3dbk9WmV1Rxo7bmQc.TyZSTQflgYpO"),
            ("pässwörd", "$2b$05$yGTZMMjfWyunReqDn.sZ1uis8NQx.q92qPy9tCGM5KrXQbYGBKEH2"),
        ];

        for (password, stored) in vectors {
            assert!(verify(password, stored).unwrap(), "{:?} vs {}", password, stored);
            assert!(!verify("wrong", stored).unwrap());
        }
    }

    #[test]
    fn test_hash_with_salt_reproduces_vector() {
        let record: HashRecord = "$2b$04$yGTZMMjfWyunReqDn.sZ1uvDGTdNMx6FfQkLe4l5iQ4q1bnXUxazK"
            .parse()
            .unwrap();
        let verifier = CredentialVerifier::new(Cost::MIN);

        let stored = verifier.hash_with_salt(&"a".repeat(80), *record.salt()).unwrap();
        assert_eq!(stored, "$2b$04$yGTZMMjfWyunReqDn.sZ1uvDGTdNMx6FfQkLe4l5iQ4q1bnXUxazK");
    }

    #[test]
    fn test_fixture_is_stable() {
        // The digest recomputed for "admin123" is z7pq6ChNdrak57Gwdi0CtMFCyjfPAv6,
        // so this stored credential belongs to some other password.
        let first = verify("admin123", FIXTURE).unwrap();
        let second = verify("admin123", FIXTURE).unwrap();

        assert!(!first);
        assert_eq!(first, second);
    }

    #[test]
    fn test_long_passwords_truncate_at_72_bytes() {
        let stored = hash(&"a".repeat(72), Cost::MIN).unwrap();

        assert!(verify(&"a".repeat(80), &stored).unwrap());
        assert!(!verify(&"a".repeat(71), &stored).unwrap());
    }

    #[test]
    fn test_nul_in_password_rejected_on_hash() {
        let err = hash("pass\0word", Cost::MIN).unwrap_err();
        assert!(matches!(err, CredentialError::PasswordContainsNul));
    }

    #[test]
    fn test_cost_sensitivity() {
        let cheap = hash("admin123", cost(4)).unwrap();
        let expensive = hash("admin123", cost(8)).unwrap();

        let started = Instant::now();
        assert!(verify("admin123", &cheap).unwrap());
        let cheap_time = started.elapsed();

        let started = Instant::now();
        assert!(verify("admin123", &expensive).unwrap());
        let expensive_time = started.elapsed();

        assert!(expensive_time > cheap_time);
    }

    #[test]
    fn test_needs_rehash() {
        let verifier = CredentialVerifier::new(cost(6));
        let weak = hash("admin123", Cost::MIN).unwrap();
        let current = verifier.hash("admin123").unwrap();

        assert!(verifier.needs_rehash(&weak).unwrap());
        assert!(!verifier.needs_rehash(&current).unwrap());
        assert!(verifier.needs_rehash("garbage").is_err());
    }

    #[test]
    fn test_concurrent_verification() {
        let verifier = CredentialVerifier::new(Cost::MIN);
        let stored = verifier.hash("shared").unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let stored = &stored;
                    scope.spawn(move || {
                        let candidate = if i % 2 == 0 { "shared" } else { "other" };
                        verifier.verify(candidate, stored).unwrap() == (i % 2 == 0)
                    })
                })
                .collect();

            for handle in handles {
                assert!(handle.join().unwrap());
            }
        });
    }
}
