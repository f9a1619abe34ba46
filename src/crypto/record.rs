//! Self-describing bcrypt hash records
//!
//! Encoded layout (60 characters):
//! `$<tag>$<cost>$<22 chars: salt><31 chars: digest>`
//!
//! Salt and digest use the bcrypt radix-64 alphabet
//! (`./A-Za-z0-9`), without padding.

use std::fmt;
use std::str::FromStr;

use base64::alphabet;
use base64::engine::general_purpose::NO_PAD;
use base64::engine::GeneralPurpose;
use base64::Engine as _;

use crate::error::{CredentialError, Result};

/// Salt length in bytes (128 bits)
pub const SALT_LEN: usize = 16;

/// Stored digest length in bytes; the last byte of the raw 24-byte
/// EksBlowfish output is dropped by every bcrypt implementation.
pub const DIGEST_LEN: usize = 23;

/// Length of a complete encoded hash
pub const ENCODED_LEN: usize = 60;

const SALT_CHARS: usize = 22;
const DIGEST_CHARS: usize = 31;

const BCRYPT_BASE64: GeneralPurpose = GeneralPurpose::new(&alphabet::BCRYPT, NO_PAD);

/// bcrypt cost factor: log2 of the key-schedule round count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cost(u32);

impl Cost {
    pub const MIN: Cost = Cost(4);
    pub const MAX: Cost = Cost(31);
    pub const DEFAULT: Cost = Cost(10);

    pub fn new(value: u32) -> Result<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CredentialError::UnsupportedCost(value))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of expensive key-schedule rounds (2^cost)
    pub fn rounds(self) -> u64 {
        1u64 << self.0
    }
}

impl Default for Cost {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Cost {
    type Error = CredentialError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Algorithm tag of an encoded hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    TwoA,
    TwoB,
    TwoX,
    TwoY,
}

impl Version {
    /// Tag written for newly created credentials
    pub const CURRENT: Version = Version::TwoB;

    pub fn as_str(self) -> &'static str {
        match self {
            Version::TwoA => "2a",
            Version::TwoB => "2b",
            Version::TwoX => "2x",
            Version::TwoY => "2y",
        }
    }
}

impl FromStr for Version {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "2a" => Ok(Version::TwoA),
            "2b" => Ok(Version::TwoB),
            "2x" => Ok(Version::TwoX),
            "2y" => Ok(Version::TwoY),
            other => Err(CredentialError::MalformedHash(format!(
                "unknown algorithm tag '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed stored credential. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRecord {
    version: Version,
    cost: Cost,
    salt: [u8; SALT_LEN],
    digest: [u8; DIGEST_LEN],
}

impl HashRecord {
    pub fn new(version: Version, cost: Cost, salt: [u8; SALT_LEN], digest: [u8; DIGEST_LEN]) -> Self {
        Self {
            version,
            cost,
            salt,
            digest,
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn digest(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }

    /// Whether a credential stored in this record should be re-hashed
    /// with `target` after the next successful verification
    pub fn needs_rehash(&self, target: Cost) -> bool {
        self.cost < target || self.version == Version::TwoX
    }
}

impl FromStr for HashRecord {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(malformed("empty hash"));
        }

        let body = s
            .strip_prefix('$')
            .ok_or_else(|| malformed("missing leading '$'"))?;

        let mut fields = body.splitn(3, '$');
        let tag = fields.next().ok_or_else(|| malformed("missing algorithm tag"))?;
        let cost = fields.next().ok_or_else(|| malformed("missing cost field"))?;
        let payload = fields.next().ok_or_else(|| malformed("missing salt and digest"))?;

        let version: Version = tag.parse()?;

        if cost.len() != 2 || !cost.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(&format!("cost field '{}' is not two digits", cost)));
        }
        let cost = cost
            .parse::<u32>()
            .map_err(|e| malformed(&format!("cost field: {}", e)))?;
        let cost = Cost::new(cost)?;

        if payload.len() != SALT_CHARS + DIGEST_CHARS {
            return Err(malformed(&format!(
                "salt and digest must be {} characters, got {}",
                SALT_CHARS + DIGEST_CHARS,
                payload.len()
            )));
        }
        // Non-ASCII input would make the split below land inside a character
        if !payload.is_ascii() {
            return Err(malformed("non-ASCII characters in salt or digest"));
        }
        let (salt_b64, digest_b64) = payload.split_at(SALT_CHARS);

        let salt = decode_field::<SALT_LEN>(salt_b64, "salt")?;
        let digest = decode_field::<DIGEST_LEN>(digest_b64, "digest")?;

        Ok(Self::new(version, cost, salt, digest))
    }
}

impl fmt::Display for HashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}${}${}{}",
            self.version,
            self.cost,
            BCRYPT_BASE64.encode(self.salt),
            BCRYPT_BASE64.encode(self.digest)
        )
    }
}

fn decode_field<const N: usize>(encoded: &str, name: &str) -> Result<[u8; N]> {
    let bytes = BCRYPT_BASE64
        .decode(encoded)
        .map_err(|e| malformed(&format!("{}: {}", name, e)))?;

    bytes
        .try_into()
        .map_err(|v: Vec<u8>| malformed(&format!("{} decodes to {} bytes, expected {}", name, v.len(), N)))
}

fn malformed(reason: &str) -> CredentialError {
    CredentialError::MalformedHash(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "$2a$10$yGTZMMjfWyunReqDn.sZ1uMazm8Q.z7xYJYUkj50TBFKlJcX4X5F2";

    #[test]
    fn test_parse_fixture() {
        let record: HashRecord = FIXTURE.parse().unwrap();

        assert_eq!(record.version(), Version::TwoA);
        assert_eq!(record.cost().get(), 10);
        assert_eq!(record.salt().len(), SALT_LEN);
        assert_eq!(record.digest().len(), DIGEST_LEN);
    }

    #[test]
    fn test_encode_is_canonical() {
        for stored in [
            FIXTURE,
            "$2b$04$yGTZMMjfWyunReqDn.sZ1uvDGTdNMx6FfQkLe4l5iQ4q1bnXUxazK",
            "$2y$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW",
        ] {
            let record: HashRecord = stored.parse().unwrap();
            let encoded = record.to_string();
            assert_eq!(encoded, stored);
            assert_eq!(encoded.len(), ENCODED_LEN);
        }
    }

    #[test]
    fn test_all_tags_accepted() {
        for tag in ["2a", "2b", "2x", "2y"] {
            let stored = FIXTURE.replacen("2a", tag, 1);
            let record: HashRecord = stored.parse().unwrap();
            assert_eq!(record.version().as_str(), tag);
        }
    }

    #[test]
    fn test_malformed_inputs() {
        let cases = [
            "",
            "not-a-valid-hash",
            "2a$10$yGTZMMjfWyunReqDn.sZ1uMazm8Q.z7xYJYUkj50TBFKlJcX4X5F2",
            "$2c$10$yGTZMMjfWyunReqDn.sZ1uMazm8Q.z7xYJYUkj50TBFKlJcX4X5F2",
            "$2a$1$yGTZMMjfWyunReqDn.sZ1uMazm8Q.z7xYJYUkj50TBFKlJcX4X5F2",
            "$2a$1x$yGTZMMjfWyunReqDn.sZ1uMazm8Q.z7xYJYUkj50TBFKlJcX4X5F2",
            "$2a$10$yGTZMMjfWyunReqDn.sZ1uMazm8Q.z7xYJYUkj50TBFKlJcX4X5F",
            "$2a$10$yGTZMMjfWyunReqDn.sZ1uMazm8Q.z7xYJYUkj50TBFKlJcX4X5F2X",
            "$2a$10$yGTZMMjfWyunReqDn+sZ1uMazm8Q.z7xYJYUkj50TBFKlJcX4X5F2",
            "$2a$10$yGTZMMjfWyunReqDn.sZ1uMazm8Q.z7xYJYUkj50TBFKlJcX4X5F=",
            "$2a$10$yGTZMMjfWyunReqDn.sZ1éazm8Q.z7xYJYUkj50TBFKlJcX4X5F2",
            "$2a$10",
        ];

        for case in cases {
            let err = case.parse::<HashRecord>().unwrap_err();
            assert!(
                matches!(err, CredentialError::MalformedHash(_)),
                "{:?} gave {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_non_canonical_trailing_bits_rejected() {
        // 'v' sets low bits that a 16-byte salt cannot carry
        let stored = "$2a$10$yGTZMMjfWyunReqDn.sZ1vMazm8Q.z7xYJYUkj50TBFKlJcX4X5F2";
        assert!(matches!(
            stored.parse::<HashRecord>(),
            Err(CredentialError::MalformedHash(_))
        ));
    }

    #[test]
    fn test_cost_out_of_range() {
        for cost in ["03", "00", "32", "99"] {
            let stored = FIXTURE.replacen("10", cost, 1);
            assert!(matches!(
                stored.parse::<HashRecord>(),
                Err(CredentialError::UnsupportedCost(_))
            ));
        }
    }

    #[test]
    fn test_cost_bounds() {
        assert!(Cost::new(3).is_err());
        assert!(Cost::new(32).is_err());
        assert_eq!(Cost::new(4).unwrap(), Cost::MIN);
        assert_eq!(Cost::new(31).unwrap(), Cost::MAX);
        assert_eq!(Cost::MIN.rounds(), 16);
        assert_eq!(Cost::new(7).unwrap().to_string(), "07");
    }

    #[test]
    fn test_needs_rehash() {
        let record: HashRecord = FIXTURE.parse().unwrap();
        assert!(!record.needs_rehash(Cost::new(10).unwrap()));
        assert!(!record.needs_rehash(Cost::new(8).unwrap()));
        assert!(record.needs_rehash(Cost::new(12).unwrap()));

        let legacy: HashRecord = FIXTURE.replacen("2a", "2x", 1).parse().unwrap();
        assert!(legacy.needs_rehash(Cost::new(4).unwrap()));
    }
}
