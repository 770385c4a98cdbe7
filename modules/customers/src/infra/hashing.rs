use sha2::{Digest, Sha256};

use crate::domain::ports::PasswordHasher;

/// SHA-256 digest over plaintext and the secondary key, hex-encoded.
/// The shape matches the legacy login path that verifies these hashes.
pub struct LegacySha256Hasher;

impl PasswordHasher for LegacySha256Hasher {
    fn hash(&self, plaintext: &str, secondary_key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        hasher.update(secondary_key.as_bytes());
        hex::encode(hasher.finalize())
    }
}
