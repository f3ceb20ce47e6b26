use sha2::{Digest, Sha256};

/// Hash a password the way the credential store keeps it: lowercase hex
/// SHA-256 of the UTF-8 bytes. Unsalted, so lookups can match on the hash.
pub fn hash_password(plain: &str) -> String {
    hex::encode(Sha256::digest(plain.as_bytes()))
}
