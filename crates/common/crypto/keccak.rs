use sha3::{Digest, Keccak256};

/// Keccak-256 with the original padding rule, as used for Ethereum hashes.
/// This is not the standardized SHA3-256.
pub fn keccak_hash(data: impl AsRef<[u8]>) -> [u8; 32] {
    Keccak256::digest(data.as_ref()).into()
}
