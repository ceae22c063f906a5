use ethereum_types::{Address, H256};
use ethrecover_crypto::ecdsa::{COMPRESSED_PUBLIC_KEY_LEN, UNCOMPRESSED_PUBLIC_KEY_LEN};

use crate::utils::keccak;

/// Every representation of a recovered public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyInfo {
    /// `0x04 || X || Y`
    pub uncompressed: [u8; UNCOMPRESSED_PUBLIC_KEY_LEN],
    /// `0x02 || X` for an even Y, `0x03 || X` for an odd one.
    pub compressed: [u8; COMPRESSED_PUBLIC_KEY_LEN],
    /// Keccak-256 of `X || Y`.
    pub hashed: H256,
    /// The last 20 bytes of `hashed`.
    pub address: Address,
}

impl PublicKeyInfo {
    pub fn from_uncompressed(uncompressed: [u8; UNCOMPRESSED_PUBLIC_KEY_LEN]) -> Self {
        let mut compressed = [0u8; COMPRESSED_PUBLIC_KEY_LEN];
        compressed[0] = if uncompressed[64] & 1 == 0 { 0x02 } else { 0x03 };
        compressed[1..].copy_from_slice(&uncompressed[1..33]);

        let hashed = keccak(&uncompressed[1..]);
        let address = Address::from_slice(&hashed.as_bytes()[12..]);

        Self {
            uncompressed,
            compressed,
            hashed,
            address,
        }
    }

    pub fn checksum_address(&self) -> String {
        to_checksum_address(&self.address)
    }
}

/// Mixed-case address encoding from EIP-55.
///
/// A hex letter is uppercased when the matching nibble of the keccak hash of the
/// lowercase address is 8 or more.
pub fn to_checksum_address(address: &Address) -> String {
    let lowercase = hex::encode(address.as_bytes());
    let hash = keccak(lowercase.as_bytes());

    let mut checksummed = String::with_capacity(2 + lowercase.len());
    checksummed.push_str("0x");
    for (i, c) in lowercase.chars().enumerate() {
        let hash_byte = hash.as_bytes()[i / 2];
        let nibble = if i % 2 == 0 {
            hash_byte >> 4
        } else {
            hash_byte & 0x0f
        };
        if nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }
    checksummed
}
