use ethereum_types::{H256, U256};
use ethrecover_crypto::keccak::keccak_hash;

use crate::errors::RecoveryError;

pub fn keccak(data: impl AsRef<[u8]>) -> H256 {
    H256(keccak_hash(data))
}

/// Parses a raw transaction given as hex.
///
/// Surrounding whitespace is ignored, the `0x` prefix is optional and digits are
/// case-insensitive. The remaining digits must come in pairs.
pub fn decode_hex_input(input: &str) -> Result<Vec<u8>, RecoveryError> {
    let normalized = input.trim().to_ascii_lowercase();
    let digits = normalized.strip_prefix("0x").unwrap_or(&normalized);

    if let Some(invalid) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(RecoveryError::MalformedHex(format!(
            "invalid character {invalid:?}"
        )));
    }
    if digits.len() % 2 != 0 {
        return Err(RecoveryError::MalformedHex(format!(
            "odd number of hex digits ({})",
            digits.len()
        )));
    }
    hex::decode(digits).map_err(|err| RecoveryError::MalformedHex(err.to_string()))
}

/// `0x`-prefixed lowercase hex of the given bytes.
pub fn to_prefixed_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// `0x`-prefixed hex quantity without leading zeros; zero is `0x0`.
pub fn to_quantity_hex(value: U256) -> String {
    format!("{value:#x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_hex_input_accepts_prefix_and_mixed_case() {
        assert_eq!(decode_hex_input("0x0aFf").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(decode_hex_input("0X0AFF").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(decode_hex_input("  0aff\n").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(decode_hex_input("0x").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn decode_hex_input_rejects_odd_length() {
        assert!(matches!(
            decode_hex_input("0xabc"),
            Err(RecoveryError::MalformedHex(_))
        ));
    }

    #[test]
    fn decode_hex_input_rejects_non_hex_characters() {
        assert!(matches!(
            decode_hex_input("0xzz"),
            Err(RecoveryError::MalformedHex(_))
        ));
        assert!(matches!(
            decode_hex_input("0x0x12"),
            Err(RecoveryError::MalformedHex(_))
        ));
        assert!(matches!(
            decode_hex_input("12 34"),
            Err(RecoveryError::MalformedHex(_))
        ));
    }

    #[test]
    fn quantity_hex_has_no_leading_zeros() {
        assert_eq!(to_quantity_hex(U256::zero()), "0x0");
        assert_eq!(to_quantity_hex(U256::from(37)), "0x25");
    }

    #[test]
    fn keccak_of_empty_input() {
        assert_eq!(
            to_prefixed_hex(keccak(b"")),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
