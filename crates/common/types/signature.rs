use bytes::Bytes;
use ethereum_types::U256;
use tracing::warn;

use crate::{errors::RecoveryError, types::Envelope};

/// Length of the `r || s || v` signature form.
pub const SIGNATURE_LEN: usize = 65;

/// Offset between a recovery id and the `v` of a pre-EIP-155 signature.
const LEGACY_V_OFFSET: u64 = 27;
/// Smallest `v` that encodes a chain id (EIP-155).
const EIP155_V_OFFSET: u64 = 35;

/// A signature normalized from whichever `v` convention the transaction uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// Parity of the `R` point's y coordinate, always 0 or 1.
    pub recovery_id: u8,
    /// Chain id bound into the signature. Only set for EIP-155 legacy transactions.
    pub chain_id: Option<u64>,
    /// `v` as carried by the transaction (the y parity for typed ones).
    pub v: U256,
}

impl RecoverableSignature {
    pub fn from_envelope(envelope: &Envelope) -> Result<Self, RecoveryError> {
        match envelope {
            Envelope::Legacy(tx) => {
                let r = signature_scalar(&tx.r, "r")?;
                let s = signature_scalar(&tx.s, "s")?;
                let (recovery_id, chain_id, v) = normalize_legacy_v(&tx.v)?;
                Ok(Self {
                    r,
                    s,
                    recovery_id,
                    chain_id,
                    v,
                })
            }
            Envelope::Typed(tx) => {
                let r = signature_scalar(&tx.signature_r, "r")?;
                let s = signature_scalar(&tx.signature_s, "s")?;
                let recovery_id = normalize_y_parity(&tx.signature_y_parity);
                Ok(Self {
                    r,
                    s,
                    recovery_id,
                    chain_id: None,
                    v: U256::from(recovery_id),
                })
            }
        }
    }

    /// `r || s || v` with `v = 27 + recovery_id`.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = LEGACY_V_OFFSET as u8 + self.recovery_id;
        bytes
    }
}

/// Left-pads `r` or `s` to 32 bytes. Range checks happen at recovery.
fn signature_scalar(value: &Bytes, name: &'static str) -> Result<[u8; 32], RecoveryError> {
    if value.is_empty() {
        return Err(RecoveryError::MissingSignatureComponent(name));
    }
    if value.len() > 32 {
        return Err(RecoveryError::InvalidSignatureRange);
    }
    let mut padded = [0u8; 32];
    padded[32 - value.len()..].copy_from_slice(value);
    Ok(padded)
}

fn normalize_legacy_v(v_bytes: &Bytes) -> Result<(u8, Option<u64>, U256), RecoveryError> {
    if v_bytes.len() > 32 {
        return Err(RecoveryError::MalformedSignature(format!(
            "v is {} bytes long",
            v_bytes.len()
        )));
    }
    let v = U256::from_big_endian(v_bytes);

    if v == U256::from(LEGACY_V_OFFSET) || v == U256::from(LEGACY_V_OFFSET + 1) {
        let recovery_id = (v.low_u64() - LEGACY_V_OFFSET) as u8;
        return Ok((recovery_id, None, v));
    }
    if v >= U256::from(EIP155_V_OFFSET) {
        let offset = v - EIP155_V_OFFSET;
        let chain_id = offset / 2;
        if chain_id > U256::from(u64::MAX) {
            return Err(RecoveryError::MalformedSignature(format!(
                "chain id {chain_id} encoded in v does not fit in 64 bits"
            )));
        }
        let recovery_id = (offset % 2).low_u64() as u8;
        return Ok((recovery_id, Some(chain_id.low_u64()), v));
    }
    Err(RecoveryError::MalformedSignature(format!(
        "v = {v} is neither 27, 28 nor at least 35"
    )))
}

/// An empty y parity is 0 and anything else is 1.
fn normalize_y_parity(y_parity: &Bytes) -> u8 {
    if y_parity.is_empty() {
        return 0;
    }
    if y_parity[..] != [0x01] {
        warn!(
            y_parity = %hex::encode(y_parity),
            "Non-canonical y parity in typed transaction, treating it as 1"
        );
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EIP1559Transaction, LegacyTransaction};
    use hex_literal::hex;

    const R: [u8; 32] = hex!("28ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276");
    const S: [u8; 32] = hex!("67cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83");

    fn legacy_with_v(v: &[u8]) -> Envelope {
        Envelope::Legacy(LegacyTransaction {
            v: Bytes::copy_from_slice(v),
            r: Bytes::copy_from_slice(&R),
            s: Bytes::copy_from_slice(&S),
            ..Default::default()
        })
    }

    fn typed_with_y_parity(y_parity: &[u8]) -> Envelope {
        Envelope::Typed(EIP1559Transaction {
            chain_id: 1,
            signature_y_parity: Bytes::copy_from_slice(y_parity),
            signature_r: Bytes::copy_from_slice(&R),
            signature_s: Bytes::copy_from_slice(&S),
            ..Default::default()
        })
    }

    #[test]
    fn eip155_v_encodes_chain_id_and_parity() {
        let signature = RecoverableSignature::from_envelope(&legacy_with_v(&[37])).unwrap();
        assert_eq!(signature.recovery_id, 0);
        assert_eq!(signature.chain_id, Some(1));
        assert_eq!(signature.v, U256::from(37));

        let signature = RecoverableSignature::from_envelope(&legacy_with_v(&[38])).unwrap();
        assert_eq!(signature.recovery_id, 1);
        assert_eq!(signature.chain_id, Some(1));

        // chain id 137 with odd parity: 137 * 2 + 36 = 310
        let signature = RecoverableSignature::from_envelope(&legacy_with_v(&[0x01, 0x36])).unwrap();
        assert_eq!(signature.recovery_id, 1);
        assert_eq!(signature.chain_id, Some(137));

        // smallest EIP-155 value: chain id 0
        let signature = RecoverableSignature::from_envelope(&legacy_with_v(&[35])).unwrap();
        assert_eq!(signature.recovery_id, 0);
        assert_eq!(signature.chain_id, Some(0));
    }

    #[test]
    fn pre_eip155_v_has_no_chain_id() {
        for (v, recovery_id) in [(27u8, 0u8), (28, 1)] {
            let signature = RecoverableSignature::from_envelope(&legacy_with_v(&[v])).unwrap();
            assert_eq!(signature.recovery_id, recovery_id);
            assert_eq!(signature.chain_id, None);
        }
    }

    #[test]
    fn rejects_v_outside_known_conventions() {
        let cases: [&[u8]; 7] = [&[], &[0], &[1], &[26], &[29], &[30], &[34]];
        for v in cases {
            assert!(matches!(
                RecoverableSignature::from_envelope(&legacy_with_v(v)),
                Err(RecoveryError::MalformedSignature(_))
            ));
        }
    }

    #[test]
    fn rejects_chain_id_wider_than_64_bits() {
        // (v - 35) / 2 = 2^64
        let mut v = [0u8; 9];
        v[0] = 0x02;
        v[8] = 35;
        assert!(matches!(
            RecoverableSignature::from_envelope(&legacy_with_v(&v)),
            Err(RecoveryError::MalformedSignature(_))
        ));

        // (v - 35) / 2 = 2^64 - 1 still fits
        let mut v = [0u8; 9];
        v[0] = 0x02;
        v[8] = 33;
        let signature = RecoverableSignature::from_envelope(&legacy_with_v(&v)).unwrap();
        assert_eq!(signature.chain_id, Some(u64::MAX));
    }

    #[test]
    fn typed_y_parity_normalization() {
        let signature = RecoverableSignature::from_envelope(&typed_with_y_parity(&[])).unwrap();
        assert_eq!(signature.recovery_id, 0);
        assert_eq!(signature.v, U256::zero());
        assert_eq!(signature.chain_id, None);

        let signature = RecoverableSignature::from_envelope(&typed_with_y_parity(&[1])).unwrap();
        assert_eq!(signature.recovery_id, 1);
        assert_eq!(signature.v, U256::one());

        // any other non-empty value counts as odd
        let cases: [&[u8]; 3] = [&[0x00], &[0x1c], &[0x01, 0x00]];
        for y_parity in cases {
            let signature =
                RecoverableSignature::from_envelope(&typed_with_y_parity(y_parity)).unwrap();
            assert_eq!(signature.recovery_id, 1);
        }
    }

    #[test]
    fn missing_components_are_reported_in_order() {
        let envelope = Envelope::Legacy(LegacyTransaction {
            v: Bytes::from_static(&[30]),
            ..Default::default()
        });
        assert_eq!(
            RecoverableSignature::from_envelope(&envelope),
            Err(RecoveryError::MissingSignatureComponent("r"))
        );

        let envelope = Envelope::Typed(EIP1559Transaction {
            signature_r: Bytes::copy_from_slice(&R),
            ..Default::default()
        });
        assert_eq!(
            RecoverableSignature::from_envelope(&envelope),
            Err(RecoveryError::MissingSignatureComponent("s"))
        );
    }

    #[test]
    fn oversized_components_are_out_of_range() {
        let envelope = Envelope::Legacy(LegacyTransaction {
            v: Bytes::from_static(&[27]),
            r: Bytes::from_static(&[0x01; 33]),
            s: Bytes::copy_from_slice(&S),
            ..Default::default()
        });
        assert_eq!(
            RecoverableSignature::from_envelope(&envelope),
            Err(RecoveryError::InvalidSignatureRange)
        );
    }

    #[test]
    fn short_components_are_left_padded() {
        let envelope = Envelope::Legacy(LegacyTransaction {
            v: Bytes::from_static(&[27]),
            r: Bytes::from_static(&[0x05]),
            s: Bytes::from_static(&[0x01, 0x02]),
            ..Default::default()
        });
        let signature = RecoverableSignature::from_envelope(&envelope).unwrap();
        assert_eq!(signature.r[31], 0x05);
        assert!(signature.r[..31].iter().all(|byte| *byte == 0));
        assert_eq!(&signature.s[30..], &[0x01, 0x02]);
    }

    #[test]
    fn to_bytes_appends_27_based_v() {
        let signature = RecoverableSignature::from_envelope(&legacy_with_v(&[38])).unwrap();
        let bytes = signature.to_bytes();
        assert_eq!(&bytes[..32], &R);
        assert_eq!(&bytes[32..64], &S);
        assert_eq!(bytes[64], 0x1c);
    }
}
