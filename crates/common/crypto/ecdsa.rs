use k256::{
    AffinePoint, FieldBytes, ProjectivePoint, PublicKey, Scalar, U256,
    elliptic_curve::{
        PrimeField, ops::Reduce, point::DecompressPoint, sec1::ToEncodedPoint, subtle::Choice,
    },
};

use crate::error::EcdsaError;

/// Length of a SEC1 uncompressed point: `0x04 || X || Y`.
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;
/// Length of a SEC1 compressed point: `0x02 | 0x03 || X`.
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;

/// Recovers the secp256k1 public key that produced `(r, s)` over `digest`.
///
/// The candidate point `R` is rebuilt from `x = r` with the y-parity selected by
/// `recovery_id`, and the key is `Q = r⁻¹ · (s·R − h·G)`. Only recovery ids 0 and 1
/// are accepted, so the `x = r + n` candidates are never considered.
///
/// Signatures with a high `s` are recovered as-is.
pub fn recover_public_key(
    digest: &[u8; 32],
    r: &[u8; 32],
    s: &[u8; 32],
    recovery_id: u8,
) -> Result<[u8; UNCOMPRESSED_PUBLIC_KEY_LEN], EcdsaError> {
    if recovery_id > 1 {
        return Err(EcdsaError::InvalidRecoveryId(recovery_id));
    }
    let r_scalar = scalar_in_range(r)?;
    let s_scalar = scalar_in_range(s)?;

    let y_is_odd = Choice::from(recovery_id);
    let big_r = Option::<AffinePoint>::from(AffinePoint::decompress(
        &FieldBytes::from(*r),
        y_is_odd,
    ))
    .ok_or(EcdsaError::InvalidCurvePoint)?;

    let h = <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*digest));
    let r_inv =
        Option::<Scalar>::from(r_scalar.invert()).ok_or(EcdsaError::InvalidSignatureRange)?;

    let q = (ProjectivePoint::from(big_r) * s_scalar - ProjectivePoint::GENERATOR * h) * r_inv;
    let public = PublicKey::from_affine(q.to_affine()).map_err(|_| EcdsaError::RecoveryFailed)?;

    encode_uncompressed(&public)
}

/// Expands a compressed SEC1 key into its uncompressed form.
pub fn decompress_public_key(
    compressed: &[u8; COMPRESSED_PUBLIC_KEY_LEN],
) -> Result<[u8; UNCOMPRESSED_PUBLIC_KEY_LEN], EcdsaError> {
    let public =
        PublicKey::from_sec1_bytes(compressed).map_err(|_| EcdsaError::InvalidPublicKey)?;
    encode_uncompressed(&public)
}

fn encode_uncompressed(
    public: &PublicKey,
) -> Result<[u8; UNCOMPRESSED_PUBLIC_KEY_LEN], EcdsaError> {
    let encoded = public.to_encoded_point(false);
    encoded
        .as_bytes()
        .try_into()
        .map_err(|_| EcdsaError::InvalidPublicKey)
}

/// Parses a big-endian scalar, requiring `0 < value < n`.
fn scalar_in_range(bytes: &[u8; 32]) -> Result<Scalar, EcdsaError> {
    let scalar = Option::<Scalar>::from(<Scalar as PrimeField>::from_repr(FieldBytes::from(
        *bytes,
    )))
    .ok_or(EcdsaError::InvalidSignatureRange)?;
    if bool::from(scalar.is_zero()) {
        return Err(EcdsaError::InvalidSignatureRange);
    }
    Ok(scalar)
}
