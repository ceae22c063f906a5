use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaError {
    #[error("Signature values r and s must be in the range [1, n)")]
    InvalidSignatureRange,
    #[error("r is not the x-coordinate of a point on secp256k1")]
    InvalidCurvePoint,
    #[error("Recovered point is the point at infinity")]
    RecoveryFailed,
    #[error("Recovery id must be 0 or 1, got {0}")]
    InvalidRecoveryId(u8),
    #[error("Invalid SEC1 public key encoding")]
    InvalidPublicKey,
}
