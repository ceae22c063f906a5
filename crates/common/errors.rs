use ethrecover_crypto::EcdsaError;
use ethrecover_rlp::error::RLPDecodeError;
use thiserror::Error;

/// Every way a recovery can fail. The pipeline stops at the first one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("Malformed hex input: {0}")]
    MalformedHex(String),
    #[error("Malformed RLP: {0}")]
    MalformedRLP(#[from] RLPDecodeError),
    #[error("Unsupported transaction type: {0:#04x}")]
    UnsupportedTransactionType(u8),
    #[error("Missing signature component '{0}'")]
    MissingSignatureComponent(&'static str),
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),
    #[error("Signature values r and s must be in the range [1, n)")]
    InvalidSignatureRange,
    #[error("Signature r is not the x-coordinate of a secp256k1 point")]
    InvalidCurvePoint,
    #[error("Public key recovery failed")]
    RecoveryFailed,
}

impl RecoveryError {
    /// Stable name of the error kind, for callers that report errors as data.
    pub fn kind(&self) -> &'static str {
        match self {
            RecoveryError::MalformedHex(_) => "MalformedHex",
            RecoveryError::MalformedRLP(_) => "MalformedRLP",
            RecoveryError::UnsupportedTransactionType(_) => "UnsupportedTransactionType",
            RecoveryError::MissingSignatureComponent(_) => "MissingSignatureComponent",
            RecoveryError::MalformedSignature(_) => "MalformedSignature",
            RecoveryError::InvalidSignatureRange => "InvalidSignatureRange",
            RecoveryError::InvalidCurvePoint => "InvalidCurvePoint",
            RecoveryError::RecoveryFailed => "RecoveryFailed",
        }
    }
}

impl From<EcdsaError> for RecoveryError {
    fn from(value: EcdsaError) -> Self {
        match value {
            EcdsaError::InvalidSignatureRange => RecoveryError::InvalidSignatureRange,
            EcdsaError::InvalidCurvePoint => RecoveryError::InvalidCurvePoint,
            EcdsaError::RecoveryFailed | EcdsaError::InvalidPublicKey => {
                RecoveryError::RecoveryFailed
            }
            EcdsaError::InvalidRecoveryId(id) => {
                RecoveryError::MalformedSignature(format!("recovery id {id} is not 0 or 1"))
            }
        }
    }
}
