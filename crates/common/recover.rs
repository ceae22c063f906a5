//! Raw signed transaction in, signer public key and address out.

use ethereum_types::H256;
use ethrecover_crypto::ecdsa::recover_public_key;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::{
    errors::RecoveryError,
    types::{Envelope, PublicKeyInfo, RecoverableSignature, TxType},
    utils::{decode_hex_input, keccak, to_prefixed_hex, to_quantity_hex},
};

/// The signer's key in every form, plus the signature it was recovered from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveredKey {
    pub uncompressed_public_key: String,
    pub compressed_public_key: String,
    pub hashed_public_key: String,
    /// EIP-55 checksummed.
    pub address: String,
    pub v: String,
    pub r: String,
    pub s: String,
    /// `r || s || v` with `v` in {0x1b, 0x1c}.
    pub signature: String,
}

impl RecoveredKey {
    fn new(signature: &RecoverableSignature, public_key: &PublicKeyInfo) -> Self {
        Self {
            uncompressed_public_key: to_prefixed_hex(public_key.uncompressed),
            compressed_public_key: to_prefixed_hex(public_key.compressed),
            hashed_public_key: to_prefixed_hex(public_key.hashed),
            address: public_key.checksum_address(),
            v: to_quantity_hex(signature.v),
            r: to_prefixed_hex(signature.r),
            s: to_prefixed_hex(signature.s),
            signature: to_prefixed_hex(signature.to_bytes()),
        }
    }
}

/// What was decoded along the way, next to the recovered key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub tx_type: TxType,
    pub chain_id: Option<u64>,
    pub nonce: u64,
    pub contract_creation: bool,
    pub recovery_id: u8,
    pub signing_hash: H256,
    pub key: RecoveredKey,
}

struct Recovery {
    envelope: Envelope,
    signature: RecoverableSignature,
    signing_hash: H256,
    public_key: PublicKeyInfo,
}

#[instrument(level = "trace", name = "Recover signer", skip_all)]
fn recover(raw: &[u8]) -> Result<Recovery, RecoveryError> {
    let envelope = Envelope::decode_canonical(raw)?;
    let signature = RecoverableSignature::from_envelope(&envelope)?;
    debug!(
        tx_type = %envelope.tx_type(),
        chain_id = ?envelope.chain_id(&signature),
        recovery_id = signature.recovery_id,
        "Normalized signature"
    );

    let signing_hash = keccak(envelope.signing_payload(&signature));
    trace!(signing_hash = %to_prefixed_hex(signing_hash), "Computed signing hash");

    let uncompressed = recover_public_key(
        signing_hash.as_fixed_bytes(),
        &signature.r,
        &signature.s,
        signature.recovery_id,
    )?;
    let public_key = PublicKeyInfo::from_uncompressed(uncompressed);
    debug!(address = %public_key.checksum_address(), "Recovered signer");

    Ok(Recovery {
        envelope,
        signature,
        signing_hash,
        public_key,
    })
}

/// Recovers the signer of a raw signed transaction given as hex.
pub fn recover_from_hex(input: &str) -> Result<RecoveredKey, RecoveryError> {
    let raw = decode_hex_input(input)?;
    recover_from_bytes(&raw)
}

/// Recovers the signer of a raw signed transaction.
pub fn recover_from_bytes(raw: &[u8]) -> Result<RecoveredKey, RecoveryError> {
    let recovery = recover(raw)?;
    Ok(RecoveredKey::new(&recovery.signature, &recovery.public_key))
}

pub fn inspect_from_hex(input: &str) -> Result<Inspection, RecoveryError> {
    let raw = decode_hex_input(input)?;
    let Recovery {
        envelope,
        signature,
        signing_hash,
        public_key,
    } = recover(&raw)?;

    Ok(Inspection {
        tx_type: envelope.tx_type(),
        chain_id: envelope.chain_id(&signature),
        nonce: envelope.nonce(),
        contract_creation: envelope.is_contract_creation(),
        recovery_id: signature.recovery_id,
        signing_hash,
        key: RecoveredKey::new(&signature, &public_key),
    })
}

/// Recovers every input independently, in parallel. Results keep the input order.
pub fn recover_batch<S: AsRef<str> + Sync>(
    inputs: &[S],
) -> Vec<Result<RecoveredKey, RecoveryError>> {
    inputs
        .par_iter()
        .map(|input| recover_from_hex(input.as_ref()))
        .collect()
}
