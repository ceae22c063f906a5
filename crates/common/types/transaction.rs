use std::fmt::Display;

use bytes::Bytes;
use ethereum_types::{Address, U256};
use serde::Serialize;
use tracing::trace;

use ethrecover_rlp::{
    constants::RLP_NULL,
    decode::RLPDecode,
    encode::RLPEncode,
    error::RLPDecodeError,
    node::Node,
    structs::{Decoder, Encoder},
};

use crate::{errors::RecoveryError, types::RecoverableSignature};

/// EIP-2718 type byte of a dynamic fee transaction.
pub const EIP1559_TX_TYPE: u8 = 0x02;

/// A signed transaction as it appears on the wire.
///
/// Legacy transactions are a bare RLP list, typed ones are the EIP-2718
/// type byte followed by the RLP list of their fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Envelope {
    Legacy(LegacyTransaction),
    Typed(EIP1559Transaction),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TxType {
    #[serde(rename = "legacy")]
    Legacy,
    #[serde(rename = "eip1559")]
    EIP1559,
}

impl Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxType::Legacy => write!(f, "Legacy"),
            TxType::EIP1559 => write!(f, "EIP1559"),
        }
    }
}

/// The transaction's kind: call or create.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum TxKind {
    Call(Address),
    #[default]
    Create,
}

impl RLPEncode for TxKind {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        match self {
            Self::Call(address) => address.encode(buf),
            Self::Create => buf.put_u8(RLP_NULL),
        }
    }
}

impl RLPDecode for TxKind {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let first_byte = rlp.first().ok_or(RLPDecodeError::InvalidLength)?;
        if *first_byte == RLP_NULL {
            return Ok((Self::Create, &rlp[1..]));
        }
        Address::decode_unfinished(rlp).map(|(t, rest)| (Self::Call(t), rest))
    }
}

/// Signature fields are kept as the raw decoded strings, so that an empty
/// value can be told apart from a zero one.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas: u64,
    /// The recipient of the transaction.
    /// Create transactions contain a [`null`](RLP_NULL) value in this field.
    pub to: TxKind,
    pub value: U256,
    pub data: Bytes,
    pub v: Bytes,
    pub r: Bytes,
    pub s: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EIP1559Transaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: U256,
    pub max_fee_per_gas: U256,
    pub gas_limit: u64,
    pub to: TxKind,
    pub value: U256,
    pub data: Bytes,
    /// Carried through untouched, it is only re-encoded for hashing.
    pub access_list: Node,
    pub signature_y_parity: Bytes,
    pub signature_r: Bytes,
    pub signature_s: Bytes,
}

impl Default for EIP1559Transaction {
    fn default() -> Self {
        Self {
            chain_id: Default::default(),
            nonce: Default::default(),
            max_priority_fee_per_gas: Default::default(),
            max_fee_per_gas: Default::default(),
            gas_limit: Default::default(),
            to: Default::default(),
            value: Default::default(),
            data: Default::default(),
            access_list: Node::List(vec![]),
            signature_y_parity: Default::default(),
            signature_r: Default::default(),
            signature_s: Default::default(),
        }
    }
}

impl RLPEncode for LegacyTransaction {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.nonce)
            .encode_field(&self.gas_price)
            .encode_field(&self.gas)
            .encode_field(&self.to)
            .encode_field(&self.value)
            .encode_field(&self.data)
            .encode_field(&self.v)
            .encode_field(&self.r)
            .encode_field(&self.s)
            .finish();
    }
}

impl RLPEncode for EIP1559Transaction {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.chain_id)
            .encode_field(&self.nonce)
            .encode_field(&self.max_priority_fee_per_gas)
            .encode_field(&self.max_fee_per_gas)
            .encode_field(&self.gas_limit)
            .encode_field(&self.to)
            .encode_field(&self.value)
            .encode_field(&self.data)
            .encode_field(&self.access_list)
            .encode_field(&self.signature_y_parity)
            .encode_field(&self.signature_r)
            .encode_field(&self.signature_s)
            .finish();
    }
}

impl RLPDecode for LegacyTransaction {
    fn decode_unfinished(rlp: &[u8]) -> Result<(LegacyTransaction, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (nonce, decoder) = decoder.decode_field("nonce")?;
        let (gas_price, decoder) = decoder.decode_field("gas_price")?;
        let (gas, decoder) = decoder.decode_field("gas")?;
        let (to, decoder) = decoder.decode_field("to")?;
        let (value, decoder) = decoder.decode_field("value")?;
        let (data, decoder) = decoder.decode_field("data")?;
        let (v, decoder) = decoder.decode_field("v")?;
        let (r, decoder) = decoder.decode_field("r")?;
        let (s, decoder) = decoder.decode_field("s")?;

        let tx = LegacyTransaction {
            nonce,
            gas_price,
            gas,
            to,
            value,
            data,
            v,
            r,
            s,
        };
        Ok((tx, decoder.finish()?))
    }
}

impl RLPDecode for EIP1559Transaction {
    fn decode_unfinished(rlp: &[u8]) -> Result<(EIP1559Transaction, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (chain_id, decoder) = decoder.decode_field("chain_id")?;
        let (nonce, decoder) = decoder.decode_field("nonce")?;
        let (max_priority_fee_per_gas, decoder) =
            decoder.decode_field("max_priority_fee_per_gas")?;
        let (max_fee_per_gas, decoder) = decoder.decode_field("max_fee_per_gas")?;
        let (gas_limit, decoder) = decoder.decode_field("gas_limit")?;
        let (to, decoder) = decoder.decode_field("to")?;
        let (value, decoder) = decoder.decode_field("value")?;
        let (data, decoder) = decoder.decode_field("data")?;
        let (access_list, decoder) = decoder.decode_field("access_list")?;
        let (signature_y_parity, decoder) = decoder.decode_field("signature_y_parity")?;
        let (signature_r, decoder) = decoder.decode_field("signature_r")?;
        let (signature_s, decoder) = decoder.decode_field("signature_s")?;

        let tx = EIP1559Transaction {
            chain_id,
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas,
            gas_limit,
            to,
            value,
            data,
            access_list,
            signature_y_parity,
            signature_r,
            signature_s,
        };
        Ok((tx, decoder.finish()?))
    }
}

impl LegacyTransaction {
    /// The pre-image that was hashed and signed.
    ///
    /// Replay-protected transactions commit to `chain_id, 0, 0` in place of the
    /// signature (EIP-155), older ones commit to the first six fields only.
    pub fn signing_payload(&self, chain_id: Option<u64>) -> Vec<u8> {
        let mut buf = vec![];
        let encoder = Encoder::new(&mut buf)
            .encode_field(&self.nonce)
            .encode_field(&self.gas_price)
            .encode_field(&self.gas)
            .encode_field(&self.to)
            .encode_field(&self.value)
            .encode_field(&self.data);
        match chain_id {
            None => encoder.finish(),
            Some(chain_id) => encoder
                .encode_field(&chain_id)
                .encode_field(&0u8)
                .encode_field(&0u8)
                .finish(),
        }
        buf
    }
}

impl EIP1559Transaction {
    /// The pre-image that was hashed and signed: the type byte followed by the
    /// RLP list of every field but the signature.
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut buf = vec![EIP1559_TX_TYPE];
        Encoder::new(&mut buf)
            .encode_field(&self.chain_id)
            .encode_field(&self.nonce)
            .encode_field(&self.max_priority_fee_per_gas)
            .encode_field(&self.max_fee_per_gas)
            .encode_field(&self.gas_limit)
            .encode_field(&self.to)
            .encode_field(&self.value)
            .encode_field(&self.data)
            .encode_field(&self.access_list)
            .finish();
        buf
    }
}

impl Envelope {
    /// Classifies a raw signed transaction by its first byte and decodes it.
    ///
    /// - `0x02`: EIP-1559, the rest of the input is its field list.
    /// - `0xc0..=0xff`: an RLP list, i.e. a legacy transaction.
    /// - any other EIP-2718 type byte (`0x00..=0x7f`) is not supported.
    pub fn decode_canonical(bytes: &[u8]) -> Result<Self, RecoveryError> {
        let first = *bytes
            .first()
            .ok_or(RecoveryError::MalformedRLP(RLPDecodeError::InvalidLength))?;
        let envelope = match first {
            EIP1559_TX_TYPE => EIP1559Transaction::decode(&bytes[1..]).map(Envelope::Typed)?,
            0xc0..=0xff => LegacyTransaction::decode(bytes).map(Envelope::Legacy)?,
            0x00..=0x7f => return Err(RecoveryError::UnsupportedTransactionType(first)),
            _ => return Err(RecoveryError::MalformedRLP(RLPDecodeError::UnexpectedString)),
        };
        trace!(tx_type = %envelope.tx_type(), "Decoded transaction envelope");
        Ok(envelope)
    }

    /// Serializes the signed transaction back into its wire form.
    pub fn encode_canonical_to_vec(&self) -> Vec<u8> {
        match self {
            Envelope::Legacy(tx) => tx.encode_to_vec(),
            Envelope::Typed(tx) => {
                let mut buf = vec![EIP1559_TX_TYPE];
                tx.encode(&mut buf);
                buf
            }
        }
    }

    pub fn tx_type(&self) -> TxType {
        match self {
            Envelope::Legacy(_) => TxType::Legacy,
            Envelope::Typed(_) => TxType::EIP1559,
        }
    }

    /// The bytes the sender signed, given the signature normalized from this
    /// envelope (its chain id decides the legacy layout).
    pub fn signing_payload(&self, signature: &RecoverableSignature) -> Vec<u8> {
        match self {
            Envelope::Legacy(tx) => tx.signing_payload(signature.chain_id),
            Envelope::Typed(tx) => tx.signing_payload(),
        }
    }

    pub fn chain_id(&self, signature: &RecoverableSignature) -> Option<u64> {
        match self {
            Envelope::Legacy(_) => signature.chain_id,
            Envelope::Typed(tx) => Some(tx.chain_id),
        }
    }

    pub fn to(&self) -> &TxKind {
        match self {
            Envelope::Legacy(tx) => &tx.to,
            Envelope::Typed(tx) => &tx.to,
        }
    }

    pub fn nonce(&self) -> u64 {
        match self {
            Envelope::Legacy(tx) => tx.nonce,
            Envelope::Typed(tx) => tx.nonce,
        }
    }

    pub fn is_contract_creation(&self) -> bool {
        matches!(self.to(), TxKind::Create)
    }
}
