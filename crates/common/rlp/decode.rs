use bytes::Bytes;
use ethereum_types::{Address, U256};

use crate::{
    constants::{RLP_NULL, SHORT_PAYLOAD_LIMIT},
    error::RLPDecodeError,
};

/// Trait for decoding RLP encoded slices of data.
/// See <https://ethereum.org/en/developers/docs/data-structures-and-encoding/rlp/#rlp-decoding> for more information.
/// The [`decode_unfinished`](RLPDecode::decode_unfinished) method is used to decode an RLP encoded slice of data and return the decoded value along with the remaining bytes.
/// The [`decode`](RLPDecode::decode) method is used to decode an RLP encoded slice of data and return the decoded value.
/// Implementors need to implement the [`decode_unfinished`](RLPDecode::decode_unfinished) method.
/// While consumers can use the [`decode`](RLPDecode::decode) method to decode the RLP encoded data.
pub trait RLPDecode: Sized {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError>;

    fn decode(rlp: &[u8]) -> Result<Self, RLPDecodeError> {
        let (decoded, remaining) = Self::decode_unfinished(rlp)?;
        if !remaining.is_empty() {
            return Err(RLPDecodeError::TrailingBytes);
        }
        Ok(decoded)
    }
}

impl RLPDecode for u8 {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (bytes, rest) = decode_bytes(rlp)?;
        let padded = static_left_pad::<1>(bytes)?;
        Ok((padded[0], rest))
    }
}

impl RLPDecode for u64 {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (bytes, rest) = decode_bytes(rlp)?;
        let padded = static_left_pad::<8>(bytes)?;
        Ok((u64::from_be_bytes(padded), rest))
    }
}

impl RLPDecode for U256 {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (bytes, rest) = decode_bytes(rlp)?;
        let padded = static_left_pad::<32>(bytes)?;
        Ok((U256::from_big_endian(&padded), rest))
    }
}

impl RLPDecode for Address {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (bytes, rest) = decode_bytes(rlp)?;
        if bytes.len() != Address::len_bytes() {
            return Err(RLPDecodeError::InvalidLength);
        }
        Ok((Address::from_slice(bytes), rest))
    }
}

impl RLPDecode for Bytes {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (bytes, rest) = decode_bytes(rlp)?;
        Ok((Bytes::copy_from_slice(bytes), rest))
    }
}

impl<T: RLPDecode> RLPDecode for Vec<T> {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (is_list, payload, input_rest) = decode_rlp_item(rlp)?;
        if !is_list {
            return Err(RLPDecodeError::UnexpectedString);
        }

        let mut result = Vec::new();
        let mut current_slice = payload;

        while !current_slice.is_empty() {
            let (item, rest_current_list) = T::decode_unfinished(current_slice)?;
            result.push(item);
            current_slice = rest_current_list;
        }

        Ok((result, input_rest))
    }
}

/// Decodes an RLP item from a slice of bytes.
/// It returns a 3-element tuple with the following elements:
/// - A boolean indicating if the item is a list or not.
/// - The payload of the item, without its prefix.
/// - The remaining bytes after the item.
///
/// Prefixes that a canonical encoder would never produce are rejected, so
/// that re-encoding a decoded item yields the original bytes.
pub fn decode_rlp_item(data: &[u8]) -> Result<(bool, &[u8], &[u8]), RLPDecodeError> {
    let first_byte = *data.first().ok_or(RLPDecodeError::InvalidLength)?;

    match first_byte {
        0..=0x7F => Ok((false, &data[..1], &data[1..])),
        0x80..=0xB7 => {
            let length = (first_byte - 0x80) as usize;
            let payload = data
                .get(1..1 + length)
                .ok_or(RLPDecodeError::InvalidLength)?;
            if length == 1 && payload[0] < RLP_NULL {
                return Err(RLPDecodeError::MalformedData);
            }
            Ok((false, payload, &data[1 + length..]))
        }
        0xB8..=0xBF => {
            let length_of_length = (first_byte - 0xB7) as usize;
            let (length, rest) = decode_long_length(&data[1..], length_of_length)?;
            let payload = rest.get(..length).ok_or(RLPDecodeError::InvalidLength)?;
            Ok((false, payload, &rest[length..]))
        }
        0xC0..=0xF7 => {
            let length = (first_byte - 0xC0) as usize;
            let payload = data
                .get(1..1 + length)
                .ok_or(RLPDecodeError::InvalidLength)?;
            Ok((true, payload, &data[1 + length..]))
        }
        0xF8..=0xFF => {
            let length_of_length = (first_byte - 0xF7) as usize;
            let (length, rest) = decode_long_length(&data[1..], length_of_length)?;
            let payload = rest.get(..length).ok_or(RLPDecodeError::InvalidLength)?;
            Ok((true, payload, &rest[length..]))
        }
    }
}

/// Reads the big-endian length that follows a long-form prefix.
fn decode_long_length(
    data: &[u8],
    length_of_length: usize,
) -> Result<(usize, &[u8]), RLPDecodeError> {
    if length_of_length > std::mem::size_of::<usize>() {
        return Err(RLPDecodeError::InvalidLength);
    }
    let length_bytes = data
        .get(..length_of_length)
        .ok_or(RLPDecodeError::InvalidLength)?;
    // a zero-padded length is not canonical
    if length_bytes.first() == Some(&0) {
        return Err(RLPDecodeError::MalformedData);
    }
    let length = length_bytes
        .iter()
        .fold(0usize, |acc, byte| (acc << 8) | *byte as usize);
    if length < SHORT_PAYLOAD_LIMIT {
        return Err(RLPDecodeError::MalformedData);
    }
    Ok((length, &data[length_of_length..]))
}

/// Decodes the payload of an RLP encoded string.
/// Returns the payload and the remaining bytes.
pub fn decode_bytes(data: &[u8]) -> Result<(&[u8], &[u8]), RLPDecodeError> {
    let (is_list, payload, rest) = decode_rlp_item(data)?;
    if is_list {
        return Err(RLPDecodeError::UnexpectedList);
    }
    Ok((payload, rest))
}

/// Pads a big-endian integer payload to `N` bytes.
/// Integers with leading zero bytes are not canonical and are rejected.
pub fn static_left_pad<const N: usize>(data: &[u8]) -> Result<[u8; N], RLPDecodeError> {
    let mut result = [0; N];

    if data.is_empty() {
        return Ok(result);
    }
    if data[0] == 0 {
        return Err(RLPDecodeError::MalformedData);
    }
    if data.len() > N {
        return Err(RLPDecodeError::InvalidLength);
    }
    let data_start_index = N.saturating_sub(data.len());
    result
        .get_mut(data_start_index..)
        .ok_or(RLPDecodeError::InvalidLength)?
        .copy_from_slice(data);
    Ok(result)
}
