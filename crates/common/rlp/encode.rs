use bytes::{BufMut, Bytes};
use ethereum_types::{Address, U256};

use crate::constants::{RLP_EMPTY_LIST, RLP_NULL, SHORT_PAYLOAD_LIMIT};

pub trait RLPEncode {
    fn encode(&self, buf: &mut dyn BufMut);

    fn length(&self) -> usize {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf.len()
    }

    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }
}

/// Writes the prefix of a list whose encoded items take `total_len` bytes.
pub fn encode_length(total_len: usize, buf: &mut dyn BufMut) {
    if total_len < SHORT_PAYLOAD_LIMIT {
        buf.put_u8(RLP_EMPTY_LIST + total_len as u8);
    } else {
        let total_len_bytes = total_len.to_be_bytes();
        let len_bytes = minimal_be_bytes(&total_len_bytes);
        buf.put_u8(0xf7 + len_bytes.len() as u8);
        buf.put_slice(len_bytes);
    }
}

/// Strips the leading zero bytes of a big-endian integer.
/// Zero becomes the empty slice.
fn minimal_be_bytes(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|byte| *byte != 0)
        .unwrap_or(bytes.len());
    &bytes[start..]
}

impl RLPEncode for u8 {
    fn encode(&self, buf: &mut dyn BufMut) {
        minimal_be_bytes(&[*self]).encode(buf)
    }
}

impl RLPEncode for u64 {
    fn encode(&self, buf: &mut dyn BufMut) {
        minimal_be_bytes(&self.to_be_bytes()).encode(buf)
    }
}

impl RLPEncode for U256 {
    fn encode(&self, buf: &mut dyn BufMut) {
        minimal_be_bytes(&self.to_big_endian()).encode(buf)
    }
}

impl RLPEncode for [u8] {
    fn encode(&self, buf: &mut dyn BufMut) {
        if self.len() == 1 && self[0] < RLP_NULL {
            buf.put_u8(self[0]);
        } else if self.len() < SHORT_PAYLOAD_LIMIT {
            buf.put_u8(RLP_NULL + self.len() as u8);
            buf.put_slice(self);
        } else {
            let len_bytes = minimal_be_bytes(&self.len().to_be_bytes()).to_vec();
            buf.put_u8(0xb7 + len_bytes.len() as u8);
            buf.put_slice(&len_bytes);
            buf.put_slice(self);
        }
    }
}

impl<const N: usize> RLPEncode for [u8; N] {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_slice().encode(buf)
    }
}

impl RLPEncode for Bytes {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_ref().encode(buf)
    }
}

impl RLPEncode for Address {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }
}

impl<T: RLPEncode> RLPEncode for Vec<T> {
    fn encode(&self, buf: &mut dyn BufMut) {
        if self.is_empty() {
            buf.put_u8(RLP_EMPTY_LIST);
        } else {
            let mut tmp_buf = vec![];
            for item in self {
                item.encode(&mut tmp_buf);
            }
            encode_length(tmp_buf.len(), buf);
            buf.put_slice(&tmp_buf);
        }
    }
}
