//! Untyped RLP item tree.
//!
//! A [`Node`] keeps every byte string and list exactly as decoded, which makes it
//! suitable for fields that must be re-serialized without being interpreted
//! (such as an access list).

use bytes::{BufMut, Bytes};

use crate::{
    constants::MAX_DEPTH,
    decode::{RLPDecode, decode_rlp_item},
    encode::{RLPEncode, encode_length},
    error::RLPDecodeError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    ByteString(Bytes),
    List(Vec<Node>),
}

impl From<&[u8]> for Node {
    fn from(value: &[u8]) -> Self {
        Node::ByteString(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::List(value)
    }
}

fn decode_node(rlp: &[u8], depth: usize) -> Result<(Node, &[u8]), RLPDecodeError> {
    if depth > MAX_DEPTH {
        return Err(RLPDecodeError::TooDeep(MAX_DEPTH));
    }
    let (is_list, payload, rest) = decode_rlp_item(rlp)?;
    if !is_list {
        return Ok((Node::ByteString(Bytes::copy_from_slice(payload)), rest));
    }

    let mut items = Vec::new();
    let mut current = payload;
    while !current.is_empty() {
        let (item, remaining) = decode_node(current, depth + 1)?;
        items.push(item);
        current = remaining;
    }
    Ok((Node::List(items), rest))
}

impl RLPDecode for Node {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        decode_node(rlp, 0)
    }
}

impl RLPEncode for Node {
    fn encode(&self, buf: &mut dyn BufMut) {
        match self {
            Node::ByteString(bytes) => bytes.encode(buf),
            Node::List(items) => {
                let mut tmp_buf = Vec::new();
                for item in items {
                    item.encode(&mut tmp_buf);
                }
                encode_length(tmp_buf.len(), buf);
                buf.put_slice(&tmp_buf);
            }
        }
    }
}

/// Decodes exactly one item; trailing bytes are an error.
pub fn decode(rlp: &[u8]) -> Result<Node, RLPDecodeError> {
    Node::decode(rlp)
}

pub fn encode(node: &Node) -> Vec<u8> {
    node.encode_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn assert_roundtrip(node: Node) {
        let encoded = encode(&node);
        assert_eq!(decode(&encoded).unwrap(), node);
    }

    #[test]
    fn roundtrip_representative_structures() {
        assert_roundtrip(Node::from(&b""[..]));
        assert_roundtrip(Node::from(&[0x42u8][..]));
        assert_roundtrip(Node::from(&b"dog"[..]));
        assert_roundtrip(Node::from(&[0x5au8; 80][..]));
        assert_roundtrip(Node::List(vec![]));
        assert_roundtrip(Node::List(vec![
            Node::from(&[0x01u8][..]),
            Node::List(vec![Node::List(vec![]), Node::from(&b"cat"[..])]),
            Node::from(&[0x01u8; 56][..]),
        ]));
    }

    #[test]
    fn decodes_set_theoretic_representation_of_three() {
        // [ [], [[]], [ [], [[]] ] ]
        let decoded = decode(&hex!("c7c0c1c0c3c0c1c0")).unwrap();
        let empty = Node::List(vec![]);
        let one = Node::List(vec![empty.clone()]);
        let expected = Node::List(vec![
            empty.clone(),
            one.clone(),
            Node::List(vec![empty, one]),
        ]);
        assert_eq!(decoded, expected);
    }

    #[test]
    fn byte_strings_encode_canonically() {
        assert_eq!(encode(&Node::from(&b""[..])), vec![0x80]);
        assert_eq!(encode(&Node::from(&[0x7fu8][..])), vec![0x7f]);
        assert_eq!(encode(&Node::from(&[0x80u8][..])), hex!("8180").to_vec());
    }

    #[test]
    fn rejects_trailing_bytes() {
        assert_eq!(decode(&hex!("c0c0")), Err(RLPDecodeError::TrailingBytes));
    }

    #[test]
    fn rejects_short_list_payload() {
        assert_eq!(decode(&hex!("c3c0")), Err(RLPDecodeError::InvalidLength));
    }

    #[test]
    fn rejects_excessive_nesting() {
        let mut encoded = vec![0xc0];
        for _ in 0..=MAX_DEPTH {
            let mut wrapped = Vec::new();
            encode_length(encoded.len(), &mut wrapped);
            wrapped.extend_from_slice(&encoded);
            encoded = wrapped;
        }
        assert_eq!(
            decode(&encoded),
            Err(RLPDecodeError::TooDeep(MAX_DEPTH))
        );
    }

    #[test]
    fn decodes_list_of_strings() {
        let node = decode(&hex!("c483646f67")).unwrap();
        assert_eq!(node, Node::List(vec![Node::from(&b"dog"[..])]));
    }
}
