/// Encoding of the empty string, also used for zero and for a missing recipient.
pub const RLP_NULL: u8 = 0x80;

/// Encoding of the empty list.
pub const RLP_EMPTY_LIST: u8 = 0xc0;

/// Payloads shorter than this use the single-byte prefix form.
pub const SHORT_PAYLOAD_LIMIT: usize = 56;

/// Maximum nesting of lists accepted by the decoder.
pub const MAX_DEPTH: usize = 64;
