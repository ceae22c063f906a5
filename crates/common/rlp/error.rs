use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RLPDecodeError {
    #[error("InvalidLength")]
    InvalidLength,
    #[error("MalformedData")]
    MalformedData,
    #[error("UnexpectedList")]
    UnexpectedList,
    #[error("UnexpectedString")]
    UnexpectedString,
    #[error("Trailing bytes after the encoded item")]
    TrailingBytes,
    #[error("List nesting exceeds {0} levels")]
    TooDeep(usize),
    #[error("Missing field '{0}'")]
    MissingField(String),
    #[error("Unexpected extra fields after '{0}'")]
    UnexpectedFieldCount(String),
    #[error("{0}")]
    Custom(String),
}
