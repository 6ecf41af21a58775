use thiserror::Error;

/// Errors that can occur during bencode encoding or decoding.
#[derive(Debug, Error)]
pub enum BencodeError {
    /// Input ended before a complete value was parsed.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Integer is malformed (empty, `-0`, leading zeros, or overflow).
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// Byte string length prefix is not a valid number.
    #[error("invalid string length")]
    InvalidStringLength,

    /// Byte string length prefix runs past the end of the input.
    #[error("string length exceeds input")]
    LengthExceedsInput,

    /// Encountered a byte that starts no bencode value.
    #[error("unexpected character: {0}")]
    UnexpectedChar(char),

    /// Dictionary key is not a byte string.
    #[error("dictionary key is not a string")]
    InvalidDictKey,

    /// The same dictionary key appeared twice.
    #[error("duplicate dictionary key")]
    DuplicateKey,

    /// Extra data exists after the bencode value.
    #[error("trailing data after value")]
    TrailingData,

    /// Recursion limit exceeded to prevent stack overflow.
    #[error("nesting too deep")]
    NestingTooDeep,

    /// I/O error during encoding.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
