//! Crate-wide error taxonomy.
//!
//! Every decode/encode/ABI-resolution failure surfaces as one of these variants. There
//! is no in-library recovery or retry: errors propagate to the root call via `?`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Decoder requested bytes beyond the source or current frame end.
    #[error("unexpected end of input: needed {needed} bytes, {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Varuint32 exceeded 5 bytes, or its decoded value is >= 2^32.
    #[error("invalid varint: {0}")]
    InvalidVarint(&'static str),

    /// An optional presence byte or bool byte was neither 0 nor 1.
    #[error("invalid tag byte: expected 0 or 1, found {0}")]
    InvalidTag(u8),

    /// A variant discriminant was >= the number of declared arms.
    #[error("variant discriminant {discriminant} out of range (arm count {arm_count})")]
    VariantOutOfRange { discriminant: u32, arm_count: u32 },

    /// A pack-inside-bytes sub-decode consumed fewer bytes than its declared length.
    #[error("underfull frame: declared {declared} bytes, consumed {consumed}")]
    UnderfullFrame { declared: usize, consumed: usize },

    /// A pack-inside-bytes sub-decode requested more bytes than its declared length allowed.
    #[error("overfull frame: declared {declared} bytes, requested {requested}")]
    OverfullFrame { declared: usize, requested: usize },

    /// A `Name` string contained a character outside the allowed alphabet, or exceeded 13 characters.
    #[error("invalid name string: {0}")]
    InvalidName(&'static str),

    /// A public/private key or signature had an unknown curve tag, a bad checksum, or invalid base58.
    #[error("invalid key or signature: {0}")]
    InvalidKey(&'static str),

    /// An ABI referenced a type name that resolves to neither a primitive, struct, variant, nor alias.
    #[error("unknown ABI type: {0}")]
    UnknownType(String),

    /// An ABI alias chain revisited a type name it had already seen while resolving.
    #[error("cyclic ABI alias at: {0}")]
    CyclicAlias(String),

    /// The encoder was asked to encode a value whose schema it cannot interpret
    /// (an ABI struct/variant field mismatch, or a variant with no arm selected).
    #[error("unsupported value: {0}")]
    UnsupportedValue(&'static str),

    /// A malformed ABI JSON document.
    #[error("invalid ABI JSON: {0}")]
    InvalidAbi(#[from] serde_json::Error),

    /// Underlying reader/writer failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
