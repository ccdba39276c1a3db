//! Error types for schema parsing, encoding and decoding.
//!
//! Every failure is terminal: codecs never substitute values or return partial
//! results. Composite codecs only wrap a child failure to record where it
//! happened (a struct key, or the input/output side of an [crate::Obi]).

use std::fmt;

use crate::uint::U256;

/// Which half of an [crate::Obi] schema an operation ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Input,
    Output,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Input => f.write_str("input"),
            Side::Output => f.write_str("output"),
        }
    }
}

/// Errors produced when turning a schema string into a [crate::Codec].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// No known type form matches the token.
    #[error("no schema matched: <{schema}>")]
    NoMatch { schema: String },

    /// A `,` closed a struct field whose key or type was empty.
    #[error("invalid struct field format at byte {offset}")]
    InvalidField { offset: usize },

    /// Struct body produced zero fields.
    #[error("struct must have at least one field")]
    EmptyStruct,

    /// The struct body never returned to depth 0 before the end of input.
    #[error("unterminated struct: <{schema}>")]
    UnterminatedStruct { schema: String },

    /// Text follows the brace that terminated a struct.
    #[error("unexpected trailing input <{rest}> after struct")]
    TrailingInput { rest: String },

    /// The type of a struct field could not be parsed.
    #[error("failed to parse struct field \"{key}\": {source}")]
    Field {
        key: String,
        #[source]
        source: Box<SchemaError>,
    },

    /// Vectors and structs are nested deeper than the parser allows.
    #[error("schema nesting exceeds {limit} levels")]
    TooDeep { limit: usize },

    /// A facade schema was not of the form `input/output`.
    #[error("schema must be in the format \"input/output\"")]
    InvalidFormat,
}

/// Errors produced when a value does not conform to its codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// Integer does not fit the declared width.
    #[error("value {value} exceeds maximum size for {bits} bits")]
    Overflow { value: U256, bits: u16 },

    /// A struct field declared by the schema is absent from the value.
    #[error("missing field \"{key}\" in struct")]
    MissingField { key: String },

    /// The value variant does not match the schema node.
    #[error("expected {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Sequence or byte length does not fit the 4-byte length prefix.
    #[error("length {len} does not fit a 32-bit length prefix")]
    LengthOverflow { len: usize },

    /// A struct field failed to encode.
    #[error("failed to encode struct field \"{key}\": {source}")]
    Field {
        key: String,
        #[source]
        source: Box<EncodeError>,
    },

    /// A facade-level encode failed.
    #[error("failed to encode {side}: {source}")]
    Side {
        side: Side,
        #[source]
        source: Box<EncodeError>,
    },
}

impl EncodeError {
    /// Walks nested context and returns the innermost failure.
    pub fn root_cause(&self) -> &EncodeError {
        match self {
            EncodeError::Field { source, .. } | EncodeError::Side { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

/// Errors produced when a byte buffer does not match its codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Fewer bytes remain than a fixed-width or length-prefixed field needs.
    #[error("not enough bytes: expected {expected}, got {actual}")]
    NotEnoughBytes { expected: usize, actual: usize },

    /// A boolean byte other than 0 or 1.
    #[error("boolean value must be 0 or 1, got {value}")]
    InvalidBool { value: U256 },

    /// String payload is not valid UTF-8.
    #[error("invalid utf-8 in string: {source}")]
    InvalidUtf8 {
        #[source]
        source: std::str::Utf8Error,
    },

    /// A length prefix does not fit in `usize` on this platform.
    #[error("length prefix {len} exceeds addressable memory")]
    LengthOverflow { len: U256 },

    /// A struct field failed to decode.
    #[error("failed to decode struct field \"{key}\": {source}")]
    Field {
        key: String,
        #[source]
        source: Box<DecodeError>,
    },

    /// Bytes were left over after a facade-level decode.
    #[error("extra bytes found after decoding {side}: {remaining} left")]
    ExtraBytes { side: Side, remaining: usize },
}

impl DecodeError {
    /// Walks nested context and returns the innermost failure.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
