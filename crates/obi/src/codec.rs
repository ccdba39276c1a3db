//! The codec tree built from a schema.

use std::fmt;

use crate::{
    composite::{BytesCodec, StringCodec, StructCodec, VectorCodec},
    errors::{DecodeError, EncodeError},
    integer::{BoolCodec, IntegerCodec},
    value::Value,
};

/// One schema node. Immutable once built; `Send + Sync` and reusable for any
/// number of encode/decode calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codec {
    Integer(IntegerCodec),
    Bool(BoolCodec),
    Vector(VectorCodec),
    Struct(StructCodec),
    String(StringCodec),
    Bytes(BytesCodec),
}

impl Codec {
    /// Name of the [Value] variant this node accepts and produces.
    pub fn kind(&self) -> &'static str {
        match self {
            Codec::Integer(_) => "integer",
            Codec::Bool(_) => "bool",
            Codec::Vector(_) => "vector",
            Codec::Struct(_) => "struct",
            Codec::String(_) => "string",
            Codec::Bytes(_) => "bytes",
        }
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        self.encode_into(value, &mut out)?;
        Ok(out)
    }

    /// Appends the encoding of `value` to `out`. On error `out` may hold a
    /// partial encoding and should be discarded.
    pub fn encode_into(&self, value: &Value, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        match (self, value) {
            (Codec::Integer(codec), Value::Int(v)) => codec.encode_into(v, out),
            (Codec::Bool(codec), Value::Bool(v)) => codec.encode_into(*v, out),
            (Codec::Vector(codec), Value::Vector(v)) => codec.encode_into(v, out),
            (Codec::Struct(codec), Value::Struct(v)) => codec.encode_into(v, out),
            (Codec::String(codec), Value::String(v)) => codec.encode_into(v, out),
            (Codec::Bytes(codec), Value::Bytes(v)) => codec.encode_into(v, out),
            (codec, value) => Err(EncodeError::TypeMismatch {
                expected: codec.kind(),
                found: value.kind(),
            }),
        }
    }

    /// Decodes one value and returns it with the bytes that follow it.
    pub fn decode<'a>(&self, data: &'a [u8]) -> Result<(Value, &'a [u8]), DecodeError> {
        match self {
            Codec::Integer(codec) => codec.decode(data).map(|(v, rest)| (Value::Int(v), rest)),
            Codec::Bool(codec) => codec.decode(data).map(|(v, rest)| (Value::Bool(v), rest)),
            Codec::Vector(codec) => codec.decode(data).map(|(v, rest)| (Value::Vector(v), rest)),
            Codec::Struct(codec) => codec.decode(data).map(|(v, rest)| (Value::Struct(v), rest)),
            Codec::String(codec) => codec
                .decode(data)
                .map(|(v, rest)| (Value::String(v.to_string()), rest)),
            Codec::Bytes(codec) => codec
                .decode(data)
                .map(|(v, rest)| (Value::Bytes(v.to_vec()), rest)),
        }
    }
}

/// Renders the canonical schema text for this tree.
impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Integer(codec) => fmt::Display::fmt(codec, f),
            Codec::Bool(codec) => fmt::Display::fmt(codec, f),
            Codec::Vector(codec) => fmt::Display::fmt(codec, f),
            Codec::Struct(codec) => fmt::Display::fmt(codec, f),
            Codec::String(codec) => fmt::Display::fmt(codec, f),
            Codec::Bytes(codec) => fmt::Display::fmt(codec, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{composite::Field, uint::U256};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_codec_is_shareable() {
        assert_send_sync::<Codec>();
    }

    #[test]
    fn test_type_mismatch() {
        let codec = Codec::Integer(IntegerCodec::U32);
        assert_eq!(
            codec.encode(&Value::from("7")).unwrap_err(),
            EncodeError::TypeMismatch {
                expected: "integer",
                found: "string"
            }
        );

        let codec = Codec::Bytes(BytesCodec);
        assert_eq!(
            codec.encode(&Value::Vector(vec![])).unwrap_err(),
            EncodeError::TypeMismatch {
                expected: "bytes",
                found: "vector"
            }
        );
    }

    #[test]
    fn test_nested_record_list() {
        let record = Codec::Struct(
            StructCodec::new(vec![
                Field::new("id", Codec::Integer(IntegerCodec::U32)),
                Field::new("name", Codec::String(StringCodec)),
            ])
            .unwrap(),
        );
        let codec = Codec::Vector(VectorCodec::new(record));

        let value = Value::Vector(vec![
            [("id", Value::from(0u32)), ("name", Value::from(""))]
                .into_iter()
                .collect(),
            [("id", Value::from(42u32)), ("name", Value::from("eth"))]
                .into_iter()
                .collect(),
        ]);

        let bytes = codec.encode(&value).unwrap();
        assert_eq!(
            bytes,
            vec![
                0, 0, 0, 2, // count
                0, 0, 0, 0, 0, 0, 0, 0, // id 0, empty name
                0, 0, 0, 42, 0, 0, 0, 3, b'e', b't', b'h',
            ]
        );

        let (decoded, rest) = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, value);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_decode_wraps_values() {
        let (value, rest) = Codec::Bool(BoolCodec).decode(&[1, 5]).unwrap();
        assert_eq!(value, Value::Bool(true));
        assert_eq!(rest, &[5]);

        let (value, _) = Codec::Integer(IntegerCodec::U8).decode(&[5]).unwrap();
        assert_eq!(value, Value::Int(U256::from(5u8)));
    }
}
