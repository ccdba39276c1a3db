//! Composite codecs: vectors, structs, strings and bytes.
//!
//! Every variable-size value is preceded by a 4-byte big-endian length
//! ([LENGTH_PREFIX_BYTES]): an item count for vectors, a byte count for
//! strings and bytes. Structs have no prefix; their fields follow each other
//! in schema order.

use std::{collections::BTreeMap, fmt};

use crate::{
    codec::Codec,
    errors::{DecodeError, EncodeError, SchemaError},
    integer::IntegerCodec,
    uint::U256,
    value::Value,
};

const LENGTH_PREFIX: IntegerCodec = IntegerCodec::U32;

/// Size of every length prefix on the wire.
pub const LENGTH_PREFIX_BYTES: usize = LENGTH_PREFIX.width_bytes();

fn encode_len(len: usize, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let len32 = u32::try_from(len).map_err(|_| EncodeError::LengthOverflow { len })?;
    out.reserve(LENGTH_PREFIX_BYTES + len);
    LENGTH_PREFIX.encode_into(&U256::from(len32), out)
}

fn decode_len(data: &[u8]) -> Result<(usize, &[u8]), DecodeError> {
    let (len, rest) = LENGTH_PREFIX.decode(data)?;
    let len = usize::try_from(len).map_err(|_| DecodeError::LengthOverflow { len })?;
    Ok((len, rest))
}

/// Splits off `len` bytes after a length prefix has been read.
fn take(data: &[u8], len: usize) -> Result<(&[u8], &[u8]), DecodeError> {
    if data.len() < len {
        return Err(DecodeError::NotEnoughBytes {
            expected: len,
            actual: data.len(),
        });
    }

    Ok(data.split_at(len))
}

/// `[T]`: item count followed by each item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorCodec {
    item: Box<Codec>,
}

impl VectorCodec {
    pub fn new(item: Codec) -> Self {
        VectorCodec {
            item: Box::new(item),
        }
    }

    pub fn item(&self) -> &Codec {
        &self.item
    }

    /// Item failures are returned unchanged.
    pub fn encode_into(&self, items: &[Value], out: &mut Vec<u8>) -> Result<(), EncodeError> {
        encode_len(items.len(), out)?;
        for item in items {
            self.item.encode_into(item, out)?;
        }

        Ok(())
    }

    pub fn decode<'a>(&self, data: &'a [u8]) -> Result<(Vec<Value>, &'a [u8]), DecodeError> {
        let (len, mut rest) = decode_len(data)?;

        // Every item takes at least one byte, so a forged length cannot
        // reserve more than the input could hold.
        let mut items = Vec::with_capacity(len.min(rest.len()));
        for _ in 0..len {
            let (item, next) = self.item.decode(rest)?;
            items.push(item);
            rest = next;
        }

        Ok((items, rest))
    }
}

impl fmt::Display for VectorCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.item)
    }
}

/// One named member of a [StructCodec].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub codec: Codec,
}

impl Field {
    pub fn new(key: impl Into<String>, codec: Codec) -> Self {
        Field {
            key: key.into(),
            codec,
        }
    }
}

/// `{k:T,...}`: fields encoded back to back in declaration order.
///
/// Keys are not checked for duplicates. When a key repeats, both fields are
/// encoded from the same map entry and the later one wins on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructCodec {
    fields: Vec<Field>,
}

impl StructCodec {
    pub fn new(fields: Vec<Field>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::EmptyStruct);
        }

        Ok(StructCodec { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn encode_into(
        &self,
        value: &BTreeMap<String, Value>,
        out: &mut Vec<u8>,
    ) -> Result<(), EncodeError> {
        for field in &self.fields {
            let item = value.get(&field.key).ok_or_else(|| EncodeError::MissingField {
                key: field.key.clone(),
            })?;

            field
                .codec
                .encode_into(item, out)
                .map_err(|source| EncodeError::Field {
                    key: field.key.clone(),
                    source: Box::new(source),
                })?;
        }

        Ok(())
    }

    pub fn decode<'a>(
        &self,
        data: &'a [u8],
    ) -> Result<(BTreeMap<String, Value>, &'a [u8]), DecodeError> {
        let mut map = BTreeMap::new();
        let mut rest = data;

        for field in &self.fields {
            let (value, next) = field
                .codec
                .decode(rest)
                .map_err(|source| DecodeError::Field {
                    key: field.key.clone(),
                    source: Box::new(source),
                })?;
            map.insert(field.key.clone(), value);
            rest = next;
        }

        Ok((map, rest))
    }
}

impl fmt::Display for StructCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", field.key, field.codec)?;
        }
        f.write_str("}")
    }
}

/// UTF-8 text with a byte-length prefix. Invalid UTF-8 fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StringCodec;

impl StringCodec {
    pub fn encode_into(&self, value: &str, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        encode_len(value.len(), out)?;
        out.extend_from_slice(value.as_bytes());
        Ok(())
    }

    pub fn decode<'a>(&self, data: &'a [u8]) -> Result<(&'a str, &'a [u8]), DecodeError> {
        let (len, rest) = decode_len(data)?;
        let (raw, rest) = take(rest, len)?;
        let text = std::str::from_utf8(raw).map_err(|source| DecodeError::InvalidUtf8 { source })?;
        Ok((text, rest))
    }
}

impl fmt::Display for StringCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("string")
    }
}

/// Opaque bytes with a length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BytesCodec;

impl BytesCodec {
    pub fn encode_into(&self, value: &[u8], out: &mut Vec<u8>) -> Result<(), EncodeError> {
        encode_len(value.len(), out)?;
        out.extend_from_slice(value);
        Ok(())
    }

    pub fn decode<'a>(&self, data: &'a [u8]) -> Result<(&'a [u8], &'a [u8]), DecodeError> {
        let (len, rest) = decode_len(data)?;
        take(rest, len)
    }
}

impl fmt::Display for BytesCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("bytes")
    }
}
