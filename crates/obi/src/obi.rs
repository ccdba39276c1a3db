//! Input/output codec pair built from an `"<input>/<output>"` schema.

use std::{fmt, str::FromStr};

use tracing::{debug, trace};

use crate::{
    codec::Codec,
    errors::{DecodeError, EncodeError, SchemaError, Side},
    schema,
    value::Value,
};

/// Separates the input and output halves of a facade schema.
pub const SIDE_SEPARATOR: char = '/';

/// Paired codecs for a request (input) and its response (output).
///
/// Top-level decodes must consume the whole buffer: the wire format has no
/// framing, so leftover bytes always mean a schema mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obi {
    input: Codec,
    output: Codec,
}

impl Obi {
    /// Builds both codecs. All whitespace in `schema` is ignored.
    pub fn new(schema: &str) -> Result<Self, SchemaError> {
        let normalized: String = schema.chars().filter(|c| !c.is_whitespace()).collect();

        let mut halves = normalized.split(SIDE_SEPARATOR);
        let (input, output) = match (halves.next(), halves.next(), halves.next()) {
            (Some(input), Some(output), None) if !input.is_empty() && !output.is_empty() => {
                (input, output)
            }
            _ => return Err(SchemaError::InvalidFormat),
        };

        let obi = Obi {
            input: schema::parse(input)?,
            output: schema::parse(output)?,
        };
        debug!(input = %obi.input, output = %obi.output, "built obi codec pair");
        Ok(obi)
    }

    pub fn input(&self) -> &Codec {
        &self.input
    }

    pub fn output(&self) -> &Codec {
        &self.output
    }

    pub fn encode_input(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        encode_side(&self.input, Side::Input, value)
    }

    pub fn decode_input(&self, data: &[u8]) -> Result<Value, DecodeError> {
        decode_side(&self.input, Side::Input, data)
    }

    pub fn encode_output(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        encode_side(&self.output, Side::Output, value)
    }

    pub fn decode_output(&self, data: &[u8]) -> Result<Value, DecodeError> {
        decode_side(&self.output, Side::Output, data)
    }
}

fn encode_side(codec: &Codec, side: Side, value: &Value) -> Result<Vec<u8>, EncodeError> {
    let bytes = codec.encode(value).map_err(|source| EncodeError::Side {
        side,
        source: Box::new(source),
    })?;

    trace!(%side, len = bytes.len(), "encoded");
    Ok(bytes)
}

fn decode_side(codec: &Codec, side: Side, data: &[u8]) -> Result<Value, DecodeError> {
    let (value, rest) = codec.decode(data)?;
    if !rest.is_empty() {
        return Err(DecodeError::ExtraBytes {
            side,
            remaining: rest.len(),
        });
    }

    trace!(%side, len = data.len(), "decoded");
    Ok(value)
}

impl FromStr for Obi {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Obi::new(s)
    }
}

impl fmt::Display for Obi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SIDE_SEPARATOR}{}", self.input, self.output)
    }
}
