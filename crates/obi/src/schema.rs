//! Schema grammar: turns schema text into a [Codec] tree.
//!
//! ```text
//! schema  := integer | "bool" | vector | struct | "string" | "bytes"
//! integer := ("u"|"i") ("8"|"16"|"32"|"64"|"128"|"256")
//! vector  := "[" schema "]"
//! struct  := "{" field ("," field)* "}"
//! field   := identifier ":" schema
//! ```
//!
//! Each form is tried in a fixed order against the whole token. Composite
//! forms recurse on sub-slices of the input, so parsing never copies schema
//! text. Whitespace is not stripped here (see [crate::Obi::new]), apart from
//! trimming around struct keys and field types.
//!
//! Nesting is capped at [MAX_DEPTH] composite levels so that hostile schema
//! text fails with [SchemaError::TooDeep] instead of exhausting the stack.

use std::str::FromStr;

use tracing::{debug, trace};

use crate::{
    codec::Codec,
    composite::{BytesCodec, Field, StringCodec, StructCodec, VectorCodec},
    errors::SchemaError,
    integer::{BoolCodec, IntegerCodec},
};

type Recognizer = fn(&str) -> bool;
type Constructor = fn(&str, usize) -> Result<Codec, SchemaError>;

/// Deepest vector/struct nesting a schema may use. The root node is depth 0.
pub const MAX_DEPTH: usize = 128;

/// Schema forms in match priority order.
const FORMS: [(Recognizer, Constructor); 6] = [
    (is_integer, parse_integer),
    (is_bool, parse_bool),
    (is_vector, parse_vector),
    (is_struct, parse_struct),
    (is_string, parse_string),
    (is_bytes, parse_bytes),
];

/// Parses a full schema string into a codec tree.
pub fn parse(schema: &str) -> Result<Codec, SchemaError> {
    parse_node(schema, 0).inspect_err(|err| debug!(schema, error = %err, "schema rejected"))
}

impl FromStr for Codec {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

fn parse_node(schema: &str, depth: usize) -> Result<Codec, SchemaError> {
    if depth > MAX_DEPTH {
        return Err(SchemaError::TooDeep { limit: MAX_DEPTH });
    }

    let (_, construct) = FORMS
        .iter()
        .find(|(recognize, _)| recognize(schema))
        .ok_or_else(|| SchemaError::NoMatch {
            schema: schema.to_string(),
        })?;

    let codec = construct(schema, depth)?;
    trace!(schema, kind = codec.kind(), "parsed schema node");
    Ok(codec)
}

/// Splits an integer token into its sign flag and bit width.
fn integer_parts(schema: &str) -> Option<(bool, u16)> {
    let signed = match schema.as_bytes().first()? {
        b'u' => false,
        b'i' => true,
        _ => return None,
    };

    let bits = match &schema[1..] {
        "8" => 8,
        "16" => 16,
        "32" => 32,
        "64" => 64,
        "128" => 128,
        "256" => 256,
        _ => return None,
    };

    Some((signed, bits))
}

fn is_integer(schema: &str) -> bool {
    integer_parts(schema).is_some()
}

fn parse_integer(schema: &str, _: usize) -> Result<Codec, SchemaError> {
    integer_parts(schema)
        .and_then(|(signed, bits)| IntegerCodec::new(signed, bits))
        .map(Codec::Integer)
        .ok_or_else(|| SchemaError::NoMatch {
            schema: schema.to_string(),
        })
}

fn is_bool(schema: &str) -> bool {
    schema == "bool"
}

fn parse_bool(_: &str, _: usize) -> Result<Codec, SchemaError> {
    Ok(Codec::Bool(BoolCodec))
}

fn is_vector(schema: &str) -> bool {
    schema.len() >= 2 && schema.starts_with('[') && schema.ends_with(']')
}

fn parse_vector(schema: &str, depth: usize) -> Result<Codec, SchemaError> {
    let item = parse_node(&schema[1..schema.len() - 1], depth + 1)?;
    Ok(Codec::Vector(VectorCodec::new(item)))
}

fn is_struct(schema: &str) -> bool {
    schema.len() >= 2 && schema.starts_with('{') && schema.ends_with('}')
}

/// Single pass over the struct body tracking brace depth.
///
/// At depth 0 the first `:` ends the key, `,` closes a field and `}` ends
/// the struct. Everything at depth > 0 belongs to the current field's type
/// and is handed to [parse_node] as one slice.
fn parse_struct(schema: &str, depth: usize) -> Result<Codec, SchemaError> {
    let bytes = schema.as_bytes();
    let mut fields = Vec::new();
    let mut depth = 0usize;
    let mut key_start = 1;
    let mut colon: Option<usize> = None;

    for (pos, byte) in bytes.iter().enumerate().skip(1) {
        match *byte {
            b'{' => depth += 1,
            b'}' if depth > 0 => depth -= 1,
            b'}' => {
                if let Some(colon) = colon {
                    let key = schema[key_start..colon].trim();
                    let value = schema[colon + 1..pos].trim();
                    if !key.is_empty() && !value.is_empty() {
                        fields.push(parse_field(key, value, depth + 1)?);
                    }
                }

                let rest = &schema[pos + 1..];
                if !rest.is_empty() {
                    return Err(SchemaError::TrailingInput {
                        rest: rest.to_string(),
                    });
                }

                return StructCodec::new(fields).map(Codec::Struct);
            }
            b':' if depth == 0 && colon.is_none() => colon = Some(pos),
            b',' if depth == 0 => {
                let (key, value) = match colon {
                    Some(colon) => (
                        schema[key_start..colon].trim(),
                        schema[colon + 1..pos].trim(),
                    ),
                    None => ("", ""),
                };

                if key.is_empty() || value.is_empty() {
                    return Err(SchemaError::InvalidField { offset: pos });
                }

                fields.push(parse_field(key, value, depth + 1)?);
                key_start = pos + 1;
                colon = None;
            }
            _ => {}
        }
    }

    Err(SchemaError::UnterminatedStruct {
        schema: schema.to_string(),
    })
}

fn parse_field(key: &str, value: &str, depth: usize) -> Result<Field, SchemaError> {
    let codec = parse_node(value, depth).map_err(|source| SchemaError::Field {
        key: key.to_string(),
        source: Box::new(source),
    })?;

    Ok(Field::new(key, codec))
}

fn is_string(schema: &str) -> bool {
    schema == "string"
}

fn parse_string(_: &str, _: usize) -> Result<Codec, SchemaError> {
    Ok(Codec::String(StringCodec))
}

fn is_bytes(schema: &str) -> bool {
    schema == "bytes"
}

fn parse_bytes(_: &str, _: usize) -> Result<Codec, SchemaError> {
    Ok(Codec::Bytes(BytesCodec))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_match(schema: &str) -> SchemaError {
        SchemaError::NoMatch {
            schema: schema.to_string(),
        }
    }

    #[test]
    fn test_parse_integers() {
        for bits in crate::integer::INTEGER_BITS {
            let unsigned = parse(&format!("u{bits}")).unwrap();
            assert_eq!(
                unsigned,
                Codec::Integer(IntegerCodec::new(false, bits).unwrap())
            );

            let Codec::Integer(signed) = parse(&format!("i{bits}")).unwrap() else {
                panic!("expected integer codec");
            };
            assert!(signed.is_signed());
            assert_eq!(signed.bits(), bits);
        }
    }

    #[test]
    fn test_reject_unknown_tokens() {
        for schema in ["u24", "U8", "u08", "u+8", "int", "", "boolean", "u8 "] {
            assert_eq!(parse(schema).unwrap_err(), no_match(schema));
        }
    }

    #[test]
    fn test_parse_leaves() {
        assert_eq!(parse("bool").unwrap(), Codec::Bool(BoolCodec));
        assert_eq!(parse("string").unwrap(), Codec::String(StringCodec));
        assert_eq!(parse("bytes").unwrap(), Codec::Bytes(BytesCodec));
    }

    #[test]
    fn test_parse_vector() {
        let codec = parse("[[u64]]").unwrap();
        assert_eq!(
            codec,
            Codec::Vector(VectorCodec::new(Codec::Vector(VectorCodec::new(
                Codec::Integer(IntegerCodec::new(false, 64).unwrap())
            ))))
        );

        assert_eq!(parse("[]").unwrap_err(), no_match(""));
        assert_eq!(parse("[u8][u8]").unwrap_err(), no_match("u8][u8"));
    }

    #[test]
    fn test_parse_struct_keeps_declared_order() {
        let Codec::Struct(codec) = parse("{zeta:u8,alpha:string}").unwrap() else {
            panic!("expected struct codec");
        };

        let keys: Vec<&str> = codec.fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_parse_nested_composites() {
        let schema = "{symbols:[string],feeds:[{id:u32,meta:{ok:bool,raw:bytes}}],n:i256}";
        let codec = parse(schema).unwrap();
        assert_eq!(codec.to_string(), schema);
    }

    #[test]
    fn test_parse_struct_trims_keys_and_types() {
        let codec = parse("{ a : u8 , b :[ string ] }");
        // The vector token itself is not trimmed inside its brackets.
        assert_eq!(
            codec.unwrap_err(),
            SchemaError::Field {
                key: "b".to_string(),
                source: Box::new(no_match(" string ")),
            }
        );

        assert_eq!(parse("{ a : u8 , b : bool }").unwrap().to_string(), "{a:u8,b:bool}");
    }

    #[test]
    fn test_parse_struct_errors() {
        assert_eq!(parse("{}").unwrap_err(), SchemaError::EmptyStruct);
        assert_eq!(parse("{a}").unwrap_err(), SchemaError::EmptyStruct);
        assert_eq!(
            parse("{,a:u8}").unwrap_err(),
            SchemaError::InvalidField { offset: 1 }
        );
        assert_eq!(
            parse("{a:,b:u8}").unwrap_err(),
            SchemaError::InvalidField { offset: 3 }
        );
        assert_eq!(parse("{a:u8").unwrap_err(), no_match("{a:u8"));
        // Only the first colon at depth 0 separates key from type.
        assert_eq!(
            parse("{a:u:8}").unwrap_err(),
            SchemaError::Field {
                key: "a".to_string(),
                source: Box::new(no_match("u:8")),
            }
        );
        assert_eq!(
            parse("{a:u9}").unwrap_err(),
            SchemaError::Field {
                key: "a".to_string(),
                source: Box::new(no_match("u9")),
            }
        );
    }

    #[test]
    fn test_parse_struct_trailing_comma() {
        assert_eq!(parse("{a:u8,}").unwrap().to_string(), "{a:u8}");
    }

    #[test]
    fn test_parse_struct_unbalanced() {
        assert_eq!(
            parse("{x:u8,a:{b:u8}").unwrap_err(),
            SchemaError::UnterminatedStruct {
                schema: "{x:u8,a:{b:u8}".to_string()
            }
        );
        assert_eq!(
            parse("{a:u8}x}").unwrap_err(),
            SchemaError::TrailingInput {
                rest: "x}".to_string()
            }
        );
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |levels: usize| format!("{}u8{}", "[".repeat(levels), "]".repeat(levels));

        assert!(parse(&nested(MAX_DEPTH)).is_ok());
        assert_eq!(
            parse(&nested(MAX_DEPTH + 1)).unwrap_err(),
            SchemaError::TooDeep { limit: MAX_DEPTH }
        );
        assert_eq!(
            parse(&nested(5_000)).unwrap_err(),
            SchemaError::TooDeep { limit: MAX_DEPTH }
        );
    }

    #[test]
    fn test_struct_nesting_counts_toward_limit() {
        let nested = |levels: usize| format!("{}u8{}", "{a:".repeat(levels), "}".repeat(levels));

        assert!(parse(&nested(MAX_DEPTH)).is_ok());

        let err = parse(&nested(5_000)).unwrap_err();
        let mut cause = &err;
        while let SchemaError::Field { source, .. } = cause {
            cause = source.as_ref();
        }
        assert_eq!(cause, &SchemaError::TooDeep { limit: MAX_DEPTH });
    }

    #[test]
    fn test_parse_duplicate_keys_allowed() {
        let Codec::Struct(codec) = parse("{a:u8,a:u16}").unwrap() else {
            panic!("expected struct codec");
        };
        assert_eq!(codec.fields().len(), 2);
    }

    #[test]
    fn test_from_str() {
        let codec: Codec = "[bool]".parse().unwrap();
        assert_eq!(codec.kind(), "vector");
    }
}
