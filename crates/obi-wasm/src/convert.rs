//! Conversions between JavaScript values and [obi::Value].
//!
//! JavaScript has no 256-bit integers and no distinction between a list of
//! numbers and a byte string, so incoming values are converted under the
//! guidance of the codec tree they are about to be encoded with. Outgoing
//! values follow the shapes JS callers of the codec expect: every integer
//! is a `BigInt` and every byte string a `Uint8Array`.

use js_sys::{Array, BigInt, Object, Reflect, Uint8Array};
use obi::{Codec, U256, Value, uint::UintError};
use wasm_bindgen::{JsCast, JsValue};

/// Largest integer a JavaScript number holds exactly (`2^53 - 1`).
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("{path}: expected {expected}, found {found}")]
    Mismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{path}: {source}")]
    Integer {
        path: String,
        #[source]
        source: UintError,
    },

    #[error("{path}: {value} is not a non-negative safe integer")]
    Number { path: String, value: String },

    #[error("{path}: invalid byte {value}")]
    Byte { path: String, value: String },

    #[error("{path}: {message}")]
    Js { path: String, message: String },
}

fn js_kind(value: &JsValue) -> &'static str {
    if value.is_null() {
        "null"
    } else if value.is_undefined() {
        "undefined"
    } else if value.as_bool().is_some() {
        "boolean"
    } else if value.as_f64().is_some() {
        "number"
    } else if value.is_bigint() {
        "bigint"
    } else if value.is_string() {
        "string"
    } else if value.is_instance_of::<Uint8Array>() {
        "Uint8Array"
    } else if Array::is_array(value) {
        "array"
    } else if value.is_object() {
        "object"
    } else {
        "unknown"
    }
}

/// Parses a decimal or `0x` hex integer. A leading `-` is reported as a
/// negative number rather than a bad digit.
pub fn integer_from_str(text: &str, path: &str) -> Result<U256, ConvertError> {
    if text.starts_with('-') {
        return Err(ConvertError::Number {
            path: path.to_string(),
            value: text.to_string(),
        });
    }

    text.parse::<U256>()
        .map_err(|source| ConvertError::Integer {
            path: path.to_string(),
            source,
        })
}

/// Accepts only integral numbers in `0..=MAX_SAFE_INTEGER`; anything larger
/// must arrive as a `BigInt` or a string.
pub fn integer_from_f64(n: f64, path: &str) -> Result<U256, ConvertError> {
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= MAX_SAFE_INTEGER as f64 {
        Ok(U256::from(n as u64))
    } else {
        Err(ConvertError::Number {
            path: path.to_string(),
            value: n.to_string(),
        })
    }
}

pub fn byte_from_f64(n: f64, path: &str) -> Result<u8, ConvertError> {
    if n.fract() == 0.0 && (0.0..=255.0).contains(&n) {
        Ok(n as u8)
    } else {
        Err(ConvertError::Byte {
            path: path.to_string(),
            value: n.to_string(),
        })
    }
}

/// Decodes a `0x`-prefixed, even-length hex string.
pub fn decode_hex(s: &str, path: &str) -> Result<Vec<u8>, ConvertError> {
    let invalid = || ConvertError::Byte {
        path: path.to_string(),
        value: s.to_string(),
    };

    let digits = s.strip_prefix("0x").ok_or_else(invalid)?;
    if digits.len() % 2 != 0 {
        return Err(invalid());
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(invalid)
        })
        .collect()
}

/// Converts `value` into a [Value] shaped for `codec`.
///
/// Missing or `undefined` struct keys are left out so the codec reports
/// them; unknown keys are ignored.
pub fn js_to_value(codec: &Codec, value: &JsValue) -> Result<Value, ConvertError> {
    convert_at(codec, value, "$")
}

fn convert_at(codec: &Codec, value: &JsValue, path: &str) -> Result<Value, ConvertError> {
    let mismatch = || ConvertError::Mismatch {
        path: path.to_string(),
        expected: codec.kind(),
        found: js_kind(value),
    };

    match codec {
        Codec::Integer(_) => {
            if let Some(n) = value.as_f64() {
                integer_from_f64(n, path).map(Value::Int)
            } else if let Some(big) = value.dyn_ref::<BigInt>() {
                let text = big.to_string(10).map_err(|err| ConvertError::Js {
                    path: path.to_string(),
                    message: String::from(err.message()),
                })?;
                integer_from_str(&String::from(text), path).map(Value::Int)
            } else if let Some(text) = value.as_string() {
                integer_from_str(&text, path).map(Value::Int)
            } else {
                Err(mismatch())
            }
        }
        Codec::Bool(_) => value.as_bool().map(Value::Bool).ok_or_else(mismatch),
        Codec::String(_) => value.as_string().map(Value::String).ok_or_else(mismatch),
        Codec::Bytes(_) => {
            if let Some(raw) = value.dyn_ref::<Uint8Array>() {
                Ok(Value::Bytes(raw.to_vec()))
            } else if Array::is_array(value) {
                Array::from(value)
                    .iter()
                    .map(|item| match item.as_f64() {
                        Some(n) => byte_from_f64(n, path),
                        None => Err(ConvertError::Byte {
                            path: path.to_string(),
                            value: js_kind(&item).to_string(),
                        }),
                    })
                    .collect::<Result<Vec<u8>, _>>()
                    .map(Value::Bytes)
            } else if let Some(text) = value.as_string() {
                decode_hex(&text, path).map(Value::Bytes)
            } else {
                Err(mismatch())
            }
        }
        Codec::Vector(vector) => {
            if !Array::is_array(value) {
                return Err(mismatch());
            }

            Array::from(value)
                .iter()
                .enumerate()
                .map(|(i, item)| convert_at(vector.item(), &item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Vector)
        }
        Codec::Struct(fields) => {
            if !value.is_object() || Array::is_array(value) {
                return Err(mismatch());
            }

            let mut map = std::collections::BTreeMap::new();
            for field in fields.fields() {
                let field_path = format!("{path}.{}", field.key);
                let item = Reflect::get(value, &JsValue::from_str(&field.key)).map_err(|err| {
                    ConvertError::Js {
                        path: field_path.clone(),
                        message: js_message(&err),
                    }
                })?;

                if !item.is_undefined() {
                    map.insert(field.key.clone(), convert_at(&field.codec, &item, &field_path)?);
                }
            }

            Ok(Value::Struct(map))
        }
    }
}

fn js_message(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "exception while reading property".to_string())
}

/// Converts a decoded value into a JS value: integers become `BigInt`,
/// bytes a `Uint8Array`, structs plain objects.
pub fn value_to_js(value: &Value) -> Result<JsValue, JsValue> {
    match value {
        Value::Int(v) => Ok(BigInt::new(&JsValue::from_str(&v.to_string()))?.into()),
        Value::Bool(b) => Ok(JsValue::from_bool(*b)),
        Value::Vector(items) => {
            let array = Array::new_with_length(items.len() as u32);
            for (i, item) in items.iter().enumerate() {
                array.set(i as u32, value_to_js(item)?);
            }
            Ok(array.into())
        }
        Value::Struct(fields) => {
            let object = Object::new();
            for (key, item) in fields {
                Reflect::set(&object, &JsValue::from_str(key), &value_to_js(item)?)?;
            }
            Ok(object.into())
        }
        Value::String(s) => Ok(JsValue::from_str(s)),
        Value::Bytes(bytes) => Ok(Uint8Array::from(bytes.as_slice()).into()),
    }
}

pub fn error_to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_strings() {
        assert_eq!(integer_from_str("42", "$").unwrap(), U256::from(42u8));
        assert_eq!(integer_from_str("0x10", "$").unwrap(), U256::from(16u8));
        assert_eq!(
            integer_from_str(&U256::MAX.to_string(), "$").unwrap(),
            U256::MAX
        );
        assert_eq!(
            integer_from_str("-1", "$.n").unwrap_err(),
            ConvertError::Number {
                path: "$.n".to_string(),
                value: "-1".to_string()
            }
        );
        assert!(matches!(
            integer_from_str("1.5", "$"),
            Err(ConvertError::Integer { .. })
        ));
    }

    #[test]
    fn test_integer_numbers_must_be_safe() {
        assert_eq!(integer_from_f64(7.0, "$").unwrap(), U256::from(7u8));
        assert_eq!(
            integer_from_f64(MAX_SAFE_INTEGER as f64, "$").unwrap(),
            U256::from(MAX_SAFE_INTEGER)
        );

        for n in [-1.0, 1.5, f64::NAN, f64::INFINITY, 2f64.powi(60)] {
            assert!(
                matches!(integer_from_f64(n, "$"), Err(ConvertError::Number { .. })),
                "{n} accepted"
            );
        }
    }

    #[test]
    fn test_bytes_from_numbers_or_hex() {
        assert_eq!(byte_from_f64(255.0, "$").unwrap(), 255);
        assert!(byte_from_f64(256.0, "$").is_err());
        assert!(byte_from_f64(-1.0, "$").is_err());
        assert!(byte_from_f64(0.5, "$").is_err());

        assert_eq!(decode_hex("0xdead", "$").unwrap(), vec![0xde, 0xad]);
        assert_eq!(decode_hex("0x", "$").unwrap(), Vec::<u8>::new());
        assert!(decode_hex("0xabc", "$").is_err());
        assert!(decode_hex("0xzz", "$").is_err());
        assert!(decode_hex("dead", "$").is_err());
    }

    #[test]
    fn test_error_messages_carry_path() {
        let err = ConvertError::Mismatch {
            path: "$.feeds[1].ok".to_string(),
            expected: "bool",
            found: "number",
        };
        assert_eq!(err.to_string(), "$.feeds[1].ok: expected bool, found number");
    }
}
