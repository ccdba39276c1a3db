//! Dynamic values passed to and returned from a [crate::Codec].

use std::collections::BTreeMap;

use crate::uint::U256;

/// A value tree whose shape mirrors a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub enum Value {
    /// Any integer width; always an unsigned magnitude.
    Int(U256),
    Bool(bool),
    /// Homogeneous list (`[T]`).
    Vector(Vec<Value>),
    /// Named fields (`{k:T,...}`). Encode order comes from the schema, not the map.
    Struct(BTreeMap<String, Value>),
    String(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Name of the variant, matching the schema vocabulary.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Bool(_) => "bool",
            Value::Vector(_) => "vector",
            Value::Struct(_) => "struct",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
        }
    }

    pub fn as_int(&self) -> Option<&U256> {
        match self {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[Value]> {
        match self {
            Value::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Struct(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Looks up a field of a struct value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_struct().and_then(|fields| fields.get(key))
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Int(U256::from(value))
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, u64, u128, usize);

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

/// Raw bytes. Use [Value::Vector] for a list of integers.
impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Vector(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Struct(value)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Struct(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_from_iter() {
        let value: Value = [("id", Value::from(7u32)), ("name", Value::from("feed"))]
            .into_iter()
            .collect();

        assert_eq!(value.kind(), "struct");
        assert_eq!(value.get("id"), Some(&Value::Int(U256::from(7u8))));
        assert_eq!(value.get("name").and_then(Value::as_str), Some("feed"));
        assert_eq!(value.get("missing"), None);
    }

    #[test]
    fn test_accessors_reject_other_variants() {
        let value = Value::from(true);
        assert_eq!(value.as_bool(), Some(true));
        assert_eq!(value.as_int(), None);
        assert_eq!(value.as_bytes(), None);
        assert_eq!(value.get("x"), None);
    }

    #[test]
    fn test_bytes_are_not_vectors() {
        assert_eq!(Value::from(vec![1u8, 2]), Value::Bytes(vec![1, 2]));
        assert_eq!(
            Value::from(vec![Value::from(1u8)]).as_vector().map(<[Value]>::len),
            Some(1)
        );
    }
}
