//! # obi
//!
//! Schema-driven binary encoding for payloads exchanged between an oracle
//! and its callers. A compact type string such as `{symbols:[string],multiplier:u64}`
//! is parsed once into a reusable [Codec] tree, which converts [Value]s to
//! and from a fixed-layout byte encoding.
//!
//! The wire format carries no tags, headers or framing: integers are
//! big-endian at their declared width, vectors/strings/bytes carry a 4-byte
//! length prefix, and struct fields follow each other in schema order. The
//! schema is therefore required to decode anything.
//!
//! ## Example
//!
//! ```
//! use obi::{Obi, Value};
//!
//! let obi = Obi::new("{symbols:[string],multiplier:u64}/{rates:[u64]}").unwrap();
//!
//! let request: Value = [
//!     ("symbols", Value::Vector(vec![Value::from("BTC")])),
//!     ("multiplier", Value::from(100u64)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let bytes = obi.encode_input(&request).unwrap();
//! assert_eq!(obi.decode_input(&bytes).unwrap(), request);
//! ```
//!
//! A single codec can be built with [build]:
//!
//! ```
//! let codec = obi::build("[u16]").unwrap();
//! let bytes = codec.encode(&obi::Value::Vector(vec![obi::Value::from(0x0102u16)])).unwrap();
//! assert_eq!(bytes, vec![0, 0, 0, 1, 0x01, 0x02]);
//! ```

pub mod codec;
pub mod composite;
pub mod errors;
pub mod integer;
pub mod obi;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod uint;
pub mod value;

pub use codec::Codec;
pub use errors::{DecodeError, EncodeError, SchemaError, Side};
pub use obi::Obi;
pub use schema::parse as build;
pub use uint::U256;
pub use value::Value;
