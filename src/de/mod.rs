//! Deserialization support for querystrings.
//!
//! Decoding happens in two steps. The `parse` module splits the string
//! into `(key, value)` pairs and folds each bracketed key into a nested
//! [`Value`](crate::Value), inferring container kinds from the key segments
//! alone. There is no schema, so a segment that looks numeric opens a
//! sequence and anything else opens a mapping.
//!
//! Typed deserialization then walks that tree with the `Deserializer`
//! implementation for `Value` in the `value` module. When the caller asks
//! for a concrete type the leaves are left as strings during parsing, and
//! `StringParsingDeserializer` turns each one into whatever primitive the
//! type wants. This keeps `zip=01234` a string when the field is a
//! `String`.

mod numeric;
mod parse;
mod string_parser;
mod value;

pub use value::from_value;

pub(crate) use parse::Parser;

use serde::de;

use crate::error::Result;
use crate::value::Map;

/// Decodes a querystring into a nested mapping.
///
/// Leaves that read as numbers become [`Number`](crate::Number)s, the rest
/// stay strings. A non-final key segment opens a sequence when the segment
/// after it is numeric and a mapping otherwise.
///
/// ```
/// use qs_nested::{decode, Value};
///
/// let map = decode("a[b][0]=1&a[b][1]=2&name=Acme");
/// assert_eq!(map["a"]["b"], Value::from(vec![1, 2]));
/// assert_eq!(map["name"], Value::from("Acme"));
/// ```
pub fn decode(input: &str) -> Map {
    crate::Config::default().decode(input)
}

/// Deserializes a querystring from a `&str`.
///
/// ```
/// # use serde::Deserialize;
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Query {
///     name: String,
///     age: u8,
///     occupation: String,
/// }
///
/// let q = Query {
///     name: "Alice".to_owned(),
///     age: 24,
///     occupation: "Student".to_owned(),
/// };
///
/// assert_eq!(
///     qs_nested::from_str::<Query>("name=Alice&age=24&occupation=Student").unwrap(),
///     q);
/// ```
pub fn from_str<T: de::DeserializeOwned>(input: &str) -> Result<T> {
    crate::Config::default().deserialize_str(input)
}
