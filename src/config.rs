use serde::{de, ser};

use crate::de::Parser;
use crate::error::{Error, Result};
use crate::ser::QsWriter;
use crate::value::{Map, Value};

/// Configuration for encoding and decoding behavior.
///
/// The `Config` struct lets you customize how `qs_nested` writes
/// querystrings and how far it will go when reading them back.
///
/// ## Encoding
///
/// By default keys and values are written with the
/// `application/x-www-form-urlencoded` set, so brackets are percent-encoded:
/// `a%5B0%5D=10`. See [`Config::use_form_encoding`].
///
/// ## Limits
///
/// `max_depth` and `max_index` bound the structure that decoding can build
/// from a maliciously crafted input. Default values: `max_depth = 20`,
/// `max_index = 1000`.
///
/// ```
/// use qs_nested::{Config, Value};
///
/// let config = Config::new().max_depth(1);
/// let map = config.decode("a[b][c]=1");
/// assert_eq!(map["a"]["b"]["[c]"], Value::from(1));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) max_depth: usize,
    pub(crate) max_index: usize,
    pub(crate) use_form_encoding: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            max_depth: 20,
            max_index: 1000,
            use_form_encoding: true,
        }
    }

    /// Specifies the maximum number of nested levels below a root key that
    /// decoding will build. Segments past the limit are kept together as one
    /// literal key such as `[d][e]`. Default is 20.
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Specifies the largest index that decoding will place in a sequence.
    /// Writing a larger index turns the sequence into a mapping keyed by
    /// index, which keeps `a[4294967294]=x` from allocating billions of
    /// slots. Default is 1000.
    pub const fn max_index(mut self, max_index: usize) -> Self {
        self.max_index = max_index;
        self
    }

    /// By default, `qs_nested` uses form encoding, as defined
    /// in [WHATWG](https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set),
    /// which is what browsers produce for `URLSearchParams`.
    ///
    /// Set this to `false` to use the minimal
    /// [query](https://url.spec.whatwg.org/#query-percent-encode-set)
    /// encoding instead, which leaves the brackets of nested keys readable:
    /// `a[0]=10`. Brackets inside key names still get percent-encoded.
    ///
    /// e.g. `{ a: { "[x]": 1 } }` will be encoded as `a[%5Bx%5D]=1`
    ///
    /// Decoding accepts both forms regardless of this setting.
    pub const fn use_form_encoding(mut self, use_form_encoding: bool) -> Self {
        self.use_form_encoding = use_form_encoding;
        self
    }

    /// Encodes a nested value into a querystring using this `Config`.
    ///
    /// See [`encode`](crate::encode).
    pub fn encode(self, value: &Value, prefix: &str) -> String {
        let mut writer = QsWriter::new(self);
        writer.write_root(value, prefix);
        writer.finish()
    }

    /// Decodes a querystring into a nested mapping using this `Config`.
    ///
    /// See [`decode`](crate::decode).
    pub fn decode(self, input: &str) -> Map {
        Parser::new(self).parse(input)
    }

    /// Serializes an object to a querystring using this `Config`.
    pub fn serialize_string<T: ser::Serialize + ?Sized>(self, input: &T) -> Result<String> {
        let value = crate::to_value(input)?;
        match value {
            Value::Mapping(_) | Value::Sequence(_) => Ok(self.encode(&value, "")),
            Value::Null => Err(Error::top_level("a unit or `None`")),
            _ => Err(Error::top_level("a primitive")),
        }
    }

    /// Deserializes a querystring from a `&str` using this `Config`.
    ///
    /// Leaves are handed to the target type as strings, so numeric-looking
    /// text keeps its exact form when the field asks for a `String`.
    pub fn deserialize_str<T: de::DeserializeOwned>(self, input: &str) -> Result<T> {
        let map = Parser::new(self).without_coercion().parse(input);
        crate::from_value(Value::Mapping(map))
    }
}
