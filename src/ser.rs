//! Serialization support for querystrings.

mod encode;
mod key;
mod value;

use encode::{brackets, encode as percent_encode};

pub use value::{to_value, ValueSerializer};

use serde::ser;

use crate::error::*;
use crate::value::Value;

/// Encodes a nested value into a querystring.
///
/// Every leaf becomes one `key=value` pair whose key is the bracketed path
/// to it. Mappings contribute their keys in insertion order, sequences their
/// indices. When `prefix` is non-empty each top-level key is nested under it.
///
/// ```
/// use qs_nested::{encode, Value};
///
/// let value: Value = [("a", Value::from(vec![10, 20]))].into_iter().collect();
/// assert_eq!(encode(&value, ""), "a%5B0%5D=10&a%5B1%5D=20");
/// assert_eq!(encode(&value, "p"), "p%5Ba%5D%5B0%5D=10&p%5Ba%5D%5B1%5D=20");
/// ```
///
/// Empty containers have no leaves and so produce no pairs at all.
pub fn encode(value: &Value, prefix: &str) -> String {
    crate::Config::default().encode(value, prefix)
}

/// Serializes a value into a querystring.
///
/// The value is first converted with [`to_value`] and then encoded. Fields
/// holding `None` are left out.
///
/// ```
/// # use serde::Serialize;
/// #[derive(Serialize)]
/// struct Query {
///     name: String,
///     age: u8,
///     tags: Vec<String>,
/// }
///
/// let q = Query {
///     name: "Alice".to_owned(),
///     age: 24,
///     tags: vec!["admin".to_owned()],
/// };
///
/// assert_eq!(
///     qs_nested::to_string(&q).unwrap(),
///     "name=Alice&age=24&tags%5B0%5D=admin");
/// ```
pub fn to_string<T: ser::Serialize + ?Sized>(input: &T) -> Result<String> {
    crate::Config::default().serialize_string(input)
}

/// A writer for the flat querystring form.
///
/// The writer maintains a key stack to build nested paths. For example,
/// when writing `{user: {name: "John"}}`, it pushes "user" onto the stack,
/// then "name", and the leaf is written as `user[name]=John`.
pub(crate) struct QsWriter {
    output: String,
    first_kv: bool,
    key: Vec<String>,
    config: crate::Config,
}

impl QsWriter {
    pub fn new(config: crate::Config) -> Self {
        Self {
            // a guess based on what `serde_json` does
            output: String::with_capacity(128),
            first_kv: true,
            key: Vec::with_capacity(4),
            config,
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    /// Writes every pair of a top-level value.
    ///
    /// Mappings are walked by key and sequences by index. A scalar at the top
    /// level has no key to go under and writes nothing.
    pub fn write_root(&mut self, value: &Value, prefix: &str) {
        if !prefix.is_empty() {
            self.push_prefix(prefix);
        }
        match value {
            Value::Mapping(map) => {
                for (k, v) in map {
                    self.push_key(k);
                    self.write_value(v);
                    self.pop_key();
                }
            }
            Value::Sequence(seq) => self.write_sequence(seq),
            _ => {
                tracing::trace!("scalar at the top level has no key, nothing written");
            }
        }
        if !prefix.is_empty() {
            self.pop_key();
        }
    }

    /// Expands a value below the current key stack.
    fn write_value(&mut self, value: &Value) {
        match value {
            Value::Sequence(seq) => self.write_sequence(seq),
            Value::Mapping(map) => {
                for (k, v) in map {
                    self.push_key(k);
                    self.write_value(v);
                    self.pop_key();
                }
            }
            scalar => {
                if let Some(text) = scalar.scalar_text() {
                    self.write_pair(&text);
                }
            }
        }
    }

    fn write_sequence(&mut self, seq: &[Value]) {
        let mut buffer = itoa::Buffer::new();
        for (i, v) in seq.iter().enumerate() {
            self.push_key(buffer.format(i));
            self.write_value(v);
            self.pop_key();
        }
    }

    /// Pushes a new key segment onto the key stack.
    ///
    /// - First key "user" becomes: `user`
    /// - Second key "name" becomes: `user[name]`
    /// - Third key "first" becomes: `user[name][first]`
    fn push_key(&mut self, newkey: &str) {
        let first_key_segment = self.key.is_empty();
        let use_form_encoding = self.config.use_form_encoding;
        let (open, close) = brackets(use_form_encoding);

        // being optimistic here that the common case does not need to encode
        let mut segment = String::with_capacity(newkey.len() + 2 * open.len());
        if !first_key_segment {
            segment.push_str(open);
        }
        if newkey
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.')
        {
            // nothing in this key needs encoding in either mode
            segment.push_str(newkey);
        } else {
            segment.extend(percent_encode(newkey, use_form_encoding));
        }
        if !first_key_segment {
            segment.push_str(close);
        }
        self.key.push(segment);
    }

    /// Pushes a caller-supplied prefix, which may already carry its own
    /// bracketed path such as `filter[user]`.
    fn push_prefix(&mut self, prefix: &str) {
        let use_form_encoding = self.config.use_form_encoding;
        let (open, close) = brackets(use_form_encoding);
        let mut segment = String::with_capacity(prefix.len());
        let mut rest = prefix;
        while let Some(pos) = rest.find(['[', ']']) {
            segment.extend(percent_encode(&rest[..pos], use_form_encoding));
            segment.push_str(if rest.as_bytes()[pos] == b'[' { open } else { close });
            rest = &rest[pos + 1..];
        }
        segment.extend(percent_encode(rest, use_form_encoding));
        self.key.push(segment);
    }

    fn pop_key(&mut self) {
        self.key.pop();
    }

    fn write_pair(&mut self, value: &str) {
        if self.first_kv {
            self.first_kv = false;
        } else {
            self.output.push('&');
        }
        for segment in &self.key {
            self.output.push_str(segment);
        }
        self.output.push('=');
        self.output
            .extend(percent_encode(value, self.config.use_form_encoding));
        tracing::trace!(value, "wrote pair");
    }
}
