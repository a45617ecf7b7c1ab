use std::borrow::Cow;

use super::numeric::{is_numeric, parse_index, parse_number};
use crate::value::{Map, Number, Value};

mod decode;

/// Splits a querystring into its decoded `(key, value)` pairs, in order.
///
/// A single leading `?` is ignored, empty pieces (`a=1&&b=2`) are skipped,
/// and a piece without `=` has an empty value.
pub fn pairs(input: &str) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
    let input = input.strip_prefix('?').unwrap_or(input);
    input
        .split('&')
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            let (key, value) = piece.split_once('=').unwrap_or((piece, ""));
            (decode::decode(key), decode::decode(value))
        })
}

/// Splits a key into its path segments: the maximal runs of characters that
/// are neither `[` nor `]`.
///
/// `a[b][0]` yields `["a", "b", "0"]`.
pub fn segments(key: &str) -> impl Iterator<Item = &str> {
    key.split(['[', ']']).filter(|s| !s.is_empty())
}

/// Folds decoded pairs into a nested mapping.
///
/// Each segment but the last picks (or creates) a container; the container
/// kind is a sequence when the *next* segment is numeric and a mapping
/// otherwise. The last segment receives the value.
///
/// Conflicting writes are settled with "last writer wins":
/// - a value written where something already is replaces it
/// - descending through a scalar replaces it with a fresh container
/// - a segment that cannot index an existing sequence turns that sequence
///   into a mapping keyed by index
pub struct Parser {
    config: crate::Config,
    coerce: bool,
}

impl Parser {
    pub fn new(config: crate::Config) -> Self {
        Parser {
            config,
            coerce: true,
        }
    }

    /// Keeps every leaf as a string rather than coercing numeric text.
    pub fn without_coercion(mut self) -> Self {
        self.coerce = false;
        self
    }

    pub fn parse(&self, input: &str) -> Map {
        let mut root = Value::Mapping(Map::new());
        for (key, value) in pairs(input) {
            tracing::trace!(key = %key, value = %value, "parsed pair");
            let path = self.path(&key);
            if path.is_empty() {
                tracing::debug!(key = %key, "skipping pair without key segments");
                continue;
            }
            self.insert(&mut root, &path, self.leaf(value));
        }
        match root {
            Value::Mapping(map) => map,
            // the root is only ever reached through `slot`, which keeps a
            // mapping a mapping
            _ => Map::new(),
        }
    }

    fn leaf(&self, value: Cow<'_, str>) -> Value {
        if self.coerce {
            if let Some(n) = parse_number(&value) {
                return Value::Number(Number::from_f64(n));
            }
        }
        Value::String(value.into_owned())
    }

    /// Splits `key` into segments, folding anything beyond `max_depth`
    /// nested levels back into a single literal segment.
    fn path<'k>(&self, key: &'k str) -> Vec<Cow<'k, str>> {
        let mut path: Vec<Cow<'k, str>> = Vec::new();
        let limit = self.config.max_depth.saturating_add(1);
        let mut overflow = String::new();
        for segment in segments(key) {
            if path.len() < limit {
                path.push(Cow::Borrowed(segment));
            } else {
                overflow.push('[');
                overflow.push_str(segment);
                overflow.push(']');
            }
        }
        if !overflow.is_empty() {
            tracing::debug!(key, max_depth = self.config.max_depth, "key nested too deeply");
            path.push(Cow::Owned(overflow));
        }
        path
    }

    fn insert(&self, root: &mut Value, path: &[Cow<'_, str>], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut current = root;
        for (i, segment) in parents.iter().enumerate() {
            let node = self.slot(current, segment);
            if !node.is_container() {
                if !node.is_null() {
                    tracing::debug!(segment = %segment, "scalar replaced by a container");
                }
                *node = if is_numeric(&path[i + 1]) {
                    Value::Sequence(Vec::new())
                } else {
                    Value::Mapping(Map::new())
                };
            }
            current = node;
        }
        *self.slot(current, last) = value;
    }

    /// Returns the slot for `segment` inside the container `node`, creating
    /// it as `Null` if absent.
    ///
    /// A sequence is only indexed by an in-range index. Any other segment
    /// turns it into a mapping keyed by index first.
    fn slot<'v>(&self, node: &'v mut Value, segment: &str) -> &'v mut Value {
        match (node, parse_index(segment, self.config.max_index)) {
            (Value::Sequence(seq), Some(idx)) => {
                if idx >= seq.len() {
                    seq.resize(idx + 1, Value::Null);
                }
                &mut seq[idx]
            }
            (Value::Mapping(map), _) => map.entry(segment.to_owned()).or_insert(Value::Null),
            (node, _) => {
                let map = match std::mem::take(node) {
                    Value::Sequence(seq) => {
                        tracing::debug!(segment, "sequence converted to a mapping");
                        sequence_to_map(seq)
                    }
                    _ => Map::new(),
                };
                *node = Value::Mapping(map);
                self.slot(node, segment)
            }
        }
    }
}

pub(crate) fn sequence_to_map(seq: Vec<Value>) -> Map {
    let mut buffer = itoa::Buffer::new();
    seq.into_iter()
        .enumerate()
        // holes have nothing to carry over
        .filter(|(_, v)| !v.is_null())
        .map(|(i, v)| (buffer.format(i).to_owned(), v))
        .collect()
}
