use serde::de::{self, Deserializer as _, IntoDeserializer, Unexpected};

use super::numeric::parse_index;
use super::parse::sequence_to_map;
use super::string_parser::StringParsingDeserializer;
use crate::error::{Error, Result};
use crate::value::{Map, Number, Value};

/// Deserializes a typed value out of a [`Value`].
///
/// The target type supplies the schema a querystring lacks: string leaves
/// parse into whatever primitive is asked for, numbers print themselves when
/// a string is wanted, and a mapping keyed by indices reads as a sequence.
///
/// ```
/// use qs_nested::{decode, from_value, Value};
///
/// let ids: Vec<u8> = from_value(decode("ids[0]=1&ids[1]=2")["ids"].clone()).unwrap();
/// assert_eq!(ids, [1, 2]);
/// ```
pub fn from_value<T: de::DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(value)
}

impl Value {
    fn unexpected(&self) -> Unexpected<'_> {
        match self {
            Value::Null => Unexpected::Unit,
            Value::Bool(b) => Unexpected::Bool(*b),
            Value::Number(n) => Unexpected::Float(n.as_f64()),
            Value::String(s) => Unexpected::Str(s),
            Value::Sequence(_) => Unexpected::Seq,
            Value::Mapping(_) => Unexpected::Map,
        }
    }

    fn invalid_type<E: de::Error>(&self, exp: &dyn de::Expected) -> E {
        de::Error::invalid_type(self.unexpected(), exp)
    }
}

macro_rules! deserialize_number {
    ($method:ident, $visit:ident, $conv:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            match self {
                Value::Number(n) => match n.$conv().and_then(|v| <$ty>::try_from(v).ok()) {
                    Some(v) => visitor.$visit(v),
                    None => Err(de::Error::invalid_value(
                        Unexpected::Float(n.as_f64()),
                        &visitor,
                    )),
                },
                Value::String(s) => StringParsingDeserializer::new(s).$method(visitor),
                other => Err(other.invalid_type(&visitor)),
            }
        }
    };
}

macro_rules! deserialize_float {
    ($method:ident, $visit:ident) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            match self {
                Value::Number(n) => visitor.visit_f64(n.as_f64()),
                Value::String(s) => StringParsingDeserializer::new(s).$method(visitor),
                other => Err(other.invalid_type(&visitor)),
            }
        }
    };
}

impl<'de> de::Deserializer<'de> for Value {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => visit_number(n, visitor),
            Value::String(s) => visitor.visit_string(s),
            Value::Sequence(seq) => visitor.visit_seq(SeqDeserializer::new(seq)),
            Value::Mapping(map) => visitor.visit_map(MapDeserializer::new(map)),
        }
    }

    deserialize_number!(deserialize_i8, visit_i8, as_i64, i8);
    deserialize_number!(deserialize_i16, visit_i16, as_i64, i16);
    deserialize_number!(deserialize_i32, visit_i32, as_i64, i32);
    deserialize_number!(deserialize_i64, visit_i64, as_i64, i64);
    deserialize_number!(deserialize_u8, visit_u8, as_u64, u8);
    deserialize_number!(deserialize_u16, visit_u16, as_u64, u16);
    deserialize_number!(deserialize_u32, visit_u32, as_u64, u32);
    deserialize_number!(deserialize_u64, visit_u64, as_u64, u64);
    deserialize_float!(deserialize_f32, visit_f32);
    deserialize_float!(deserialize_f64, visit_f64);

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Bool(b) => visitor.visit_bool(b),
            Value::String(s) => StringParsingDeserializer::new(s).deserialize_bool(visitor),
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::String(s) => visitor.visit_string(s),
            scalar @ (Value::Number(_) | Value::Bool(_)) => match scalar.scalar_text() {
                Some(text) => visitor.visit_string(text.into_owned()),
                None => Err(scalar.invalid_type(&visitor)),
            },
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::String(s) => visitor.visit_byte_buf(s.into_bytes()),
            other @ (Value::Sequence(_) | Value::Mapping(_)) => other.deserialize_seq(visitor),
            other => other.deserialize_str(visitor),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Null => visitor.visit_unit(),
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Sequence(seq) => visitor.visit_seq(SeqDeserializer::new(seq)),
            Value::Mapping(map) => match indexed_entries(map) {
                // e.g. a sequence that was turned into a mapping by an
                // out-of-range index
                Ok(seq) => visitor.visit_seq(SeqDeserializer::new(seq)),
                Err(map) => Err(Value::Mapping(map).invalid_type(&visitor)),
            },
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Mapping(map) => visitor.visit_map(MapDeserializer::new(map)),
            // integer keys such as `m[1]=x` decode as a sequence
            Value::Sequence(seq) => visitor.visit_map(MapDeserializer::new(sequence_to_map(seq))),
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::String(s) => visitor.visit_enum(StringParsingDeserializer::<Error>::new(s)),
            Value::Mapping(map) if map.len() == 1 => {
                let mut iter = map.into_iter();
                match iter.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer { variant, value }),
                    None => Err(de::Error::custom("expected a single variant")),
                }
            }
            other => Err(de::Error::invalid_type(
                other.unexpected(),
                &"a variant name or a mapping with a single variant",
            )),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_u64(visitor)
    }
}

impl IntoDeserializer<'_, Error> for Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

fn visit_number<'de, V: de::Visitor<'de>>(n: Number, visitor: V) -> Result<V::Value> {
    if let Some(u) = n.as_u64() {
        visitor.visit_u64(u)
    } else if let Some(i) = n.as_i64() {
        visitor.visit_i64(i)
    } else {
        visitor.visit_f64(n.as_f64())
    }
}

/// Reads a mapping whose keys are all indices as a sequence in index order.
/// Gaps become `Null`.
fn indexed_entries(map: Map) -> Result<Vec<Value>, Map> {
    let indices: Option<Vec<usize>> = map.keys().map(|k| parse_index(k, usize::MAX)).collect();
    let Some(entries) = indices else {
        return Err(map);
    };
    let len = match entries.iter().max() {
        Some(max) => match max.checked_add(1) {
            Some(len) => len,
            None => return Err(map),
        },
        None => 0,
    };
    if len > map.len().saturating_mul(2).saturating_add(16) {
        // too sparse to be a sequence
        return Err(map);
    }
    let mut seq = vec![Value::Null; len];
    for (i, (_, value)) in entries.into_iter().zip(map) {
        seq[i] = value;
    }
    Ok(seq)
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(seq: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: seq.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(value).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: Map) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        if let Some((key, value)) = self.iter.next() {
            self.value = Some(value);
            return seed
                .deserialize(StringParsingDeserializer::<Error>::new(key))
                .map(Some);
        };
        Ok(None)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(value),
            None => Err(de::Error::custom(
                "Somehow the map was empty after a non-empty key was returned",
            )),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = Value;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Value)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(StringParsingDeserializer::<Error>::new(self.variant))?;
        Ok((variant, self.value))
    }
}

impl<'de> de::VariantAccess<'de> for Value {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self {
            Value::Null => Ok(()),
            other => Err(other.invalid_type(&"unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_map(self, visitor)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::from_value;
    use crate::Value;

    fn mapping<const N: usize>(entries: [(&str, Value); N]) -> Value {
        entries.into_iter().collect()
    }

    #[test]
    fn numbers_read_as_strings() {
        let name: String = from_value(Value::from(12345)).unwrap();
        assert_eq!(name, "12345");
    }

    #[test]
    fn strings_parse_as_numbers() {
        let n: u32 = from_value(Value::from("42")).unwrap();
        assert_eq!(n, 42);
        assert!(from_value::<u8>(Value::from("x")).is_err());
    }

    #[test]
    fn fractional_number_is_not_an_integer() {
        assert!(from_value::<u8>(Value::from(1.5)).is_err());
        assert!(from_value::<u8>(Value::from(256)).is_err());
        assert_eq!(from_value::<f32>(Value::from(1.5)).unwrap(), 1.5);
    }

    #[test]
    fn indexed_mapping_reads_as_sequence() {
        let v = mapping([("1", "b".into()), ("0", "a".into())]);
        let seq: Vec<String> = from_value(v).unwrap();
        assert_eq!(seq, ["a", "b"]);
    }

    #[test]
    fn huge_index_is_not_a_sequence() {
        let v = mapping([("18446744073709551615", "x".into())]);
        assert!(from_value::<Vec<String>>(v).is_err());
        let v = mapping([("0", "a".into()), ("4294967294", "x".into())]);
        assert!(from_value::<Vec<String>>(v).is_err());
    }

    #[test]
    fn named_mapping_is_not_a_sequence() {
        let v = mapping([("x", "b".into())]);
        assert!(from_value::<Vec<String>>(v).is_err());
    }

    #[test]
    fn null_is_none() {
        let v = Value::Sequence(vec![Value::Null, 3.into()]);
        let seq: Vec<Option<u8>> = from_value(v).unwrap();
        assert_eq!(seq, [None, Some(3)]);
    }

    #[test]
    fn map_keys_parse() {
        let v = mapping([("3", "c".into()), ("7", "g".into())]);
        let map: HashMap<u8, char> = from_value(v).unwrap();
        assert_eq!(map, HashMap::from([(3, 'c'), (7, 'g')]));
    }

    #[test]
    fn sequence_reads_as_integer_keyed_map() {
        let v = Value::Sequence(vec![Value::Null, "b".into(), Value::Null, "d".into()]);
        let map: HashMap<u32, String> = from_value(v).unwrap();
        assert_eq!(map, HashMap::from([(1, "b".to_owned()), (3, "d".to_owned())]));
    }

    #[test]
    fn enums() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "lowercase")]
        enum Shape {
            Dot,
            Circle(u8),
            Line(u8, u8),
            Rect { w: u8, h: u8 },
        }

        assert_eq!(from_value::<Shape>("dot".into()).unwrap(), Shape::Dot);
        assert_eq!(
            from_value::<Shape>(mapping([("circle", 3.into())])).unwrap(),
            Shape::Circle(3)
        );
        assert_eq!(
            from_value::<Shape>(mapping([("line", Value::from(vec![1, 2]))])).unwrap(),
            Shape::Line(1, 2)
        );
        assert_eq!(
            from_value::<Shape>(mapping([(
                "rect",
                mapping([("w", 4.into()), ("h", "5".into())])
            )]))
            .unwrap(),
            Shape::Rect { w: 4, h: 5 }
        );
    }
}
