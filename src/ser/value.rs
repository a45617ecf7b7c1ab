use serde::ser::{self, Serialize};

use super::key::MapKeySerializer;
use crate::error::{Error, Result};
use crate::value::{Map, Number, Value};

/// Converts any serializable type into a [`Value`].
///
/// Structs and maps become mappings, sequences and tuples become sequences,
/// unit variants become strings and data-carrying variants become a mapping
/// with a single entry named after the variant. Struct fields and map entries
/// that serialize to nothing (`None`, `()`) are left out.
///
/// ```
/// use qs_nested::{to_value, Value};
///
/// let v = to_value(&[("a", vec![1, 2])]).unwrap();
/// assert_eq!(v, Value::Sequence(vec![
///     Value::Sequence(vec!["a".into(), Value::from(vec![1, 2])]),
/// ]));
/// ```
pub fn to_value<T: Serialize + ?Sized>(input: &T) -> Result<Value> {
    input.serialize(ValueSerializer)
}

/// A serializer whose output is a [`Value`].
pub struct ValueSerializer;

macro_rules! serialize_number {
    ($($ty:ty => $meth:ident,)*) => {
        $(
            fn $meth(self, v: $ty) -> Result<Value> {
                Ok(Value::Number(Number::from(v)))
            }
        )*
    };
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    serialize_number! {
        u8  => serialize_u8,
        u16 => serialize_u16,
        u32 => serialize_u32,
        u64 => serialize_u64,
        i8  => serialize_i8,
        i16 => serialize_i16,
        i32 => serialize_i32,
        i64 => serialize_i64,
        f32 => serialize_f32,
        f64 => serialize_f64,
    }

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::String(String::from_utf8_lossy(v).into_owned()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value> {
        let mut map = Map::with_capacity(1);
        map.insert(variant.to_owned(), to_value(value)?);
        Ok(Value::Mapping(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant.to_owned(),
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(SerializeMap {
            map: Map::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant.to_owned(),
            map: Map::with_capacity(len),
        })
    }
}

#[doc(hidden)]
pub struct SerializeVec {
    vec: Vec<Value>,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Sequence(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

#[doc(hidden)]
pub struct SerializeTupleVariant {
    name: String,
    vec: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut map = Map::with_capacity(1);
        map.insert(self.name, Value::Sequence(self.vec));
        Ok(Value::Mapping(map))
    }
}

#[doc(hidden)]
pub struct SerializeMap {
    map: Map,
    next_key: Option<String>,
}

impl SerializeMap {
    fn insert(&mut self, key: String, value: Value) {
        // `None` fields have nothing to write
        if !value.is_null() {
            self.map.insert(key, value);
        }
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let Some(key) = self.next_key.take() else {
            return Err(Error::Custom(
                "serialize_value called before serialize_key".to_owned(),
            ));
        };
        let value = to_value(value)?;
        self.insert(key, value);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Mapping(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        let value = to_value(value)?;
        self.insert(key.to_owned(), value);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        ser::SerializeMap::end(self)
    }
}

#[doc(hidden)]
pub struct SerializeStructVariant {
    name: String,
    map: Map,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        let value = to_value(value)?;
        if !value.is_null() {
            self.map.insert(key.to_owned(), value);
        }
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut outer = Map::with_capacity(1);
        outer.insert(self.name, Value::Mapping(self.map));
        Ok(Value::Mapping(outer))
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::to_value;
    use crate::{Error, Value};

    #[derive(Serialize)]
    #[serde(rename_all = "lowercase")]
    enum Shape {
        Dot,
        Circle(u8),
        Line(u8, u8),
        Rect { w: u8, h: u8 },
    }

    #[test]
    fn struct_skips_none() {
        #[derive(Serialize)]
        struct Query {
            a: Option<u8>,
            b: Option<u8>,
        }
        let v = to_value(&Query { a: None, b: Some(2) }).unwrap();
        assert_eq!(v, [("b", 2)].into_iter().collect::<Value>());
    }

    #[test]
    fn enum_variants() {
        assert_eq!(to_value(&Shape::Dot).unwrap(), Value::from("dot"));
        assert_eq!(
            to_value(&Shape::Circle(3)).unwrap(),
            [("circle", 3)].into_iter().collect::<Value>()
        );
        assert_eq!(
            to_value(&Shape::Line(1, 2)).unwrap(),
            [("line", Value::from(vec![1, 2]))].into_iter().collect::<Value>()
        );
        assert_eq!(
            to_value(&Shape::Rect { w: 4, h: 5 }).unwrap(),
            [("rect", [("w", 4), ("h", 5)].into_iter().collect::<Value>())]
                .into_iter()
                .collect::<Value>()
        );
    }

    #[test]
    fn numeric_map_keys() {
        let map = BTreeMap::from([(1u32, "one"), (2u32, "two")]);
        assert_eq!(
            to_value(&map).unwrap(),
            [("1", "one"), ("2", "two")].into_iter().collect::<Value>()
        );
    }

    #[test]
    fn complex_map_keys_are_unsupported() {
        let map = BTreeMap::from([(vec![1u8], "x")]);
        assert!(matches!(to_value(&map), Err(Error::Unsupported(_))));
    }
}
