use std::{borrow::Cow, fmt, marker::PhantomData};

use serde::de::{self, Unexpected};

/// Deserializes a querystring leaf or key, parsing it into whatever
/// primitive the target type asks for.
pub struct StringParsingDeserializer<'a, E> {
    value: Cow<'a, str>,
    marker: PhantomData<E>,
}

impl<E> Clone for StringParsingDeserializer<'_, E> {
    fn clone(&self) -> Self {
        StringParsingDeserializer {
            value: self.value.clone(),
            marker: PhantomData,
        }
    }
}

impl<'a, E> StringParsingDeserializer<'a, E> {
    pub fn new(value: impl Into<Cow<'a, str>>) -> Self {
        StringParsingDeserializer {
            value: value.into(),
            marker: PhantomData,
        }
    }
}

macro_rules! deserialize_primitive {
    ($ty:ident, $method:ident, $visit_method:ident) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
        where
            V: de::Visitor<'de>,
        {
            match self.value.trim().parse::<$ty>() {
                Ok(val) => visitor.$visit_method(val),
                Err(_) => {
                    // if we fail to parse the value as the requested type,
                    // we'll just pass it through as a string
                    self.deserialize_any(visitor)
                }
            }
        }
    };
}

impl<'de, 'a: 'de, E> de::Deserializer<'de> for StringParsingDeserializer<'a, E>
where
    E: de::Error,
{
    type Error = E;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Cow::Borrowed(string) => visitor.visit_borrowed_str(string),
            Cow::Owned(string) => visitor.visit_string(string),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let _ = name;
        let _ = variants;
        visitor.visit_enum(self)
    }

    deserialize_primitive!(bool, deserialize_bool, visit_bool);
    deserialize_primitive!(i8, deserialize_i8, visit_i8);
    deserialize_primitive!(i16, deserialize_i16, visit_i16);
    deserialize_primitive!(i32, deserialize_i32, visit_i32);
    deserialize_primitive!(i64, deserialize_i64, visit_i64);
    deserialize_primitive!(u8, deserialize_u8, visit_u8);
    deserialize_primitive!(u16, deserialize_u16, visit_u16);
    deserialize_primitive!(u32, deserialize_u32, visit_u32);
    deserialize_primitive!(u64, deserialize_u64, visit_u64);
    deserialize_primitive!(f32, deserialize_f32, visit_f32);
    deserialize_primitive!(f64, deserialize_f64, visit_f64);

    serde::forward_to_deserialize_any! {
        char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

impl<'de, 'a: 'de, E> de::EnumAccess<'de> for StringParsingDeserializer<'a, E>
where
    E: de::Error,
{
    type Error = E;
    type Variant = UnitOnly<E>;

    fn variant_seed<T>(self, seed: T) -> Result<(T::Value, Self::Variant), Self::Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self).map(unit_only)
    }
}

impl<E> fmt::Debug for StringParsingDeserializer<'_, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter
            .debug_struct("StringParsingDeserializer")
            .field("value", &self.value)
            .finish()
    }
}

pub struct UnitOnly<E> {
    marker: PhantomData<E>,
}

pub fn unit_only<T, E>(t: T) -> (T, UnitOnly<E>) {
    (
        t,
        UnitOnly {
            marker: PhantomData,
        },
    )
}

impl<'de, E> de::VariantAccess<'de> for UnitOnly<E>
where
    E: de::Error,
{
    type Error = E;

    fn unit_variant(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, _seed: T) -> Result<T::Value, Self::Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        Err(de::Error::invalid_type(
            Unexpected::UnitVariant,
            &"newtype variant",
        ))
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        Err(de::Error::invalid_type(
            Unexpected::UnitVariant,
            &"tuple variant",
        ))
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        Err(de::Error::invalid_type(
            Unexpected::UnitVariant,
            &"struct variant",
        ))
    }
}

#[cfg(test)]
mod test {
    use serde::Deserialize;

    use super::StringParsingDeserializer;
    use crate::Error;

    fn de(s: &'static str) -> StringParsingDeserializer<'static, Error> {
        StringParsingDeserializer::new(s)
    }

    #[test]
    fn parses_requested_primitive() {
        assert_eq!(u16::deserialize(de("512")).unwrap(), 512);
        assert_eq!(f64::deserialize(de("1.5")).unwrap(), 1.5);
        assert!(bool::deserialize(de("true")).unwrap());
        assert_eq!(String::deserialize(de("007")).unwrap(), "007");
    }

    #[test]
    fn unparsable_primitive_is_an_error() {
        assert!(u8::deserialize(de("300")).is_err());
        assert!(u8::deserialize(de("abc")).is_err());
    }

    #[test]
    fn unit_variant() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "lowercase")]
        enum Color {
            Red,
            Blue,
        }
        assert_eq!(Color::deserialize(de("red")).unwrap(), Color::Red);
        assert_eq!(Color::deserialize(de("blue")).unwrap(), Color::Blue);
        assert!(Color::deserialize(de("green")).is_err());
    }
}
