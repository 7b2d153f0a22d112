use super::FormatCodec;
use crate::error::{SerializerError, SerializerErrorExt};
use dser_domain::{PropertyBagOptions, SerializationKind};
use dser_registry::Shape;
use serde::de::value::{MapDeserializer, StrDeserializer};
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, VariantAccess, Visitor,
};
use serde::{Deserializer, Serialize, forward_to_deserialize_any};
use serde_json::Value;

/// Key of the optional line carrying the payload type.
pub const TYPE_PROPERTY: &str = "$type";

/// Flat `key=value` lines, one per top-level field.
///
/// Scalars are written as-is, nested values as compact JSON and absent values as the
/// configured null literal. Only values with named fields (structs, maps, struct-like enum
/// variants) can be written. Keys are read back like values, so maps with numeric keys survive,
/// and a payload with a single property names the variant of a top-level enum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBagCodec {
    options: PropertyBagOptions,
}

impl PropertyBagCodec {
    /// # Errors
    /// Returns [`SerializerError::ArgumentOutOfRange`] when a delimiter is empty or the two
    /// delimiters overlap.
    pub fn new(options: PropertyBagOptions) -> Result<Self, SerializerError> {
        let key_value = options.key_value_delimiter.as_str();
        let line = options.line_delimiter.as_str();
        if key_value.is_empty() || line.is_empty() || key_value.contains(line) {
            return Err(SerializerError::ArgumentOutOfRange {
                name: "property_bag",
                message: format!(
                    "delimiters {key_value:?} and {line:?} must be non-empty and distinct"
                )
                .into(),
                context: None,
            });
        }
        Ok(Self { options })
    }

    #[must_use]
    pub const fn options(&self) -> &PropertyBagOptions {
        &self.options
    }

    fn render(&self, value: &Value) -> String {
        match value {
            Value::Null => self.options.null_value_encoding.clone(),
            Value::String(text) => text.clone(),
            nested => nested.to_string(),
        }
    }

    fn line(&self, key: &str, value: &str) -> Result<String, SerializerError> {
        let delimiter = &self.options.key_value_delimiter;
        if key.contains(delimiter.as_str()) || key.contains(self.options.line_delimiter.as_str()) {
            return Err(SerializerError::property_bag(format!(
                "property name `{key}` contains a delimiter"
            )));
        }
        if value.contains(self.options.line_delimiter.as_str()) {
            return Err(SerializerError::property_bag(format!(
                "value of `{key}` contains the line delimiter"
            )));
        }
        Ok(format!("{key}{delimiter}{value}"))
    }
}

impl FormatCodec for PropertyBagCodec {
    fn kind(&self) -> SerializationKind {
        SerializationKind::PropertyBag
    }

    fn null_string(&self) -> &str {
        &self.options.null_value_encoding
    }

    fn encode_string<T: Serialize + Shape>(&self, value: &T) -> Result<String, SerializerError> {
        let tree = serde_json::to_value(value).context("Property bag encoding failed")?;
        let Value::Object(fields) = tree else {
            return Err(SerializerError::property_bag(format!(
                "`{}` has no named fields",
                T::shape()
            )));
        };

        let mut lines = Vec::with_capacity(fields.len() + 1);
        if self.options.include_versionless_qualified_name_as_property {
            let shape = T::shape();
            let name = shape.representation().versionless_qualified_name();
            lines.push(self.line(TYPE_PROPERTY, &name)?);
        }
        for (key, field) in &fields {
            lines.push(self.line(key, &self.render(field))?);
        }
        Ok(lines.join(&self.options.line_delimiter))
    }

    fn encode_bytes<T: Serialize + Shape>(&self, value: &T) -> Result<Vec<u8>, SerializerError> {
        self.encode_string(value).map(String::into_bytes)
    }

    fn decode_string<T: DeserializeOwned>(&self, payload: &str) -> Result<T, SerializerError> {
        let mut fields = Vec::new();
        for line in payload.split(self.options.line_delimiter.as_str()) {
            if line.is_empty() {
                continue;
            }
            let Some((key, raw)) = line.split_once(self.options.key_value_delimiter.as_str())
            else {
                return Err(SerializerError::property_bag(format!(
                    "line `{line}` has no key/value delimiter"
                )));
            };
            if key != TYPE_PROPERTY {
                let null = Some(self.options.null_value_encoding.as_str());
                fields.push((PropertyValue { raw: key, null: None }, PropertyValue { raw, null }));
            }
        }

        T::deserialize(PropertyLines { fields }).context("Property bag decoding failed")
    }

    fn decode_bytes<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, SerializerError> {
        let text = std::str::from_utf8(payload).context("Property bag payload is not UTF-8")?;
        self.decode_string(text)
    }
}

/// The lines of a payload, without the `$type` line.
struct PropertyLines<'a> {
    fields: Vec<(PropertyValue<'a>, PropertyValue<'a>)>,
}

impl<'de> Deserializer<'de> for PropertyLines<'_> {
    type Error = serde_json::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        let map: MapDeserializer<'de, _, Self::Error> =
            MapDeserializer::new(self.fields.into_iter());
        map.deserialize_any(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        let count = self.fields.len();
        let mut fields = self.fields.into_iter();
        match (fields.next(), count) {
            (Some((variant, value)), 1) => visitor.visit_enum(PropertyVariant { variant, value }),
            _ => Err(de::Error::invalid_length(count, &"one property naming the variant")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string bytes byte_buf
        option unit unit_struct newtype_struct seq tuple tuple_struct map struct identifier
        ignored_any
    }
}

/// A top-level enum: the key names the variant, the value holds its content.
struct PropertyVariant<'a> {
    variant: PropertyValue<'a>,
    value: PropertyValue<'a>,
}

impl<'de, 'a> EnumAccess<'de> for PropertyVariant<'a> {
    type Error = serde_json::Error;
    type Variant = PropertyValue<'a>;

    fn variant_seed<S: DeserializeSeed<'de>>(
        self,
        seed: S,
    ) -> Result<(S::Value, Self::Variant), Self::Error> {
        let variant = seed.deserialize(self.variant)?;
        Ok((variant, self.value))
    }
}

/// The textual key or value of one line.
///
/// Strings are taken verbatim; every other target type reads the text as JSON. Keys carry no
/// null literal.
struct PropertyValue<'a> {
    raw: &'a str,
    null: Option<&'a str>,
}

impl PropertyValue<'_> {
    fn is_null(&self) -> bool {
        self.null == Some(self.raw)
    }

    fn parsed(&self) -> Option<Value> {
        serde_json::from_str(self.raw).ok()
    }
}

impl<'de> IntoDeserializer<'de, serde_json::Error> for PropertyValue<'_> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

impl<'de> Deserializer<'de> for PropertyValue<'_> {
    type Error = serde_json::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.is_null() {
            return visitor.visit_unit();
        }
        match self.parsed() {
            Some(value) => value.deserialize_any(visitor),
            None => visitor.visit_str(self.raw),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.is_null() { visitor.visit_none() } else { visitor.visit_some(self) }
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_str(self.raw)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_str(self.raw)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_str(self.raw)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_str(self.raw)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        match self.parsed() {
            Some(value @ Value::Object(_)) => value.deserialize_enum(name, variants, visitor),
            _ => {
                let variant: StrDeserializer<'_, Self::Error> = self.raw.into_deserializer();
                visitor.visit_enum(variant)
            },
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 bytes byte_buf unit unit_struct
        seq tuple tuple_struct map struct ignored_any
    }
}

impl<'de> VariantAccess<'de> for PropertyValue<'_> {
    type Error = serde_json::Error;

    fn unit_variant(self) -> Result<(), Self::Error> {
        de::Deserialize::deserialize(self)
    }

    fn newtype_variant_seed<S: DeserializeSeed<'de>>(
        self,
        seed: S,
    ) -> Result<S::Value, Self::Error> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_seq(visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_map(visitor)
    }
}
