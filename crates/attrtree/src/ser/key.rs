use serde::Serialize;
use serde::ser::{Impossible, Serializer};

use super::BuildError;
use crate::number::{format_f32, format_f64};
use crate::value::Sentinel;

/// Default rendering of a map key or other attribute key.
///
/// Strings are used verbatim, numbers in decimal, booleans as `true`/`false`,
/// absent values as `<nil>` and unit variants by name. Keys with inner
/// structure (tuples, structs, data-carrying variants) fall back to their
/// compact JSON text.
pub fn format_key<K: Serialize + ?Sized>(key: &K) -> String {
    match key.serialize(KeySerializer) {
        Ok(s) => s,
        Err(_) => serde_json::to_string(key).unwrap_or_else(|err| {
            tracing::debug!(%err, "map key could not be rendered");
            format!("!BADKEY: {err}")
        }),
    }
}

struct KeySerializer;

fn composite() -> Result<Impossible<String, BuildError>, BuildError> {
    Err(BuildError::new("composite key"))
}

impl Serializer for KeySerializer {
    type Ok = String;
    type Error = BuildError;
    type SerializeSeq = Impossible<String, BuildError>;
    type SerializeTuple = Impossible<String, BuildError>;
    type SerializeTupleStruct = Impossible<String, BuildError>;
    type SerializeTupleVariant = Impossible<String, BuildError>;
    type SerializeMap = Impossible<String, BuildError>;
    type SerializeStruct = Impossible<String, BuildError>;
    type SerializeStructVariant = Impossible<String, BuildError>;

    fn serialize_bool(self, v: bool) -> Result<String, BuildError> {
        Ok(if v { "true" } else { "false" }.to_string())
    }
    fn serialize_i8(self, v: i8) -> Result<String, BuildError> {
        Ok(v.to_string())
    }
    fn serialize_i16(self, v: i16) -> Result<String, BuildError> {
        Ok(v.to_string())
    }
    fn serialize_i32(self, v: i32) -> Result<String, BuildError> {
        Ok(v.to_string())
    }
    fn serialize_i64(self, v: i64) -> Result<String, BuildError> {
        Ok(v.to_string())
    }
    fn serialize_i128(self, v: i128) -> Result<String, BuildError> {
        Ok(v.to_string())
    }
    fn serialize_u8(self, v: u8) -> Result<String, BuildError> {
        Ok(v.to_string())
    }
    fn serialize_u16(self, v: u16) -> Result<String, BuildError> {
        Ok(v.to_string())
    }
    fn serialize_u32(self, v: u32) -> Result<String, BuildError> {
        Ok(v.to_string())
    }
    fn serialize_u64(self, v: u64) -> Result<String, BuildError> {
        Ok(v.to_string())
    }
    fn serialize_u128(self, v: u128) -> Result<String, BuildError> {
        Ok(v.to_string())
    }
    fn serialize_f32(self, v: f32) -> Result<String, BuildError> {
        Ok(format_f32(v))
    }
    fn serialize_f64(self, v: f64) -> Result<String, BuildError> {
        Ok(format_f64(v))
    }
    fn serialize_char(self, v: char) -> Result<String, BuildError> {
        Ok(v.to_string())
    }
    fn serialize_str(self, v: &str) -> Result<String, BuildError> {
        Ok(v.to_string())
    }
    fn serialize_bytes(self, _v: &[u8]) -> Result<String, BuildError> {
        Err(BuildError::new("composite key"))
    }
    fn serialize_none(self) -> Result<String, BuildError> {
        Ok(Sentinel::Nil.as_str().to_string())
    }
    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<String, BuildError> {
        value.serialize(self)
    }
    fn serialize_unit(self) -> Result<String, BuildError> {
        Ok(Sentinel::Nil.as_str().to_string())
    }
    fn serialize_unit_struct(self, name: &'static str) -> Result<String, BuildError> {
        Ok(name.to_string())
    }
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, BuildError> {
        Ok(variant.to_string())
    }
    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, BuildError> {
        value.serialize(self)
    }
    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, BuildError> {
        Err(BuildError::new("composite key"))
    }
    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, BuildError> {
        composite()
    }
    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, BuildError> {
        composite()
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, BuildError> {
        composite()
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, BuildError> {
        composite()
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, BuildError> {
        composite()
    }
    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, BuildError> {
        composite()
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, BuildError> {
        composite()
    }
}
