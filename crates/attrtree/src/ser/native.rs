//! The native JSON rendering carried by opaque scalars.
//!
//! Produces the same shape `serde_json::to_value` would, except that it never
//! fails and stops at the nesting limit with a `"<truncated>"` string.

use serde::Serialize;
use serde::ser::*;
use serde_json::{Map, Value as Json};

use super::BuildError;
use super::budget::Budget;
use super::key::format_key;
use crate::value::Sentinel;

/// Renders `value` as JSON; a failing `Serialize` impl leaves an error string
/// in place of the failing part only.
pub(crate) fn render<T: Serialize + ?Sized>(value: &T, budget: Budget<'_>) -> Json {
    value.serialize(NativeSerializer { budget }).unwrap_or_else(|err| {
        tracing::debug!(%err, "opaque member degraded to error marker");
        Json::String(format!("!ERROR: {err}"))
    })
}

fn truncated(budget: Budget<'_>) -> Json {
    tracing::debug!(depth = budget.depth, "nesting limit reached inside opaque value");
    Json::String(Sentinel::Truncated.as_str().to_string())
}

/// Wraps variant content the way serde_json tags enums: `{"Variant": ...}`.
pub(crate) fn tagged(variant: Option<&'static str>, content: Json) -> Json {
    match variant {
        Some(name) => {
            let mut obj = Map::with_capacity(1);
            obj.insert(name.to_string(), content);
            Json::Object(obj)
        }
        None => content,
    }
}

struct NativeSerializer<'a> {
    budget: Budget<'a>,
}

impl<'a> Serializer for NativeSerializer<'a> {
    type Ok = Json;
    type Error = BuildError;
    type SerializeSeq = NativeSeq<'a>;
    type SerializeTuple = NativeSeq<'a>;
    type SerializeTupleStruct = NativeSeq<'a>;
    type SerializeTupleVariant = NativeSeq<'a>;
    type SerializeMap = NativeMap<'a>;
    type SerializeStruct = NativeMap<'a>;
    type SerializeStructVariant = NativeMap<'a>;

    fn serialize_bool(self, v: bool) -> Result<Json, BuildError> {
        Ok(Json::Bool(v))
    }
    fn serialize_i8(self, v: i8) -> Result<Json, BuildError> {
        Ok(Json::from(v))
    }
    fn serialize_i16(self, v: i16) -> Result<Json, BuildError> {
        Ok(Json::from(v))
    }
    fn serialize_i32(self, v: i32) -> Result<Json, BuildError> {
        Ok(Json::from(v))
    }
    fn serialize_i64(self, v: i64) -> Result<Json, BuildError> {
        Ok(Json::from(v))
    }
    fn serialize_i128(self, v: i128) -> Result<Json, BuildError> {
        Ok(i64::try_from(v)
            .map(Json::from)
            .unwrap_or_else(|_| Json::String(v.to_string())))
    }
    fn serialize_u8(self, v: u8) -> Result<Json, BuildError> {
        Ok(Json::from(v))
    }
    fn serialize_u16(self, v: u16) -> Result<Json, BuildError> {
        Ok(Json::from(v))
    }
    fn serialize_u32(self, v: u32) -> Result<Json, BuildError> {
        Ok(Json::from(v))
    }
    fn serialize_u64(self, v: u64) -> Result<Json, BuildError> {
        Ok(Json::from(v))
    }
    fn serialize_u128(self, v: u128) -> Result<Json, BuildError> {
        Ok(u64::try_from(v)
            .map(Json::from)
            .unwrap_or_else(|_| Json::String(v.to_string())))
    }
    fn serialize_f32(self, v: f32) -> Result<Json, BuildError> {
        Ok(Json::from(v))
    }
    fn serialize_f64(self, v: f64) -> Result<Json, BuildError> {
        // non-finite values become null, as in serde_json
        Ok(Json::from(v))
    }
    fn serialize_char(self, v: char) -> Result<Json, BuildError> {
        Ok(Json::String(v.to_string()))
    }
    fn serialize_str(self, v: &str) -> Result<Json, BuildError> {
        Ok(Json::String(v.to_string()))
    }
    fn serialize_bytes(self, v: &[u8]) -> Result<Json, BuildError> {
        Ok(Json::Array(v.iter().map(|b| Json::from(*b)).collect()))
    }
    fn serialize_none(self) -> Result<Json, BuildError> {
        Ok(Json::Null)
    }
    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Json, BuildError> {
        if self.budget.chain_exhausted() {
            return Ok(truncated(self.budget));
        }
        value.serialize(NativeSerializer {
            budget: self.budget.unwrapped(),
        })
    }
    fn serialize_unit(self) -> Result<Json, BuildError> {
        Ok(Json::Null)
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Json, BuildError> {
        Ok(Json::Null)
    }
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Json, BuildError> {
        Ok(Json::String(variant.to_string()))
    }
    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Json, BuildError> {
        self.serialize_some(value)
    }
    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Json, BuildError> {
        if self.budget.exhausted() {
            return Ok(truncated(self.budget));
        }
        Ok(tagged(Some(variant), render(value, self.budget.nested())))
    }
    fn serialize_seq(self, len: Option<usize>) -> Result<NativeSeq<'a>, BuildError> {
        Ok(NativeSeq::new(self.budget, None, len))
    }
    fn serialize_tuple(self, len: usize) -> Result<NativeSeq<'a>, BuildError> {
        self.serialize_seq(Some(len))
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<NativeSeq<'a>, BuildError> {
        self.serialize_seq(Some(len))
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<NativeSeq<'a>, BuildError> {
        Ok(NativeSeq::new(self.budget, Some(variant), Some(len)))
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<NativeMap<'a>, BuildError> {
        Ok(NativeMap::new(self.budget, None))
    }
    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<NativeMap<'a>, BuildError> {
        Ok(NativeMap::new(self.budget, None))
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<NativeMap<'a>, BuildError> {
        Ok(NativeMap::new(self.budget, Some(variant)))
    }
}

pub(crate) struct NativeSeq<'a> {
    budget: Budget<'a>,
    variant: Option<&'static str>,
    truncated: bool,
    items: Vec<Json>,
}

impl<'a> NativeSeq<'a> {
    pub(crate) fn new(
        budget: Budget<'a>,
        variant: Option<&'static str>,
        len: Option<usize>,
    ) -> Self {
        let truncated = budget.exhausted();
        let cap = if truncated { 0 } else { len.unwrap_or(0) };
        Self {
            budget,
            variant,
            truncated,
            items: Vec::with_capacity(cap),
        }
    }

    pub(crate) fn push<T: ?Sized + Serialize>(&mut self, value: &T) {
        if !self.truncated {
            self.items.push(render(value, self.budget.nested()));
        }
    }

    /// The rendered array, or `None` when the container was past the limit.
    pub(crate) fn finish(self) -> Option<Json> {
        if self.truncated {
            return None;
        }
        Some(tagged(self.variant, Json::Array(self.items)))
    }

    fn end_json(self) -> Json {
        let budget = self.budget;
        self.finish().unwrap_or_else(|| truncated(budget))
    }
}

impl SerializeSeq for NativeSeq<'_> {
    type Ok = Json;
    type Error = BuildError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BuildError> {
        self.push(value);
        Ok(())
    }
    fn end(self) -> Result<Json, BuildError> {
        Ok(self.end_json())
    }
}

impl SerializeTuple for NativeSeq<'_> {
    type Ok = Json;
    type Error = BuildError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BuildError> {
        self.push(value);
        Ok(())
    }
    fn end(self) -> Result<Json, BuildError> {
        Ok(self.end_json())
    }
}

impl SerializeTupleStruct for NativeSeq<'_> {
    type Ok = Json;
    type Error = BuildError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BuildError> {
        self.push(value);
        Ok(())
    }
    fn end(self) -> Result<Json, BuildError> {
        Ok(self.end_json())
    }
}

impl SerializeTupleVariant for NativeSeq<'_> {
    type Ok = Json;
    type Error = BuildError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BuildError> {
        self.push(value);
        Ok(())
    }
    fn end(self) -> Result<Json, BuildError> {
        Ok(self.end_json())
    }
}

pub(crate) struct NativeMap<'a> {
    budget: Budget<'a>,
    variant: Option<&'static str>,
    truncated: bool,
    entries: Map<String, Json>,
    next_key: Option<String>,
}

impl<'a> NativeMap<'a> {
    pub(crate) fn new(budget: Budget<'a>, variant: Option<&'static str>) -> Self {
        Self {
            budget,
            variant,
            truncated: budget.exhausted(),
            entries: Map::new(),
            next_key: None,
        }
    }

    /// Renders one member without checking the limit on this container.
    pub(crate) fn insert_unchecked<T: ?Sized + Serialize>(&mut self, key: String, value: &T) {
        self.entries.insert(key, render(value, self.budget.nested()));
    }

    pub(crate) fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) {
        if !self.truncated {
            self.insert_unchecked(key, value);
        }
    }

    pub(crate) fn entries(&self) -> &Map<String, Json> {
        &self.entries
    }

    /// The rendered object, or `None` when the container was past the limit.
    pub(crate) fn finish(self) -> Option<Json> {
        if self.truncated {
            return None;
        }
        Some(tagged(self.variant, Json::Object(self.entries)))
    }

    fn end_json(self) -> Json {
        let budget = self.budget;
        self.finish().unwrap_or_else(|| truncated(budget))
    }
}

impl SerializeMap for NativeMap<'_> {
    type Ok = Json;
    type Error = BuildError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), BuildError> {
        if !self.truncated {
            self.next_key = Some(format_key(key));
        }
        Ok(())
    }
    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BuildError> {
        let key = self.next_key.take().unwrap_or_default();
        self.insert(key, value);
        Ok(())
    }
    fn end(self) -> Result<Json, BuildError> {
        Ok(self.end_json())
    }
}

impl SerializeStruct for NativeMap<'_> {
    type Ok = Json;
    type Error = BuildError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), BuildError> {
        self.insert(key.to_string(), value);
        Ok(())
    }
    fn end(self) -> Result<Json, BuildError> {
        Ok(self.end_json())
    }
}

impl SerializeStructVariant for NativeMap<'_> {
    type Ok = Json;
    type Error = BuildError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), BuildError> {
        self.insert(key.to_string(), value);
        Ok(())
    }
    fn end(self) -> Result<Json, BuildError> {
        Ok(self.end_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use serde_json::json;

    fn native<T: Serialize + ?Sized>(value: &T, opts: &Options) -> Json {
        render(value, Budget::new(opts))
    }

    #[test]
    fn matches_serde_json_shapes() {
        let opts = Options::default();
        let v = (vec![7u8], Vec::<u8>::new(), None::<u8>, "x", 'c', ());
        assert_eq!(native(&v, &opts), json!([[7], [], null, "x", "c", null]));
        assert_eq!(native(&f64::NAN, &opts), Json::Null);
    }

    #[test]
    fn containers_stop_at_the_limit() {
        let opts = Options::default().with_max_depth(Some(1));
        assert_eq!(native(&vec![vec![1]], &opts), json!(["<truncated>"]));
        assert_eq!(native(&Some(Some(3)), &opts), json!(3));
    }
}
