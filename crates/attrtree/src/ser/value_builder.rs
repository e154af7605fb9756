use std::cell::Cell;

use serde::Serialize;
use serde::ser::*;

use super::BuildError;
use super::budget::Budget;
use super::compose;
use super::key::format_key;
use super::native::{self, NativeMap, NativeSeq};
use super::well_known::{Token, WellKnownStruct};
use crate::options::Options;
use crate::value::{Attr, Sentinel, Value};

/// Normalizes `value`, degrading a failing `Serialize` impl to an error marker.
pub(crate) fn build<T: Serialize + ?Sized>(value: &T, ser: ValueSerializer<'_>) -> Value {
    value.serialize(ser).unwrap_or_else(degrade)
}

fn degrade(err: BuildError) -> Value {
    tracing::debug!(%err, "value degraded to error marker");
    Value::string(format!("!ERROR: {err}"))
}

fn truncated(depth: usize) -> Value {
    tracing::debug!(depth, "nesting limit reached, branch truncated");
    Value::Sentinel(Sentinel::Truncated)
}

/// What the caller one level up expects from this serializer.
#[derive(Debug, Clone, Copy)]
enum Mode<'a> {
    Plain,
    /// The next map is a pre-built group: keep it as is, even when empty.
    Group,
    /// A sequence element; flags the slot when the element is a pre-built attribute.
    Element(&'a Cell<bool>),
    /// The next sequence, reached through any pointers, uses this
    /// single-value policy instead of unpacking.
    Seq(bool),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ValueSerializer<'a> {
    budget: Budget<'a>,
    mode: Mode<'a>,
}

impl<'a> ValueSerializer<'a> {
    pub(crate) fn new(opts: &'a Options) -> Self {
        Self {
            budget: Budget::new(opts),
            mode: Mode::Plain,
        }
    }

    /// Serializer for a value expected to be a sequence.
    pub(crate) fn for_seq(opts: &'a Options, unpack_single: bool) -> Self {
        Self::new(opts).with_mode(Mode::Seq(unpack_single))
    }

    fn with_mode(self, mode: Mode<'a>) -> Self {
        Self { mode, ..self }
    }

    /// Follows one pointer or newtype; only the sequence policy carries over.
    fn unwrapped(self) -> Self {
        let mode = match self.mode {
            Mode::Seq(unpack) => Mode::Seq(unpack),
            _ => Mode::Plain,
        };
        Self {
            budget: self.budget.unwrapped(),
            mode,
        }
    }

    fn unpack_single(&self) -> bool {
        match self.mode {
            Mode::Seq(unpack) => unpack,
            _ => true,
        }
    }
}

impl<'a> Serializer for ValueSerializer<'a> {
    type Ok = Value;
    type Error = BuildError;
    type SerializeSeq = SeqBuilder<'a>;
    type SerializeTuple = SeqBuilder<'a>;
    type SerializeTupleStruct = SeqBuilder<'a>;
    type SerializeTupleVariant = VariantSeqBuilder<'a>;
    type SerializeMap = MapBuilder<'a>;
    type SerializeStruct = StructBuilder<'a>;
    type SerializeStructVariant = StructBuilder<'a>;

    fn serialize_bool(self, v: bool) -> Result<Value, BuildError> {
        Ok(Value::bool(v))
    }
    fn serialize_i8(self, v: i8) -> Result<Value, BuildError> {
        Ok(Value::int64(v as i64))
    }
    fn serialize_i16(self, v: i16) -> Result<Value, BuildError> {
        Ok(Value::int64(v as i64))
    }
    fn serialize_i32(self, v: i32) -> Result<Value, BuildError> {
        Ok(Value::int64(v as i64))
    }
    fn serialize_i64(self, v: i64) -> Result<Value, BuildError> {
        Ok(Value::int64(v))
    }
    fn serialize_i128(self, v: i128) -> Result<Value, BuildError> {
        Ok(i64::try_from(v)
            .map(Value::int64)
            .unwrap_or_else(|_| Value::string(v.to_string())))
    }
    fn serialize_u8(self, v: u8) -> Result<Value, BuildError> {
        Ok(Value::uint64(v as u64))
    }
    fn serialize_u16(self, v: u16) -> Result<Value, BuildError> {
        Ok(Value::uint64(v as u64))
    }
    fn serialize_u32(self, v: u32) -> Result<Value, BuildError> {
        Ok(Value::uint64(v as u64))
    }
    fn serialize_u64(self, v: u64) -> Result<Value, BuildError> {
        Ok(Value::uint64(v))
    }
    fn serialize_u128(self, v: u128) -> Result<Value, BuildError> {
        Ok(u64::try_from(v)
            .map(Value::uint64)
            .unwrap_or_else(|_| Value::string(v.to_string())))
    }
    fn serialize_f32(self, v: f32) -> Result<Value, BuildError> {
        self.serialize_f64(v as f64)
    }
    fn serialize_f64(self, v: f64) -> Result<Value, BuildError> {
        Ok(Value::float64(v))
    }
    fn serialize_char(self, v: char) -> Result<Value, BuildError> {
        Ok(Value::string(v.to_string()))
    }
    fn serialize_str(self, v: &str) -> Result<Value, BuildError> {
        Ok(Value::string(v))
    }
    fn serialize_bytes(self, v: &[u8]) -> Result<Value, BuildError> {
        let mut seq = SeqBuilder::new(self, self.unpack_single());
        for b in v {
            seq.push(b);
        }
        Ok(seq.finish())
    }
    fn serialize_none(self) -> Result<Value, BuildError> {
        Ok(Value::nil())
    }
    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, BuildError> {
        if self.budget.chain_exhausted() {
            return Ok(truncated(self.budget.depth));
        }
        value.serialize(self.unwrapped())
    }
    fn serialize_unit(self) -> Result<Value, BuildError> {
        Ok(Value::nil())
    }
    fn serialize_unit_struct(self, name: &'static str) -> Result<Value, BuildError> {
        Ok(Value::string(name))
    }
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, BuildError> {
        Ok(Value::string(variant))
    }
    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Value, BuildError> {
        if let Some(token) = Token::from_name(name) {
            return match token {
                Token::Group => Ok(build(value, self.with_mode(Mode::Group))),
                Token::Attr => {
                    if let Mode::Element(hit) = self.mode {
                        hit.set(true);
                    }
                    Ok(build(value, self.with_mode(Mode::Group)))
                }
                Token::Opaque => Ok(Value::opaque(serde_json::to_value(value)?)),
                leaf => Ok(leaf.restore(build(value, self.with_mode(Mode::Plain)))),
            };
        }
        self.serialize_some(value)
    }
    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, BuildError> {
        if self.budget.exhausted() {
            return Ok(truncated(self.budget.depth));
        }
        let content = native::render(value, self.budget.nested());
        Ok(Value::opaque(native::tagged(Some(variant), content)))
    }
    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, BuildError> {
        Ok(SeqBuilder::new(self, self.unpack_single()))
    }
    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, BuildError> {
        self.serialize_seq(Some(len))
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, BuildError> {
        self.serialize_seq(Some(len))
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, BuildError> {
        Ok(VariantSeqBuilder {
            depth: self.budget.depth,
            seq: NativeSeq::new(self.budget, Some(variant), Some(len)),
        })
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, BuildError> {
        let verbatim = matches!(self.mode, Mode::Group);
        Ok(MapBuilder::new(self, verbatim))
    }
    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, BuildError> {
        Ok(StructBuilder::new(self.budget, None, WellKnownStruct::detect(name, len)))
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, BuildError> {
        Ok(StructBuilder::new(self.budget, Some(variant), None))
    }
}

/// Collects sequence elements, then applies the single-value policy.
pub(crate) struct SeqBuilder<'a> {
    budget: Budget<'a>,
    unpack_single: bool,
    truncated: bool,
    elems: Vec<Value>,
    all_attrs: bool,
}

impl<'a> SeqBuilder<'a> {
    pub(crate) fn new(ser: ValueSerializer<'a>, unpack_single: bool) -> Self {
        Self {
            budget: ser.budget,
            unpack_single,
            truncated: ser.budget.exhausted(),
            elems: Vec::new(),
            all_attrs: true,
        }
    }

    pub(crate) fn push<T: ?Sized + Serialize>(&mut self, value: &T) {
        if self.truncated {
            return;
        }
        let hit = Cell::new(false);
        let child = ValueSerializer {
            budget: self.budget.nested(),
            mode: Mode::Element(&hit),
        };
        self.elems.push(build(value, child));
        self.all_attrs &= hit.get();
    }

    pub(crate) fn finish(self) -> Value {
        if self.truncated {
            return truncated(self.budget.depth);
        }
        if self.all_attrs && !self.elems.is_empty() {
            return compose::splice_attrs(self.elems);
        }
        compose::finish_seq(self.elems, self.unpack_single)
    }
}

impl SerializeSeq for SeqBuilder<'_> {
    type Ok = Value;
    type Error = BuildError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BuildError> {
        self.push(value);
        Ok(())
    }

    fn end(self) -> Result<Value, BuildError> {
        Ok(self.finish())
    }
}

impl SerializeTuple for SeqBuilder<'_> {
    type Ok = Value;
    type Error = BuildError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BuildError> {
        self.push(value);
        Ok(())
    }
    fn end(self) -> Result<Value, BuildError> {
        Ok(self.finish())
    }
}

impl SerializeTupleStruct for SeqBuilder<'_> {
    type Ok = Value;
    type Error = BuildError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BuildError> {
        self.push(value);
        Ok(())
    }
    fn end(self) -> Result<Value, BuildError> {
        Ok(self.finish())
    }
}

/// Collects map entries under their formatted keys.
pub(crate) struct MapBuilder<'a> {
    budget: Budget<'a>,
    verbatim: bool,
    truncated: bool,
    entries: Vec<Attr>,
    next_key: Option<String>,
}

impl<'a> MapBuilder<'a> {
    pub(crate) fn new(ser: ValueSerializer<'a>, verbatim: bool) -> Self {
        Self {
            budget: ser.budget,
            verbatim,
            truncated: ser.budget.exhausted(),
            entries: Vec::new(),
            next_key: None,
        }
    }

    pub(crate) fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) {
        if self.truncated {
            return;
        }
        let child = ValueSerializer {
            budget: self.budget.nested(),
            mode: Mode::Plain,
        };
        self.entries.push(Attr {
            key,
            value: build(value, child),
        });
    }

    pub(crate) fn finish(self) -> Value {
        if self.truncated {
            return truncated(self.budget.depth);
        }
        if self.verbatim {
            return Value::Group(self.entries);
        }
        compose::finish_map(self.entries, self.budget.opts.map_order)
    }
}

impl SerializeMap for MapBuilder<'_> {
    type Ok = Value;
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

    fn end(self) -> Result<Value, BuildError> {
        Ok(self.finish())
    }
}

/// Structs and struct variants become one opaque scalar holding their native
/// JSON, except the std time types which become typed scalars.
pub(crate) struct StructBuilder<'a> {
    depth: usize,
    shape: Option<WellKnownStruct>,
    fields: NativeMap<'a>,
}

impl<'a> StructBuilder<'a> {
    fn new(
        budget: Budget<'a>,
        variant: Option<&'static str>,
        shape: Option<WellKnownStruct>,
    ) -> Self {
        Self {
            depth: budget.depth,
            shape,
            fields: NativeMap::new(budget, variant),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) {
        // time structs are leaves and are classified even at the limit
        if self.shape.is_some() {
            self.fields.insert_unchecked(key.to_string(), value);
        } else {
            self.fields.insert(key.to_string(), value);
        }
    }

    fn well_known(&self) -> Option<Value> {
        let shape = self.shape?;
        let fields = self.fields.entries();
        let field = |name: &str| fields.get(name).and_then(serde_json::Value::as_u64);
        shape.build(field(shape.secs_field())?, field(shape.nanos_field())?)
    }

    fn finish(self) -> Value {
        if let Some(v) = self.well_known() {
            return v;
        }
        let depth = self.depth;
        match self.fields.finish() {
            Some(json) => Value::opaque(json),
            None => truncated(depth),
        }
    }
}

impl SerializeStruct for StructBuilder<'_> {
    type Ok = Value;
    type Error = BuildError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), BuildError> {
        self.push(key, value);
        Ok(())
    }

    fn end(self) -> Result<Value, BuildError> {
        Ok(self.finish())
    }
}

impl SerializeStructVariant for StructBuilder<'_> {
    type Ok = Value;
    type Error = BuildError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), BuildError> {
        self.push(key, value);
        Ok(())
    }

    fn end(self) -> Result<Value, BuildError> {
        Ok(self.finish())
    }
}

/// Tuple variants become an opaque `{"Variant": [...]}` scalar.
pub(crate) struct VariantSeqBuilder<'a> {
    depth: usize,
    seq: NativeSeq<'a>,
}

impl SerializeTupleVariant for VariantSeqBuilder<'_> {
    type Ok = Value;
    type Error = BuildError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), BuildError> {
        self.seq.push(value);
        Ok(())
    }

    fn end(self) -> Result<Value, BuildError> {
        Ok(match self.seq.finish() {
            Some(json) => Value::opaque(json),
            None => truncated(self.depth),
        })
    }
}
