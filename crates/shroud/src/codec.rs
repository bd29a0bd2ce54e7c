//! Canonical byte encoding of structured values.
//!
//! Values are first lowered into the schema-erased [`serde_json::Value`] tree
//! (null, bool, number, string, sequence, string-keyed map) and then written
//! as compact JSON. Going through the tree sorts map keys, so two values that
//! compare equal always encode to the same bytes regardless of the iteration
//! order of the source container.
//!
//! Everything [`to_canonical`] accepts, [`from_canonical`] can read back:
//! non-finite floats are refused up front instead of being written as `null`,
//! and both directions share the [`MAX_DEPTH`] nesting limit.

use serde::{
    de::DeserializeOwned,
    ser::{self, Error as _, Serialize},
};
use serde_json::Value;

use crate::error::ShroudError;

/// Deepest nesting of sequences and maps that encodes and decodes.
///
/// serde_json's reader stops at 128 open brackets; the encoder stops one
/// short of it so no token is issued that the reader would refuse.
pub const MAX_DEPTH: usize = 127;

/// Lower `value` into the schema-erased tree.
///
/// # Errors
///
/// Returns [`ShroudError::Serialization`] if `value` has no representation in
/// the tree: a NaN or infinite float, a map whose keys are not strings or
/// integers, nesting deeper than [`MAX_DEPTH`], or a `Serialize` impl that
/// reports an error.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, ShroudError> {
    value
        .serialize(FiniteCheck)
        .map_err(ShroudError::Serialization)?;
    let tree = serde_json::to_value(value).map_err(ShroudError::Serialization)?;
    if depth(&tree) > MAX_DEPTH {
        return Err(ShroudError::Serialization(serde_json::Error::custom(
            format_args!("value nests deeper than {MAX_DEPTH} levels"),
        )));
    }
    Ok(tree)
}

/// Encode `value` into canonical bytes.
///
/// # Errors
///
/// Returns [`ShroudError::Serialization`] as for [`to_value`], and
/// [`ShroudError::EmptyValue`] if the encoding is zero-length.
pub fn to_canonical<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ShroudError> {
    let tree = to_value(value)?;
    let bytes = serde_json::to_vec(&tree).map_err(ShroudError::Serialization)?;
    if bytes.is_empty() {
        return Err(ShroudError::EmptyValue);
    }
    Ok(bytes)
}

/// Decode canonical bytes into `T`.
///
/// Input nested deeper than [`MAX_DEPTH`] is rejected by serde_json's
/// recursion guard rather than risking the stack.
///
/// # Errors
///
/// Returns [`ShroudError::Deserialization`] if the bytes do not fit `T`.
pub fn from_canonical<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ShroudError> {
    serde_json::from_slice(bytes).map_err(|e| ShroudError::Deserialization {
        line: e.line(),
        column: e.column(),
    })
}

/// Number of nested sequences and maps around the deepest leaf.
fn depth(tree: &Value) -> usize {
    let mut deepest = 0;
    let mut pending = vec![(tree, 0usize)];
    while let Some((node, level)) = pending.pop() {
        match node {
            Value::Array(items) => {
                deepest = deepest.max(level + 1);
                pending.extend(items.iter().map(|child| (child, level + 1)));
            }
            Value::Object(map) => {
                deepest = deepest.max(level + 1);
                pending.extend(map.values().map(|child| (child, level + 1)));
            }
            _ => {}
        }
    }
    deepest
}

// ---------------------------------------------------------------------------
// Non-finite float detection
// ---------------------------------------------------------------------------

/// Serializer that produces nothing and fails on NaN or infinite floats.
///
/// serde_json writes those as `null` without complaint, which would seal a
/// value that can never be exposed as its own type.
#[derive(Clone, Copy)]
struct FiniteCheck;

type Checked = Result<(), serde_json::Error>;

fn finite(ok: bool) -> Checked {
    if ok {
        Ok(())
    } else {
        Err(serde_json::Error::custom(
            "NaN and infinite floats have no canonical representation",
        ))
    }
}

impl ser::Serializer for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_f32(self, v: f32) -> Checked {
        finite(v.is_finite())
    }
    fn serialize_f64(self, v: f64) -> Checked {
        finite(v.is_finite())
    }

    fn serialize_bool(self, _: bool) -> Checked {
        Ok(())
    }
    fn serialize_i8(self, _: i8) -> Checked {
        Ok(())
    }
    fn serialize_i16(self, _: i16) -> Checked {
        Ok(())
    }
    fn serialize_i32(self, _: i32) -> Checked {
        Ok(())
    }
    fn serialize_i64(self, _: i64) -> Checked {
        Ok(())
    }
    fn serialize_i128(self, _: i128) -> Checked {
        Ok(())
    }
    fn serialize_u8(self, _: u8) -> Checked {
        Ok(())
    }
    fn serialize_u16(self, _: u16) -> Checked {
        Ok(())
    }
    fn serialize_u32(self, _: u32) -> Checked {
        Ok(())
    }
    fn serialize_u64(self, _: u64) -> Checked {
        Ok(())
    }
    fn serialize_u128(self, _: u128) -> Checked {
        Ok(())
    }
    fn serialize_char(self, _: char) -> Checked {
        Ok(())
    }
    fn serialize_str(self, _: &str) -> Checked {
        Ok(())
    }
    fn serialize_bytes(self, _: &[u8]) -> Checked {
        Ok(())
    }
    fn serialize_none(self) -> Checked {
        Ok(())
    }
    fn serialize_unit(self) -> Checked {
        Ok(())
    }
    fn serialize_unit_struct(self, _: &'static str) -> Checked {
        Ok(())
    }
    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Checked {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Checked {
        value.serialize(self)
    }
    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        value: &T,
    ) -> Checked {
        value.serialize(self)
    }
    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Checked {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self, Self::Error> {
        Ok(self)
    }
    fn serialize_tuple(self, _: usize) -> Result<Self, Self::Error> {
        Ok(self)
    }
    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self, Self::Error> {
        Ok(self)
    }
    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, Self::Error> {
        Ok(self)
    }
    fn serialize_map(self, _: Option<usize>) -> Result<Self, Self::Error> {
        Ok(self)
    }
    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, Self::Error> {
        Ok(self)
    }
    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, Self::Error> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Checked {
        key.serialize(*self)
    }
    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &'static str, value: &T) -> Checked {
        value.serialize(*self)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &'static str, value: &T) -> Checked {
        value.serialize(*self)
    }
    fn end(self) -> Checked {
        Ok(())
    }
}
