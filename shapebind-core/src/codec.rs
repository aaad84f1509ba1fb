//! Format-neutral encode/decode protocol
//!
//! Six object-safe roles let one graph traversal drive any serialization
//! format, the way parsers drive any `GraphSink` without knowing the concrete
//! sink type:
//!
//! - `ValueEncoder` writes one value (scalar, identifier, nested object, or
//!   list); `ObjectEncoder` writes named properties; `ListEncoder` writes
//!   successive items.
//! - `ValueDecoder` classifies and reads one value; `ObjectDecoder`
//!   enumerates `(name, value)` pairs and exposes identity and declared type
//!   separately; `ListDecoder` enumerates items.
//!
//! Typed readers return `None` ("absent") instead of failing on a shape
//! mismatch, which is what makes permissive decoding of open content
//! possible: a generic walk can classify with `shape()` and dispatch without
//! foreknowledge of a property's declared type.

use crate::error::Result;
use crate::temporal::DateTime;
use serde_json::Value as JsonValue;

/// Shape of a decoded value, as reported by `ValueDecoder::shape`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    String,
    Number,
    Bool,
    Object,
    List,
    Null,
    Absent,
}

/// Writes a single value to the output
pub trait ValueEncoder {
    fn write_string(&mut self, value: &str) -> Result<()>;
    fn write_datetime(&mut self, value: &DateTime) -> Result<()>;
    fn write_integer(&mut self, value: i64) -> Result<()>;
    fn write_float(&mut self, value: f64) -> Result<()>;
    fn write_bool(&mut self, value: bool) -> Result<()>;
    /// Write a bare identifier (reference stub or unresolved reference)
    fn write_iri(&mut self, iri: &str) -> Result<()>;
    /// Write an enum identifier
    fn write_enum(&mut self, iri: &str) -> Result<()>;
    /// Write a null; only open content produces these
    fn write_null(&mut self) -> Result<()>;

    /// Write a nested object record
    ///
    /// `id_key` is the identity key for the record (`@id` or a class alias);
    /// `types` is what the type key should carry, and may be empty for raw
    /// open-content maps (no identity or type key is emitted then).
    fn write_object(
        &mut self,
        id_key: &str,
        id: Option<&str>,
        types: &[String],
        body: &mut dyn FnMut(&mut dyn ObjectEncoder) -> Result<()>,
    ) -> Result<()>;

    /// Write a list of values
    fn write_list(&mut self, body: &mut dyn FnMut(&mut dyn ListEncoder) -> Result<()>)
        -> Result<()>;
}

/// Writes the named properties of one object record
pub trait ObjectEncoder {
    /// Write one named property via a fresh `ValueEncoder`
    fn encode_property(
        &mut self,
        name: &str,
        value: &mut dyn FnMut(&mut dyn ValueEncoder) -> Result<()>,
    ) -> Result<()>;
}

/// Writes successive list items
pub trait ListEncoder {
    /// Write one item via a fresh `ValueEncoder`
    fn encode_item(
        &mut self,
        value: &mut dyn FnMut(&mut dyn ValueEncoder) -> Result<()>,
    ) -> Result<()>;
}

/// Reads a single value from an already-parsed document
pub trait ValueDecoder {
    /// Classify the value without committing to a type
    fn shape(&self) -> ValueShape;

    fn read_string(&self) -> Option<&str>;
    fn read_integer(&self) -> Option<i64>;
    fn read_float(&self) -> Option<f64>;
    fn read_bool(&self) -> Option<bool>;
    /// Parse a dateTime; absent on shape mismatch or unparseable text
    fn read_datetime(&self) -> Option<DateTime>;
    /// Read a bare identifier
    fn read_iri(&self) -> Option<&str>;

    fn as_object(&self) -> Option<Box<dyn ObjectDecoder + '_>>;
    fn as_list(&self) -> Option<Box<dyn ListDecoder + '_>>;
}

/// Reads one object record
pub trait ObjectDecoder {
    /// Declared type identifiers, in document order; empty when absent
    fn declared_types(&self) -> Vec<String>;

    /// The record's identity under `id_key`, falling back to the canonical
    /// identity key
    fn id(&self, id_key: &str) -> Option<&str>;

    /// Enumerate `(name, value)` pairs, skipping names in `ignore` so
    /// callers can suppress reprocessing of structural keys
    fn for_each_property(
        &self,
        ignore: &[&str],
        f: &mut dyn FnMut(&str, &dyn ValueDecoder) -> Result<()>,
    ) -> Result<()>;
}

/// Reads successive list items
pub trait ListDecoder {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerate item decoders with their indices
    fn for_each_item(&self, f: &mut dyn FnMut(usize, &dyn ValueDecoder) -> Result<()>)
        -> Result<()>;
}

/// Iterate the items of a list-valued property
///
/// A scalar where a list was expected is treated as a single-element list,
/// matching what lenient producers emit for single-valued arrays.
pub fn for_each_list_item(
    dec: &dyn ValueDecoder,
    f: &mut dyn FnMut(usize, &dyn ValueDecoder) -> Result<()>,
) -> Result<()> {
    match dec.as_list() {
        Some(list) => list.for_each_item(f),
        None => f(0, dec),
    }
}

/// Reconstruct a generic value tree from a decoder
///
/// Used to capture open content verbatim: the walk dispatches on `shape()`
/// and rebuilds the value without knowing anything about its schema.
pub fn decode_any(dec: &dyn ValueDecoder) -> Result<JsonValue> {
    match dec.shape() {
        ValueShape::String => Ok(JsonValue::String(
            dec.read_string().unwrap_or_default().to_string(),
        )),
        ValueShape::Number => {
            if let Some(i) = dec.read_integer() {
                Ok(JsonValue::from(i))
            } else {
                Ok(dec.read_float().map(JsonValue::from).unwrap_or(JsonValue::Null))
            }
        }
        ValueShape::Bool => Ok(JsonValue::Bool(dec.read_bool().unwrap_or_default())),
        ValueShape::Object => {
            let mut map = serde_json::Map::new();
            if let Some(obj) = dec.as_object() {
                obj.for_each_property(&[], &mut |name, value| {
                    map.insert(name.to_string(), decode_any(value)?);
                    Ok(())
                })?;
            }
            Ok(JsonValue::Object(map))
        }
        ValueShape::List => {
            let mut items = Vec::new();
            if let Some(list) = dec.as_list() {
                list.for_each_item(&mut |_, item| {
                    items.push(decode_any(item)?);
                    Ok(())
                })?;
            }
            Ok(JsonValue::Array(items))
        }
        ValueShape::Null | ValueShape::Absent => Ok(JsonValue::Null),
    }
}

/// Re-emit a generic value tree through the protocol
///
/// The encode-side counterpart of `decode_any`, used for open content.
pub fn encode_any(value: &JsonValue, enc: &mut dyn ValueEncoder) -> Result<()> {
    match value {
        JsonValue::Null => enc.write_null(),
        JsonValue::Bool(b) => enc.write_bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                enc.write_integer(i)
            } else {
                enc.write_float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => enc.write_string(s),
        JsonValue::Array(items) => enc.write_list(&mut |list| {
            for item in items {
                list.encode_item(&mut |v| encode_any(item, v))?;
            }
            Ok(())
        }),
        JsonValue::Object(map) => enc.write_object("", None, &[], &mut |obj| {
            for (name, item) in map {
                obj.encode_property(name, &mut |v| encode_any(item, v))?;
            }
            Ok(())
        }),
    }
}
