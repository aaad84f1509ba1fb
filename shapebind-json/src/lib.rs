//! Streaming JSON serialization for shapebind object graphs
//!
//! This crate is the concrete realization of the format-neutral codec
//! protocol: a delimiter-tracking streaming writer on the encode side, and
//! decoders bound over an already-parsed `serde_json::Value` tree on the
//! decode side. The traversal logic itself (graph walk, polymorphic object
//! decode, linking) lives in `shapebind-core` and is reused unchanged.
//!
//! # Wire shape
//!
//! Each object is a record with an identity key (`@id`, or the class's
//! alias), a type key holding one identifier or an array of identifiers
//! (any order accepted on decode; a single canonical identifier emitted),
//! and the remaining keys as property identifiers — compact or full accepted
//! on decode, compact preferred on encode. List-valued properties are
//! arrays; reference-valued properties are nested records or bare identity
//! stubs. Multi-object documents wrap in `{"@graph": [...]}`.
//!
//! # Example
//!
//! ```ignore
//! use shapebind_json::{decode_str, encode_to_string};
//! use shapebind_core::{Collector, ObjectSet};
//! use std::collections::BTreeSet;
//!
//! let mut set = ObjectSet::new();
//! let mut missing = BTreeSet::new();
//! let mut handler = Collector::new();
//! decode_str(input, &REGISTRY, &mut set, &mut missing, &mut handler)?;
//!
//! let output = encode_to_string(&set, &mut handler)?;
//! ```

pub mod reader;
pub mod writer;

pub use reader::{JsonListDecoder, JsonObjectDecoder, JsonValueDecoder};
pub use writer::{JsonListEncoder, JsonObjectEncoder, JsonValueEncoder, JsonWriter};

use serde_json::Value as JsonValue;
use shapebind_core::{
    decode_object, encode_set, BindError, DecodeCtx, ErrorHandler, ObjectSet, PropertyPath,
    Result, Severity, TypeRegistry,
};
use shapebind_vocab::keys;
use std::collections::BTreeSet;
use std::io::{Read, Write};
use tracing::debug;

/// Decode a parsed document into an object set
///
/// Builds typed objects (reference properties hold raw identifiers), links
/// the set — unresolvable identifiers land in `missing`, never failing the
/// decode — then re-checks all constraints through the handler.
///
/// Fails when the handler aborts; a permissive handler records problems and
/// lets a best-effort decode finish.
pub fn decode(
    value: &JsonValue,
    registry: &TypeRegistry,
    set: &mut ObjectSet,
    missing: &mut BTreeSet<String>,
    handler: &mut dyn ErrorHandler,
) -> Result<()> {
    let nodes: Vec<&JsonValue> = match value {
        JsonValue::Object(map) if map.contains_key(keys::GRAPH) => match map.get(keys::GRAPH) {
            Some(JsonValue::Array(items)) => items.iter().collect(),
            _ => {
                return Err(BindError::decode(
                    keys::GRAPH,
                    "graph key must hold an array of object records",
                ))
            }
        },
        JsonValue::Object(_) => vec![value],
        JsonValue::Array(items) => items.iter().collect(),
        _ => {
            return Err(BindError::decode(
                ".",
                "document must be an object record or an array of them",
            ))
        }
    };

    let mut ctx = DecodeCtx { registry, set };
    for (idx, node) in nodes.iter().enumerate() {
        let path = PropertyPath::new().push_index(idx);
        match node {
            JsonValue::Object(map) => {
                decode_object(&mut ctx, &JsonObjectDecoder::new(map), &path, handler)?;
            }
            _ => {
                let message = "graph entry is not an object record";
                if !handler.report(Severity::Violation, &path, message) {
                    return Err(BindError::decode(path.to_string(), message));
                }
            }
        }
    }
    debug!(objects = set.len(), "decoded document");

    set.link(missing)?;

    if !set.validate(handler) {
        return Err(BindError::validation(
            ".",
            "validation aborted by error handler",
        ));
    }
    Ok(())
}

/// Decode a JSON document from text
pub fn decode_str(
    input: &str,
    registry: &TypeRegistry,
    set: &mut ObjectSet,
    missing: &mut BTreeSet<String>,
    handler: &mut dyn ErrorHandler,
) -> Result<()> {
    let value: JsonValue = serde_json::from_str(input)?;
    decode(&value, registry, set, missing, handler)
}

/// Decode a JSON document from a reader
pub fn decode_reader<R: Read>(
    input: R,
    registry: &TypeRegistry,
    set: &mut ObjectSet,
    missing: &mut BTreeSet<String>,
    handler: &mut dyn ErrorHandler,
) -> Result<()> {
    let value: JsonValue = serde_json::from_reader(input)?;
    decode(&value, registry, set, missing, handler)
}

/// Encode an object set as streaming JSON
///
/// Validates first — the handler decides whether problems abort — then
/// walks the graph cycle-safely, emitting each object inline once and as an
/// identifier stub on every later reach. Unset optional properties are
/// omitted entirely.
pub fn encode<W: Write>(out: W, set: &ObjectSet, handler: &mut dyn ErrorHandler) -> Result<()> {
    if !set.validate(handler) {
        return Err(BindError::validation(
            ".",
            "validation aborted by error handler",
        ));
    }
    let mut writer = JsonWriter::new(out);
    let mut enc = JsonValueEncoder::new(&mut writer);
    encode_set(set, &mut enc)
}

/// Encode an object set to a string
pub fn encode_to_string(set: &ObjectSet, handler: &mut dyn ErrorHandler) -> Result<String> {
    let mut buf = Vec::new();
    encode(&mut buf, set, handler)?;
    String::from_utf8(buf)
        .map_err(|e| BindError::validation(".", format!("encoder produced invalid UTF-8: {}", e)))
}

/// Encode an object set and reparse it as a generic value tree
///
/// Convenient for tests and for callers that post-process the document.
pub fn encode_to_value(set: &ObjectSet, handler: &mut dyn ErrorHandler) -> Result<JsonValue> {
    let text = encode_to_string(set, handler)?;
    Ok(serde_json::from_str(&text)?)
}
