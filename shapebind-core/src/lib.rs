//! Runtime data binding for SHACL-generated object models
//!
//! This crate is the runtime half of a schema compiler: the compiler turns
//! declarative shape definitions into typed classes, and those classes run
//! on the machinery here.
//!
//! # Overview
//!
//! Decoding a document works by:
//! 1. Resolving each record's declared type against the `TypeRegistry` and
//!    instantiating the most specific concrete class
//! 2. Decoding declared properties through constraint-checked slots
//!    (`Property`, `ListProperty`, `RefProperty`), leaving reference
//!    properties as raw identifiers
//! 3. Linking: resolving every deferred reference to a live object in the
//!    `ObjectSet`, collecting unresolvable identifiers into a missing set
//! 4. Re-checking constraints through the caller's `ErrorHandler`
//!
//! Encoding walks the set cycle-safely: each object is emitted inline once
//! and as a bare identifier stub on every later reach.
//!
//! # Supported constraints
//!
//! - Cardinality: required, minimum/maximum count
//! - String: pattern (also applies to dateTime lexical forms)
//! - Numeric: inclusive floor
//! - Enumeration: permitted-identifier set
//! - Temporal: required timezone offset
//! - Reference: target class restriction
//!
//! # Example
//!
//! ```ignore
//! use shapebind_core::{Collector, ObjectSet};
//! use std::collections::BTreeSet;
//!
//! let mut set = ObjectSet::new();
//! let artifact = set.insert(Artifact::new());
//!
//! let mut missing = BTreeSet::new();
//! set.link(&mut missing)?;
//!
//! let mut handler = Collector::new();
//! set.validate(&mut handler);
//! ```
//!
//! Serialization formats live in sibling crates; they implement the codec
//! protocol traits and reuse the walk and decode drivers unchanged.

pub mod codec;
pub mod decode;
pub mod descriptor;
pub mod error;
pub mod handler;
pub mod object;
pub mod object_set;
pub mod path;
pub mod prop;
pub mod temporal;
pub mod walk;

pub use codec::{
    decode_any, encode_any, for_each_list_item, ListDecoder, ListEncoder, ObjectDecoder,
    ObjectEncoder, ValueDecoder, ValueEncoder, ValueShape,
};
pub use decode::{decode_object, decode_ref, DecodeCtx};
pub use descriptor::{NamedIndividual, NodeKind, TypeDescriptor, TypeRegistry};
pub use error::{BindError, Result};
pub use handler::{Collector, ErrorHandler, FailFast, Report, Severity};
pub use object::{shared, ExtensibleBase, ObjectBase, Ref, ShaclObject, SharedObject};
pub use object_set::{LinkState, ObjectSet};
pub use path::PropertyPath;
pub use prop::{Constraint, Datum, ListProperty, Property, RefListProperty, RefProperty, SlotValue};
pub use temporal::DateTime;
pub use walk::{encode_object, encode_ref, encode_set, EncodeState};
