//! Object model: the `ShaclObject` trait and its base state
//!
//! Generated classes are plain structs composing `ObjectBase` (and
//! `ExtensibleBase` when the schema allows open content) and implementing
//! `ShaclObject`. The runtime only ever sees the trait: decode drives
//! `decode_property`, validation drives `validate`, the linker and graph walk
//! drive the reference visitors.

use crate::codec::{ObjectEncoder, ValueDecoder};
use crate::decode::DecodeCtx;
use crate::descriptor::TypeDescriptor;
use crate::error::{BindError, Result};
use crate::handler::ErrorHandler;
use crate::path::PropertyPath;
use crate::walk::EncodeState;
use serde_json::Value as JsonValue;
use std::any::Any;
use std::sync::{Arc, RwLock};

/// Shared handle to an object
///
/// Objects are owned jointly by the `ObjectSet` and by every resolved
/// reference property holding them; an object is released when the set and
/// all referrers are gone.
pub type SharedObject = Arc<RwLock<dyn ShaclObject>>;

/// Wrap a concrete object into a shared handle
pub fn shared<T: ShaclObject>(obj: T) -> SharedObject {
    Arc::new(RwLock::new(obj))
}

/// Stable key for identity-based bookkeeping (visited sets, encode state)
pub(crate) fn handle_key(obj: &SharedObject) -> usize {
    Arc::as_ptr(obj) as *const () as usize
}

/// A reference slot: either a deferred identifier or a live object
///
/// During decode, reference properties hold `Iri`; the linker is the sole
/// writer of the `Iri` → `Obj` transition. References constructed in memory
/// start out resolved and are never touched by the linker.
#[derive(Clone)]
pub enum Ref {
    /// Deferred: the identifier of an object that may live elsewhere in the
    /// document
    Iri(String),
    /// Resolved: a live, shared object
    Obj(SharedObject),
}

impl Ref {
    /// Create a deferred reference
    pub fn iri(iri: impl Into<String>) -> Self {
        Ref::Iri(iri.into())
    }

    /// Create a resolved reference
    pub fn obj(obj: SharedObject) -> Self {
        Ref::Obj(obj)
    }

    /// True once the slot holds a live object
    pub fn is_resolved(&self) -> bool {
        matches!(self, Ref::Obj(_))
    }

    /// The live object, if resolved
    pub fn as_obj(&self) -> Option<&SharedObject> {
        match self {
            Ref::Obj(obj) => Some(obj),
            Ref::Iri(_) => None,
        }
    }

    /// The deferred identifier, if unresolved
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Ref::Iri(iri) => Some(iri),
            Ref::Obj(_) => None,
        }
    }
}

impl std::fmt::Debug for Ref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ref::Iri(iri) => f.debug_tuple("Iri").field(iri).finish(),
            Ref::Obj(obj) => {
                let id = obj
                    .try_read()
                    .ok()
                    .and_then(|o| o.base().id().map(String::from));
                f.debug_tuple("Obj").field(&id).finish()
            }
        }
    }
}

/// State common to every object: identity and descriptor back-reference
#[derive(Debug)]
pub struct ObjectBase {
    desc: &'static TypeDescriptor,
    id: Option<String>,
    /// Declared type identifiers as read off the wire; kept only when the
    /// list carries information the canonical identifier loses (unknown
    /// subtype IRIs on an extensible class)
    declared_types: Vec<String>,
}

impl ObjectBase {
    /// Create base state for a class
    pub fn new(desc: &'static TypeDescriptor) -> Self {
        Self {
            desc,
            id: None,
            declared_types: Vec::new(),
        }
    }

    /// The class descriptor
    pub fn type_descriptor(&self) -> &'static TypeDescriptor {
        self.desc
    }

    /// The object's identity, if assigned
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Assign an identity, validating the class node-kind constraint
    ///
    /// A `_:`-prefixed identity is document-scoped. Fails with a structural
    /// error when the node kind forbids the identity's kind.
    pub fn set_id(&mut self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        if !self.desc.node_kind.permits(Some(&id)) {
            return Err(BindError::structural(
                &id,
                format!(
                    "identity kind not permitted by node kind {:?} of {}",
                    self.desc.node_kind, self.desc.iri
                ),
            ));
        }
        self.id = Some(id);
        Ok(())
    }

    /// Remove the identity, making the object anonymous
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Declared wire types; empty when the canonical identifier suffices
    pub fn declared_types(&self) -> &[String] {
        &self.declared_types
    }

    /// Preserve a declared type list for round-trip
    pub fn set_declared_types(&mut self, types: Vec<String>) {
        self.declared_types = types;
    }

    /// What the type key should carry on encode
    pub fn wire_types(&self) -> Vec<String> {
        if self.declared_types.is_empty() {
            vec![self.desc.wire_name().to_string()]
        } else {
            self.declared_types.clone()
        }
    }

    /// Validate structural rules; returns false when the handler aborted
    pub fn validate(&self, path: &PropertyPath, handler: &mut dyn ErrorHandler) -> bool {
        use crate::handler::Severity;
        if !self.desc.node_kind.permits(self.id()) {
            let message = format!(
                "identity {:?} not permitted by node kind {:?}",
                self.id(),
                self.desc.node_kind
            );
            return handler.report(Severity::Violation, path, &message);
        }
        true
    }
}

/// Open content for extensible classes
///
/// Keys absent from the schema are stored verbatim and re-emitted unchanged
/// on encode; round-trip fidelity of this mapping is a hard invariant.
#[derive(Debug, Default)]
pub struct ExtensibleBase {
    properties: serde_json::Map<String, JsonValue>,
}

impl ExtensibleBase {
    /// Create an empty open-content map
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a schema-unknown property
    pub fn set(&mut self, name: impl Into<String>, value: JsonValue) {
        self.properties.insert(name.into(), value);
    }

    /// Read a stored property
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.properties.get(name)
    }

    /// True when no open content is stored
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate stored properties
    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.properties.iter()
    }

    /// Re-emit all open content through an object encoder
    pub fn encode(&self, enc: &mut dyn ObjectEncoder) -> Result<()> {
        for (name, value) in &self.properties {
            enc.encode_property(name, &mut |v| crate::codec::encode_any(value, v))?;
        }
        Ok(())
    }
}

/// Behavior every generated class implements
///
/// The base state accessors plus four traversal hooks: property decode,
/// property encode, validation, and the reference visitors used by the
/// linker and graph walk.
pub trait ShaclObject: Any + Send + Sync {
    /// The class descriptor
    fn type_descriptor(&self) -> &'static TypeDescriptor;

    /// Base state (identity, declared types)
    fn base(&self) -> &ObjectBase;

    /// Base state, mutably
    fn base_mut(&mut self) -> &mut ObjectBase;

    /// Decode one named property; `Ok(true)` when the name was recognized
    ///
    /// Unrecognized names are the caller's concern: stored as open content
    /// on extensible classes, reported otherwise.
    fn decode_property(
        &mut self,
        ctx: &mut DecodeCtx<'_>,
        name: &str,
        value: &dyn ValueDecoder,
        path: &PropertyPath,
        handler: &mut dyn ErrorHandler,
    ) -> Result<bool>;

    /// Encode every set property in declaration order
    ///
    /// Unset optional properties are omitted entirely.
    fn encode_properties(
        &self,
        enc: &mut dyn ObjectEncoder,
        state: &mut EncodeState,
    ) -> Result<()>;

    /// Validate all property slots plus structural rules
    ///
    /// Returns false when the handler aborted; violations under a permissive
    /// handler are recorded by the handler itself.
    fn validate(&self, path: &PropertyPath, handler: &mut dyn ErrorHandler) -> bool;

    /// Visit every reference slot (graph walk)
    fn for_each_ref(&self, f: &mut dyn FnMut(&Ref));

    /// Visit every reference slot mutably (linker)
    fn for_each_ref_mut(&mut self, f: &mut dyn FnMut(&mut Ref));

    /// Open content, for extensible classes
    fn extensible(&self) -> Option<&ExtensibleBase> {
        None
    }

    /// Open content mutably, for extensible classes
    fn extensible_mut(&mut self) -> Option<&mut ExtensibleBase> {
        None
    }

    /// Downcast support for typed consumer accessors
    fn as_any(&self) -> &dyn Any;

    /// Downcast support, mutable
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
