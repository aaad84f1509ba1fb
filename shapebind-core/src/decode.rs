//! Generic decode driver
//!
//! Works entirely through the protocol traits, so any format that supplies
//! an `ObjectDecoder` gets the full behavior: polymorphic instantiation via
//! the registry, identity and node-kind handling, declared-property decode
//! through the generated classes, open-content capture on extensible
//! classes.

use crate::codec::{decode_any, ObjectDecoder, ValueDecoder, ValueShape};
use crate::descriptor::TypeRegistry;
use crate::error::{BindError, Result};
use crate::handler::{ErrorHandler, Severity};
use crate::object::{Ref, SharedObject};
use crate::object_set::ObjectSet;
use crate::path::PropertyPath;
use shapebind_vocab::keys;
use tracing::trace;

/// Shared context for one decode pass
pub struct DecodeCtx<'a> {
    /// Registry resolving declared type identifiers
    pub registry: &'a TypeRegistry,
    /// Destination set; every decoded object lands here
    pub set: &'a mut ObjectSet,
}

/// Decode one object record
///
/// Returns `None` when the record was skipped under a permissive handler
/// (unresolvable or abstract declared type, forbidden identity). The object
/// is added to the context's set before being returned.
pub fn decode_object(
    ctx: &mut DecodeCtx<'_>,
    dec: &dyn ObjectDecoder,
    path: &PropertyPath,
    handler: &mut dyn ErrorHandler,
) -> Result<Option<SharedObject>> {
    let declared = dec.declared_types();
    if declared.is_empty() {
        let message = "object record has no type key";
        if handler.report(Severity::Violation, path, message) {
            return Ok(None);
        }
        return Err(BindError::structural(path.to_string(), message));
    }

    let desc = match ctx.registry.resolve(&declared) {
        Ok(desc) => desc,
        Err(err) => {
            let message = err.to_string();
            if handler.report(Severity::Violation, path, &message) {
                return Ok(None);
            }
            return Err(err);
        }
    };
    trace!(type_iri = desc.iri, "decoding object");

    let obj = (desc.make)();
    let obj_path;
    {
        let mut guard = obj.write().expect("object lock poisoned");

        // Keep the declared list when it names types the registry does not
        // know; the canonical identifier alone would lose them on re-encode.
        if declared.iter().any(|t| ctx.registry.find(t).is_none()) {
            guard.base_mut().set_declared_types(declared);
        }

        let id_key = desc.id_key();
        if let Some(id) = dec.id(id_key) {
            if let Err(err) = guard.base_mut().set_id(id) {
                let message = err.to_string();
                if handler.report(Severity::Violation, path, &message) {
                    // Identity rejected: the object stays anonymous
                } else {
                    return Err(err);
                }
            }
        }

        obj_path = match guard.base().id() {
            Some(id) => PropertyPath::new().push(id),
            None => path.clone(),
        };

        let ignore = [id_key, keys::ID, keys::TYPE, keys::CONTEXT];
        dec.for_each_property(&ignore, &mut |name, value| {
            let consumed = guard.decode_property(ctx, name, value, &obj_path, handler)?;
            if consumed {
                return Ok(());
            }
            if let Some(ext) = guard.extensible_mut() {
                ext.set(name, decode_any(value)?);
                return Ok(());
            }
            let message = format!("unknown property '{}'", name);
            if handler.report(Severity::Violation, &obj_path.push(name), &message) {
                Ok(())
            } else {
                Err(BindError::decode(obj_path.push(name).to_string(), message))
            }
        })?;
    }

    Ok(Some(ctx.set.add(obj)))
}

/// Decode one reference-valued property
///
/// A string is a deferred identifier for the linker; a nested record decodes
/// recursively into the set. Returns `None` when the value had neither shape
/// (or the nested record was skipped) and the handler chose to continue.
pub fn decode_ref(
    ctx: &mut DecodeCtx<'_>,
    dec: &dyn ValueDecoder,
    path: &PropertyPath,
    handler: &mut dyn ErrorHandler,
) -> Result<Option<Ref>> {
    match dec.shape() {
        ValueShape::String => {
            let iri = dec.read_iri().unwrap_or_default().to_string();
            Ok(Some(Ref::Iri(iri)))
        }
        ValueShape::Object => match dec.as_object() {
            Some(obj_dec) => Ok(decode_object(ctx, &*obj_dec, path, handler)?.map(Ref::Obj)),
            None => Ok(None),
        },
        _ => {
            let message = "expected a reference: identifier or nested record";
            if handler.report(Severity::Violation, path, message) {
                Ok(None)
            } else {
                Err(BindError::decode(path.to_string(), message))
            }
        }
    }
}
