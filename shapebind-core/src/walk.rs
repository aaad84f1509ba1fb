//! Cycle-safe graph walk driving serialization
//!
//! The walk visits every reachable object exactly once: the first time an
//! object is reached it is encoded inline, every subsequent reach emits only
//! its identifier. That single rule guarantees termination and no duplicate
//! definitions on cyclic or shared graphs.
//!
//! A preparation pass scans the graph (same visited-set technique as the
//! linker) to record effective identities, generate `_:`-identities for
//! anonymous objects that are referenced more than once, and plan which
//! objects appear at the top level: anonymous objects with exactly one
//! inbound reference are emitted inline at their reference site instead.

use crate::codec::ValueEncoder;
use crate::error::{BindError, Result};
use crate::object::{handle_key, Ref, SharedObject};
use crate::object_set::ObjectSet;
use rustc_hash::{FxHashMap, FxHashSet};
use shapebind_vocab::keys;

/// Bookkeeping for one encode traversal
pub struct EncodeState {
    /// Effective identity per object: its own, or one generated here
    ids: FxHashMap<usize, String>,
    /// Objects already encoded inline
    written: FxHashSet<usize>,
}

impl EncodeState {
    /// Scan the graph and plan the encode
    ///
    /// Returns the state plus the top-level objects in emission order.
    pub fn prepare(set: &ObjectSet) -> (Self, Vec<SharedObject>) {
        let mut ids: FxHashMap<usize, String> = FxHashMap::default();
        let mut inbound: FxHashMap<usize, usize> = FxHashMap::default();
        let mut seen: FxHashSet<usize> = FxHashSet::default();
        let mut used_ids: FxHashSet<String> = FxHashSet::default();
        let mut discovery: Vec<usize> = Vec::new();

        // Reachability scan: record identities and inbound reference counts.
        let mut stack: Vec<SharedObject> = set.objects().to_vec();
        stack.reverse();
        while let Some(obj) = stack.pop() {
            let key = handle_key(&obj);
            if !seen.insert(key) {
                continue;
            }
            discovery.push(key);
            let guard = obj.read().expect("object lock poisoned");
            if let Some(id) = guard.base().id() {
                ids.insert(key, id.to_string());
                used_ids.insert(id.to_string());
            }
            guard.for_each_ref(&mut |r| {
                if let Ref::Obj(target) = r {
                    let target_key = handle_key(target);
                    // A self-reference always forces an identity
                    let weight = if target_key == key { 2 } else { 1 };
                    *inbound.entry(target_key).or_insert(0) += weight;
                    stack.push(target.clone());
                }
            });
        }

        // Anonymous objects referenced more than once need a generated
        // document-scoped identity so later reaches can emit a stub.
        // Discovery order keeps the generated names deterministic.
        let mut counter = 0usize;
        for &key in &discovery {
            if inbound.get(&key).copied().unwrap_or(0) >= 2 && !ids.contains_key(&key) {
                let id = loop {
                    let candidate = format!("{}b{}", shapebind_vocab::BLANK_PREFIX, counter);
                    counter += 1;
                    if !used_ids.contains(&candidate) {
                        break candidate;
                    }
                };
                used_ids.insert(id.clone());
                ids.insert(key, id);
            }
        }

        // Plan the top level by simulating the traversal: an object inlined
        // under an earlier top never appears again.
        let mut sim: FxHashSet<usize> = FxHashSet::default();
        let mut tops: Vec<SharedObject> = Vec::new();
        for obj in set.objects() {
            let key = handle_key(obj);
            let anonymous = !ids.contains_key(&key);
            if anonymous && inbound.get(&key).copied().unwrap_or(0) == 1 {
                continue;
            }
            if sim.contains(&key) {
                continue;
            }
            tops.push(obj.clone());
            mark_reachable(obj, &mut sim);
        }
        // Anything still unplanned (pathological reference shapes) is
        // emitted at the top level rather than dropped.
        for obj in set.objects() {
            if !sim.contains(&handle_key(obj)) {
                tops.push(obj.clone());
                mark_reachable(obj, &mut sim);
            }
        }

        (
            Self {
                ids,
                written: FxHashSet::default(),
            },
            tops,
        )
    }

    /// The effective identity of an object, if it has one
    pub fn id_of(&self, obj: &SharedObject) -> Option<&str> {
        self.ids.get(&handle_key(obj)).map(String::as_str)
    }

    /// True once an object has been encoded inline
    pub fn is_written(&self, obj: &SharedObject) -> bool {
        self.written.contains(&handle_key(obj))
    }
}

/// Mark everything reachable from `obj` in traversal order
fn mark_reachable(obj: &SharedObject, marked: &mut FxHashSet<usize>) {
    if !marked.insert(handle_key(obj)) {
        return;
    }
    let guard = obj.read().expect("object lock poisoned");
    guard.for_each_ref(&mut |r| {
        if let Ref::Obj(target) = r {
            mark_reachable(target, marked);
        }
    });
}

/// Encode a whole object set
///
/// A single top-level object is emitted as one record; anything else wraps
/// in a `@graph` list.
pub fn encode_set(set: &ObjectSet, enc: &mut dyn ValueEncoder) -> Result<()> {
    let (mut state, tops) = EncodeState::prepare(set);

    if tops.len() == 1 {
        return encode_object(&tops[0], enc, &mut state);
    }

    enc.write_object("", None, &[], &mut |obj| {
        obj.encode_property(keys::GRAPH, &mut |v| {
            v.write_list(&mut |list| {
                for top in &tops {
                    list.encode_item(&mut |item| encode_object(top, item, &mut state))?;
                }
                Ok(())
            })
        })
    })
}

/// Encode one object inline: identity, declared type(s), then each set
/// property in declaration order
pub fn encode_object(
    obj: &SharedObject,
    enc: &mut dyn ValueEncoder,
    state: &mut EncodeState,
) -> Result<()> {
    state.written.insert(handle_key(obj));

    let guard = obj.read().expect("object lock poisoned");
    let id = state.id_of(obj).map(String::from);
    let types = guard.base().wire_types();
    let id_key = guard.type_descriptor().id_key();

    enc.write_object(id_key, id.as_deref(), &types, &mut |oenc| {
        guard.encode_properties(oenc, state)
    })
}

/// Encode one reference slot
///
/// Deferred references emit their identifier as-is. Resolved references
/// nest the target on first reach and emit a bare identifier stub after.
pub fn encode_ref(
    r: &Ref,
    enc: &mut dyn ValueEncoder,
    state: &mut EncodeState,
) -> Result<()> {
    match r {
        Ref::Iri(iri) => enc.write_iri(iri),
        Ref::Obj(target) => {
            if state.is_written(target) {
                let id = state.id_of(target).map(String::from);
                match id {
                    Some(id) => enc.write_iri(&id),
                    None => Err(BindError::structural(
                        "",
                        "shared object reached twice without an identity",
                    )),
                }
            } else {
                encode_object(target, enc, state)
            }
        }
    }
}
