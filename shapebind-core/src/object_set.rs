//! Object set and the reference linker
//!
//! An `ObjectSet` owns all objects of one document and indexes them by
//! identity. After decode, reference properties hold raw identifiers; the
//! linker resolves every deferred reference to a live handle by exact
//! identifier match, cycle-safe via a visited set, collecting identifiers
//! with no corresponding object into the caller's missing set instead of
//! failing.

use crate::error::Result;
use crate::handler::ErrorHandler;
use crate::object::{handle_key, Ref, ShaclObject, SharedObject};
use crate::path::PropertyPath;
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Container owning all objects of one document
///
/// The set is the root owner: objects kept alive only through reference
/// properties remain reachable until the set and all referrers are dropped.
/// A cyclic document keeps its cycle alive through the shared handles even
/// after the set drops; call [`ObjectSet::clear_links`] first for
/// deterministic teardown of cyclic graphs.
#[derive(Default)]
pub struct ObjectSet {
    objects: Vec<SharedObject>,
    by_id: rustc_hash::FxHashMap<String, SharedObject>,
}

impl ObjectSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shared object, indexing its identity when present
    pub fn add(&mut self, obj: SharedObject) -> SharedObject {
        if let Some(id) = obj.read().expect("object lock poisoned").base().id() {
            self.by_id.insert(id.to_string(), obj.clone());
        }
        self.objects.push(obj.clone());
        obj
    }

    /// Wrap a concrete object and add it
    pub fn insert<T: ShaclObject>(&mut self, obj: T) -> SharedObject {
        self.add(Arc::new(RwLock::new(obj)))
    }

    /// Look up an object by exact identifier
    pub fn find_by_id(&self, id: &str) -> Option<SharedObject> {
        self.by_id.get(id).cloned()
    }

    /// All objects, in insertion order
    pub fn objects(&self) -> &[SharedObject] {
        &self.objects
    }

    /// Number of objects in the set
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the set holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Rebuild the identity index after identities changed
    ///
    /// The index is maintained on `add`; callers that assign or clear ids on
    /// objects already in the set must reindex before linking again.
    pub fn reindex(&mut self) {
        self.by_id.clear();
        for obj in &self.objects {
            if let Some(id) = obj.read().expect("object lock poisoned").base().id() {
                self.by_id.insert(id.to_string(), obj.clone());
            }
        }
    }

    /// Resolve every deferred reference reachable from the set
    ///
    /// Identifiers with no corresponding object land in `missing`; the slot
    /// stays deferred, which is recoverable, not fatal. Linking is
    /// idempotent: relinking a fully-resolved graph is a no-op and reports
    /// the same missing set.
    pub fn link(&self, missing: &mut BTreeSet<String>) -> Result<()> {
        let mut state = LinkState::new(self, missing);
        for obj in &self.objects {
            state.link_from(obj)?;
        }
        debug!(
            objects = self.objects.len(),
            missing = state.missing.len(),
            "linked object set"
        );
        Ok(())
    }

    /// Validate every object against its constraints
    ///
    /// Returns false when the handler aborted; a permissive handler records
    /// violations and keeps going.
    pub fn validate(&self, handler: &mut dyn ErrorHandler) -> bool {
        for (idx, obj) in self.objects.iter().enumerate() {
            let guard = obj.read().expect("object lock poisoned");
            let path = match guard.base().id() {
                Some(id) => PropertyPath::new().push(id),
                None => PropertyPath::new().push_index(idx),
            };
            if !guard.validate(&path, handler) {
                return false;
            }
        }
        true
    }

    /// Downgrade every resolved reference back to its identifier
    ///
    /// Breaks the strong-handle cycles of a cyclic document so the set's
    /// teardown releases everything; a later `link` restores the handles.
    pub fn clear_links(&self) {
        for obj in &self.objects {
            let key = handle_key(obj);
            let mut guard = obj.write().expect("object lock poisoned");
            let own_id = guard.base().id().map(String::from);
            guard.for_each_ref_mut(&mut |r| {
                let id = match r {
                    // A self-reference must not re-enter the held lock
                    Ref::Obj(target) if handle_key(target) == key => own_id.clone(),
                    Ref::Obj(target) => target
                        .read()
                        .expect("object lock poisoned")
                        .base()
                        .id()
                        .map(String::from),
                    Ref::Iri(_) => None,
                };
                if let Some(id) = id {
                    *r = Ref::Iri(id);
                }
            });
        }
    }
}

impl std::fmt::Debug for ObjectSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectSet")
            .field("objects", &self.objects.len())
            .field("indexed", &self.by_id.len())
            .finish()
    }
}

/// Transient state for one linking pass
///
/// Borrows the set and the caller's missing-identifier collector; owns the
/// visited set that bounds the traversal to O(objects + reference edges)
/// regardless of sharing or cycles.
pub struct LinkState<'a> {
    set: &'a ObjectSet,
    missing: &'a mut BTreeSet<String>,
    visited: FxHashSet<usize>,
}

impl<'a> LinkState<'a> {
    /// Create state for one pass
    pub fn new(set: &'a ObjectSet, missing: &'a mut BTreeSet<String>) -> Self {
        Self {
            set,
            missing,
            visited: FxHashSet::default(),
        }
    }

    /// Link everything reachable from `obj`, depth-first
    ///
    /// Each object's slots are resolved under its own write lock; child
    /// recursion happens after release so cycles never re-enter a held lock.
    pub fn link_from(&mut self, obj: &SharedObject) -> Result<()> {
        let mut stack = vec![obj.clone()];

        while let Some(current) = stack.pop() {
            if !self.visited.insert(handle_key(&current)) {
                continue;
            }

            let mut children = Vec::new();
            {
                let mut guard = current.write().expect("object lock poisoned");
                guard.for_each_ref_mut(&mut |r| {
                    if let Some(child) = self.resolve(r) {
                        children.push(child);
                    }
                });
            }
            stack.extend(children);
        }
        Ok(())
    }

    /// Resolve one slot; returns the live target for traversal
    ///
    /// Already-resolved references are untouched. A lookup miss records the
    /// identifier and leaves the slot deferred.
    fn resolve(&mut self, r: &mut Ref) -> Option<SharedObject> {
        match r {
            Ref::Obj(obj) => Some(obj.clone()),
            Ref::Iri(iri) => match self.set.find_by_id(iri) {
                Some(target) => {
                    *r = Ref::Obj(target.clone());
                    Some(target)
                }
                None => {
                    self.missing.insert(iri.clone());
                    None
                }
            },
        }
    }
}
