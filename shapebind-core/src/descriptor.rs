//! Type descriptors and the descriptor registry
//!
//! Every generated class carries one static `TypeDescriptor` built before any
//! decode and never mutated afterwards. "Is-a" questions are answered by
//! membership in the descriptor's ancestor list, never by host-language type
//! machinery, so the answers match every other binding generated from the
//! same schema.

use crate::error::{BindError, Result};
use crate::object::SharedObject;
use rustc_hash::FxHashMap;
use shapebind_vocab::{is_blank, keys};

/// Constraint on the kind of identity an object may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Identity must be a global IRI
    Iri,
    /// Identity must be document-scoped (blank or unset)
    BlankNode,
    /// Either kind of identity is permitted
    BlankNodeOrIri,
}

impl NodeKind {
    /// Check an identity against this node kind
    ///
    /// `None` counts as an anonymous identity.
    pub fn permits(&self, id: Option<&str>) -> bool {
        match self {
            NodeKind::Iri => id.is_some_and(|i| !is_blank(i)),
            NodeKind::BlankNode => id.map_or(true, is_blank),
            NodeKind::BlankNodeOrIri => true,
        }
    }
}

/// Static description of one generated class
///
/// One instance per class, `'static`, immutable. The `make` hook instantiates
/// the concrete class; abstract descriptors are registered as decode targets
/// but are rejected before `make` is ever called.
pub struct TypeDescriptor {
    /// Canonical class IRI
    pub iri: &'static str,
    /// Compact name, preferred on encode when present
    pub compact: Option<&'static str>,
    /// Ancestor descriptors, nearest first, excluding self
    pub ancestors: &'static [&'static TypeDescriptor],
    /// Class-specific identity key replacing `@id`, if declared
    pub id_alias: Option<&'static str>,
    /// Identity constraint
    pub node_kind: NodeKind,
    /// Abstract classes cannot be instantiated directly
    pub is_abstract: bool,
    /// Extensible classes accept and preserve schema-unknown properties
    pub is_extensible: bool,
    /// Construct a fresh instance of the concrete class
    pub make: fn() -> SharedObject,
}

impl TypeDescriptor {
    /// True when this class is `iri` or descends from it
    pub fn is_subclass_of(&self, iri: &str) -> bool {
        self.iri == iri || self.ancestors.iter().any(|a| a.iri == iri)
    }

    /// The identity key for this class: its own alias, the nearest
    /// ancestor's alias, or `@id`
    pub fn id_key(&self) -> &'static str {
        self.id_alias
            .or_else(|| self.ancestors.iter().find_map(|a| a.id_alias))
            .unwrap_or(keys::ID)
    }

    /// The type identifier emitted on encode: compact name when present
    pub fn wire_name(&self) -> &'static str {
        self.compact.unwrap_or(self.iri)
    }
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("iri", &self.iri)
            .field("compact", &self.compact)
            .field("id_alias", &self.id_alias)
            .field("node_kind", &self.node_kind)
            .field("is_abstract", &self.is_abstract)
            .field("is_extensible", &self.is_extensible)
            .finish()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

/// Predeclared constant of an enumerated type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedIndividual {
    /// IRI of the enumerated type this individual belongs to
    pub type_iri: &'static str,
    /// The individual's own IRI, the value stored in enum properties
    pub iri: &'static str,
    /// Optional human-readable label; individuals without one are still
    /// permitted values
    pub label: Option<&'static str>,
}

/// Read-only lookup table from type identifiers to descriptors
///
/// Built once at startup from the generated model, then shared freely:
/// every field is immutable after `build()`.
pub struct TypeRegistry {
    by_name: FxHashMap<&'static str, &'static TypeDescriptor>,
    individuals: FxHashMap<&'static str, &'static NamedIndividual>,
}

impl TypeRegistry {
    /// Start building a registry
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder {
            by_name: FxHashMap::default(),
            individuals: FxHashMap::default(),
        }
    }

    /// Look up a descriptor by canonical IRI or compact name
    pub fn find(&self, name: &str) -> Option<&'static TypeDescriptor> {
        self.by_name.get(name).copied()
    }

    /// Look up a named individual by IRI
    pub fn individual(&self, iri: &str) -> Option<&'static NamedIndividual> {
        self.individuals.get(iri).copied()
    }

    /// Resolve a declared type list to the concrete class to instantiate
    ///
    /// Selects the most specific registered descriptor among the declared
    /// identifiers (accepted in any order). Fails when nothing is registered,
    /// when the declared types are unrelated, when unknown identifiers
    /// accompany a non-extensible resolution, or when the winner is abstract.
    pub fn resolve(&self, declared: &[String]) -> Result<&'static TypeDescriptor> {
        let known: Vec<&'static TypeDescriptor> =
            declared.iter().filter_map(|t| self.find(t)).collect();

        if known.is_empty() {
            let shown = declared.first().map(String::as_str).unwrap_or("<none>");
            return Err(BindError::type_error(shown, "no registered type matches"));
        }

        let best = known
            .iter()
            .copied()
            .find(|d| known.iter().all(|other| d.is_subclass_of(other.iri)))
            .ok_or_else(|| {
                BindError::type_error(known[0].iri, "declared types are not related")
            })?;

        if known.len() < declared.len() && !best.is_extensible {
            let unknown = declared
                .iter()
                .find(|t| self.find(t).is_none())
                .map(String::as_str)
                .unwrap_or("<none>");
            return Err(BindError::type_error(unknown, "unregistered type"));
        }

        if best.is_abstract {
            return Err(BindError::type_error(
                best.iri,
                "abstract type cannot be instantiated",
            ));
        }

        Ok(best)
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.by_name.len())
            .field("individuals", &self.individuals.len())
            .finish()
    }
}

/// Builder for `TypeRegistry`
pub struct TypeRegistryBuilder {
    by_name: FxHashMap<&'static str, &'static TypeDescriptor>,
    individuals: FxHashMap<&'static str, &'static NamedIndividual>,
}

impl TypeRegistryBuilder {
    /// Register a class descriptor under its IRI and compact name
    pub fn register(mut self, desc: &'static TypeDescriptor) -> Self {
        self.by_name.insert(desc.iri, desc);
        if let Some(compact) = desc.compact {
            self.by_name.insert(compact, desc);
        }
        self
    }

    /// Register a named individual
    pub fn individual(mut self, individual: &'static NamedIndividual) -> Self {
        self.individuals.insert(individual.iri, individual);
        self
    }

    /// Finish building
    pub fn build(self) -> TypeRegistry {
        TypeRegistry {
            by_name: self.by_name,
            individuals: self.individuals,
        }
    }
}
