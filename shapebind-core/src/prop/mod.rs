//! Generic, constraint-checked property slots
//!
//! Generated classes declare their properties as fields of these slot types:
//!
//! - `Property<T>` — optional scalar
//! - `ListProperty<T>` — ordered values
//! - `RefProperty` / `RefListProperty` — references to other objects,
//!   deferred during decode and resolved by the linker
//!
//! One constraint set gates both synchronous assignment (`set`, which fails
//! with a `ValidationError`) and decode-time assignment (`set_checked`, which
//! routes violations through the `ErrorHandler` so a permissive handler can
//! accept-and-flag). Count constraints are enforced by `check()` when the
//! owning object is complete.

pub mod constraint;

pub use constraint::Constraint;

use crate::descriptor::TypeDescriptor;
use crate::error::{BindError, Result};
use crate::handler::{ErrorHandler, Severity};
use crate::object::{Ref, SharedObject};
use crate::path::PropertyPath;
use crate::temporal::DateTime;

/// Borrowed view of a slot value, for constraint checking
///
/// Constraints dispatch on this view instead of on the slot's generic
/// parameter, so one constraint set serves every value type.
#[derive(Debug, Clone, Copy)]
pub enum Datum<'a> {
    Str(&'a str),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(&'a DateTime),
}

/// Value types storable in a property slot
pub trait SlotValue: Clone + Send + Sync {
    /// Borrow the value for constraint checking
    fn datum(&self) -> Datum<'_>;
}

impl SlotValue for String {
    fn datum(&self) -> Datum<'_> {
        Datum::Str(self)
    }
}

impl SlotValue for i64 {
    fn datum(&self) -> Datum<'_> {
        Datum::Int(*self)
    }
}

impl SlotValue for f64 {
    fn datum(&self) -> Datum<'_> {
        Datum::Float(*self)
    }
}

impl SlotValue for bool {
    fn datum(&self) -> Datum<'_> {
        Datum::Bool(*self)
    }
}

impl SlotValue for DateTime {
    fn datum(&self) -> Datum<'_> {
        Datum::DateTime(self)
    }
}

/// Optional scalar slot
#[derive(Debug, Clone)]
pub struct Property<T: SlotValue> {
    name: &'static str,
    value: Option<T>,
    default: Option<T>,
    constraints: Vec<Constraint>,
}

impl<T: SlotValue> Property<T> {
    /// Create a slot with its constraint set
    pub fn new(name: &'static str, constraints: Vec<Constraint>) -> Self {
        Self {
            name,
            value: None,
            default: None,
            constraints,
        }
    }

    /// Attach a default returned by `get` while the slot is unset
    pub fn with_default(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    /// The compact property name, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current value, or the configured default
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref().or(self.default.as_ref())
    }

    /// True when a value has been assigned (defaults do not count)
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Validate and replace the value; chainable
    pub fn set(&mut self, value: T) -> Result<&mut Self> {
        if let Some(message) = self.violation(&value) {
            return Err(BindError::validation(self.name, message));
        }
        self.value = Some(value);
        Ok(self)
    }

    /// Decode-time assignment: violations go through the handler
    ///
    /// A permissive handler keeps the flagged value; `Err` means the handler
    /// aborted.
    pub fn set_checked(
        &mut self,
        value: T,
        path: &PropertyPath,
        handler: &mut dyn ErrorHandler,
    ) -> Result<()> {
        if let Some(message) = self.violation(&value) {
            let prop_path = path.push(self.name);
            if !handler.report(Severity::Violation, &prop_path, &message) {
                return Err(BindError::validation(prop_path.to_string(), message));
            }
        }
        self.value = Some(value);
        Ok(())
    }

    /// Clear to unset
    pub fn unset(&mut self) {
        self.value = None;
    }

    /// Completion check: required flag plus value constraints
    ///
    /// Returns false when the handler aborted.
    pub fn check(&self, path: &PropertyPath, handler: &mut dyn ErrorHandler) -> bool {
        let prop_path = path.push(self.name);

        match &self.value {
            None if self.default.is_none() => {
                for c in &self.constraints {
                    if let Some(message) = c.check_count(0) {
                        if !handler.report(Severity::Violation, &prop_path, &message) {
                            return false;
                        }
                    }
                }
            }
            None => {}
            Some(value) => {
                for c in &self.constraints {
                    if let Some(message) = c.check_value(&value.datum()) {
                        if !handler.report(Severity::Violation, &prop_path, &message) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    fn violation(&self, value: &T) -> Option<String> {
        self.constraints
            .iter()
            .find_map(|c| c.check_value(&value.datum()))
    }
}

/// Ordered multi-value slot
#[derive(Debug, Clone)]
pub struct ListProperty<T: SlotValue> {
    name: &'static str,
    values: Vec<T>,
    constraints: Vec<Constraint>,
}

impl<T: SlotValue> ListProperty<T> {
    /// Create a slot with its constraint set
    pub fn new(name: &'static str, constraints: Vec<Constraint>) -> Self {
        Self {
            name,
            values: Vec::new(),
            constraints,
        }
    }

    /// The compact property name, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current values, in insertion order
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// True when at least one value is present
    pub fn is_set(&self) -> bool {
        !self.values.is_empty()
    }

    /// Validate and append one value; chainable
    ///
    /// Count bounds are not enforced here; they apply when the owning
    /// object is complete.
    pub fn add(&mut self, value: T) -> Result<&mut Self> {
        if let Some(message) = self.violation(&value) {
            return Err(BindError::validation(self.name, message));
        }
        self.values.push(value);
        Ok(self)
    }

    /// Validate and replace all values; chainable
    pub fn set_values(&mut self, values: Vec<T>) -> Result<&mut Self> {
        for value in &values {
            if let Some(message) = self.violation(value) {
                return Err(BindError::validation(self.name, message));
            }
        }
        self.values = values;
        Ok(self)
    }

    /// Decode-time append: violations go through the handler
    pub fn add_checked(
        &mut self,
        value: T,
        path: &PropertyPath,
        handler: &mut dyn ErrorHandler,
    ) -> Result<()> {
        if let Some(message) = self.violation(&value) {
            let item_path = path.push(self.name).push_index(self.values.len());
            if !handler.report(Severity::Violation, &item_path, &message) {
                return Err(BindError::validation(item_path.to_string(), message));
            }
        }
        self.values.push(value);
        Ok(())
    }

    /// Clear to empty
    pub fn unset(&mut self) {
        self.values.clear();
    }

    /// Completion check: count bounds plus per-element constraints
    pub fn check(&self, path: &PropertyPath, handler: &mut dyn ErrorHandler) -> bool {
        let prop_path = path.push(self.name);

        for c in &self.constraints {
            if let Some(message) = c.check_count(self.values.len()) {
                if !handler.report(Severity::Violation, &prop_path, &message) {
                    return false;
                }
            }
        }

        for (idx, value) in self.values.iter().enumerate() {
            for c in &self.constraints {
                if let Some(message) = c.check_value(&value.datum()) {
                    let item_path = prop_path.push_index(idx);
                    if !handler.report(Severity::Violation, &item_path, &message) {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn violation(&self, value: &T) -> Option<String> {
        self.constraints
            .iter()
            .find_map(|c| c.check_value(&value.datum()))
    }
}

/// Scalar reference slot
///
/// Holds either a deferred identifier (during decode) or a live object.
/// The optional class restriction is checked against the target's
/// descriptor once the reference is resolved.
#[derive(Debug, Clone)]
pub struct RefProperty {
    name: &'static str,
    value: Option<Ref>,
    class: Option<&'static TypeDescriptor>,
    required: bool,
}

impl RefProperty {
    /// Create a slot, optionally restricted to a target class
    pub fn new(name: &'static str, class: Option<&'static TypeDescriptor>) -> Self {
        Self {
            name,
            value: None,
            class,
            required: false,
        }
    }

    /// Mark the slot required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The compact property name, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The current reference
    pub fn get(&self) -> Option<&Ref> {
        self.value.as_ref()
    }

    /// The resolved target, if any
    pub fn obj(&self) -> Option<SharedObject> {
        self.value.as_ref().and_then(|r| r.as_obj().cloned())
    }

    /// True when a reference (resolved or deferred) is present
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Assign a live object, checking the class restriction now
    pub fn set_obj(&mut self, obj: SharedObject) -> Result<&mut Self> {
        if let Some(message) = self.class_violation(&obj) {
            return Err(BindError::validation(self.name, message));
        }
        self.value = Some(Ref::Obj(obj));
        Ok(self)
    }

    /// Assign a deferred identifier; resolution happens in the linker
    pub fn set_iri(&mut self, iri: impl Into<String>) -> &mut Self {
        self.value = Some(Ref::Iri(iri.into()));
        self
    }

    /// Assign a reference directly, deferring the class check to `check()`
    ///
    /// The decode path uses this: a nested record of the wrong class is a
    /// validation report at completion time, not a hard decode failure.
    pub fn set_ref(&mut self, r: Ref) -> &mut Self {
        self.value = Some(r);
        self
    }

    /// Clear to unset
    pub fn unset(&mut self) {
        self.value = None;
    }

    /// Completion check: required flag plus class restriction
    pub fn check(&self, path: &PropertyPath, handler: &mut dyn ErrorHandler) -> bool {
        let prop_path = path.push(self.name);

        match &self.value {
            None if self.required => handler.report(
                Severity::Violation,
                &prop_path,
                "required property is unset",
            ),
            None | Some(Ref::Iri(_)) => true,
            Some(Ref::Obj(obj)) => match self.class_violation(obj) {
                Some(message) => handler.report(Severity::Violation, &prop_path, &message),
                None => true,
            },
        }
    }

    /// Visit the reference slot (graph walk)
    pub fn visit(&self, f: &mut dyn FnMut(&Ref)) {
        if let Some(r) = &self.value {
            f(r);
        }
    }

    /// Visit the reference slot mutably (linker)
    pub fn visit_mut(&mut self, f: &mut dyn FnMut(&mut Ref)) {
        if let Some(r) = &mut self.value {
            f(r);
        }
    }

    fn class_violation(&self, obj: &SharedObject) -> Option<String> {
        let class = self.class?;
        // try_read: the owner may be validating under its own lock and
        // reference itself; skipping the check beats re-entering the lock
        let desc = match obj.try_read() {
            Ok(guard) => guard.type_descriptor(),
            Err(_) => return None,
        };
        if desc.is_subclass_of(class.iri) {
            None
        } else {
            Some(format!(
                "referenced object of type {} is not a {}",
                desc.iri, class.iri
            ))
        }
    }
}

/// List reference slot
#[derive(Debug, Clone)]
pub struct RefListProperty {
    name: &'static str,
    values: Vec<Ref>,
    class: Option<&'static TypeDescriptor>,
    constraints: Vec<Constraint>,
}

impl RefListProperty {
    /// Create a slot, optionally restricted to a target class
    pub fn new(
        name: &'static str,
        class: Option<&'static TypeDescriptor>,
        constraints: Vec<Constraint>,
    ) -> Self {
        Self {
            name,
            values: Vec::new(),
            class,
            constraints,
        }
    }

    /// The compact property name, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current references, in insertion order
    pub fn values(&self) -> &[Ref] {
        &self.values
    }

    /// True when at least one reference is present
    pub fn is_set(&self) -> bool {
        !self.values.is_empty()
    }

    /// Append a live object, checking the class restriction now
    pub fn add_obj(&mut self, obj: SharedObject) -> Result<&mut Self> {
        if let Some(message) = self.class_violation(&obj) {
            return Err(BindError::validation(self.name, message));
        }
        self.values.push(Ref::Obj(obj));
        Ok(self)
    }

    /// Append a deferred identifier
    pub fn add_iri(&mut self, iri: impl Into<String>) -> &mut Self {
        self.values.push(Ref::Iri(iri.into()));
        self
    }

    /// Append a reference directly, deferring the class check to `check()`
    pub fn add_ref(&mut self, r: Ref) -> &mut Self {
        self.values.push(r);
        self
    }

    /// Clear to empty
    pub fn unset(&mut self) {
        self.values.clear();
    }

    /// Completion check: count bounds plus class restriction on resolved
    /// elements
    pub fn check(&self, path: &PropertyPath, handler: &mut dyn ErrorHandler) -> bool {
        let prop_path = path.push(self.name);

        for c in &self.constraints {
            if let Some(message) = c.check_count(self.values.len()) {
                if !handler.report(Severity::Violation, &prop_path, &message) {
                    return false;
                }
            }
        }

        for (idx, r) in self.values.iter().enumerate() {
            if let Ref::Obj(obj) = r {
                if let Some(message) = self.class_violation(obj) {
                    let item_path = prop_path.push_index(idx);
                    if !handler.report(Severity::Violation, &item_path, &message) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Visit every reference slot (graph walk)
    pub fn visit(&self, f: &mut dyn FnMut(&Ref)) {
        for r in &self.values {
            f(r);
        }
    }

    /// Visit every reference slot mutably (linker)
    pub fn visit_mut(&mut self, f: &mut dyn FnMut(&mut Ref)) {
        for r in &mut self.values {
            f(r);
        }
    }

    fn class_violation(&self, obj: &SharedObject) -> Option<String> {
        let class = self.class?;
        // try_read: the owner may be validating under its own lock and
        // reference itself; skipping the check beats re-entering the lock
        let desc = match obj.try_read() {
            Ok(guard) => guard.type_descriptor(),
            Err(_) => return None,
        };
        if desc.is_subclass_of(class.iri) {
            None
        } else {
            Some(format!(
                "referenced object of type {} is not a {}",
                desc.iri, class.iri
            ))
        }
    }
}
