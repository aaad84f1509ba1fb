//! Hand-written model classes standing in for schema-compiler output
//!
//! The runtime never sees generated code in this repository, so the
//! integration suites carry a small model written exactly the way the
//! compiler would emit it: one static `TypeDescriptor` per class, structs
//! composing `ObjectBase`, and trait impls routing every property through
//! the constraint-checked slots.

// Each integration binary compiles this module separately and uses a
// different slice of it.
#![allow(dead_code)]

use once_cell::sync::Lazy;
use shapebind_core::{
    decode_ref, encode_ref, for_each_list_item, BindError, Constraint, DateTime, DecodeCtx,
    EncodeState, ErrorHandler, ExtensibleBase, ListProperty, NamedIndividual, NodeKind,
    ObjectBase, ObjectEncoder, Property, PropertyPath, Ref, RefListProperty, RefProperty,
    Result, Severity, ShaclObject, SharedObject, TypeDescriptor, TypeRegistry, ValueDecoder,
};
use std::any::Any;

// Class IRIs
pub const ELEMENT_IRI: &str = "http://example.org/shapes/Element";
pub const ARTIFACT_IRI: &str = "http://example.org/shapes/Artifact";
pub const BUNDLE_IRI: &str = "http://example.org/shapes/Bundle";
pub const ANNOTATION_IRI: &str = "http://example.org/shapes/Annotation";
pub const CATALOG_ENTRY_IRI: &str = "http://example.org/shapes/CatalogEntry";
pub const LOCAL_ENTRY_IRI: &str = "http://example.org/shapes/LocalEntry";

// License enumeration individuals
pub const LICENSE_MIT_IRI: &str = "http://example.org/shapes/license/mit";
pub const LICENSE_APACHE_IRI: &str = "http://example.org/shapes/license/apache-2.0";
pub const LICENSE_UNLABELED_IRI: &str = "http://example.org/shapes/license/unlabeled";

pub static LICENSE_MIT: NamedIndividual = NamedIndividual {
    type_iri: "http://example.org/shapes/License",
    iri: LICENSE_MIT_IRI,
    label: Some("MIT"),
};

pub static LICENSE_APACHE: NamedIndividual = NamedIndividual {
    type_iri: "http://example.org/shapes/License",
    iri: LICENSE_APACHE_IRI,
    label: Some("Apache-2.0"),
};

// This value has no label
pub static LICENSE_UNLABELED: NamedIndividual = NamedIndividual {
    type_iri: "http://example.org/shapes/License",
    iri: LICENSE_UNLABELED_IRI,
    label: None,
};

pub const PERMITTED_LICENSES: &[&str] =
    &[LICENSE_MIT_IRI, LICENSE_APACHE_IRI, LICENSE_UNLABELED_IRI];

fn report_expected(
    path: &PropertyPath,
    name: &str,
    expected: &str,
    handler: &mut dyn ErrorHandler,
) -> Result<()> {
    let prop_path = path.push(name);
    let message = format!("expected {} value", expected);
    if handler.report(Severity::Violation, &prop_path, &message) {
        Ok(())
    } else {
        Err(BindError::decode(prop_path.to_string(), message))
    }
}

// An abstract base class
pub struct Element {
    base: ObjectBase,
}

impl Element {
    pub fn new() -> Self {
        Self {
            base: ObjectBase::new(&ELEMENT),
        }
    }
}

fn make_element() -> SharedObject {
    shapebind_core::shared(Element::new())
}

pub static ELEMENT: TypeDescriptor = TypeDescriptor {
    iri: ELEMENT_IRI,
    compact: Some("Element"),
    ancestors: &[],
    id_alias: None,
    node_kind: NodeKind::BlankNodeOrIri,
    is_abstract: true,
    is_extensible: false,
    make: make_element,
};

impl ShaclObject for Element {
    fn type_descriptor(&self) -> &'static TypeDescriptor {
        self.base.type_descriptor()
    }

    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn decode_property(
        &mut self,
        _ctx: &mut DecodeCtx<'_>,
        _name: &str,
        _value: &dyn ValueDecoder,
        _path: &PropertyPath,
        _handler: &mut dyn ErrorHandler,
    ) -> Result<bool> {
        Ok(false)
    }

    fn encode_properties(
        &self,
        _enc: &mut dyn ObjectEncoder,
        _state: &mut EncodeState,
    ) -> Result<()> {
        Ok(())
    }

    fn validate(&self, path: &PropertyPath, handler: &mut dyn ErrorHandler) -> bool {
        self.base.validate(path, handler)
    }

    fn for_each_ref(&self, _f: &mut dyn FnMut(&Ref)) {}

    fn for_each_ref_mut(&mut self, _f: &mut dyn FnMut(&mut Ref)) {}

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// A concrete class exercising every slot and constraint kind
pub struct Artifact {
    base: ObjectBase,
    pub name: Property<String>,
    pub version: Property<String>,
    pub size: Property<i64>,
    pub created: Property<DateTime>,
    pub license: Property<String>,
    pub tags: ListProperty<String>,
    pub dependencies: RefListProperty,
    pub derived_from: RefProperty,
}

impl Artifact {
    pub fn new() -> Self {
        Self {
            base: ObjectBase::new(&ARTIFACT),
            name: Property::new("name", vec![Constraint::Required]),
            version: Property::new(
                "version",
                vec![Constraint::pattern(r"^\d+\.\d+$").unwrap()],
            ),
            size: Property::new("size", vec![Constraint::MinInclusive(0.0)]),
            created: Property::new("created", vec![Constraint::TimezoneRequired]),
            license: Property::new("license", vec![Constraint::In(PERMITTED_LICENSES)]),
            tags: ListProperty::new("tags", vec![Constraint::MaxCount(3)]),
            dependencies: RefListProperty::new("dependencies", Some(&ARTIFACT), vec![]),
            derived_from: RefProperty::new("derivedFrom", Some(&ELEMENT)),
        }
    }
}

fn make_artifact() -> SharedObject {
    shapebind_core::shared(Artifact::new())
}

pub static ARTIFACT: TypeDescriptor = TypeDescriptor {
    iri: ARTIFACT_IRI,
    compact: Some("Artifact"),
    ancestors: &[&ELEMENT],
    id_alias: None,
    node_kind: NodeKind::BlankNodeOrIri,
    is_abstract: false,
    is_extensible: false,
    make: make_artifact,
};

impl ShaclObject for Artifact {
    fn type_descriptor(&self) -> &'static TypeDescriptor {
        &ARTIFACT
    }

    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn decode_property(
        &mut self,
        ctx: &mut DecodeCtx<'_>,
        name: &str,
        value: &dyn ValueDecoder,
        path: &PropertyPath,
        handler: &mut dyn ErrorHandler,
    ) -> Result<bool> {
        match name {
            "http://example.org/shapes/name" | "name" => {
                match value.read_string() {
                    Some(s) => self.name.set_checked(s.to_string(), path, handler)?,
                    None => report_expected(path, "name", "string", handler)?,
                }
                Ok(true)
            }
            "http://example.org/shapes/version" | "version" => {
                match value.read_string() {
                    Some(s) => self.version.set_checked(s.to_string(), path, handler)?,
                    None => report_expected(path, "version", "string", handler)?,
                }
                Ok(true)
            }
            "http://example.org/shapes/size" | "size" => {
                match value.read_integer() {
                    Some(n) => self.size.set_checked(n, path, handler)?,
                    None => report_expected(path, "size", "integer", handler)?,
                }
                Ok(true)
            }
            "http://example.org/shapes/created" | "created" => {
                match value.read_datetime() {
                    Some(dt) => self.created.set_checked(dt, path, handler)?,
                    None => report_expected(path, "created", "dateTime", handler)?,
                }
                Ok(true)
            }
            "http://example.org/shapes/license" | "license" => {
                match value.read_iri() {
                    Some(iri) => self.license.set_checked(iri.to_string(), path, handler)?,
                    None => report_expected(path, "license", "identifier", handler)?,
                }
                Ok(true)
            }
            "http://example.org/shapes/tags" | "tags" => {
                for_each_list_item(value, &mut |_, item| {
                    match item.read_string() {
                        Some(s) => self.tags.add_checked(s.to_string(), path, handler),
                        None => report_expected(path, "tags", "string", handler),
                    }
                })?;
                Ok(true)
            }
            "http://example.org/shapes/dependencies" | "dependencies" => {
                let prop_path = path.push("dependencies");
                for_each_list_item(value, &mut |idx, item| {
                    if let Some(r) =
                        decode_ref(ctx, item, &prop_path.push_index(idx), handler)?
                    {
                        self.dependencies.add_ref(r);
                    }
                    Ok(())
                })?;
                Ok(true)
            }
            "http://example.org/shapes/derivedFrom" | "derivedFrom" => {
                let prop_path = path.push("derivedFrom");
                if let Some(r) = decode_ref(ctx, value, &prop_path, handler)? {
                    self.derived_from.set_ref(r);
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn encode_properties(
        &self,
        enc: &mut dyn ObjectEncoder,
        state: &mut EncodeState,
    ) -> Result<()> {
        if let Some(v) = self.name.get() {
            enc.encode_property("name", &mut |e| e.write_string(v))?;
        }
        if let Some(v) = self.version.get() {
            enc.encode_property("version", &mut |e| e.write_string(v))?;
        }
        if let Some(v) = self.size.get() {
            enc.encode_property("size", &mut |e| e.write_integer(*v))?;
        }
        if let Some(v) = self.created.get() {
            enc.encode_property("created", &mut |e| e.write_datetime(v))?;
        }
        if let Some(v) = self.license.get() {
            enc.encode_property("license", &mut |e| e.write_enum(v))?;
        }
        if self.tags.is_set() {
            enc.encode_property("tags", &mut |e| {
                e.write_list(&mut |list| {
                    for tag in self.tags.values() {
                        list.encode_item(&mut |v| v.write_string(tag))?;
                    }
                    Ok(())
                })
            })?;
        }
        if self.dependencies.is_set() {
            enc.encode_property("dependencies", &mut |e| {
                e.write_list(&mut |list| {
                    for r in self.dependencies.values() {
                        list.encode_item(&mut |v| encode_ref(r, v, state))?;
                    }
                    Ok(())
                })
            })?;
        }
        if let Some(r) = self.derived_from.get() {
            enc.encode_property("derivedFrom", &mut |e| encode_ref(r, e, state))?;
        }
        Ok(())
    }

    fn validate(&self, path: &PropertyPath, handler: &mut dyn ErrorHandler) -> bool {
        self.base.validate(path, handler)
            && self.name.check(path, handler)
            && self.version.check(path, handler)
            && self.size.check(path, handler)
            && self.created.check(path, handler)
            && self.license.check(path, handler)
            && self.tags.check(path, handler)
            && self.dependencies.check(path, handler)
            && self.derived_from.check(path, handler)
    }

    fn for_each_ref(&self, f: &mut dyn FnMut(&Ref)) {
        self.dependencies.visit(f);
        self.derived_from.visit(f);
    }

    fn for_each_ref_mut(&mut self, f: &mut dyn FnMut(&mut Ref)) {
        self.dependencies.visit_mut(f);
        self.derived_from.visit_mut(f);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// An extensible class preserving schema-unknown content
pub struct Bundle {
    base: ObjectBase,
    ext: ExtensibleBase,
    pub title: Property<String>,
}

impl Bundle {
    pub fn new() -> Self {
        Self {
            base: ObjectBase::new(&BUNDLE),
            ext: ExtensibleBase::new(),
            title: Property::new("title", vec![]),
        }
    }
}

fn make_bundle() -> SharedObject {
    shapebind_core::shared(Bundle::new())
}

pub static BUNDLE: TypeDescriptor = TypeDescriptor {
    iri: BUNDLE_IRI,
    compact: Some("Bundle"),
    ancestors: &[&ELEMENT],
    id_alias: None,
    node_kind: NodeKind::BlankNodeOrIri,
    is_abstract: false,
    is_extensible: true,
    make: make_bundle,
};

impl ShaclObject for Bundle {
    fn type_descriptor(&self) -> &'static TypeDescriptor {
        &BUNDLE
    }

    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn decode_property(
        &mut self,
        _ctx: &mut DecodeCtx<'_>,
        name: &str,
        value: &dyn ValueDecoder,
        path: &PropertyPath,
        handler: &mut dyn ErrorHandler,
    ) -> Result<bool> {
        match name {
            "http://example.org/shapes/title" | "title" => {
                match value.read_string() {
                    Some(s) => self.title.set_checked(s.to_string(), path, handler)?,
                    None => report_expected(path, "title", "string", handler)?,
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn encode_properties(
        &self,
        enc: &mut dyn ObjectEncoder,
        _state: &mut EncodeState,
    ) -> Result<()> {
        if let Some(v) = self.title.get() {
            enc.encode_property("title", &mut |e| e.write_string(v))?;
        }
        self.ext.encode(enc)
    }

    fn validate(&self, path: &PropertyPath, handler: &mut dyn ErrorHandler) -> bool {
        self.base.validate(path, handler) && self.title.check(path, handler)
    }

    fn for_each_ref(&self, _f: &mut dyn FnMut(&Ref)) {}

    fn for_each_ref_mut(&mut self, _f: &mut dyn FnMut(&mut Ref)) {}

    fn extensible(&self) -> Option<&ExtensibleBase> {
        Some(&self.ext)
    }

    fn extensible_mut(&mut self) -> Option<&mut ExtensibleBase> {
        Some(&mut self.ext)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// A class restricted to document-scoped identities
pub struct Annotation {
    base: ObjectBase,
    pub text: Property<String>,
}

impl Annotation {
    pub fn new() -> Self {
        Self {
            base: ObjectBase::new(&ANNOTATION),
            text: Property::new("text", vec![Constraint::Required]),
        }
    }
}

fn make_annotation() -> SharedObject {
    shapebind_core::shared(Annotation::new())
}

pub static ANNOTATION: TypeDescriptor = TypeDescriptor {
    iri: ANNOTATION_IRI,
    compact: Some("Annotation"),
    ancestors: &[&ELEMENT],
    id_alias: None,
    node_kind: NodeKind::BlankNode,
    is_abstract: false,
    is_extensible: false,
    make: make_annotation,
};

impl ShaclObject for Annotation {
    fn type_descriptor(&self) -> &'static TypeDescriptor {
        &ANNOTATION
    }

    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn decode_property(
        &mut self,
        _ctx: &mut DecodeCtx<'_>,
        name: &str,
        value: &dyn ValueDecoder,
        path: &PropertyPath,
        handler: &mut dyn ErrorHandler,
    ) -> Result<bool> {
        match name {
            "http://example.org/shapes/text" | "text" => {
                match value.read_string() {
                    Some(s) => self.text.set_checked(s.to_string(), path, handler)?,
                    None => report_expected(path, "text", "string", handler)?,
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn encode_properties(
        &self,
        enc: &mut dyn ObjectEncoder,
        _state: &mut EncodeState,
    ) -> Result<()> {
        if let Some(v) = self.text.get() {
            enc.encode_property("text", &mut |e| e.write_string(v))?;
        }
        Ok(())
    }

    fn validate(&self, path: &PropertyPath, handler: &mut dyn ErrorHandler) -> bool {
        self.base.validate(path, handler) && self.text.check(path, handler)
    }

    fn for_each_ref(&self, _f: &mut dyn FnMut(&Ref)) {}

    fn for_each_ref_mut(&mut self, _f: &mut dyn FnMut(&mut Ref)) {}

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// A class with an identity-key alias
pub struct CatalogEntry {
    base: ObjectBase,
    pub item: RefProperty,
}

impl CatalogEntry {
    pub fn new() -> Self {
        Self::with_descriptor(&CATALOG_ENTRY)
    }

    pub fn with_descriptor(desc: &'static TypeDescriptor) -> Self {
        Self {
            base: ObjectBase::new(desc),
            item: RefProperty::new("item", Some(&ELEMENT)),
        }
    }
}

fn make_catalog_entry() -> SharedObject {
    shapebind_core::shared(CatalogEntry::new())
}

pub static CATALOG_ENTRY: TypeDescriptor = TypeDescriptor {
    iri: CATALOG_ENTRY_IRI,
    compact: Some("CatalogEntry"),
    ancestors: &[],
    id_alias: Some("entryId"),
    node_kind: NodeKind::BlankNodeOrIri,
    is_abstract: false,
    is_extensible: false,
    make: make_catalog_entry,
};

impl ShaclObject for CatalogEntry {
    fn type_descriptor(&self) -> &'static TypeDescriptor {
        self.base.type_descriptor()
    }

    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn decode_property(
        &mut self,
        ctx: &mut DecodeCtx<'_>,
        name: &str,
        value: &dyn ValueDecoder,
        path: &PropertyPath,
        handler: &mut dyn ErrorHandler,
    ) -> Result<bool> {
        match name {
            "http://example.org/shapes/item" | "item" => {
                let prop_path = path.push("item");
                if let Some(r) = decode_ref(ctx, value, &prop_path, handler)? {
                    self.item.set_ref(r);
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn encode_properties(
        &self,
        enc: &mut dyn ObjectEncoder,
        state: &mut EncodeState,
    ) -> Result<()> {
        if let Some(r) = self.item.get() {
            enc.encode_property("item", &mut |e| encode_ref(r, e, state))?;
        }
        Ok(())
    }

    fn validate(&self, path: &PropertyPath, handler: &mut dyn ErrorHandler) -> bool {
        self.base.validate(path, handler) && self.item.check(path, handler)
    }

    fn for_each_ref(&self, f: &mut dyn FnMut(&Ref)) {
        self.item.visit(f);
    }

    fn for_each_ref_mut(&mut self, f: &mut dyn FnMut(&mut Ref)) {
        self.item.visit_mut(f);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// A class inheriting its identity-key alias from the parent
pub struct LocalEntry {
    inner: CatalogEntry,
}

impl LocalEntry {
    pub fn new() -> Self {
        Self {
            inner: CatalogEntry::with_descriptor(&LOCAL_ENTRY),
        }
    }
}

fn make_local_entry() -> SharedObject {
    shapebind_core::shared(LocalEntry::new())
}

pub static LOCAL_ENTRY: TypeDescriptor = TypeDescriptor {
    iri: LOCAL_ENTRY_IRI,
    compact: Some("LocalEntry"),
    ancestors: &[&CATALOG_ENTRY],
    id_alias: None,
    node_kind: NodeKind::BlankNodeOrIri,
    is_abstract: false,
    is_extensible: false,
    make: make_local_entry,
};

impl ShaclObject for LocalEntry {
    fn type_descriptor(&self) -> &'static TypeDescriptor {
        &LOCAL_ENTRY
    }

    fn base(&self) -> &ObjectBase {
        self.inner.base()
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        self.inner.base_mut()
    }

    fn decode_property(
        &mut self,
        ctx: &mut DecodeCtx<'_>,
        name: &str,
        value: &dyn ValueDecoder,
        path: &PropertyPath,
        handler: &mut dyn ErrorHandler,
    ) -> Result<bool> {
        self.inner.decode_property(ctx, name, value, path, handler)
    }

    fn encode_properties(
        &self,
        enc: &mut dyn ObjectEncoder,
        state: &mut EncodeState,
    ) -> Result<()> {
        self.inner.encode_properties(enc, state)
    }

    fn validate(&self, path: &PropertyPath, handler: &mut dyn ErrorHandler) -> bool {
        self.inner.validate(path, handler)
    }

    fn for_each_ref(&self, f: &mut dyn FnMut(&Ref)) {
        self.inner.for_each_ref(f);
    }

    fn for_each_ref_mut(&mut self, f: &mut dyn FnMut(&mut Ref)) {
        self.inner.for_each_ref_mut(f);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The registry every suite decodes against
pub static REGISTRY: Lazy<TypeRegistry> = Lazy::new(|| {
    TypeRegistry::builder()
        .register(&ELEMENT)
        .register(&ARTIFACT)
        .register(&BUNDLE)
        .register(&ANNOTATION)
        .register(&CATALOG_ENTRY)
        .register(&LOCAL_ENTRY)
        .individual(&LICENSE_MIT)
        .individual(&LICENSE_APACHE)
        .individual(&LICENSE_UNLABELED)
        .build()
});
