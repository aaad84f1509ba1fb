//! Decoder protocol bound over an already-parsed JSON value tree
//!
//! Parsing is an external collaborator (`serde_json`); these decoders borrow
//! the parsed tree and answer the protocol's shape and reader queries.
//! Typed readers return `None` on shape mismatch, which lets the generic
//! decode drivers probe values without failing.

use serde_json::{Map, Value as JsonValue};
use shapebind_core::{
    DateTime, ListDecoder, ObjectDecoder, Result, ValueDecoder, ValueShape,
};
use shapebind_vocab::keys;

/// `ValueDecoder` over one JSON value
pub struct JsonValueDecoder<'a> {
    value: &'a JsonValue,
}

impl<'a> JsonValueDecoder<'a> {
    /// Bind to a value
    pub fn new(value: &'a JsonValue) -> Self {
        Self { value }
    }
}

impl ValueDecoder for JsonValueDecoder<'_> {
    fn shape(&self) -> ValueShape {
        match self.value {
            JsonValue::String(_) => ValueShape::String,
            JsonValue::Number(_) => ValueShape::Number,
            JsonValue::Bool(_) => ValueShape::Bool,
            JsonValue::Object(_) => ValueShape::Object,
            JsonValue::Array(_) => ValueShape::List,
            JsonValue::Null => ValueShape::Null,
        }
    }

    fn read_string(&self) -> Option<&str> {
        self.value.as_str()
    }

    fn read_integer(&self) -> Option<i64> {
        self.value.as_i64()
    }

    fn read_float(&self) -> Option<f64> {
        self.value.as_f64()
    }

    fn read_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }

    fn read_datetime(&self) -> Option<DateTime> {
        self.value.as_str().and_then(|s| DateTime::parse(s).ok())
    }

    fn read_iri(&self) -> Option<&str> {
        self.value.as_str()
    }

    fn as_object(&self) -> Option<Box<dyn ObjectDecoder + '_>> {
        self.value
            .as_object()
            .map(|map| Box::new(JsonObjectDecoder { map }) as Box<dyn ObjectDecoder>)
    }

    fn as_list(&self) -> Option<Box<dyn ListDecoder + '_>> {
        self.value
            .as_array()
            .map(|items| Box::new(JsonListDecoder { items }) as Box<dyn ListDecoder>)
    }
}

/// `ObjectDecoder` over one JSON object record
pub struct JsonObjectDecoder<'a> {
    map: &'a Map<String, JsonValue>,
}

impl<'a> JsonObjectDecoder<'a> {
    /// Bind to a parsed record
    pub fn new(map: &'a Map<String, JsonValue>) -> Self {
        Self { map }
    }
}

impl ObjectDecoder for JsonObjectDecoder<'_> {
    fn declared_types(&self) -> Vec<String> {
        match self.map.get(keys::TYPE) {
            Some(JsonValue::String(s)) => vec![s.clone()],
            Some(JsonValue::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn id(&self, id_key: &str) -> Option<&str> {
        self.map
            .get(id_key)
            .and_then(JsonValue::as_str)
            .or_else(|| self.map.get(keys::ID).and_then(JsonValue::as_str))
    }

    fn for_each_property(
        &self,
        ignore: &[&str],
        f: &mut dyn FnMut(&str, &dyn ValueDecoder) -> Result<()>,
    ) -> Result<()> {
        for (name, value) in self.map {
            if ignore.contains(&name.as_str()) {
                continue;
            }
            f(name, &JsonValueDecoder { value })?;
        }
        Ok(())
    }
}

/// `ListDecoder` over one JSON array
pub struct JsonListDecoder<'a> {
    items: &'a [JsonValue],
}

impl ListDecoder for JsonListDecoder<'_> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn for_each_item(
        &self,
        f: &mut dyn FnMut(usize, &dyn ValueDecoder) -> Result<()>,
    ) -> Result<()> {
        for (idx, value) in self.items.iter().enumerate() {
            f(idx, &JsonValueDecoder { value })?;
        }
        Ok(())
    }
}
