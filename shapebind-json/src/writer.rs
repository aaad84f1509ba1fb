//! Streaming JSON writer and the encoder protocol implementation
//!
//! The writer emits JSON text directly to the output stream without building
//! an intermediate document tree: the only bookkeeping is one
//! needs-delimiter flag per nesting level, so auxiliary memory is
//! O(current nesting depth) regardless of total output size.
//!
//! Writing a delimiter clears the level's flag; writing any value sets it.
//! Scopes push a fresh flag on entry and pop it on exit, so the state stays
//! correct even when an error ends the encode early.

use shapebind_core::{
    BindError, DateTime, ListEncoder, ObjectEncoder, Result, ValueEncoder,
};
use shapebind_vocab::keys;
use std::io::Write;

/// Delimiter-tracking JSON text writer
pub struct JsonWriter<W: Write> {
    out: W,
    /// One needs-delimiter flag per open scope, innermost last
    levels: Vec<bool>,
    /// A key was just written; the next value completes the member
    pending_key: bool,
}

impl<W: Write> JsonWriter<W> {
    /// Wrap an output stream
    pub fn new(out: W) -> Self {
        Self {
            out,
            levels: Vec::new(),
            pending_key: false,
        }
    }

    /// Finish writing and hand the stream back
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the separating delimiter when the current scope needs one
    fn separate(&mut self) -> Result<()> {
        if self.pending_key {
            self.pending_key = false;
            return Ok(());
        }
        if let Some(needs_delimiter) = self.levels.last_mut() {
            if *needs_delimiter {
                self.out.write_all(b",")?;
            }
            *needs_delimiter = true;
        }
        Ok(())
    }

    /// Open an object scope
    pub fn begin_object(&mut self) -> Result<()> {
        self.separate()?;
        self.out.write_all(b"{")?;
        self.levels.push(false);
        Ok(())
    }

    /// Close the innermost object scope
    pub fn end_object(&mut self) -> Result<()> {
        self.levels.pop();
        self.out.write_all(b"}")?;
        Ok(())
    }

    /// Open an array scope
    pub fn begin_array(&mut self) -> Result<()> {
        self.separate()?;
        self.out.write_all(b"[")?;
        self.levels.push(false);
        Ok(())
    }

    /// Close the innermost array scope
    pub fn end_array(&mut self) -> Result<()> {
        self.levels.pop();
        self.out.write_all(b"]")?;
        Ok(())
    }

    /// Write a member key inside an object scope
    pub fn key(&mut self, name: &str) -> Result<()> {
        self.separate()?;
        let escaped = serde_json::to_string(name)?;
        self.out.write_all(escaped.as_bytes())?;
        self.out.write_all(b":")?;
        self.pending_key = true;
        Ok(())
    }

    /// Write a pre-rendered atom (number, boolean, null)
    pub fn atom(&mut self, raw: &str) -> Result<()> {
        self.separate()?;
        self.out.write_all(raw.as_bytes())?;
        Ok(())
    }

    /// Write an escaped string value
    pub fn string(&mut self, value: &str) -> Result<()> {
        self.separate()?;
        let escaped = serde_json::to_string(value)?;
        self.out.write_all(escaped.as_bytes())?;
        Ok(())
    }
}

/// `ValueEncoder` writing through a shared `JsonWriter`
pub struct JsonValueEncoder<'w, W: Write> {
    w: &'w mut JsonWriter<W>,
}

impl<'w, W: Write> JsonValueEncoder<'w, W> {
    /// Bind to a writer
    pub fn new(w: &'w mut JsonWriter<W>) -> Self {
        Self { w }
    }
}

impl<W: Write> ValueEncoder for JsonValueEncoder<'_, W> {
    fn write_string(&mut self, value: &str) -> Result<()> {
        self.w.string(value)
    }

    fn write_datetime(&mut self, value: &DateTime) -> Result<()> {
        self.w.string(value.original())
    }

    fn write_integer(&mut self, value: i64) -> Result<()> {
        self.w.atom(&value.to_string())
    }

    fn write_float(&mut self, value: f64) -> Result<()> {
        let number = serde_json::Number::from_f64(value).ok_or_else(|| {
            BindError::validation("", format!("non-finite float {} cannot be written", value))
        })?;
        self.w.atom(&number.to_string())
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.w.atom(if value { "true" } else { "false" })
    }

    fn write_iri(&mut self, iri: &str) -> Result<()> {
        self.w.string(iri)
    }

    fn write_enum(&mut self, iri: &str) -> Result<()> {
        self.w.string(iri)
    }

    fn write_null(&mut self) -> Result<()> {
        self.w.atom("null")
    }

    fn write_object(
        &mut self,
        id_key: &str,
        id: Option<&str>,
        types: &[String],
        body: &mut dyn FnMut(&mut dyn ObjectEncoder) -> Result<()>,
    ) -> Result<()> {
        self.w.begin_object()?;
        if let Some(id) = id {
            let key = if id_key.is_empty() { keys::ID } else { id_key };
            self.w.key(key)?;
            self.w.string(id)?;
        }
        match types {
            [] => {}
            [single] => {
                self.w.key(keys::TYPE)?;
                self.w.string(single)?;
            }
            many => {
                self.w.key(keys::TYPE)?;
                self.w.begin_array()?;
                for t in many {
                    self.w.string(t)?;
                }
                self.w.end_array()?;
            }
        }
        let mut members = JsonObjectEncoder { w: &mut *self.w };
        body(&mut members)?;
        self.w.end_object()
    }

    fn write_list(
        &mut self,
        body: &mut dyn FnMut(&mut dyn ListEncoder) -> Result<()>,
    ) -> Result<()> {
        self.w.begin_array()?;
        let mut items = JsonListEncoder { w: &mut *self.w };
        body(&mut items)?;
        self.w.end_array()
    }
}

/// `ObjectEncoder` for one object scope
pub struct JsonObjectEncoder<'w, W: Write> {
    w: &'w mut JsonWriter<W>,
}

impl<W: Write> ObjectEncoder for JsonObjectEncoder<'_, W> {
    fn encode_property(
        &mut self,
        name: &str,
        value: &mut dyn FnMut(&mut dyn ValueEncoder) -> Result<()>,
    ) -> Result<()> {
        self.w.key(name)?;
        let mut encoder = JsonValueEncoder { w: &mut *self.w };
        value(&mut encoder)
    }
}

/// `ListEncoder` for one array scope
pub struct JsonListEncoder<'w, W: Write> {
    w: &'w mut JsonWriter<W>,
}

impl<W: Write> ListEncoder for JsonListEncoder<'_, W> {
    fn encode_item(
        &mut self,
        value: &mut dyn FnMut(&mut dyn ValueEncoder) -> Result<()>,
    ) -> Result<()> {
        let mut encoder = JsonValueEncoder { w: &mut *self.w };
        value(&mut encoder)
    }
}
