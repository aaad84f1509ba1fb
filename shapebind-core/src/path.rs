//! Property paths for diagnostics
//!
//! A `PropertyPath` records where in the object graph a report originated:
//! object identities, property names, and list indices, rendered as
//! `.creationInfo.createdBy[2].name`.

use std::fmt;

/// Location of a value within the object graph
///
/// Paths are cheap to extend; each `push` clones the segment list so a
/// caller can keep extending its own path while handing out children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// Create an empty (document root) path
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path rooted at an object identity
    pub fn root(id: impl Into<String>) -> Self {
        Self {
            segments: vec![id.into()],
        }
    }

    /// Extend with a property name segment
    pub fn push(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Extend with a list index segment, rendered as `[idx]`
    pub fn push_index(&self, idx: usize) -> Self {
        self.push(format!("[{}]", idx))
    }

    /// True when the path has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, ".");
        }
        for segment in &self.segments {
            if segment.starts_with('[') {
                write!(f, "{}", segment)?;
            } else {
                write!(f, ".{}", segment)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let path = PropertyPath::new().push("creationInfo").push("createdBy");
        assert_eq!(path.to_string(), ".creationInfo.createdBy");

        let indexed = path.push_index(2).push("name");
        assert_eq!(indexed.to_string(), ".creationInfo.createdBy[2].name");
    }

    #[test]
    fn test_empty_path() {
        let path = PropertyPath::new();
        assert!(path.is_empty());
        assert_eq!(path.to_string(), ".");
    }

    #[test]
    fn test_push_does_not_mutate_parent() {
        let parent = PropertyPath::new().push("a");
        let _child = parent.push("b");
        assert_eq!(parent.to_string(), ".a");
    }
}
