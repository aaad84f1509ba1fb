//! Property constraint types and validators
//!
//! The constraint set is fixed when a property slot is constructed (the
//! schema compiler knows the bounds) and checked in two situations: value
//! constraints gate every assignment, count constraints are enforced when
//! the owning object is considered complete.

use crate::error::{BindError, Result};
use crate::prop::Datum;
use regex::Regex;

/// A constraint attached to a property slot
#[derive(Debug, Clone)]
pub enum Constraint {
    /// The slot must hold a value when the object is complete
    Required,
    /// Minimum number of list elements
    MinCount(usize),
    /// Maximum number of list elements
    MaxCount(usize),
    /// String (or dateTime lexical form) must match this pattern
    Pattern(Regex),
    /// Numeric value must be >= this floor
    MinInclusive(f64),
    /// Value must be one of these identifiers
    In(&'static [&'static str]),
    /// dateTime value must carry an explicit timezone offset
    TimezoneRequired,
}

impl Constraint {
    /// Compile a pattern constraint
    pub fn pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| BindError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Constraint::Pattern(regex))
    }

    /// Check a single value; `Some(message)` describes a violation
    ///
    /// Count constraints never match individual values and report nothing
    /// here; see [`Constraint::check_count`].
    pub fn check_value(&self, value: &Datum<'_>) -> Option<String> {
        match self {
            Constraint::Required | Constraint::MinCount(_) | Constraint::MaxCount(_) => None,
            Constraint::Pattern(regex) => check_pattern(regex, value),
            Constraint::MinInclusive(min) => check_min_inclusive(*min, value),
            Constraint::In(permitted) => check_in(permitted, value),
            Constraint::TimezoneRequired => check_timezone(value),
        }
    }

    /// Check the value count of a complete slot; `Some(message)` describes a
    /// violation
    pub fn check_count(&self, count: usize) -> Option<String> {
        match self {
            Constraint::Required if count == 0 => {
                Some("required property is unset".to_string())
            }
            Constraint::MinCount(min) if count < *min => Some(format!(
                "expected at least {} value(s) but found {}",
                min, count
            )),
            Constraint::MaxCount(max) if count > *max => Some(format!(
                "expected at most {} value(s) but found {}",
                max, count
            )),
            _ => None,
        }
    }
}

fn check_pattern(regex: &Regex, value: &Datum<'_>) -> Option<String> {
    let text = match value {
        Datum::Str(s) => *s,
        Datum::DateTime(dt) => dt.original(),
        _ => return Some("pattern constraint requires a string value".to_string()),
    };

    if regex.is_match(text) {
        None
    } else {
        Some(format!(
            "value '{}' does not match pattern '{}'",
            text,
            regex.as_str()
        ))
    }
}

fn check_min_inclusive(min: f64, value: &Datum<'_>) -> Option<String> {
    let number = match value {
        Datum::Int(i) => *i as f64,
        Datum::Float(f) => *f,
        _ => return Some("range constraint requires a numeric value".to_string()),
    };

    if number < min {
        Some(format!("value {} is below minimum {}", number, min))
    } else {
        None
    }
}

fn check_in(permitted: &[&str], value: &Datum<'_>) -> Option<String> {
    let id = match value {
        Datum::Str(s) => *s,
        _ => return Some("enum constraint requires an identifier value".to_string()),
    };

    if permitted.contains(&id) {
        None
    } else {
        Some(format!("'{}' is not a permitted value", id))
    }
}

fn check_timezone(value: &Datum<'_>) -> Option<String> {
    match value {
        Datum::DateTime(dt) if dt.has_timezone() => None,
        Datum::DateTime(dt) => Some(format!(
            "dateTime '{}' is missing a required timezone offset",
            dt.original()
        )),
        _ => Some("timezone constraint requires a dateTime value".to_string()),
    }
}
