//! Typed tweak values
//!
//! Every tweak carries a default value whose kind decides what a front end
//! must send for it: a checkbox yields a boolean, a spin box an integer and a
//! text field a string.

use serde::{Deserialize, Serialize};

/// The kind of value a tweak accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Boolean,
    Integer,
    Text,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Text => "text",
        })
    }
}

/// A value selected for a tweak
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TweakValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl TweakValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            TweakValue::Bool(_) => ValueKind::Boolean,
            TweakValue::Integer(_) => ValueKind::Integer,
            TweakValue::Text(_) => ValueKind::Text,
        }
    }

    /// Whether the value counts as "on".
    ///
    /// `false`, `0` and blank text are off, everything else is on.
    pub fn is_truthy(&self) -> bool {
        match self {
            TweakValue::Bool(b) => *b,
            TweakValue::Integer(i) => *i != 0,
            TweakValue::Text(s) => !s.trim().is_empty(),
        }
    }

    /// Parses user input according to the kind the tweak expects
    ///
    /// # Arguments
    /// * `kind` - The kind the tweak's definition declares
    /// * `raw` - The text the user typed
    ///
    /// # Returns
    /// `None` if the text cannot be read as that kind
    pub fn parse_as(kind: ValueKind, raw: &str) -> Option<Self> {
        match kind {
            ValueKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(TweakValue::Bool(true)),
                "false" | "0" | "no" | "off" => Some(TweakValue::Bool(false)),
                _ => None,
            },
            ValueKind::Integer => raw.trim().parse().ok().map(TweakValue::Integer),
            ValueKind::Text => Some(TweakValue::Text(raw.to_string())),
        }
    }

    /// Reads a plist scalar, returning `None` for containers, data and dates
    pub fn from_plist(value: &plist::Value) -> Option<Self> {
        match value {
            plist::Value::Boolean(b) => Some(TweakValue::Bool(*b)),
            plist::Value::Integer(i) => i.as_signed().map(TweakValue::Integer),
            plist::Value::String(s) => Some(TweakValue::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<TweakValue> for plist::Value {
    fn from(value: TweakValue) -> Self {
        match value {
            TweakValue::Bool(b) => plist::Value::Boolean(b),
            TweakValue::Integer(i) => plist::Value::Integer(i.into()),
            TweakValue::Text(s) => plist::Value::String(s),
        }
    }
}

impl From<bool> for TweakValue {
    fn from(value: bool) -> Self {
        TweakValue::Bool(value)
    }
}

impl From<i64> for TweakValue {
    fn from(value: i64) -> Self {
        TweakValue::Integer(value)
    }
}

impl From<&str> for TweakValue {
    fn from(value: &str) -> Self {
        TweakValue::Text(value.to_string())
    }
}

impl From<String> for TweakValue {
    fn from(value: String) -> Self {
        TweakValue::Text(value)
    }
}

impl std::fmt::Display for TweakValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TweakValue::Bool(b) => write!(f, "{b}"),
            TweakValue::Integer(i) => write!(f, "{i}"),
            TweakValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_boolean_spellings() {
        for raw in ["true", "YES", " on ", "1"] {
            assert_eq!(
                TweakValue::parse_as(ValueKind::Boolean, raw),
                Some(TweakValue::Bool(true))
            );
        }
        assert_eq!(
            TweakValue::parse_as(ValueKind::Boolean, "off"),
            Some(TweakValue::Bool(false))
        );
        assert_eq!(TweakValue::parse_as(ValueKind::Boolean, "maybe"), None);
    }

    #[test]
    fn parse_integer_rejects_text() {
        assert_eq!(
            TweakValue::parse_as(ValueKind::Integer, "42"),
            Some(TweakValue::Integer(42))
        );
        assert_eq!(TweakValue::parse_as(ValueKind::Integer, "4.2"), None);
    }

    #[test]
    fn truthiness() {
        assert!(TweakValue::Bool(true).is_truthy());
        assert!(!TweakValue::Integer(0).is_truthy());
        assert!(!TweakValue::Text("  ".into()).is_truthy());
        assert!(TweakValue::Text("AT&T".into()).is_truthy());
    }

    #[test]
    fn plist_scalars_only() {
        assert_eq!(
            TweakValue::from_plist(&plist::Value::Integer(3.into())),
            Some(TweakValue::Integer(3))
        );
        assert_eq!(
            TweakValue::from_plist(&plist::Value::Array(Vec::new())),
            None
        );
    }
}
