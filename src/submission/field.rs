//! Tagged field values classified at the parse boundary.

use serde_json::{Map, Value};
use std::borrow::Cow;

/// A single document value, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Key not present in the mapping
    Absent,
    /// Key present with an explicit null
    Null,
    Text(String),
    List(Vec<Value>),
    Mapping(Map<String, Value>),
    /// Numbers and booleans
    Other(Value),
}

impl Field {
    pub fn classify(value: Option<&Value>) -> Self {
        match value {
            None => Field::Absent,
            Some(Value::Null) => Field::Null,
            Some(Value::String(s)) => Field::Text(s.clone()),
            Some(Value::Array(items)) => Field::List(items.clone()),
            Some(Value::Object(map)) => Field::Mapping(map.clone()),
            Some(other) => Field::Other(other.clone()),
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Field::Absent)
    }

    /// Null, or a string made only of whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Field::Null => true,
            Field::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Present with a value that carries content: non-blank text, a
    /// non-empty collection, a non-zero number or `true`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Field::Absent | Field::Null => false,
            Field::Text(s) => !s.is_empty(),
            Field::List(items) => !items.is_empty(),
            Field::Mapping(map) => !map.is_empty(),
            Field::Other(Value::Bool(b)) => *b,
            Field::Other(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            Field::Other(_) => true,
        }
    }

    /// Text rendering of scalar values. Numbers and booleans render the way
    /// they were written; collections and missing values have no text.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Field::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Field::Other(Value::Number(n)) => Some(Cow::Owned(n.to_string())),
            Field::Other(Value::Bool(b)) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    /// Short name of the value's shape for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Field::Absent => "missing",
            Field::Null => "null",
            Field::Text(_) => "string",
            Field::List(_) => "list",
            Field::Mapping(_) => "mapping",
            Field::Other(Value::Bool(_)) => "boolean",
            Field::Other(_) => "number",
        }
    }
}

/// An optional list whose items are classified individually.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Absent,
    /// Present but not a list; holds what was found instead
    NotAList(Field),
    Items(Vec<T>),
}

impl<T> Listing<T> {
    pub fn classify(value: Option<&Value>, item: impl Fn(&Value) -> T) -> Self {
        match value {
            None => Listing::Absent,
            Some(Value::Array(items)) => Listing::Items(items.iter().map(item).collect()),
            Some(other) => Listing::NotAList(Field::classify(Some(other))),
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Listing::Absent)
    }
}

/// One element of the `claims` list.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimEntry {
    Claim(Claim),
    NotAMapping,
}

/// A reproducible claim with its reproduction steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub claim: Field,
    pub context: Field,
    pub instruction: Listing<Field>,
}

impl Claim {
    pub(crate) fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            claim: Field::classify(map.get("claim")),
            context: Field::classify(map.get("context")),
            instruction: Listing::classify(map.get("instruction"), |step| {
                Field::classify(Some(step))
            }),
        }
    }
}

/// One element of the `non_reproducible_claims` list.
#[derive(Debug, Clone, PartialEq)]
pub enum NonReproducibleEntry {
    Claim(NonReproducibleClaim),
    NotAMapping,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NonReproducibleClaim {
    pub claim: Field,
    pub reason: Field,
}

impl NonReproducibleClaim {
    pub(crate) fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            claim: Field::classify(map.get("claim")),
            reason: Field::classify(map.get("reason")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_detection() {
        assert!(Field::Null.is_blank());
        assert!(Field::Text("  \t".to_string()).is_blank());
        assert!(!Field::Text("x".to_string()).is_blank());
        assert!(!Field::Absent.is_blank());
        assert!(!Field::List(vec![]).is_blank());
    }

    #[test]
    fn test_truthiness() {
        assert!(!Field::Absent.is_truthy());
        assert!(!Field::Null.is_truthy());
        assert!(!Field::Text(String::new()).is_truthy());
        assert!(Field::Text(" ".to_string()).is_truthy());
        assert!(!Field::Other(json!(0)).is_truthy());
        assert!(Field::Other(json!(3)).is_truthy());
        assert!(!Field::Other(json!(false)).is_truthy());
        assert!(!Field::List(vec![]).is_truthy());
    }

    #[test]
    fn test_as_text_renders_scalars() {
        assert_eq!(Field::Other(json!(2104)).as_text().as_deref(), Some("2104"));
        assert_eq!(Field::Other(json!(true)).as_text().as_deref(), Some("true"));
        assert_eq!(Field::Text("a".into()).as_text().as_deref(), Some("a"));
        assert!(Field::List(vec![]).as_text().is_none());
        assert!(Field::Null.as_text().is_none());
    }

    #[test]
    fn test_claim_from_map() {
        let value = json!({"claim": "X", "instruction": ["a", 3, null]});
        let claim = Claim::from_map(value.as_object().unwrap());
        assert_eq!(claim.claim, Field::Text("X".into()));
        assert_eq!(claim.context, Field::Absent);
        assert_eq!(
            claim.instruction,
            Listing::Items(vec![
                Field::Text("a".into()),
                Field::Other(json!(3)),
                Field::Null
            ])
        );
    }
}
