use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::RateError;

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Index(usize),
    Key(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "[{i}]"),
            Segment::Key(k) => write!(f, "'{k}'"),
        }
    }
}

/// A fixed route to a nested value, e.g. `["rates", "EUR"]`.
///
/// Serialises as a plain JSON array of strings (object keys) and
/// non-negative integers (array indices).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyPath(pub Vec<Segment>);

impl KeyPath {
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyPath(keys.into_iter().map(|k| Segment::Key(k.into())).collect())
    }

    /// Follow the path from `root`, failing at the first absent segment.
    pub fn walk<'a>(&self, root: &'a JsonValue) -> Result<&'a JsonValue, RateError> {
        self.0.iter().try_fold(root, |node, segment| {
            let next = match segment {
                Segment::Key(k) => node.as_object().and_then(|o| o.get(k)),
                Segment::Index(i) => node.as_array().and_then(|a| a.get(*i)),
            };
            next.ok_or_else(|| RateError::MissingKey {
                path: self.to_string(),
                segment: segment.to_string(),
            })
        })
    }

    /// Walk to the target and render it as text: numbers and booleans
    /// verbatim, strings without quotes.
    pub fn scalar_text(&self, root: &JsonValue) -> Result<String, RateError> {
        match self.walk(root)? {
            JsonValue::Number(n) => Ok(n.to_string()),
            JsonValue::String(s) => Ok(s.clone()),
            JsonValue::Bool(b) => Ok(b.to_string()),
            _ => Err(RateError::NotScalar(self.to_string())),
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(k) if i == 0 => write!(f, "{k}")?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}
