use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Value – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Calendar day parsed from the designated date column.
    Date(NaiveDate),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            // Debug keeps the fractional part (`5.0`), so the cell reloads as a float.
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Null => Ok(()),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64` for arithmetic.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Infer the type of a raw CSV cell.
    pub fn infer(s: &str) -> Value {
        if s.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
        match s {
            "true" | "True" => Value::Bool(true),
            "false" | "False" => Value::Bool(false),
            _ => Value::String(s.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Row – one line of the source file
// ---------------------------------------------------------------------------

/// Column name → value for a single row.
pub type Row = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered table of rows sharing one column set.
///
/// Row position is the index: removing rows renumbers the remainder from zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Column names in header order (new columns are appended).
    pub column_names: Vec<String>,
    pub rows: Vec<Row>,
    /// Column holding a parsed [`Value::Date`] in every non-null cell.
    pub date_column: String,
    /// strftime pattern used to parse and re-emit the date column.
    pub date_format: String,
}

impl Dataset {
    pub fn new(
        column_names: Vec<String>,
        rows: Vec<Row>,
        date_column: impl Into<String>,
        date_format: impl Into<String>,
    ) -> Self {
        Dataset {
            column_names,
            rows,
            date_column: date_column.into(),
            date_format: date_format.into(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }

    /// All values of one column in row order, `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        if !self.has_column(name) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| row.get(name).unwrap_or(&Value::Null))
                .collect(),
        )
    }

    /// Render one cell for text output, honouring the dataset's date format.
    pub fn format_cell(&self, value: &Value) -> String {
        match value {
            Value::Date(d) => d.format(&self.date_format).to_string(),
            other => other.to_string(),
        }
    }
}
