use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::PipelineError;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Requests and records
// ---------------------------------------------------------------------------

/// A column to summarise, with an optional divisor (e.g. `1e9` for billions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRequest {
    pub column: String,
    #[serde(default)]
    pub normalizer: Option<f64>,
}

impl StatRequest {
    pub fn new(column: impl Into<String>, normalizer: Option<f64>) -> Self {
        StatRequest {
            column: column.into(),
            normalizer,
        }
    }
}

/// Min / max / mean of one column, each already divided and formatted to
/// two decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
    pub column: String,
    pub min: String,
    pub max: String,
    pub mean: String,
}

/// Summarise one column. Null cells are skipped; a column without numbers
/// yields `NaN` in all three fields.
pub fn aggregate(
    dataset: &Dataset,
    column: &str,
    normalizer: Option<f64>,
) -> Result<StatRecord, PipelineError> {
    let values = numeric_values(dataset, column)?;
    let divisor = normalizer.unwrap_or(1.0);

    let (min, max, mean) = if values.is_empty() {
        (f64::NAN, f64::NAN, f64::NAN)
    } else {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        (min, max, mean)
    };

    Ok(StatRecord {
        column: column.to_string(),
        min: format!("{:.2}", min / divisor),
        max: format!("{:.2}", max / divisor),
        mean: format!("{:.2}", mean / divisor),
    })
}

/// Sum of the non-null cells of a numeric column.
pub fn column_sum(dataset: &Dataset, column: &str) -> Result<f64, PipelineError> {
    Ok(numeric_values(dataset, column)?.iter().sum())
}

fn numeric_values(dataset: &Dataset, column: &str) -> Result<Vec<f64>, PipelineError> {
    let cells = dataset
        .column(column)
        .ok_or_else(|| PipelineError::MissingColumn(column.to_string()))?;

    cells
        .into_iter()
        .enumerate()
        .filter(|(_, v)| !v.is_null())
        .map(|(row, v)| {
            v.as_f64().ok_or_else(|| PipelineError::NotNumeric {
                column: column.to_string(),
                row,
                value: v.to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// StatTable – ordered summary for the run
// ---------------------------------------------------------------------------

/// Stat records in the order they were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatTable {
    records: Vec<StatRecord>,
}

impl StatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate every request against the same dataset, in order.
    pub fn build(dataset: &Dataset, requests: &[StatRequest]) -> Result<Self, PipelineError> {
        let mut table = StatTable::new();
        for req in requests {
            table.push(dataset, &req.column, req.normalizer)?;
        }
        Ok(table)
    }

    /// Append one more record. Repeating a column adds a second row.
    pub fn push(
        &mut self,
        dataset: &Dataset,
        column: &str,
        normalizer: Option<f64>,
    ) -> Result<&StatRecord, PipelineError> {
        let record = aggregate(dataset, column, normalizer)?;
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    pub fn records(&self) -> &[StatRecord] {
        &self.records
    }

    pub fn get(&self, column: &str) -> Option<&StatRecord> {
        self.records.iter().find(|r| r.column == column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Display for StatTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attr_w = self
            .records
            .iter()
            .map(|r| r.column.len())
            .chain(std::iter::once("attr".len()))
            .max()
            .unwrap_or(4);
        let num_w = self
            .records
            .iter()
            .flat_map(|r| [r.min.len(), r.max.len(), r.mean.len()])
            .chain(std::iter::once("average".len()))
            .max()
            .unwrap_or(7);

        writeln!(
            f,
            "{:<attr_w$}  {:>num_w$}  {:>num_w$}  {:>num_w$}",
            "attr", "min", "max", "average"
        )?;
        for r in &self.records {
            writeln!(
                f,
                "{:<attr_w$}  {:>num_w$}  {:>num_w$}  {:>num_w$}",
                r.column, r.min, r.max, r.mean
            )?;
        }
        Ok(())
    }
}
