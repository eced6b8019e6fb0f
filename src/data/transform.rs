use log::debug;
use serde::{Deserialize, Serialize};

use super::error::PipelineError;
use super::model::{Dataset, Value};

/// Derive `target` from `source` by scaling with the run's exchange rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRule {
    pub target: String,
    pub source: String,
}

impl ConversionRule {
    pub fn new(target: impl Into<String>, source: impl Into<String>) -> Self {
        ConversionRule {
            target: target.into(),
            source: source.into(),
        }
    }
}

/// Apply each rule in order: `target = source * rate`, row by row.
///
/// An existing target column is overwritten in place; a new one is appended
/// to the column order. Null cells stay null.
pub fn convert(
    dataset: &mut Dataset,
    rules: &[ConversionRule],
    rate: f64,
) -> Result<(), PipelineError> {
    for rule in rules {
        if !dataset.has_column(&rule.source) {
            return Err(PipelineError::MissingColumn(rule.source.clone()));
        }

        let converted = dataset
            .rows
            .iter()
            .enumerate()
            .map(|(row_no, row)| match row.get(&rule.source).unwrap_or(&Value::Null) {
                Value::Null => Ok(Value::Null),
                v => v.as_f64().map(|x| Value::Float(x * rate)).ok_or_else(|| {
                    PipelineError::NotNumeric {
                        column: rule.source.clone(),
                        row: row_no,
                        value: v.to_string(),
                    }
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (row, value) in dataset.rows.iter_mut().zip(converted) {
            row.insert(rule.target.clone(), value);
        }
        if !dataset.has_column(&rule.target) {
            dataset.column_names.push(rule.target.clone());
        }
        debug!("{} = {} × {rate}", rule.target, rule.source);
    }
    Ok(())
}
