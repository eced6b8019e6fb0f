use std::path::Path;

use log::info;

use super::error::PipelineError;
use super::model::{Dataset, Value};

/// Write the dataset as comma-delimited text: header row, no index column.
///
/// Dates are written with the dataset's own format so the file loads back
/// with the same settings. Missing parent directories are created.
pub fn export(dataset: &Dataset, path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&dataset.column_names)?;

    for row in &dataset.rows {
        let record = dataset.column_names.iter().map(|col| {
            let value = row.get(col).unwrap_or(&Value::Null);
            dataset.format_cell(value)
        });
        writer.write_record(record)?;
    }
    writer.flush().map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Exported {} rows to {}", dataset.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;
    use crate::data::model::Row;
    use chrono::NaiveDate;

    fn sample(date_format: &str) -> Dataset {
        let rows = (1..=3)
            .map(|d| {
                let mut row = Row::new();
                row.insert(
                    "date".into(),
                    Value::Date(NaiveDate::from_ymd_opt(2019, 2, d).unwrap()),
                );
                row.insert("price(USD)".into(), Value::Float(3500.5 + f64::from(d)));
                row.insert("price(EUR)".into(), Value::Float(3045.0));
                row.insert("paymentCount".into(), Value::Integer(i64::from(d) * 1000));
                row.insert("note".into(), if d == 2 { Value::Null } else { Value::String("a, b".into()) });
                row
            })
            .collect();
        Dataset::new(
            vec![
                "date".into(),
                "price(USD)".into(),
                "price(EUR)".into(),
                "paymentCount".into(),
                "note".into(),
            ],
            rows,
            "date",
            date_format,
        )
    }

    #[test]
    fn export_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("btc-last-year.csv");
        let ds = sample("%Y-%m-%d");

        export(&ds, &path).unwrap();
        let back = load(&path, "date", "%Y-%m-%d").unwrap();

        assert_eq!(back, ds);
    }

    #[test]
    fn header_first_and_no_index_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.csv");
        export(&sample("%d/%m/%Y"), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,price(USD),price(EUR),paymentCount,note"
        );
        assert_eq!(lines.next().unwrap(), "01/02/2019,3501.5,3045.0,1000,\"a, b\"");
        assert_eq!(lines.next().unwrap(), "02/02/2019,3502.5,3045.0,2000,");
    }
}
