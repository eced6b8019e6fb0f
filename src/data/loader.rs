use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info};

use super::error::LoadError;
use super::model::{Dataset, Row, Value};

// ---------------------------------------------------------------------------
// Supported formats
// ---------------------------------------------------------------------------

/// Input formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-delimited text with a header row.
    Csv,
    /// Excel workbook. Recognised but not readable yet.
    Xlsx,
}

impl FileFormat {
    /// Resolve the format from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            _ => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: ext,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// `date_column` is parsed with `date_format` (strftime syntax, e.g.
/// `%Y-%m-%d`); every other cell gets its type inferred.
pub fn load(path: &Path, date_column: &str, date_format: &str) -> Result<Dataset, LoadError> {
    let format = FileFormat::from_path(path)?;
    debug!("Loading {} as {format:?}", path.display());

    let dataset = match format {
        FileFormat::Csv => load_csv(path, date_column, date_format)?,
        FileFormat::Xlsx => return Err(LoadError::NotImplemented(FileFormat::Xlsx)),
    };

    info!(
        "Loaded {} rows × {} columns from {}",
        dataset.len(),
        dataset.column_names.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path, date_column: &str, date_format: &str) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let date_idx = headers
        .iter()
        .position(|h| h == date_column)
        .ok_or_else(|| LoadError::MissingDateColumn(date_column.to_string()))?;

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;

        let mut row = Row::new();
        for (col_idx, raw) in record.iter().enumerate() {
            let Some(col_name) = headers.get(col_idx) else {
                continue;
            };
            let value = if col_idx == date_idx {
                parse_date(raw, date_format, row_no)?
            } else {
                Value::infer(raw)
            };
            row.insert(col_name.clone(), value);
        }

        rows.push(row);
    }

    Ok(Dataset::new(headers, rows, date_column, date_format))
}

fn parse_date(raw: &str, format: &str, row: usize) -> Result<Value, LoadError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    NaiveDate::parse_from_str(raw, format)
        .map(Value::Date)
        .map_err(|_| LoadError::Date {
            row,
            value: raw.to_string(),
            format: format.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("btc.csv")).unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("BTC.CSV")).unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("file.xlsx")).unwrap(), FileFormat::Xlsx);
        assert!(matches!(
            FileFormat::from_path(Path::new("noext")),
            Err(LoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn csv_parses_dates_and_infers_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "btc.csv",
            "date,price(USD),generatedCoins,note\n2019-01-01,3800.5,1800,\n2019-01-02,3900,1750,halving\n",
        );

        let ds = load(&path, "date", "%Y-%m-%d").unwrap();
        assert_eq!(ds.column_names, vec!["date", "price(USD)", "generatedCoins", "note"]);
        assert_eq!(ds.len(), 2);

        let first = &ds.rows[0];
        assert_eq!(
            first["date"],
            Value::Date(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap())
        );
        assert_eq!(first["price(USD)"], Value::Float(3800.5));
        assert_eq!(first["generatedCoins"], Value::Integer(1800));
        assert_eq!(first["note"], Value::Null);
        assert_eq!(ds.rows[1]["note"], Value::String("halving".into()));
    }

    #[test]
    fn custom_date_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "eu.csv", "day,v\n31.12.2018,1\n");

        let ds = load(&path, "day", "%d.%m.%Y").unwrap();
        assert_eq!(
            ds.rows[0]["day"].as_date(),
            NaiveDate::from_ymd_opt(2018, 12, 31)
        );
        assert_eq!(ds.date_format, "%d.%m.%Y");
    }

    #[test]
    fn bad_date_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.csv", "date,v\n2019-01-01,1\nyesterday,2\n");

        match load(&path, "date", "%Y-%m-%d") {
            Err(LoadError::Date { row, value, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected date error, got {other:?}"),
        }
    }

    #[test]
    fn missing_date_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "nodate.csv", "day,v\n2019-01-01,1\n");

        assert!(matches!(
            load(&path, "date", "%Y-%m-%d"),
            Err(LoadError::MissingDateColumn(c)) if c == "date"
        ));
    }

    #[test]
    fn xlsx_reader_is_a_stub() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "file.xlsx", "");

        assert!(matches!(
            load(&path, "date", "%Y-%m-%d"),
            Err(LoadError::NotImplemented(FileFormat::Xlsx))
        ));
    }

    #[test]
    fn json_extension_is_rejected_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "btc.json", "[]");

        match load(&path, "date", "%Y-%m-%d") {
            Err(LoadError::UnsupportedFormat { extension, .. }) => assert_eq!(extension, "json"),
            other => panic!("expected unsupported format, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load(Path::new("/definitely/not/here.csv"), "date", "%Y-%m-%d").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("here.csv"));
    }
}
