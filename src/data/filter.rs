use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use log::debug;

use super::error::PipelineError;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Row filter: trailing window of calendar days
// ---------------------------------------------------------------------------

/// Keep only rows dated within the last `days` calendar days, anchored at the
/// latest date in the dataset.
///
/// The window is `[max - (days - 1), max]`, inclusive on both ends. Rows with
/// a null date fall outside every window. Surviving rows keep their relative
/// order. `days == 0` empties the dataset; a window reaching past the
/// earliest representable date keeps every dated row.
pub fn filter_last_n_days(dataset: &mut Dataset, days: u32) -> Result<(), PipelineError> {
    if !dataset.has_column(&dataset.date_column) {
        return Err(PipelineError::MissingColumn(dataset.date_column.clone()));
    }

    let date_col = dataset.date_column.clone();
    let latest = dataset
        .rows
        .iter()
        .filter_map(|row| row.get(&date_col).and_then(|v| v.as_date()))
        .max();

    let Some(latest) = latest else {
        dataset.rows.clear();
        return Ok(());
    };
    if days == 0 {
        dataset.rows.clear();
        return Ok(());
    }

    let first = latest
        .checked_sub_signed(Duration::days(i64::from(days) - 1))
        .unwrap_or(NaiveDate::MIN);
    let before = dataset.len();

    dataset.rows.retain(|row| {
        row.get(&date_col)
            .and_then(|v| v.as_date())
            .is_some_and(|d| d >= first && d <= latest)
    });

    debug!(
        "Day window {first}..={latest}: kept {} of {before} rows",
        dataset.len()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Column filter
// ---------------------------------------------------------------------------

/// Drop every column not named in `required`.
///
/// Names in `required` that the dataset does not have are ignored without
/// error.
pub fn select_columns(dataset: &mut Dataset, required: &BTreeSet<String>) {
    let dropped: BTreeSet<String> = dataset
        .column_names
        .iter()
        .filter(|c| !required.contains(*c))
        .cloned()
        .collect();

    if dropped.is_empty() {
        return;
    }

    dataset.column_names.retain(|c| !dropped.contains(c));
    for row in &mut dataset.rows {
        row.retain(|col, _| !dropped.contains(col));
    }
    debug!("Dropped columns: {dropped:?}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Row, Value};
    use chrono::NaiveDate;

    fn day(d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(2019, 1, d).unwrap())
    }

    fn dataset(dates: &[Value]) -> Dataset {
        let rows = dates
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let mut row = Row::new();
                row.insert("date".into(), d.clone());
                row.insert("price".into(), Value::Integer(i as i64));
                row.insert("volume".into(), Value::Float(0.5));
                row
            })
            .collect();
        Dataset::new(
            vec!["date".into(), "price".into(), "volume".into()],
            rows,
            "date",
            "%Y-%m-%d",
        )
    }

    #[test]
    fn keeps_exactly_n_trailing_days() {
        let mut ds = dataset(&[day(1), day(2), day(3), day(4), day(5)]);
        filter_last_n_days(&mut ds, 2).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0]["date"], day(4));
        assert_eq!(ds.rows[1]["date"], day(5));
    }

    #[test]
    fn window_is_anchored_at_max_not_last_row() {
        let mut ds = dataset(&[day(5), day(1), day(4), day(2)]);
        filter_last_n_days(&mut ds, 2).unwrap();

        // Order is preserved, only day 5 and day 4 survive.
        assert_eq!(ds.rows.len(), 2);
        assert_eq!(ds.rows[0]["date"], day(5));
        assert_eq!(ds.rows[1]["date"], day(4));
        assert_eq!(ds.rows[1]["price"], Value::Integer(2));
    }

    #[test]
    fn shorter_source_yields_fewer_rows() {
        let mut ds = dataset(&[day(1), day(2), day(3)]);
        filter_last_n_days(&mut ds, 365).unwrap();
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn window_beyond_calendar_range_keeps_all_dated_rows() {
        let mut ds = dataset(&[day(1), Value::Null, day(3)]);
        filter_last_n_days(&mut ds, u32::MAX).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn gaps_count_as_days() {
        let mut ds = dataset(&[day(1), day(2), day(10)]);
        filter_last_n_days(&mut ds, 3).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn null_dates_and_zero_window() {
        let mut ds = dataset(&[day(1), Value::Null, day(2)]);
        filter_last_n_days(&mut ds, 10).unwrap();
        assert_eq!(ds.len(), 2);

        filter_last_n_days(&mut ds, 0).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn filter_requires_date_column() {
        let mut ds = dataset(&[day(1)]);
        select_columns(&mut ds, &BTreeSet::from(["price".to_string()]));
        assert!(matches!(
            filter_last_n_days(&mut ds, 1),
            Err(PipelineError::MissingColumn(c)) if c == "date"
        ));
    }

    #[test]
    fn select_drops_unrequired_columns() {
        let mut ds = dataset(&[day(1), day(2)]);
        let required = BTreeSet::from(["date".to_string(), "price".to_string()]);
        select_columns(&mut ds, &required);

        assert_eq!(ds.column_names, vec!["date", "price"]);
        assert!(ds.rows.iter().all(|r| !r.contains_key("volume")));
    }

    #[test]
    fn select_ignores_required_columns_that_do_not_exist() {
        // Current contract: unknown names are silently skipped, no error.
        let mut ds = dataset(&[day(1)]);
        let required = BTreeSet::from([
            "date".to_string(),
            "price".to_string(),
            "exchangeVolume(USD)".to_string(),
        ]);
        select_columns(&mut ds, &required);

        assert_eq!(ds.column_names, vec!["date", "price"]);
        assert_eq!(ds.rows[0].len(), 2);
    }
}
