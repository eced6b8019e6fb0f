use std::path::Path;

use chrono::NaiveDate;
use image::{Rgb, RgbImage};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

/// One-series line chart: X = the dataset's date column, Y = `column`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSpec {
    pub column: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSpec {
    fn default() -> Self {
        ChartSpec {
            column: "price(EUR)".into(),
            title: "Price of BTC in the last 365 days, in EUR".into(),
            x_label: "Day".into(),
            y_label: "Price of BTC".into(),
            width: 960,
            height: 540,
        }
    }
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("creating {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encoding image: {0}")]
    Image(#[from] image::ImageError),
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);
const SERIES: Rgb<u8> = Rgb([0, 128, 0]);

const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 40;
const MARGIN_BOTTOM: u32 = 40;
const Y_TICKS: u32 = 5;

/// Render the chart to `path` (format picked by extension, normally `.png`).
///
/// Points are plotted in date order; rows with a null date or value are
/// skipped. With no points left only the grid and axes are drawn. Title and
/// axis labels are logged but not drawn.
pub fn render_line_chart(dataset: &Dataset, chart: &ChartSpec, path: &Path) -> Result<(), ChartError> {
    let points = series(dataset, &chart.column)?;

    let width = chart.width.max(MARGIN_LEFT + MARGIN_RIGHT + 2);
    let height = chart.height.max(MARGIN_TOP + MARGIN_BOTTOM + 2);
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

    let plot = PlotArea {
        left: MARGIN_LEFT as f64,
        right: (width - MARGIN_RIGHT) as f64,
        top: MARGIN_TOP as f64,
        bottom: (height - MARGIN_BOTTOM) as f64,
    };

    // Grid + axes
    for i in 0..=Y_TICKS {
        let y = plot.bottom - (plot.bottom - plot.top) * f64::from(i) / f64::from(Y_TICKS);
        draw_line(&mut img, (plot.left, y), (plot.right, y), GRID);
    }
    draw_line(&mut img, (plot.left, plot.top), (plot.left, plot.bottom), AXIS);
    draw_line(&mut img, (plot.left, plot.bottom), (plot.right, plot.bottom), AXIS);

    if !points.is_empty() {
        draw_series(&mut img, &plot, &points);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ChartError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    img.save(path)?;

    info!(
        "Saved chart \"{}\" ({} vs {}, {} points) to {}",
        chart.title,
        chart.y_label,
        chart.x_label,
        points.len(),
        path.display()
    );
    Ok(())
}

struct PlotArea {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

/// Plot non-empty, date-sorted `points` as a 2px polyline.
fn draw_series(img: &mut RgbImage, plot: &PlotArea, points: &[(NaiveDate, f64)]) {
    let first_day = points[0].0;
    let span_days = (points[points.len() - 1].0 - first_day).num_days() as f64;
    let (y_min, y_max) = y_range(points);

    let to_px = |(day, value): (NaiveDate, f64)| -> (f64, f64) {
        let fx = if span_days > 0.0 {
            (day - first_day).num_days() as f64 / span_days
        } else {
            0.5
        };
        let fy = (value - y_min) / (y_max - y_min);
        (
            plot.left + fx * (plot.right - plot.left),
            plot.bottom - fy * (plot.bottom - plot.top),
        )
    };

    let pixels: Vec<(f64, f64)> = points.iter().copied().map(to_px).collect();
    if pixels.len() == 1 {
        let (x, y) = pixels[0];
        draw_line(img, (x - 2.0, y), (x + 2.0, y), SERIES);
        draw_line(img, (x, y - 2.0), (x, y + 2.0), SERIES);
    }
    for pair in pixels.windows(2) {
        // Two passes one pixel apart for a 2px stroke.
        draw_line(img, pair[0], pair[1], SERIES);
        draw_line(img, (pair[0].0, pair[0].1 - 1.0), (pair[1].0, pair[1].1 - 1.0), SERIES);
    }
}

fn series(dataset: &Dataset, column: &str) -> Result<Vec<(NaiveDate, f64)>, ChartError> {
    if !dataset.has_column(column) {
        return Err(ChartError::MissingColumn(column.to_string()));
    }
    if !dataset.has_column(&dataset.date_column) {
        return Err(ChartError::MissingColumn(dataset.date_column.clone()));
    }

    let mut points: Vec<(NaiveDate, f64)> = dataset
        .rows
        .iter()
        .filter_map(|row| {
            let day = row.get(&dataset.date_column)?.as_date()?;
            let value = row.get(column)?.as_f64()?;
            value.is_finite().then_some((day, value))
        })
        .collect();

    points.sort_by_key(|(day, _)| *day);
    Ok(points)
}

/// Value range padded by 5 %, widened to ±1 around a flat series.
fn y_range(points: &[(NaiveDate, f64)]) -> (f64, f64) {
    let min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if max - min < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// Bresenham line, clipped to the image bounds.
fn draw_line(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && y0 >= 0 && (x0 as u32) < img.width() && (y0 as u32) < img.height() {
            img.put_pixel(x0 as u32, y0 as u32, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
