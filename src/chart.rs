use std::io::Write;
use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::errors::SimdbenchError;
use crate::persist;
use crate::types::BenchmarkRow;

/// Default location of the rendered charts, relative to the working directory.
pub const DEFAULT_CHART: &str = "./results/benchmark.svg";

/// Width and height of the whole image; each pane takes half the width.
pub const CHART_SIZE: (u32, u32) = (1280, 540);

pub const TIMING_LABELS: [&str; 4] = [
    "Naive",
    "Vectorized",
    "Multi-threaded",
    "Multi-threaded +Vectorized",
];

pub const GAIN_LABELS: [&str; 4] = [
    "Perf. vect.",
    "Perf. vect. bis",
    "Perf. MT",
    "Perf. Vect.+ MT",
];

const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

struct Pane {
    title: &'static str,
    y_desc: &'static str,
    labels: [&'static str; 4],
}

const TIMING_PANE: Pane = Pane {
    title: "Computation time",
    y_desc: "t (µs)",
    labels: TIMING_LABELS,
};

const GAIN_PANE: Pane = Pane {
    title: "Performance gain obtained with SIMD and multi-threading",
    y_desc: "Performance Gain",
    labels: GAIN_LABELS,
};

type Series = [Vec<(f64, f64)>; 4];

/// Axis range used when a pane has nothing to plot.
const EMPTY_BOUNDS: (f64, f64) = (1.0, 10.0);

/// Render the timing and gain charts side by side as an SVG at `path`.
///
/// Both panes are log-log with `sizes` on the x axis. Points that cannot sit
/// on a log axis (zero, negative, NaN) are left out of their series; a pane
/// left with no points is drawn empty. The image is rendered in memory and
/// `path` is only replaced once rendering succeeded.
pub fn render_charts(sizes: &[u64], table: &[BenchmarkRow], path: &Path) -> Result<()> {
    let render_err = |detail: String| SimdbenchError::ChartRender {
        path: path.to_path_buf(),
        detail,
    };

    if sizes.len() != table.len() {
        return Err(render_err(format!(
            "{} sizes but {} result rows",
            sizes.len(),
            table.len()
        ))
        .into());
    }

    let svg = render_svg(sizes, table).map_err(render_err)?;
    persist::replace_file(path, |file| file.write_all(svg.as_bytes()))
        .map_err(|e| render_err(e.to_string()))?;

    tracing::debug!(path = %path.display(), points = sizes.len(), "charts rendered");
    Ok(())
}

/// Open the rendered charts in the platform's default viewer.
///
/// The file is already saved, so a missing viewer only costs a warning.
pub fn show_charts(path: &Path) {
    match opener::open(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "charts opened in viewer"),
        Err(err) => tracing::warn!(path = %path.display(), error = %err, "could not open charts"),
    }
}

fn render_svg(sizes: &[u64], table: &[BenchmarkRow]) -> std::result::Result<String, String> {
    let timings = collect_series(sizes, table, |row| row.timings().map(|t| t as f64));
    let gains = collect_series(sizes, table, |row| row.gains());
    let x_bounds = log_bounds(sizes.iter().map(|&n| n as f64).filter(|&x| plottable(x)));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let (left, right) = root.split_horizontally((CHART_SIZE.0 / 2) as i32);
        draw_pane(&left, &TIMING_PANE, SeriesLabelPosition::UpperLeft, x_bounds, &timings)?;
        draw_pane(&right, &GAIN_PANE, SeriesLabelPosition::LowerRight, x_bounds, &gains)?;

        root.present().map_err(|e| e.to_string())?;
    }
    Ok(svg)
}

fn collect_series<F>(sizes: &[u64], table: &[BenchmarkRow], values: F) -> Series
where
    F: Fn(&BenchmarkRow) -> [f64; 4],
{
    let mut series: Series = Default::default();
    for (&size, row) in sizes.iter().zip(table) {
        let x = size as f64;
        for (points, y) in series.iter_mut().zip(values(row)) {
            if plottable(x) && plottable(y) {
                points.push((x, y));
            }
        }
    }
    series
}

fn plottable(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Log-axis range covering every value, widened when all values coincide.
fn log_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    if lo == hi {
        Some((lo / 2.0, hi * 2.0))
    } else {
        Some((lo, hi))
    }
}

fn draw_pane<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    pane: &Pane,
    legend: SeriesLabelPosition,
    x_bounds: Option<(f64, f64)>,
    series: &Series,
) -> std::result::Result<(), String> {
    let y_bounds = log_bounds(series.iter().flatten().map(|&(_, y)| y));
    if y_bounds.is_none() {
        tracing::warn!(pane = pane.title, "no positive values to plot, drawing an empty pane");
    }
    let (x_lo, x_hi) = x_bounds.unwrap_or(EMPTY_BOUNDS);
    let (y_lo, y_hi) = y_bounds.unwrap_or(EMPTY_BOUNDS);

    let mut chart = ChartBuilder::on(area)
        .caption(pane.title, ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(64)
        .build_cartesian_2d((x_lo..x_hi).log_scale(), (y_lo..y_hi).log_scale())
        .map_err(|e| e.to_string())?;

    chart
        .configure_mesh()
        .x_desc("n")
        .y_desc(pane.y_desc)
        .draw()
        .map_err(|e| e.to_string())?;

    for ((points, label), color) in series.iter().zip(pane.labels).zip(SERIES_COLORS) {
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(|e| e.to_string())?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(legend)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| e.to_string())?;

    Ok(())
}
