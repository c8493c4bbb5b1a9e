use std::path::Path;

use owo_colors::{OwoColorize, Stream, Style};
use serde::Serialize;

use crate::errors::SimdbenchError;
use crate::run::Progress;
use crate::types::BenchmarkRow;

const SUMMARY_HEADERS: [&str; 9] = [
    "n",
    "naive",
    "vect",
    "mt",
    "mt+vect",
    "perf vect",
    "perf vect bis",
    "perf mt",
    "perf vect+mt",
];

// Style constants
fn style_size() -> Style {
    Style::new().cyan().bold()
}

fn style_banner() -> Style {
    Style::new().red().bold()
}

/// "Running ./simdbmk with n=1000"
pub fn format_step_start(binary: &Path, size: u64) -> String {
    let size_str = size.to_string();
    format!(
        "Running {} with n={}",
        binary.display(),
        size_str.if_supports_color(Stream::Stderr, |s| s.style(style_size()))
    )
}

/// "./simdbmk ran successfully with n=1000"
pub fn format_step_success(binary: &Path, size: u64) -> String {
    let line = format!("{} ran successfully with n={}", binary.display(), size);
    line.if_supports_color(Stream::Stderr, |s| s.green())
        .to_string()
}

/// Failure report for one step. Execution failures get the full captured
/// stdout and stderr. Any other error is only named here; its message is
/// printed once by the caller that reports the final error.
pub fn format_step_failure(binary: &Path, size: u64, err: &anyhow::Error) -> String {
    let mut out = String::new();

    match err.downcast_ref::<SimdbenchError>() {
        Some(SimdbenchError::BenchmarkExecution {
            status,
            stdout,
            stderr,
            ..
        }) => {
            let headline = format!(
                "Ooops, {} for n={} exited with {}",
                binary.display(),
                size,
                status
            );
            out.push_str(
                &headline
                    .if_supports_color(Stream::Stderr, |s| s.style(style_banner()))
                    .to_string(),
            );
            out.push('\n');
            push_section(&mut out, "STDOUT", stdout);
            push_section(&mut out, "STDERR", stderr);
        }
        _ => {
            let headline = format!("{} failed for n={}", binary.display(), size);
            out.push_str(
                &headline
                    .if_supports_color(Stream::Stderr, |s| s.style(style_banner()))
                    .to_string(),
            );
            out.push('\n');
        }
    }

    out
}

fn push_section(out: &mut String, name: &str, body: &str) {
    let rule = format!("------------- {} ------------", name);
    out.push_str(
        &rule
            .if_supports_color(Stream::Stderr, |s| s.dimmed())
            .to_string(),
    );
    out.push('\n');
    out.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }
}

pub fn print_step_start(binary: &Path, size: u64) {
    eprintln!("{}", format_step_start(binary, size));
}

pub fn print_step_success(binary: &Path, size: u64) {
    eprintln!("{}", format_step_success(binary, size));
}

pub fn print_step_failure(binary: &Path, size: u64, err: &anyhow::Error) {
    eprint!("{}", format_step_failure(binary, size, err));
}

/// Reports run progress on stderr.
pub struct StderrProgress;

impl Progress for StderrProgress {
    fn step_started(&mut self, binary: &Path, size: u64) {
        print_step_start(binary, size);
    }

    fn step_succeeded(&mut self, binary: &Path, size: u64, _row: &BenchmarkRow) {
        print_step_success(binary, size);
    }

    fn step_failed(&mut self, binary: &Path, size: u64, err: &anyhow::Error) {
        print_step_failure(binary, size, err);
    }
}

pub fn print_saved(what: &str, path: &Path) {
    let line = format!("{} written to {}", what, path.display());
    eprintln!(
        "{}",
        line.if_supports_color(Stream::Stderr, |s| s.dimmed())
    );
}

/// Aligned text table: one line per size with its eight values.
pub fn format_summary(sizes: &[u64], table: &[BenchmarkRow]) -> String {
    let rows: Vec<[String; 9]> = sizes
        .iter()
        .zip(table)
        .map(|(size, row)| {
            let [t0, t1, t2, t3] = row.timings();
            let [g0, g1, g2, g3] = row.gains();
            [
                size.to_string(),
                t0.to_string(),
                t1.to_string(),
                t2.to_string(),
                t3.to_string(),
                format!("{:.2}", g0),
                format!("{:.2}", g1),
                format!("{:.2}", g2),
                format!("{:.2}", g3),
            ]
        })
        .collect();

    let mut widths = SUMMARY_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();

    let header = SUMMARY_HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{:>width$}", h, width = w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(
        &header
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
            .to_string(),
    );
    out.push('\n');

    let size_style = style_size();
    for row in &rows {
        let mut cells = Vec::with_capacity(row.len());
        for (i, (cell, w)) in row.iter().zip(widths).enumerate() {
            let padded = format!("{:>width$}", cell, width = w);
            let colored = match i {
                0 => padded
                    .if_supports_color(Stream::Stdout, |s| s.style(size_style))
                    .to_string(),
                1..=4 => padded
                    .if_supports_color(Stream::Stdout, |s| s.yellow())
                    .to_string(),
                _ => padded
                    .if_supports_color(Stream::Stdout, |s| s.green())
                    .to_string(),
            };
            cells.push(colored);
        }
        out.push_str(&cells.join("  "));
        out.push('\n');
    }

    out
}

#[derive(Serialize)]
struct JsonRow<'a> {
    size: u64,
    #[serde(flatten)]
    row: &'a BenchmarkRow,
}

/// JSON array of `{size, <eight named fields>}` objects.
pub fn format_json(sizes: &[u64], table: &[BenchmarkRow]) -> String {
    let rows: Vec<JsonRow<'_>> = sizes
        .iter()
        .zip(table)
        .map(|(&size, row)| JsonRow { size, row })
        .collect();

    serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
}
