use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{ArgAction, Parser};

use simdbench::chart;
use simdbench::config::{self, Settings};
use simdbench::display;
use simdbench::logging;
use simdbench::persist;
use simdbench::run;
use simdbench::types::{self, OutputFormat};

#[derive(Parser)]
#[command(
    name = "simdbench",
    version,
    about = "Runs the SIMD benchmarking binary for every 10^p in a list of powers, \
             stores the results in a CSV and charts them"
)]
struct Cli {
    /// Powers of ten to use as array sizes (non-integral powers are floored)
    #[arg(value_name = "POWERS", required = true, num_args = 1.., allow_negative_numbers = true)]
    powers: Vec<f64>,

    /// Benchmark executable [default: ./simdbmk]
    #[arg(short, long)]
    binary: Option<PathBuf>,

    /// CSV results path [default: ./results/benchmark.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// SVG chart path [default: ./results/benchmark.svg]
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Skip rendering the charts
    #[arg(long)]
    no_chart: bool,

    /// Save the charts without opening them in a viewer
    #[arg(long)]
    no_show: bool,

    /// Config file to use instead of ./simdbench.toml
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "summary")]
    format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long)]
    json: bool,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let file_config = config::load_config(cli.config.as_deref())?;
    let settings = Settings::resolve(file_config, cli.binary, cli.output, cli.chart);

    // All sizes are validated before the first spawn
    let sizes = types::sizes_from_exponents(&cli.powers)?;

    let table = run::run_benchmark(&settings.binary, &sizes, &mut display::StderrProgress)?;

    persist::write_table(&table, &settings.output)?;
    display::print_saved("Results", &settings.output);

    if !cli.no_chart {
        chart::render_charts(&sizes, &table, &settings.chart)?;
        display::print_saved("Charts", &settings.chart);
        if !cli.no_show {
            chart::show_charts(&settings.chart);
        }
    }

    let format = if cli.json { OutputFormat::Json } else { cli.format };
    let output = match format {
        OutputFormat::Json => display::format_json(&sizes, &table) + "\n",
        OutputFormat::Summary => display::format_summary(&sizes, &table),
    };
    print!("{}", output);

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
