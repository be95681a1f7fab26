use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

use vizpick::csv_reader::read_csv;
use vizpick::data::records_from_json;
use vizpick::parser::parse_hints;
use vizpick::{render, translate, ChartType, DataSpec, EngineOptions, Record};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormat {
    /// CSV with a header row
    Csv,
    /// JSON array of flat objects
    Json,
    /// JSON document with rows, explicitType and hints
    Spec,
}

#[derive(Parser, Debug)]
#[command(name = "vizpick")]
#[command(about = "Pick a visualization for tabular data read from stdin", long_about = None)]
struct Args {
    /// Hint string (e.g., 'geo(zip) | measure(count) | density')
    hints: Option<String>,

    /// Format of the data on stdin
    #[arg(long, value_enum, default_value = "csv")]
    input: InputFormat,

    /// Force a chart type instead of classifying
    #[arg(long = "type")]
    chart_type: Option<ChartType>,

    /// Show every ranked-list entry
    #[arg(long)]
    expand: bool,

    /// Rows inspected when probing for date fields
    #[arg(long)]
    time_sample_limit: Option<usize>,

    /// Translate a clicked row (JSON object) into a drill-down filter
    #[arg(long, value_name = "ROW_JSON")]
    click: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_spec(format: InputFormat, input: &str) -> Result<DataSpec> {
    let spec = match format {
        InputFormat::Csv => DataSpec::new(read_csv(input.as_bytes())?),
        InputFormat::Json => {
            let value: serde_json::Value =
                serde_json::from_str(input).context("Input is not valid JSON")?;
            DataSpec::new(records_from_json(&value)?)
        }
        InputFormat::Spec => {
            serde_json::from_str(input).context("Input is not a valid data spec document")?
        }
    };
    Ok(spec)
}

fn parse_click(raw: &str) -> Result<Record> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("Clicked row is not valid JSON")?;
    let mut rows = records_from_json(&serde_json::Value::Array(vec![value]))
        .context("Clicked row must be a flat JSON object")?;
    rows.pop().context("Clicked row is empty")
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let written = if pretty {
        serde_json::to_writer_pretty(&mut handle, value)
    } else {
        serde_json::to_writer(&mut handle, value)
    };
    written.context("Failed to write JSON to stdout")?;
    writeln!(handle).context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read data from stdin")?;

    let mut spec = read_spec(args.input, &input).context("Failed to read input data")?;

    if let Some(hints) = &args.hints {
        let parsed = parse_hints(hints).context("Failed to parse hints")?;
        parsed.apply_to(&mut spec);
    }
    if let Some(chart_type) = args.chart_type {
        spec.explicit_type = Some(chart_type);
    }

    let mut options = EngineOptions {
        expand_ranked_list: args.expand,
        ..Default::default()
    };
    if let Some(limit) = args.time_sample_limit {
        options.time_sample_limit = limit;
    }

    tracing::info!(rows = spec.rows.len(), "data loaded");
    let rendering = render(&spec, &options);

    match &args.click {
        Some(raw) => {
            let row = parse_click(raw)?;
            let filter = translate(Some(&row), &rendering.decision);
            write_json(&filter, args.pretty)
        }
        None => write_json(&rendering, args.pretty),
    }
}
