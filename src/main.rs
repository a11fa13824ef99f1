// Rust Frame Engine - Main executable
// Author: Gabriel Demetrios Lafis

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use log::{debug, info};

use rust_frame_engine::{
    data::{convert_value, infer_kind, CsvSource, DelimitedSink, FrameSink, FrameSource, RecordSink},
    processing::{FillMissingTransform, NormalizeTransform},
    utils::{init_logging, Config, EngineConfig},
    Frame, Pipeline, Value,
};

fn input_args() -> [Arg<'static>; 3] {
    [
        Arg::new("input")
            .value_name("CSV")
            .help("CSV file to load")
            .required(true)
            .takes_value(true),
        Arg::new("no-header")
            .long("no-header")
            .help("Treat the first record as data"),
        Arg::new("delimiter")
            .short('d')
            .long("delimiter")
            .value_name("CHAR")
            .help("Field delimiter of the input file")
            .takes_value(true)
            .default_value(","),
    ]
}

fn load_frame(matches: &ArgMatches) -> Result<Frame> {
    let path = matches.value_of("input").context("missing input file")?;
    let delimiter = matches
        .value_of("delimiter")
        .and_then(|d| d.chars().next())
        .unwrap_or(',');

    let source = CsvSource::new(path, !matches.is_present("no-header"), delimiter).infer_types(true);
    let frame = source
        .read()
        .with_context(|| format!("failed to load '{}'", path))?;

    info!(
        "loaded {} rows x {} columns from {}",
        frame.row_count(),
        frame.column_count(),
        path
    );
    Ok(frame)
}

/// Parse a fill value as the most specific kind its text fits
fn parse_fill_value(text: &str) -> Result<Value> {
    let raw = Value::from(text);
    let kind = infer_kind(std::slice::from_ref(&raw));
    convert_value(&raw, kind).with_context(|| format!("invalid fill value '{}'", text))
}

/// Fill and normalization steps requested for export, under the engine policies
fn export_pipeline(matches: &ArgMatches, engine: &EngineConfig) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new("export");

    if let Some(text) = matches.value_of("fill") {
        let default = parse_fill_value(text)?;
        pipeline = pipeline.add(FillMissingTransform::new(default, engine.fill_policy));
    }
    if matches.is_present("normalize") {
        pipeline = pipeline.add(NormalizeTransform::new(engine.constant_columns));
    }

    Ok(pipeline)
}

fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("Rust Frame Engine")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Query and export tabular data held in memory")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file (JSON or YAML)")
                .takes_value(true),
        )
        .subcommand(
            Command::new("describe")
                .about("Print summary statistics of every numeric column")
                .args(input_args()),
        )
        .subcommand(
            Command::new("group")
                .about("Count rows per distinct key")
                .args(input_args())
                .arg(
                    Arg::new("by")
                        .short('b')
                        .long("by")
                        .value_name("COLUMN")
                        .help("Column to group by (repeatable)")
                        .takes_value(true)
                        .multiple_occurrences(true)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Render the loaded frame as text")
                .args(input_args())
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .help("Output format")
                        .takes_value(true)
                        .possible_values(["delimited", "records"])
                        .default_value("delimited"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .help("Indent record output"),
                )
                .arg(
                    Arg::new("fill")
                        .long("fill")
                        .value_name("VALUE")
                        .help("Replace missing cells with VALUE before export")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("normalize")
                        .long("normalize")
                        .help("Rescale numeric columns into [0, 1] before export"),
                ),
        )
        .get_matches();

    // Load configuration
    let config = match matches.value_of("config") {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config '{}'", path))?,
        None => Config::default(),
    };

    // Initialize logging
    if let Err(err) = init_logging(config.log_level_filter()) {
        eprintln!("Error initializing logger: {}", err);
    }
    debug!("using configuration {:?}", config);

    let delimited = DelimitedSink::from_config(&config.export);

    let output = match matches.subcommand() {
        Some(("describe", sub)) => {
            let frame = load_frame(sub)?;
            delimited.render(&frame.describe()?)?
        }
        Some(("group", sub)) => {
            let frame = load_frame(sub)?;
            let columns: Vec<&str> = sub.values_of("by").map(|v| v.collect()).unwrap_or_default();
            delimited.render(&frame.group_by(&columns)?)?
        }
        Some(("export", sub)) => {
            let pipeline = export_pipeline(sub, &config.engine)?;
            let frame = pipeline.execute(&load_frame(sub)?)?;
            match sub.value_of("format") {
                Some("records") => RecordSink::new(sub.is_present("pretty")).render(&frame)?,
                _ => delimited.render(&frame)?,
            }
        }
        _ => unreachable!("a subcommand is required"),
    };

    print!("{}", output);
    Ok(())
}
