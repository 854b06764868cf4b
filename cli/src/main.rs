//! `snappy`: compress or decompress snappy streams between files and the
//! standard streams.
//!
//! Exit codes:
//! - 0 success
//! - 1 the input is not a valid stream for the requested format
//! - 2 anything else (arguments, configuration, I/O)

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{ArgGroup, Parser};
use log::{info, warn};

use snappy_core::container::registry::{resolve_selector, selector_names};
use snappy_core::container::{Direction, FormatSelector};
use snappy_core::pipeline::{run_with, PipelineConfig};
use snappy_core::types::StreamError;

const STDIO: &str = "-";

#[derive(Parser)]
#[command(name = "snappy")]
#[command(about = "Compress or decompress snappy archive")]
#[command(group(ArgGroup::new("mode").required(true).args(["compress", "decompress"])))]
struct Cli {
    /// Compress
    #[arg(short = 'c')]
    compress: bool,

    /// Decompress
    #[arg(short = 'd')]
    decompress: bool,

    /// Target format. `auto` writes the default format and sniffs on decompress
    #[arg(short = 't', default_value = FormatSelector::AUTO_NAME,
          value_parser = PossibleValuesParser::new(selector_names()))]
    target_format: String,

    /// Uncompressed bytes per chunk when compressing (default: per format)
    #[arg(long)]
    block_size: Option<usize>,

    /// Print run statistics as JSON to stderr
    #[arg(long)]
    stats: bool,

    /// Input file (or stdin)
    infile: Option<PathBuf>,

    /// Output file (or stdout)
    outfile: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("snappy: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let selector = resolve_selector(&cli.target_format)?;
    let direction = if cli.compress { Direction::Compress } else { Direction::Decompress };
    if direction == Direction::Decompress && cli.block_size.is_some() {
        warn!("--block-size only applies when compressing; ignoring it");
    }
    let config = PipelineConfig::new(cli.block_size);

    let mut input = open_input(cli.infile.as_deref())?;
    let mut output = open_output(cli.outfile.as_deref())?;

    let stats = run_with(&config, direction, selector, &mut input, &mut output)?;
    info!(
        "{:?} as {}: {} bytes in, {} bytes out, {} chunks, ratio {:.3}",
        stats.direction, stats.format, stats.bytes_in, stats.bytes_out, stats.chunks, stats.ratio()
    );

    if cli.stats {
        let mut report = serde_json::to_value(&stats)?;
        report["ratio"] = serde_json::json!(stats.ratio());
        eprintln!("{}", report);
    }
    Ok(())
}

fn is_stdio(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p.as_os_str() == STDIO)
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    match path {
        Some(p) if !is_stdio(path) => {
            let file = File::open(p).with_context(|| format!("cannot open input {}", p.display()))?;
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if !is_stdio(path) => {
            let file = File::create(p).with_context(|| format!("cannot create output {}", p.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        _ => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Content errors exit with 1, everything else with 2.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<StreamError>() {
        Some(e) if e.is_content_error() => 1,
        _ => 2,
    }
}
