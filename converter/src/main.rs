//! cnai2csv CLI - Convert Ericsson CNAI dumps to CSV
//!
//! ```bash
//! cnai2csv -i cnai_dump.txt -o out_folder
//! cnai2csv -i input_folder -o out_folder -c parameters.cfg
//! cnai2csv -i input_folder -p
//! cnai2csv -i input_folder -p -m --format json
//! ```

use clap::{Parser, ValueEnum};
use cnai_csv::{run, CatalogFormat, ConvertOptions, RunOutcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cnai2csv", version)]
#[command(about = "Parses Ericsson CNAI configuration dumps to csv", long_about = None)]
struct Cli {
    /// Input file or directory name
    #[arg(short = 'i', long = "input-file", value_name = "INPUT_FILE")]
    input: PathBuf,

    /// Output directory name
    #[arg(short = 'o', long = "output-directory", value_name = "OUTPUT_DIRECTORY")]
    output_dir: Option<PathBuf>,

    /// Parameter configuration file
    #[arg(short = 'c', long = "parameter-config", value_name = "PARAMETER_CONFIG")]
    parameter_config: Option<PathBuf>,

    /// Extract only the domains and parameters
    #[arg(short = 'p', long = "extract-parameters")]
    extract_parameters: bool,

    /// Add meta fields to extracted parameters. FILENAME,DATETIME
    #[arg(short = 'm', long = "meta-fields")]
    meta_fields: bool,

    /// Format of the extracted parameter listing
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for CatalogFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => CatalogFormat::Text,
            Format::Json => CatalogFormat::Json,
        }
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let options = ConvertOptions {
        output_dir: cli.output_dir,
        parameter_file: cli.parameter_config,
        extract_parameters: cli.extract_parameters,
        meta_fields: cli.meta_fields,
        catalog_format: cli.format.into(),
    };

    match run(&cli.input, &options) {
        Ok(outcome) => report(&outcome),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

fn report(outcome: &RunOutcome) {
    let summary = &outcome.summary;

    if let Some(catalog) = &outcome.catalog {
        print!("{}", catalog);
    }

    eprintln!(
        "{} file(s) parsed, {} skipped, {} entities written, {} discarded, {} malformed line(s)",
        summary.files_parsed,
        summary.files_skipped,
        summary.stats.entities_flushed,
        summary.stats.entities_discarded,
        summary.stats.malformed_lines,
    );
    for domain in &summary.domains {
        if domain.rows > 0 {
            eprintln!("   {}: {} rows, {} columns", domain.name, domain.rows, domain.columns.len());
        }
    }
}
