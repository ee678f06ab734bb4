//! High-level run API: dump file or directory in, CSV tables out.
//!
//! # Example
//!
//! ```rust,ignore
//! use cnai_csv::{run, ConvertOptions};
//! use std::path::Path;
//!
//! let options = ConvertOptions {
//!     output_dir: Some("out".into()),
//!     ..ConvertOptions::default()
//! };
//! let outcome = run(Path::new("dumps/"), &options)?;
//! println!("{} files parsed", outcome.summary.files_parsed);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{OutputError, RunError, RunResult};
use crate::filter::ParameterFilter;
use crate::logs::{log_error, log_info, log_info_indent, log_success};
use crate::output::{
    validate_output_dir, CatalogFormat, CsvEmitter, DirectoryTables, EntitySink,
    ParameterCatalog,
};
use crate::parser::{DumpParser, DumpReader, ParseStats};

/// Name of the catalog written in extraction mode.
pub const CATALOG_FILE: &str = "parameters.txt";

/// Options for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Directory receiving `<domain>.csv` (required unless extracting)
    pub output_dir: Option<PathBuf>,

    /// Parameter filter file
    pub parameter_file: Option<PathBuf>,

    /// Only collect domain and parameter names
    pub extract_parameters: bool,

    /// Prefix extracted parameter lists with FILENAME,DATETIME
    pub meta_fields: bool,

    /// Rendering of the extracted catalog
    pub catalog_format: CatalogFormat,
}

/// Per-domain result
#[derive(Debug, Clone, Serialize)]
pub struct DomainSummary {
    pub name: String,
    /// Data rows written (always 0 when extracting)
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Result of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub files_parsed: usize,
    pub files_skipped: usize,
    pub stats: ParseStats,
    pub domains: Vec<DomainSummary>,
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,

    /// Rendered catalog, when extracting without an output directory
    pub catalog: Option<String>,
}

/// Convert a dump file, or every file in a directory.
///
/// Configuration problems abort before any input is read. When `input` is a
/// directory, a file that cannot be read is reported and skipped; output
/// failures always abort.
pub fn run(input: &Path, options: &ConvertOptions) -> RunResult<RunOutcome> {
    let started_at = Utc::now();
    let clock = Instant::now();

    if !options.extract_parameters && options.output_dir.is_none() {
        return Err(RunError::MissingOutputDirectory);
    }
    if let Some(dir) = &options.output_dir {
        validate_output_dir(dir)?;
    }

    let filter = options
        .parameter_file
        .as_deref()
        .map(ParameterFilter::load)
        .transpose()?;
    if let Some(f) = &filter {
        log_info(format!("Loaded parameter filter for {} domains", f.len()));
    }

    let files = collect_inputs(input)?;
    let single = input.is_file();

    let (files_parsed, files_skipped, stats, domains, catalog) = if options.extract_parameters {
        let mut parser = DumpParser::new(ParameterCatalog::new(filter));
        let (parsed, skipped) = parse_files(&mut parser, &files, single, "Extracting parameters from")?;
        let (catalog, stats) = parser.into_parts();

        let domains: Vec<DomainSummary> = catalog
            .domains()
            .map(|name| DomainSummary {
                name: name.to_string(),
                rows: 0,
                columns: catalog
                    .parameters(name)
                    .map(|p| p.map(String::from).collect())
                    .unwrap_or_default(),
            })
            .collect();

        let rendered = catalog.render(options.catalog_format, options.meta_fields)?;
        let rendered = match &options.output_dir {
            Some(dir) => {
                let path = dir.join(CATALOG_FILE);
                fs::write(&path, rendered).map_err(OutputError::from)?;
                log_success(format!("Parameters written to {}", path.display()));
                None
            }
            None => Some(rendered),
        };

        (parsed, skipped, stats, domains, rendered)
    } else {
        let dir = options
            .output_dir
            .as_deref()
            .ok_or(RunError::MissingOutputDirectory)?;
        let emitter = CsvEmitter::new(DirectoryTables::new(dir), filter);
        let mut parser = DumpParser::new(emitter);
        let (parsed, skipped) = parse_files(&mut parser, &files, single, "Parsing")?;
        let (emitter, stats) = parser.into_parts();

        let domains: Vec<DomainSummary> = emitter
            .finish()?
            .into_iter()
            .map(|table| DomainSummary {
                name: table.name,
                rows: table.rows,
                columns: table.columns,
            })
            .collect();

        (parsed, skipped, stats, domains, None)
    };

    let elapsed = clock.elapsed();
    log_info("PARSING COMPLETED:");
    log_info_indent(format!("Total time: {}", format_elapsed(elapsed)), 1);

    Ok(RunOutcome {
        summary: RunSummary {
            started_at,
            elapsed,
            files_parsed,
            files_skipped,
            stats,
            domains,
        },
        catalog,
    })
}

/// Files to parse: the input itself, or the regular files of a directory in
/// name order.
pub fn collect_inputs(input: &Path) -> RunResult<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(RunError::InputNotFound(input.to_path_buf()));
    }

    let entries = fs::read_dir(input).map_err(|_| RunError::InputNotFound(input.to_path_buf()))?;
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Parse each file in turn. Returns (parsed, skipped).
fn parse_files<S: EntitySink>(
    parser: &mut DumpParser<S>,
    files: &[PathBuf],
    single: bool,
    verb: &str,
) -> RunResult<(usize, usize)> {
    let mut parsed = 0;
    let mut skipped = 0;

    for path in files {
        let name = file_basename(path);
        log_info(format!("{verb} {name}..."));

        let result = DumpReader::open(path)
            .map_err(RunError::from)
            .and_then(|reader| {
                parser.begin_file(&name);
                parser.parse_reader(reader)
            });

        match result {
            Ok(()) => {
                parsed += 1;
                log_success(format!("{name}: Done."));
            }
            Err(RunError::Input(e)) if !single => {
                skipped += 1;
                log_error(format!("{e}"));
                log_error(format!("Skipping file: {name}"));
            }
            Err(e) => return Err(e),
        }
    }

    Ok((parsed, skipped))
}

/// Final path component, or the whole path when there is none.
pub fn file_basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Human-readable run time, e.g. `1 minutes 3 seconds 12 milliseconds`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_millis();
    let hours = total / 3_600_000;
    let minutes = (total % 3_600_000) / 60_000;
    let seconds = (total % 60_000) / 1_000;
    let millis = total % 1_000;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours} hours "));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes} minutes "));
    }
    if total >= 1_000 {
        out.push_str(&format!("{seconds} seconds "));
    }
    out.push_str(&format!("{millis} milliseconds"));
    out
}
