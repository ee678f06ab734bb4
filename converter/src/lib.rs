//! # cnai-csv - Ericsson CNAI dump to CSV conversion
//!
//! Converts CNAI configuration dumps exported by the element manager into
//! one CSV table per configuration domain.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CNAI dump  │────▶│  Classifier │────▶│  Entity     │────▶│ <domain>.csv│
//! │ (any enc.)  │     │  + context  │     │  buffer     │     │  per domain │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cnai_csv::{run, ConvertOptions};
//!
//! let options = ConvertOptions {
//!     output_dir: Some("out".into()),
//!     ..ConvertOptions::default()
//! };
//! let outcome = run("dump.txt".as_ref(), &options).unwrap();
//! println!("Wrote {} tables", outcome.summary.domains.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`logs`] - Run log broadcasting
//! - [`filter`] - Parameter filter loading
//! - [`parser`] - Line classification and the parse state machine
//! - [`output`] - Schema registry, CSV emission, parameter catalog
//! - [`pipeline`] - File/directory runs

// Core modules
pub mod error;
pub mod logs;

// Configuration
pub mod filter;

// Parsing
pub mod parser;

// Output
pub mod output;

// Orchestration
pub mod pipeline;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    FilterError,
    InputError,
    OutputError,
    RunError,
    RunResult,
};

// =============================================================================
// Re-exports - Filter
// =============================================================================

pub use filter::ParameterFilter;

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    classify,
    Directive,
    DumpParser,
    DumpReader,
    EntityBuffer,
    ParseContext,
    ParseStats,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use output::{
    to_csv_field,
    CatalogFormat,
    CsvEmitter,
    DirectoryTables,
    EntitySink,
    MemoryTables,
    ParameterCatalog,
    SchemaRegistry,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{
    run,
    ConvertOptions,
    DomainSummary,
    RunOutcome,
    RunSummary,
};
