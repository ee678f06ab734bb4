//! Output side of the converter.
//!
//! The parser hands every completed entity to an [`EntitySink`]:
//!
//! - [`CsvEmitter`] writes one CSV table per domain (conversion mode)
//! - [`ParameterCatalog`] collects parameter names per domain (extraction mode)
//!
//! CSV tables are created through a [`TableFactory`], so the same emitter
//! writes to a directory in production and to memory in tests.

pub mod catalog;
pub mod emitter;
pub mod schema;

pub use catalog::{CatalogFormat, ParameterCatalog};
pub use emitter::{assemble_record, to_csv_field, CsvEmitter, Record};
pub use schema::{DomainTable, FinishedTable, SchemaRegistry};

use indexmap::IndexMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{OutputError, OutputResult};
use crate::parser::ParseContext;

/// One completed entity, ready to be written.
#[derive(Debug, Clone, Copy)]
pub struct Entity<'a> {
    pub context: &'a ParseContext,
    pub domain: &'a str,
    /// Identifier of the `.set` that opened this entity.
    pub set_id: &'a str,
    pub params: &'a IndexMap<String, String>,
}

/// Receiver of domain directives and completed entities.
pub trait EntitySink {
    /// Called on every `.domain` directive.
    fn open_domain(&mut self, domain: &str) -> OutputResult<()>;

    /// Write an entity. Returns `false` when the domain is not retained.
    fn write_entity(&mut self, entity: &Entity<'_>) -> OutputResult<bool>;
}

/// Creates the writer behind a domain table.
pub trait TableFactory {
    type Writer: Write;

    fn create(&mut self, domain: &str) -> io::Result<Self::Writer>;
}

/// Writes `<dir>/<domain>.csv`.
#[derive(Debug, Clone)]
pub struct DirectoryTables {
    dir: PathBuf,
}

impl DirectoryTables {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{domain}.csv"))
    }
}

impl TableFactory for DirectoryTables {
    type Writer = File;

    fn create(&mut self, domain: &str) -> io::Result<File> {
        File::create(self.path_for(domain))
    }
}

/// In-memory tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryTables;

impl TableFactory for MemoryTables {
    type Writer = Vec<u8>;

    fn create(&mut self, _domain: &str) -> io::Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Check that `path` is an existing, writable directory.
pub fn validate_output_dir(path: &Path) -> OutputResult<()> {
    let invalid = |reason: &str| OutputError::InvalidDirectory {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let meta = fs::metadata(path).map_err(|_| invalid("does not exist"))?;
    if !meta.is_dir() {
        return Err(invalid("not a directory"));
    }

    // Permission bits are not reliable across platforms; probe instead
    let probe = path.join(format!(".cnai2csv-probe-{}", std::process::id()));
    File::create(&probe).map_err(|_| invalid("cannot write to directory"))?;
    let _ = fs::remove_file(&probe);

    Ok(())
}
