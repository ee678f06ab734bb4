//! CSV record emission.
//!
//! Every row starts with the meta prefix
//!
//! ```text
//! FILNAME,DATETIME,capabilities,subnetwork,domain,set
//! ```
//!
//! followed by the domain's columns. In filter mode the last four meta
//! fields are only written when the domain's configured list names them.
//! Reserved names never appear twice: they are skipped from the trailing
//! columns in both modes.

use super::{Entity, EntitySink, FinishedTable, SchemaRegistry, TableFactory};
use crate::error::OutputResult;
use crate::filter::ParameterFilter;

/// Names that are emitted as meta fields, never as trailing columns.
pub const RESERVED_COLUMNS: [&str; 4] = ["set", "domain", "subnetwork", "capabilities"];

/// Quote a raw value for CSV output.
///
/// One leading and one trailing `"` are stripped first. A value containing a
/// comma is wrapped in quotes; a value containing a quote has its quotes
/// doubled and is wrapped. Both checks run against the stripped value, so
/// the result always parses back to it.
pub fn to_csv_field(value: &str) -> String {
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);

    let mut field = value.to_string();
    if value.contains(',') {
        field = format!("\"{value}\"");
    }
    if value.contains('"') {
        field = format!("\"{}\"", value.replace('"', "\"\""));
    }
    field
}

/// An assembled header and data row, fields already quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub header: Vec<String>,
    pub row: Vec<String>,
    /// Unquoted trailing column names, in row order.
    pub columns: Vec<String>,
}

impl Record {
    fn push(&mut self, name: &str, value: &str) {
        self.header.push(to_csv_field(name));
        self.row.push(to_csv_field(value));
    }
}

/// Build the header and row for one entity.
///
/// `configured` is the filter's column list for the domain (filter mode).
/// `locked` is the domain's known column list; `None` on the first write in
/// discovery mode, where the entity's own keys become the columns.
pub fn assemble_record(
    entity: &Entity<'_>,
    configured: Option<&[String]>,
    locked: Option<&[String]>,
) -> Record {
    let ctx = entity.context;
    let mut record = Record {
        header: Vec::new(),
        row: Vec::new(),
        columns: Vec::new(),
    };

    let included = |name: &str| configured.map_or(true, |cols| cols.iter().any(|c| c == name));

    record.push("FILNAME", &ctx.file_name);
    record.push("DATETIME", &ctx.creation_date_time);
    if included("capabilities") {
        record.push("capabilities", &ctx.capabilities);
    }
    if included("subnetwork") {
        record.push("subnetwork", &ctx.subnetwork);
    }
    if included("domain") {
        record.push("domain", entity.domain);
    }
    if included("set") {
        record.push("set", entity.set_id);
    }

    match locked {
        Some(columns) => {
            for name in columns.iter().filter(|n| !is_reserved(n)) {
                let value = entity.params.get(name).map(String::as_str).unwrap_or("");
                record.push(name, value);
                record.columns.push(name.clone());
            }
        }
        None => {
            for (name, value) in entity.params.iter().filter(|(n, _)| !is_reserved(n)) {
                record.push(name, value);
                record.columns.push(name.clone());
            }
        }
    }

    record
}

fn is_reserved(name: &str) -> bool {
    RESERVED_COLUMNS.contains(&name)
}

/// Writes entities into per-domain CSV tables.
pub struct CsvEmitter<F: TableFactory> {
    registry: SchemaRegistry<F>,
}

impl<F: TableFactory> CsvEmitter<F> {
    pub fn new(factory: F, filter: Option<ParameterFilter>) -> Self {
        Self {
            registry: SchemaRegistry::new(factory, filter),
        }
    }

    /// Flush and close every table.
    pub fn finish(self) -> OutputResult<Vec<FinishedTable<F::Writer>>> {
        self.registry.finish()
    }
}

impl<F: TableFactory> EntitySink for CsvEmitter<F> {
    fn open_domain(&mut self, domain: &str) -> OutputResult<()> {
        self.registry.open_domain(domain)
    }

    fn write_entity(&mut self, entity: &Entity<'_>) -> OutputResult<bool> {
        let Some(table) = self.registry.table_mut(entity.domain) else {
            return Ok(false);
        };

        let configured = if table.is_configured() { table.columns() } else { None };
        let record = assemble_record(entity, configured, table.columns());

        if !table.header_written() {
            table.write_header(&record.header, &record.columns)?;
        }
        table.write_row(&record.row)?;
        Ok(true)
    }
}
