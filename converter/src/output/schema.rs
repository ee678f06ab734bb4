//! Per-domain table registry.
//!
//! A [`DomainTable`] is created lazily on the first `.domain` directive for
//! its name and lives until the end of the run. Its column list is either
//! configured up front from the parameter filter, or discovered from the
//! first entity written to it and locked from then on.

use indexmap::IndexMap;
use std::io::Write;

use super::TableFactory;
use crate::error::{OutputError, OutputResult};
use crate::filter::ParameterFilter;

/// Output table for one domain.
pub struct DomainTable<W: Write> {
    name: String,
    writer: csv::Writer<W>,
    header_written: bool,
    columns: Option<Vec<String>>,
    configured: bool,
    rows: usize,
}

impl<W: Write> DomainTable<W> {
    fn new(name: &str, writer: W, configured: Option<&[String]>) -> Self {
        let writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Never)
            .flexible(true)
            .from_writer(writer);

        Self {
            name: name.to_string(),
            writer,
            header_written: false,
            columns: configured.map(<[String]>::to_vec),
            configured: configured.is_some(),
            rows: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns after the meta prefix, once known.
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    /// Whether columns come from the parameter filter.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Data rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Write the header row and, in discovery mode, lock the columns.
    ///
    /// Only the first call has any effect.
    pub fn write_header(&mut self, fields: &[String], columns: &[String]) -> OutputResult<()> {
        if self.header_written {
            return Ok(());
        }
        self.writer.write_record(fields)?;
        if self.columns.is_none() {
            self.columns = Some(columns.to_vec());
        }
        self.header_written = true;
        Ok(())
    }

    /// Write one fully assembled data row.
    pub fn write_row(&mut self, fields: &[String]) -> OutputResult<()> {
        self.writer.write_record(fields)?;
        self.rows += 1;
        Ok(())
    }

    fn finish(self) -> OutputResult<FinishedTable<W>> {
        let writer = self
            .writer
            .into_inner()
            .map_err(|e| OutputError::Io(e.into_error()))?;

        Ok(FinishedTable {
            name: self.name,
            columns: self.columns.unwrap_or_default(),
            rows: self.rows,
            writer,
        })
    }
}

/// A flushed table, returned at the end of the run.
#[derive(Debug)]
pub struct FinishedTable<W> {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: usize,
    pub writer: W,
}

/// One [`DomainTable`] per distinct domain name.
pub struct SchemaRegistry<F: TableFactory> {
    factory: F,
    filter: Option<ParameterFilter>,
    tables: IndexMap<String, DomainTable<F::Writer>>,
}

impl<F: TableFactory> SchemaRegistry<F> {
    pub fn new(factory: F, filter: Option<ParameterFilter>) -> Self {
        Self {
            factory,
            filter,
            tables: IndexMap::new(),
        }
    }

    /// Create the domain's table unless it exists or is filtered out.
    pub fn open_domain(&mut self, domain: &str) -> OutputResult<()> {
        if self.tables.contains_key(domain) {
            return Ok(());
        }

        let configured = match &self.filter {
            Some(filter) => match filter.columns(domain) {
                Some(columns) => Some(columns),
                None => return Ok(()),
            },
            None => None,
        };

        let writer = self
            .factory
            .create(domain)
            .map_err(|source| OutputError::CreateTable {
                domain: domain.to_string(),
                source,
            })?;

        self.tables
            .insert(domain.to_string(), DomainTable::new(domain, writer, configured));
        Ok(())
    }

    pub fn table(&self, domain: &str) -> Option<&DomainTable<F::Writer>> {
        self.tables.get(domain)
    }

    pub fn table_mut(&mut self, domain: &str) -> Option<&mut DomainTable<F::Writer>> {
        self.tables.get_mut(domain)
    }

    /// Domain names in order of first appearance.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Flush and close every table.
    pub fn finish(self) -> OutputResult<Vec<FinishedTable<F::Writer>>> {
        self.tables.into_values().map(DomainTable::finish).collect()
    }
}
