//! Streaming CNAI dump parser.
//!
//! Lines are fed one at a time into a [`DumpParser`]. Header directives
//! update the [`ParseContext`], `name=value` lines fill the
//! [`EntityBuffer`], and every `.set` boundary (or the end-of-export marker)
//! hands the completed entity to an [`EntitySink`].
//!
//! ```text
//! .domain RNC        -> sink.open_domain("RNC")
//! .set E1            -> flush nothing yet, current set = E1
//! a=1                -> buffer {a: 1}
//! b=2,3              -> buffer {a: 1, b: "2,3"}
//! .set E2            -> flush buffer as entity E1, current set = E2
//! ```
//!
//! A buffer holding a single key at a boundary is treated as noise and
//! dropped. Entities still buffered when a file ends without a boundary are
//! dropped as well, and set ids never carry over into the next file.

pub mod classify;
pub mod context;
pub mod encoding;

pub use classify::{classify, Directive};
pub use context::{EntityBuffer, ParseContext};
pub use encoding::{decode_line, detect_encoding, DumpReader};

use serde::Serialize;
use std::io::BufRead;

use crate::error::{OutputResult, RunResult};
use crate::logs::log_warning;
use crate::output::{Entity, EntitySink};

/// Counters kept while parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub lines_read: usize,
    pub malformed_lines: usize,
    pub entities_flushed: usize,
    /// Entities with no active domain, or whose domain is not retained.
    pub entities_discarded: usize,
}

/// The parse state machine.
pub struct DumpParser<S: EntitySink> {
    context: ParseContext,
    buffer: EntityBuffer,
    sink: S,
    stats: ParseStats,
    line_number: usize,
}

impl<S: EntitySink> DumpParser<S> {
    pub fn new(sink: S) -> Self {
        Self {
            context: ParseContext::new(),
            buffer: EntityBuffer::new(),
            sink,
            stats: ParseStats::default(),
            line_number: 0,
        }
    }

    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    pub fn buffer(&self) -> &EntityBuffer {
        &self.buffer
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Start a new input file. Header values carry over from earlier files;
    /// an entity the previous file left open is dropped.
    pub fn begin_file(&mut self, file_name: &str) {
        self.context.begin_file(file_name);
        self.buffer.clear();
        self.line_number = 0;
    }

    /// Process one line.
    pub fn process_line(&mut self, line: &str) -> OutputResult<()> {
        self.line_number += 1;
        self.stats.lines_read += 1;

        match classify(line) {
            Directive::StartMarker | Directive::Unrecognized => {}
            Directive::EndMarker => {
                let set_id = self.context.current_set_id.clone();
                self.close_entity(set_id)?;
            }
            Directive::Set(set_id) => {
                // The buffer belongs to the set that was current until now
                let closed = self.context.advance_set(set_id).map(String::from);
                self.close_entity(closed)?;
            }
            Directive::Domain(domain) => {
                self.sink.open_domain(&domain)?;
                self.context.current_domain = Some(domain);
            }
            Directive::Capabilities(value) => self.context.capabilities = value,
            Directive::Subnetwork(value) => self.context.subnetwork = value,
            Directive::Timestamp(value) => self.context.creation_date_time = value,
            Directive::Parameter { name, value } => self.buffer.put(name, value),
            Directive::Malformed(text) => {
                self.stats.malformed_lines += 1;
                log_warning(format!(
                    "{}:{}: skipping line without '=': {}",
                    self.context.file_name, self.line_number, text
                ));
            }
        }

        Ok(())
    }

    /// Feed every line of a dump. Input errors stop at the failing line.
    pub fn parse_reader<R: BufRead>(&mut self, reader: DumpReader<R>) -> RunResult<()> {
        for line in reader {
            self.process_line(&line?)?;
        }
        Ok(())
    }

    /// Hand the buffered entity to the sink, then clear the buffer.
    fn close_entity(&mut self, set_id: Option<String>) -> OutputResult<()> {
        if self.buffer.len() > 1 {
            let params = self.buffer.snapshot_and_clear();

            let written = match self.context.current_domain.as_deref() {
                Some(domain) => {
                    let entity = Entity {
                        context: &self.context,
                        domain,
                        set_id: set_id.as_deref().unwrap_or(""),
                        params: &params,
                    };
                    self.sink.write_entity(&entity)?
                }
                None => {
                    log_warning(format!(
                        "{}:{}: discarding entity {} outside any domain",
                        self.context.file_name,
                        self.line_number,
                        set_id.as_deref().unwrap_or("<none>")
                    ));
                    false
                }
            };

            if written {
                self.stats.entities_flushed += 1;
            } else {
                self.stats.entities_discarded += 1;
            }
        }

        self.buffer.clear();
        Ok(())
    }

    /// Stop parsing and return the sink with the final counters.
    pub fn into_parts(self) -> (S, ParseStats) {
        (self.sink, self.stats)
    }
}
