//! Parse state carried between lines.

use indexmap::IndexMap;

/// Run-scoped header values and entity identifiers.
///
/// Capabilities, subnetwork and timestamp are not reset between files; a
/// file that omits one of them inherits the previous file's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    /// Basename of the dump being parsed.
    pub file_name: String,
    pub capabilities: String,
    pub subnetwork: String,
    /// Raw `.utctime` payload.
    pub creation_date_time: String,
    pub current_domain: Option<String>,
    pub current_set_id: Option<String>,
    pub previous_set_id: Option<String>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a new input file. Set ids belong to the file they came from.
    pub fn begin_file(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
        self.current_set_id = None;
        self.previous_set_id = None;
    }

    /// Record a `.set` boundary. Returns the id of the entity it closes.
    pub fn advance_set(&mut self, set_id: String) -> Option<&str> {
        self.previous_set_id = self.current_set_id.replace(set_id);
        self.previous_set_id.as_deref()
    }
}

/// Parameters collected for the entity currently being read.
///
/// Keys keep their first-insertion position; re-putting a name overwrites
/// its value in place.
#[derive(Debug, Clone, Default)]
pub struct EntityBuffer {
    params: IndexMap<String, String>,
}

impl EntityBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    pub fn clear(&mut self) {
        self.params.clear();
    }

    /// Take the collected parameters, leaving the buffer empty.
    pub fn snapshot_and_clear(&mut self) -> IndexMap<String, String> {
        std::mem::take(&mut self.params)
    }
}
