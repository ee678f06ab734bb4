//! Parameter filter loading.
//!
//! A filter file lists, per domain, the parameters to keep and their column
//! order:
//!
//! ```text
//! UtranCell:cId,localCellId,maximumTransmissionPower
//! RNC:rncId,mcc,mnc
//! ```
//!
//! Only the first `:` separates the domain from its list. The list is split
//! on `,` verbatim: no trimming, no deduplication, blank entries stay blank
//! columns. A later line for the same domain replaces the earlier one.

use indexmap::IndexMap;
use std::path::Path;

use crate::error::{FilterError, FilterResult};

/// Ordered domain → parameter list mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterFilter {
    domains: IndexMap<String, Vec<String>>,
}

impl ParameterFilter {
    /// Parse filter definitions from text.
    pub fn parse(content: &str) -> FilterResult<Self> {
        let mut domains = IndexMap::new();

        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let (domain, params) = line.split_once(':').ok_or_else(|| {
                FilterError::MissingSeparator {
                    line: idx + 1,
                    content: line.to_string(),
                }
            })?;

            let params: Vec<String> = params.split(',').map(String::from).collect();
            domains.insert(domain.to_string(), params);
        }

        Ok(Self { domains })
    }

    /// Load filter definitions from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> FilterResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Whether this domain is retained.
    pub fn contains_domain(&self, domain: &str) -> bool {
        self.domains.contains_key(domain)
    }

    /// Configured columns for a domain, in file order.
    pub fn columns(&self, domain: &str) -> Option<&[String]> {
        self.domains.get(domain).map(Vec::as_slice)
    }

    /// Configured domains, in file order.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
