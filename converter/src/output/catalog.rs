//! Parameter catalog for extraction mode.
//!
//! Collects, per domain, every parameter name seen in a written entity, in
//! first-seen order. The text rendering is the parameter filter format, so
//! a catalog can be trimmed by hand and fed back with `-c`.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::{Entity, EntitySink};
use crate::error::OutputResult;
use crate::filter::ParameterFilter;

/// Meta names prefixed to each domain when meta fields are requested.
pub const META_FIELDS: [&str; 2] = ["FILENAME", "DATETIME"];

/// Rendering of an extracted catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    /// `<domain>:<p1>,<p2>,...` lines
    #[default]
    Text,
    /// `{"<domain>": ["<p1>", ...]}`
    Json,
}

/// Domain → ordered parameter names.
#[derive(Debug, Clone, Default)]
pub struct ParameterCatalog {
    filter: Option<ParameterFilter>,
    domains: IndexMap<String, IndexSet<String>>,
}

impl ParameterCatalog {
    pub fn new(filter: Option<ParameterFilter>) -> Self {
        Self {
            filter,
            domains: IndexMap::new(),
        }
    }

    fn retains(&self, domain: &str) -> bool {
        self.filter.as_ref().map_or(true, |f| f.contains_domain(domain))
    }

    /// Parameters recorded for a domain.
    pub fn parameters(&self, domain: &str) -> Option<impl Iterator<Item = &str>> {
        self.domains
            .get(domain)
            .map(|names| names.iter().map(String::as_str))
    }

    /// Domains with at least one recorded parameter, in order of appearance.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains
            .iter()
            .filter(|(_, names)| !names.is_empty())
            .map(|(domain, _)| domain.as_str())
    }

    fn columns(&self, names: &IndexSet<String>, meta_fields: bool) -> Vec<String> {
        let meta = META_FIELDS.iter().filter(|_| meta_fields).map(|s| s.to_string());
        meta.chain(names.iter().cloned()).collect()
    }

    /// Render in parameter filter format, one domain per line.
    pub fn to_text(&self, meta_fields: bool) -> String {
        let mut out = String::new();
        for (domain, names) in self.domains.iter().filter(|(_, n)| !n.is_empty()) {
            out.push_str(domain);
            out.push(':');
            out.push_str(&self.columns(names, meta_fields).join(","));
            out.push('\n');
        }
        out
    }

    /// Render as a JSON object.
    pub fn to_json(&self, meta_fields: bool) -> OutputResult<String> {
        let map: IndexMap<&str, Vec<String>> = self
            .domains
            .iter()
            .filter(|(_, n)| !n.is_empty())
            .map(|(domain, names)| (domain.as_str(), self.columns(names, meta_fields)))
            .collect();
        Ok(serde_json::to_string_pretty(&map)?)
    }

    pub fn render(&self, format: CatalogFormat, meta_fields: bool) -> OutputResult<String> {
        match format {
            CatalogFormat::Text => Ok(self.to_text(meta_fields)),
            CatalogFormat::Json => self.to_json(meta_fields),
        }
    }
}

impl EntitySink for ParameterCatalog {
    fn open_domain(&mut self, domain: &str) -> OutputResult<()> {
        if self.retains(domain) && !self.domains.contains_key(domain) {
            self.domains.insert(domain.to_string(), IndexSet::new());
        }
        Ok(())
    }

    fn write_entity(&mut self, entity: &Entity<'_>) -> OutputResult<bool> {
        let Some(names) = self.domains.get_mut(entity.domain) else {
            return Ok(false);
        };
        for name in entity.params.keys() {
            if !names.contains(name) {
                names.insert(name.clone());
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseContext;

    fn write(catalog: &mut ParameterCatalog, domain: &str, keys: &[&str]) -> bool {
        let ctx = ParseContext::default();
        let params: IndexMap<String, String> =
            keys.iter().map(|k| (k.to_string(), String::new())).collect();
        let entity = Entity { context: &ctx, domain, set_id: "E", params: &params };
        catalog.write_entity(&entity).unwrap()
    }

    #[test]
    fn test_union_in_first_seen_order() {
        let mut catalog = ParameterCatalog::new(None);
        catalog.open_domain("RNC").unwrap();
        write(&mut catalog, "RNC", &["a", "b"]);
        write(&mut catalog, "RNC", &["c", "a"]);

        let names: Vec<&str> = catalog.parameters("RNC").unwrap().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(catalog.to_text(false), "RNC:a,b,c\n");
    }

    #[test]
    fn test_meta_fields_prefix() {
        let mut catalog = ParameterCatalog::new(None);
        catalog.open_domain("Cell").unwrap();
        write(&mut catalog, "Cell", &["cId"]);

        assert_eq!(catalog.to_text(true), "Cell:FILENAME,DATETIME,cId\n");
    }

    #[test]
    fn test_filter_excludes_domains() {
        let filter = ParameterFilter::parse("Cell:cId").unwrap();
        let mut catalog = ParameterCatalog::new(Some(filter));
        catalog.open_domain("RNC").unwrap();

        assert!(!write(&mut catalog, "RNC", &["a", "b"]));
        assert_eq!(catalog.domains().count(), 0);
    }

    #[test]
    fn test_empty_domains_not_rendered() {
        let mut catalog = ParameterCatalog::new(None);
        catalog.open_domain("Empty").unwrap();
        assert_eq!(catalog.to_text(false), "");
    }

    #[test]
    fn test_text_round_trips_through_filter() {
        let mut catalog = ParameterCatalog::new(None);
        catalog.open_domain("RNC").unwrap();
        write(&mut catalog, "RNC", &["mcc", "mnc"]);

        let filter = ParameterFilter::parse(&catalog.to_text(false)).unwrap();
        assert_eq!(filter.columns("RNC").unwrap(), ["mcc", "mnc"]);
    }

    #[test]
    fn test_json_rendering() {
        let mut catalog = ParameterCatalog::new(None);
        catalog.open_domain("RNC").unwrap();
        write(&mut catalog, "RNC", &["mcc"]);

        let json = catalog.render(CatalogFormat::Json, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["RNC"], serde_json::json!(["FILENAME", "DATETIME", "mcc"]));
    }
}
