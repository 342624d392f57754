use crate::registry::Registry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// A recognized annotation keyword and how to display it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// The keyword itself (TODO, FIXME, ...), unique within a registry
    pub text: String,

    /// Display color name (yellow, cyan, magenta, red, ...)
    pub color: String,

    pub priority: i64,
}

impl Annotation {
    pub fn new(text: impl Into<String>, color: impl Into<String>, priority: i64) -> Self {
        Self {
            text: text.into(),
            color: color.into(),
            priority,
        }
    }

    /// The built-in keyword set used when no overlay replaces it
    pub fn defaults() -> Vec<Annotation> {
        vec![
            Annotation::new("TODO", "yellow", 1),
            Annotation::new("FIXME", "cyan", 1),
            Annotation::new("URGENT", "magenta", 1),
            Annotation::new("BUG", "red", 1),
        ]
    }
}

/// One located occurrence of a keyword within a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Keyword that matched; always present in the registry that produced it
    pub annotation_text: String,

    /// Free text after the first colon following the keyword
    pub instruction: String,

    /// Base name of the file containing the match
    pub filename: String,

    /// Line number where the keyword was found (1-indexed, 0 means not found)
    pub row: usize,
}

/// Occurrences grouped by keyword, each group in walk order then line order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    groups: HashMap<String, Vec<MatchRecord>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record to its keyword's sequence
    pub fn push(&mut self, record: MatchRecord) {
        self.groups
            .entry(record.annotation_text.clone())
            .or_default()
            .push(record);
    }

    /// Append every sequence of `other` onto the matching sequence of `self`
    pub fn merge(&mut self, other: ResultSet) {
        for (keyword, records) in other.groups {
            self.groups.entry(keyword).or_default().extend(records);
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&[MatchRecord]> {
        self.groups.get(keyword).map(Vec::as_slice)
    }

    /// Keywords present in the set, in no particular order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.groups.retain(|keyword, _| keep(keyword));
    }

    /// Total number of records across every keyword
    pub fn total_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }
}

/// Configuration overlay as it appears on disk
///
/// Fields left out of the file keep their defaults; fields that are present,
/// even as empty lists, replace them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigOverlay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<Annotation>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded: Option<Vec<String>>,
}

/// Effective configuration for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory to scan when none is given on the command line
    pub path: Option<PathBuf>,

    /// Keywords to search for, in display order
    pub keywords: Vec<Annotation>,

    /// Glob patterns of paths to skip
    pub excluded: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            keywords: Annotation::defaults(),
            excluded: Vec::new(),
        }
    }
}

impl Config {
    /// Apply an overlay on top of this configuration, replacing whole lists
    pub fn apply(mut self, overlay: ConfigOverlay) -> Self {
        if let Some(path) = overlay.path {
            self.path = Some(path);
        }
        if let Some(keywords) = overlay.keywords {
            self.keywords = keywords;
        }
        if let Some(excluded) = overlay.excluded {
            self.excluded = excluded;
        }
        self
    }

    pub fn to_overlay(&self) -> ConfigOverlay {
        ConfigOverlay {
            path: self.path.clone(),
            keywords: Some(self.keywords.clone()),
            excluded: Some(self.excluded.clone()),
        }
    }
}

/// All occurrences of one keyword, ready for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSection {
    pub keyword: String,
    pub color: String,
    pub priority: i64,
    pub matches: Vec<MatchRecord>,
}

/// Complete report of the annotations found in a tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationReport {
    /// Non-empty sections in registry order
    pub sections: Vec<KeywordSection>,

    /// Total number of emitted matches
    pub total_count: usize,

    /// Count of matches by keyword
    pub by_keyword: HashMap<String, usize>,

    /// Count of matches by file name
    pub by_file: HashMap<String, usize>,

    /// Path that was scanned
    pub scan_path: PathBuf,

    /// When the scan was performed
    pub scan_time: DateTime<Utc>,
}

impl AnnotationReport {
    /// Build a report from a result set, dropping keywords the registry does
    /// not know and not-found sentinel rows
    pub fn new(results: &ResultSet, registry: &Registry, scan_path: PathBuf) -> Self {
        let mut sections = Vec::new();
        let mut by_keyword: HashMap<String, usize> = HashMap::new();
        let mut by_file: HashMap<String, usize> = HashMap::new();

        for annotation in registry.annotations() {
            let matches: Vec<MatchRecord> = results
                .get(&annotation.text)
                .unwrap_or_default()
                .iter()
                .filter(|record| record.row != 0)
                .cloned()
                .collect();

            if matches.is_empty() {
                continue;
            }

            for record in &matches {
                *by_file.entry(record.filename.clone()).or_insert(0) += 1;
            }
            by_keyword.insert(annotation.text.clone(), matches.len());

            sections.push(KeywordSection {
                keyword: annotation.text.clone(),
                color: annotation.color.clone(),
                priority: annotation.priority,
                matches,
            });
        }

        let total_count = by_keyword.values().sum();

        Self {
            sections,
            total_count,
            by_keyword,
            by_file,
            scan_path,
            scan_time: Utc::now(),
        }
    }
}
