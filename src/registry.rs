use crate::error::{Error, Result};
use crate::models::{Annotation, Config};
use regex::Regex;
use std::collections::HashSet;
use std::path::PathBuf;

/// The set of keywords a run searches for, plus their combined pattern
#[derive(Debug, Clone)]
pub struct Registry {
    annotations: Vec<Annotation>,
    pattern: Option<Regex>,
}

impl Registry {
    /// Build a registry from keywords in display order
    ///
    /// Keyword texts must be non-empty and unique.
    pub fn new(annotations: Vec<Annotation>) -> Result<Self> {
        let mut seen = HashSet::new();
        for annotation in &annotations {
            if annotation.text.is_empty() {
                return Err(invalid_keywords("keyword text must not be empty"));
            }
            if !seen.insert(annotation.text.as_str()) {
                return Err(invalid_keywords(format!(
                    "keyword {} is listed more than once",
                    annotation.text
                )));
            }
        }

        let pattern = build_keyword_regex(&annotations)?;

        Ok(Self {
            annotations,
            pattern,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.keywords.clone())
    }

    /// Exact, case-sensitive lookup by keyword text
    pub fn lookup(&self, text: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.text == text)
    }

    /// Combined pattern of every keyword; `None` for an empty registry
    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        let annotations = Annotation::defaults();
        let pattern = build_keyword_regex(&annotations).ok().flatten();
        Self {
            annotations,
            pattern,
        }
    }
}

fn invalid_keywords(message: impl Into<String>) -> Error {
    Error::Config {
        path: PathBuf::from("keywords"),
        message: message.into(),
    }
}

/// Build an alternation of the keyword texts, each escaped so it matches
/// only as a literal substring
fn build_keyword_regex(annotations: &[Annotation]) -> Result<Option<Regex>> {
    if annotations.is_empty() {
        return Ok(None);
    }

    let alternation = annotations
        .iter()
        .map(|a| regex::escape(&a.text))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&format!("(?:{})", alternation))
        .map(Some)
        .map_err(|e| invalid_keywords(e.to_string()))
}
