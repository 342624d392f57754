use crate::error::{Error, Result};
use crate::models::ResultSet;
use crate::registry::Registry;
use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;

/// Compiled exclusion patterns
///
/// Patterns use shell-glob syntax (`*`, `?`, `[...]`, `[^...]`, `\` escapes)
/// and wildcards never cross a path separator. They are matched against the
/// path exactly as the walk produced it, so a run must stick to either
/// absolute or root-relative paths.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    matchers: Vec<GlobMatcher>,
}

impl ExclusionSet {
    /// Compile every pattern, failing on the first invalid one
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let matchers = patterns
            .iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { matchers })
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.matchers.iter().any(|matcher| matcher.is_match(path))
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

/// Check one path against a list of glob patterns without keeping them
pub fn is_excluded<S: AsRef<str>>(path: &Path, patterns: &[S]) -> Result<bool> {
    for pattern in patterns {
        if compile(pattern.as_ref())?.is_match(path) {
            return Ok(true);
        }
    }

    Ok(false)
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(&to_globset_syntax(pattern))
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| Error::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Rewrite a shell glob into the globset dialect
///
/// Runs of `*` collapse to one so `**` never spans directories, braces are
/// literal, `[^...]` negates and a leading `!` inside a class is literal.
fn to_globset_syntax(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '*' => {
                out.push('*');
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
            }
            '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '[' => {
                let negated = chars.next_if_eq(&'^').is_some();
                let literal_bang = !negated && chars.next_if_eq(&'!').is_some();

                let mut body = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    body.push(c);
                }

                if !closed {
                    // Left unclosed so the compiler reports it
                    out.push('[');
                    if literal_bang {
                        out.push('!');
                    }
                    out.push_str(&body);
                } else if negated {
                    out.push_str(&format!("[!{}]", body));
                } else if literal_bang && body.is_empty() {
                    out.push_str("\\!");
                } else if literal_bang {
                    out.push_str(&format!("[{}!]", body));
                } else {
                    out.push_str(&format!("[{}]", body));
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Keep only one keyword (case-insensitive exact match)
pub fn filter_by_keyword(mut results: ResultSet, keyword: &str) -> ResultSet {
    let keyword_lower = keyword.to_lowercase();
    results.retain(|k| k.to_lowercase() == keyword_lower);
    results
}

/// Keep keywords whose registered priority is at least `min_priority`
///
/// Keywords the registry does not know are dropped.
pub fn filter_by_priority(
    mut results: ResultSet,
    registry: &Registry,
    min_priority: i64,
) -> ResultSet {
    results.retain(|k| {
        registry
            .lookup(k)
            .map(|annotation| annotation.priority >= min_priority)
            .unwrap_or(false)
    });
    results
}
