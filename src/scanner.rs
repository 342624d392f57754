use crate::error::{Error, Result};
use crate::filters::ExclusionSet;
use crate::models::{MatchRecord, ResultSet};
use crate::registry::Registry;
use ignore::WalkBuilder;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// Walk a directory tree and collect every annotation in it
///
/// Any traversal, exclusion or file error aborts the whole run; no partial
/// results are returned.
pub fn scan_directory(
    root: &Path,
    registry: &Registry,
    exclusions: &ExclusionSet,
) -> Result<ResultSet> {
    fs::metadata(root).map_err(|source| Error::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut results = ResultSet::new();

    // Every entry is visited; only the configured exclusions filter the tree
    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    for entry in walker.build() {
        let entry = entry.map_err(Error::Walk)?;

        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        if exclusions.is_excluded(entry.path()) {
            debug!(path = %entry.path().display(), "skipping excluded file");
            continue;
        }

        let file_results = scan_file(entry.path(), registry)?;
        debug!(
            path = %entry.path().display(),
            matches = file_results.total_count(),
            "scanned file"
        );
        results.merge(file_results);
    }

    Ok(results)
}

/// Scan a single file for annotations
///
/// Lines that fail to match (undecodable text, unknown keyword) are skipped.
pub fn scan_file(path: &Path, registry: &Registry) -> Result<ResultSet> {
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let metadata = file.metadata().map_err(io_error)?;

    let mut results = ResultSet::new();

    // A symlink to a directory opens fine but has no lines to read
    if metadata.is_dir() {
        return Ok(results);
    }

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let reader = BufReader::new(file);

    for (idx, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.map_err(io_error)?;
        let row = idx + 1; // Convert to 1-indexed

        let matched =
            decode_line(bytes, row).and_then(|line| match_line(&line, &filename, row, registry));

        match matched {
            Ok(Some(record)) => results.push(record),
            Ok(None) => {}
            Err(err) if err.is_line_local() => {
                trace!(file = %filename, row, error = %err, "skipping line");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(results)
}

/// Find a registered keyword in one line of text
///
/// The instruction is everything after the first colon that follows the
/// keyword, or empty when there is none.
pub fn match_line(
    line: &str,
    filename: &str,
    row: usize,
    registry: &Registry,
) -> Result<Option<MatchRecord>> {
    let Some(pattern) = registry.pattern() else {
        return Ok(None);
    };

    let Some(found) = pattern.find(line) else {
        return Ok(None);
    };

    let annotation = registry
        .lookup(found.as_str())
        .ok_or_else(|| Error::KeywordNotFound(found.as_str().to_string()))?;

    let instruction = line[found.end()..]
        .split_once(':')
        .map(|(_, rest)| rest.to_string())
        .unwrap_or_default();

    Ok(Some(MatchRecord {
        annotation_text: annotation.text.clone(),
        instruction,
        filename: filename.to_string(),
        row,
    }))
}

fn decode_line(mut bytes: Vec<u8>, row: usize) -> Result<String> {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    String::from_utf8(bytes).map_err(|_| Error::MatchDecode { row })
}
