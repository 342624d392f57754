use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::models::{AnnotationReport, ResultSet};
use crate::registry::Registry;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Generate and output a report in the specified format
pub fn generate_report(
    results: &ResultSet,
    registry: &Registry,
    scan_path: &Path,
    format: OutputFormat,
    align: bool,
    output_path: Option<&Path>,
) -> Result<()> {
    if let Some(path) = output_path {
        let io_error = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        write_report(&mut writer, results, registry, scan_path, format, align).map_err(io_error)?;
        writer.flush().map_err(io_error)?;
        info!(path = %path.display(), "report written");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_report(&mut handle, results, registry, scan_path, format, align).map_err(|source| {
            Error::Io {
                path: "<stdout>".into(),
                source,
            }
        })?;
    }

    Ok(())
}

/// Write a report to any sink
pub fn write_report<W: Write>(
    sink: &mut W,
    results: &ResultSet,
    registry: &Registry,
    scan_path: &Path,
    format: OutputFormat,
    align: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Text if align => render_aligned(results, registry, sink),
        OutputFormat::Text => render(results, registry, sink),
        OutputFormat::Markdown => {
            let report = AnnotationReport::new(results, registry, scan_path.to_path_buf());
            sink.write_all(format_markdown(&report).as_bytes())
        }
        OutputFormat::Json => {
            let report = AnnotationReport::new(results, registry, scan_path.to_path_buf());
            serde_json::to_writer_pretty(&mut *sink, &report)?;
            writeln!(sink)
        }
    }
}

/// Write one colorized section per keyword, in registry order
///
/// Each match is a line of the form `  -<instruction>\t<file>:<row>`.
pub fn render<W: Write>(results: &ResultSet, registry: &Registry, sink: &mut W) -> io::Result<()> {
    for annotation in registry.annotations() {
        let Some(records) = results.get(&annotation.text) else {
            continue;
        };
        if records.is_empty() {
            continue;
        }

        writeln!(sink, "{}", annotation.text.as_str().color(annotation.color.as_str()))?;

        for record in records.iter().filter(|r| r.row != 0) {
            writeln!(sink, "  -{}\t{}:{}", record.instruction, record.filename, record.row)?;
        }
    }

    Ok(())
}

/// Same sections as [`render`], with matches laid out as a table
pub fn render_aligned<W: Write>(
    results: &ResultSet,
    registry: &Registry,
    sink: &mut W,
) -> io::Result<()> {
    for annotation in registry.annotations() {
        let records: Vec<_> = results
            .get(&annotation.text)
            .unwrap_or_default()
            .iter()
            .filter(|r| r.row != 0)
            .collect();
        if records.is_empty() {
            continue;
        }

        writeln!(sink, "{}", annotation.text.as_str().color(annotation.color.as_str()))?;

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Instruction").fg(Color::Cyan),
                Cell::new("File").fg(Color::Cyan),
                Cell::new("Line").fg(Color::Cyan),
            ]);

        for record in records {
            table.add_row(vec![
                Cell::new(record.instruction.trim()),
                Cell::new(&record.filename),
                Cell::new(record.row.to_string()),
            ]);
        }

        writeln!(sink, "{}", table)?;
    }

    Ok(())
}

/// Format report as Markdown
fn format_markdown(report: &AnnotationReport) -> String {
    let mut output = String::new();

    output.push_str("# Annotations\n\n");
    output.push_str(&format!("**Scanned**: `{}`\n", report.scan_path.display()));
    output.push_str(&format!("**Total**: {}\n", report.total_count));
    output.push_str(&format!(
        "**Generated**: {}\n\n",
        report.scan_time.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    for section in &report.sections {
        output.push_str(&format!("## {} ({})\n\n", section.keyword, section.matches.len()));

        for record in &section.matches {
            let instruction = record.instruction.trim();
            let instruction = if instruction.is_empty() {
                "(no description)"
            } else {
                instruction
            };
            output.push_str(&format!("- {} `{}:{}`\n", instruction, record.filename, record.row));
        }
        output.push('\n');
    }

    output
}
