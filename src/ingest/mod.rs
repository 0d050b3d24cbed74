pub mod csv;
pub mod json;

use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::analysis::model::OutcomeTag;
use crate::config::ColumnNames;
use crate::error::IngestError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" | "tsv" | "txt" => Some(Format::Csv),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    pub fn detect_from_extension(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::from_str(ext),
            None => None,
        }
    }
}

/// A parsed export before column mapping: trimmed headers and raw cells,
/// each row with its line number in the source.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub file: String,
    pub headers: Vec<String>,
    pub rows: Vec<(usize, Vec<String>)>,
}

/// One export row mapped onto the known columns, tag resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub source: String,
    pub line: usize,
    pub tag: OutcomeTag,
    pub call_id: String,
    pub external_id: String,
    pub status: String,
    pub exam: String,
    /// `None` when the export has no duration column.
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions<'a> {
    pub columns: &'a ColumnNames,
    /// File-level tag for exports without a tag column.
    pub tag_override: Option<OutcomeTag>,
    pub format_override: Option<Format>,
}

/// Rows read so far, plus how many input rows were seen in total.
#[derive(Debug, Default)]
struct Batch {
    rows: Vec<RawRow>,
    seen: usize,
}

impl Batch {
    fn finish(self) -> Result<Vec<RawRow>, IngestError> {
        if self.seen == 0 {
            return Err(IngestError::EmptyInput);
        }
        if self.rows.is_empty() {
            return Err(IngestError::NoRecognizedTag { rows: self.seen });
        }
        Ok(self.rows)
    }
}

/// Ingest one or more paths (files, directories or glob patterns).
pub fn ingest_paths(paths: &[String], opts: &IngestOptions) -> Result<Vec<RawRow>, IngestError> {
    let mut batch = Batch::default();

    for path_str in paths {
        let path = Path::new(path_str);
        if path.is_dir() {
            ingest_directory(&mut batch, path, opts)?;
        } else if path.is_file() {
            ingest_file(&mut batch, path, opts)?;
        } else {
            // Try glob pattern
            let matches: Vec<_> = glob::glob(path_str)
                .map_err(|_| IngestError::NoMatch(path_str.clone()))?
                .filter_map(|r| r.ok())
                .collect();

            if matches.is_empty() {
                return Err(IngestError::NoMatch(path_str.clone()));
            }

            for entry in matches {
                if entry.is_file() {
                    ingest_file(&mut batch, &entry, opts)?;
                }
            }
        }
    }

    info!("Read {} rows ({} with a recognized tag)", batch.seen, batch.rows.len());
    batch.finish()
}

/// Ingest from stdin. Without a forced format, content starting with `[` or
/// `{` is read as JSON.
pub fn ingest_stdin(opts: &IngestOptions) -> Result<Vec<RawRow>, IngestError> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .map_err(|source| IngestError::Io {
            path: "stdin".into(),
            source,
        })?;
    ingest_str(&content, "stdin", opts)
}

/// Ingest an in-memory export.
pub fn ingest_str(content: &str, name: &str, opts: &IngestOptions) -> Result<Vec<RawRow>, IngestError> {
    if content.trim().is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let format = opts.format_override.unwrap_or_else(|| {
        let trimmed = content.trim_start_matches('\u{feff}').trim_start();
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            Format::Json
        } else {
            Format::Csv
        }
    });

    let mut batch = Batch::default();
    let table = parse_content(content, name, format)?;
    let file_tag = opts.tag_override.or_else(|| OutcomeTag::detect_from_file_name(name));
    rows_from_table(&mut batch, &table, opts.columns, file_tag)?;
    batch.finish()
}

fn ingest_directory(batch: &mut Batch, dir: &Path, opts: &IngestOptions) -> Result<(), IngestError> {
    let io_err = |source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            ingest_directory(batch, &path, opts)?;
        } else if path.is_file() {
            // Only process known extensions unless format is overridden
            if opts.format_override.is_some() || Format::detect_from_extension(&path).is_some() {
                ingest_file(batch, &path, opts)?;
            }
        }
    }

    Ok(())
}

fn ingest_file(batch: &mut Batch, path: &Path, opts: &IngestOptions) -> Result<(), IngestError> {
    let format = opts
        .format_override
        .or_else(|| Format::detect_from_extension(path))
        .ok_or_else(|| IngestError::UnknownFormat(path.to_path_buf()))?;

    let content = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let table = parse_content(&content, filename, format)?;
    let file_tag = opts
        .tag_override
        .or_else(|| OutcomeTag::detect_from_file_name(filename));
    let before = batch.rows.len();
    rows_from_table(batch, &table, opts.columns, file_tag)?;
    info!(
        "Read {} ({} rows kept of {})",
        path.display(),
        batch.rows.len() - before,
        table.rows.len()
    );
    Ok(())
}

fn parse_content(content: &str, filename: &str, format: Format) -> Result<Table, IngestError> {
    match format {
        Format::Csv => csv::parse_csv(content, filename),
        Format::Json => json::parse_json(content, filename),
    }
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    let name = name.trim().to_lowercase();
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase() == name)
}

/// Map table rows onto [`RawRow`]s, resolving each row's tag from its own
/// column first, then from the file-level tag.
fn rows_from_table(
    batch: &mut Batch,
    table: &Table,
    columns: &ColumnNames,
    file_tag: Option<OutcomeTag>,
) -> Result<(), IngestError> {
    if table.headers.is_empty() && table.rows.is_empty() {
        warn!("{} is empty", table.file);
        return Ok(());
    }

    let required = |name: &str| {
        find_column(&table.headers, name).ok_or_else(|| IngestError::MissingColumn {
            column: name.to_string(),
            file: table.file.clone(),
        })
    };
    let id = required(&columns.id)?;
    let external_id = required(&columns.external_id)?;
    let status = required(&columns.status)?;
    let exam = required(&columns.exam)?;
    let duration = find_column(&table.headers, &columns.duration);
    let tag_col = find_column(&table.headers, &columns.tag);

    if tag_col.is_none() && file_tag.is_none() {
        return Err(IngestError::MissingTag {
            column: columns.tag.clone(),
            file: table.file.clone(),
        });
    }

    let cell = |cells: &[String], i: usize| cells.get(i).cloned().unwrap_or_default();

    for (line, cells) in &table.rows {
        batch.seen += 1;
        let tag = match tag_col {
            Some(i) => match cells.get(i).map(|s| s.trim()).filter(|s| !s.is_empty()) {
                Some(raw) => OutcomeTag::from_str(raw),
                None => file_tag,
            },
            None => file_tag,
        };
        let Some(tag) = tag else {
            debug!("Skipping row {line} of {}: unrecognized tag", table.file);
            continue;
        };

        batch.rows.push(RawRow {
            source: table.file.clone(),
            line: *line,
            tag,
            call_id: cell(cells, id),
            external_id: cell(cells, external_id),
            status: cell(cells, status),
            exam: cell(cells, exam),
            duration: duration.map(|i| cell(cells, i)),
        });
    }

    Ok(())
}
