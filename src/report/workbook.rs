use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ReportError;

/// Name of the manifest written next to the sheet files.
pub const MANIFEST_FILE: &str = "workbook.json";

/// Spreadsheet tools cap tab names at 31 characters.
pub const SHEET_NAME_MAX: usize = 31;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(u64),
}

impl Cell {
    pub fn text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Int(n) => n.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<u64> for Cell {
    fn from(n: u64) -> Self {
        Cell::Int(n)
    }
}

/// One tab: a header row and data rows. Rows may be shorter than the header.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Index of the first header matching any of `names`.
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| {
            self.headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
        })
    }

    /// Text of a cell, empty when the row is short.
    pub fn cell(&self, row: &[Cell], col: usize) -> String {
        row.get(col).map(Cell::text).unwrap_or_default()
    }

    /// Move the header down to the first row (within the first few) that
    /// contains `marker`. Decorated exports put a title line above the header.
    pub fn rebase_on(&mut self, marker: &str) {
        if self.column(&[marker]).is_some() {
            return;
        }
        let found = self
            .rows
            .iter()
            .take(5)
            .position(|row| row.iter().any(|c| c.text().trim() == marker));
        if let Some(i) = found {
            let header_row: Vec<Cell> = self.rows.remove(i);
            self.rows.drain(..i);
            self.headers = header_row.iter().map(|c| c.text().trim().to_string()).collect();
            debug!("Sheet '{}': header found on row {}", self.name, i + 2);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub generator: String,
    pub generated_at: DateTime<Utc>,
    pub sheets: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    /// Set when read from a directory with a manifest.
    pub generated_at: Option<DateTime<Utc>>,
}

/// Sheet names compare case-insensitively, with `_` and space treated alike,
/// so that tabs saved as file names are still found.
pub fn sheet_key(name: &str) -> String {
    name.trim().to_lowercase().replace('_', " ")
}

/// Cut a sheet name to `max` characters.
pub fn truncate_name(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

fn file_name_for(index: usize, name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{:02}_{safe}.csv", index + 1)
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        let key = sheet_key(name);
        self.sheets.iter().find(|s| sheet_key(&s.name) == key)
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Write one CSV per sheet plus the manifest into `dir`, creating it.
    pub fn write_dir(&self, dir: &Path) -> Result<Manifest, ReportError> {
        std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut entries = Vec::with_capacity(self.sheets.len());
        for (i, sheet) in self.sheets.iter().enumerate() {
            let file = file_name_for(i, &sheet.name);
            let path = dir.join(&file);
            write_sheet(sheet, &path)?;
            entries.push(ManifestEntry {
                name: sheet.name.clone(),
                file,
            });
        }

        let manifest = Manifest {
            generator: format!("allostat {}", env!("CARGO_PKG_VERSION")),
            generated_at: Utc::now(),
            sheets: entries,
        };
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| ReportError::Corrupted(format!("manifest: {e}")))?;
        std::fs::write(&path, json).map_err(|source| ReportError::Io { path, source })?;
        Ok(manifest)
    }

    /// Read a report directory. Without a manifest every `*.csv` file becomes
    /// a sheet named after its file stem, in file-name order.
    pub fn read_dir(dir: &Path) -> Result<Self, ReportError> {
        if !dir.is_dir() {
            return Err(ReportError::Io {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            });
        }

        let manifest_path = dir.join(MANIFEST_FILE);
        if manifest_path.exists() {
            let content = std::fs::read_to_string(&manifest_path).map_err(|source| {
                ReportError::Io {
                    path: manifest_path.clone(),
                    source,
                }
            })?;
            let manifest: Manifest = serde_json::from_str(&content)
                .map_err(|e| ReportError::Corrupted(format!("{MANIFEST_FILE}: {e}")))?;

            let mut workbook = Workbook {
                sheets: Vec::with_capacity(manifest.sheets.len()),
                generated_at: Some(manifest.generated_at),
            };
            for entry in &manifest.sheets {
                let path = dir.join(&entry.file);
                if !path.is_file() {
                    return Err(ReportError::Corrupted(format!(
                        "sheet '{}' listed in {MANIFEST_FILE} but {} is missing",
                        entry.name, entry.file
                    )));
                }
                workbook.push(read_sheet(&entry.name, &path)?);
            }
            return Ok(workbook);
        }

        warn!("No {MANIFEST_FILE} in {}, reading CSV files by name", dir.display());
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|source| ReportError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("csv"))
            .collect();
        files.sort();

        let mut workbook = Workbook::new();
        for path in files {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            workbook.push(read_sheet(strip_index(stem), &path)?);
        }
        Ok(workbook)
    }
}

/// `03_Stats_Non_trouvés` → `Stats_Non_trouvés`.
fn strip_index(stem: &str) -> &str {
    match stem.split_once('_') {
        Some((n, rest)) if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => stem,
    }
}

fn write_sheet(sheet: &Sheet, path: &Path) -> Result<(), ReportError> {
    let csv_err = |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    writer.write_record(&sheet.headers).map_err(csv_err)?;
    for row in &sheet.rows {
        writer
            .write_record(row.iter().map(Cell::text))
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn read_sheet(name: &str, path: &Path) -> Result<Sheet, ReportError> {
    let corrupted = |e: csv::Error| ReportError::Corrupted(format!("{}: {e}", path.display()));
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(corrupted)?;

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(corrupted)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(corrupted)?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(Cell::from).collect());
    }

    Ok(Sheet {
        name: name.to_string(),
        headers,
        rows,
    })
}
