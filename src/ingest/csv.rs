use super::Table;
use crate::error::IngestError;

/// Parse a CSV export. The delimiter (`,` `;` or tab) is guessed from the
/// header line; French spreadsheet exports usually use `;`.
pub fn parse_csv(content: &str, file: &str) -> Result<Table, IngestError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let delimiter = detect_delimiter(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(content.as_bytes());

    let csv_err = |source| IngestError::Csv {
        file: file.to_string(),
        source,
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        // header is line 1
        let line = record.position().map(|p| p.line() as usize).unwrap_or(rows.len() + 2);
        rows.push((line, record.iter().map(str::to_string).collect()));
    }

    Ok(Table {
        file: file.to_string(),
        headers,
        rows,
    })
}

fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    [b';', b'\t', b',']
        .into_iter()
        .map(|d| (d, header.bytes().filter(|b| *b == d).count()))
        .max_by_key(|(_, n)| *n)
        .filter(|(_, n)| *n > 0)
        .map(|(d, _)| d)
        .unwrap_or(b',')
}
