use serde_json::Value;

use super::Table;
use crate::error::IngestError;

/// Parse a JSON export: an array of row objects, or an object wrapping that
/// array under `rows` or `data` (the shape spreadsheet-to-JSON tools emit).
///
/// Headers are the union of keys across rows; columns are matched by name
/// later, so their order does not matter. Numbers and booleans are rendered
/// as text; `null` becomes an empty cell.
pub fn parse_json(content: &str, file: &str) -> Result<Table, IngestError> {
    let value: Value = serde_json::from_str(content).map_err(|source| IngestError::Json {
        file: file.to_string(),
        source,
    })?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("rows").or_else(|| map.remove("data")) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let mut headers: Vec<String> = Vec::new();
    for item in &items {
        if let Value::Object(obj) = item {
            for key in obj.keys() {
                let key = key.trim();
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.to_string());
                }
            }
        }
    }

    let rows = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let obj = item.as_object()?;
            let cells = headers
                .iter()
                .map(|h| {
                    obj.iter()
                        .find(|(k, _)| k.trim() == h)
                        .map(|(_, v)| cell_text(v))
                        .unwrap_or_default()
                })
                .collect();
            Some((i + 1, cells))
        })
        .collect();

    Ok(Table {
        file: file.to_string(),
        headers,
        rows,
    })
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_of_rows() {
        let content = r#"[
            {"Id": 1, "Tag": "appointment_created", "Durée": 45.5, "Id Externe": null},
            {"Id": "2", "Tag": "exam_found", "Statut": "Transféré"}
        ]"#;
        let table = parse_json(content, "rows.json").unwrap();
        assert_eq!(table.headers.len(), 5);
        let col = |name: &str| table.headers.iter().position(|h| h == name).unwrap();
        let first = &table.rows[0].1;
        assert_eq!(first[col("Id")], "1");
        assert_eq!(first[col("Durée")], "45.5");
        assert_eq!(first[col("Id Externe")], "");
        assert_eq!(first[col("Statut")], "");
        assert_eq!(table.rows[1].1[col("Statut")], "Transféré");
    }

    #[test]
    fn wrapped_rows() {
        let table = parse_json(r#"{"rows": [{"Id": "a"}]}"#, "w.json").unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn invalid_json_names_the_file() {
        let err = parse_json("{not json", "broken.json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
