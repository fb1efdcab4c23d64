//! Loading price series from files.

use anyhow::{anyhow, bail, Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a series from a CSV file.
///
/// `column` is a header name or a zero-based index; without it the first
/// column whose first record parses as a number is used.
pub fn load_csv_data(path: &Path, column: Option<&str>) -> Result<Vec<f64>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader.headers().context("failed to read CSV headers")?.clone();
    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<std::result::Result<_, _>>()
        .context("failed to read CSV record")?;

    let col_idx = match column {
        Some(col) => match col.parse::<usize>() {
            Ok(idx) => idx,
            Err(_) => headers
                .iter()
                .position(|h| h.trim() == col)
                .ok_or_else(|| anyhow!("column '{}' not found", col))?,
        },
        None => records
            .first()
            .and_then(|first| first.iter().position(|v| v.trim().parse::<f64>().is_ok()))
            .ok_or_else(|| anyhow!("no numeric column in {}", path.display()))?,
    };

    let data: Vec<f64> = records
        .iter()
        .filter_map(|record| record.get(col_idx))
        .filter_map(|value| value.trim().parse::<f64>().ok())
        .collect();

    if data.is_empty() {
        bail!("no numeric data found in the selected column");
    }
    Ok(data)
}

/// Load a series from a JSON file: an array of numbers, an array of objects
/// carrying `column` (or `close`, `value`), or an object holding such an array.
pub fn load_json_data(path: &Path, column: Option<&str>) -> Result<Vec<f64>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let json: serde_json::Value =
        serde_json::from_reader(BufReader::new(file)).context("failed to parse JSON")?;
    extract_series(&json, column).ok_or_else(|| anyhow!("could not extract numeric data from JSON"))
}

fn extract_series(json: &serde_json::Value, column: Option<&str>) -> Option<Vec<f64>> {
    if let Some(arr) = json.as_array() {
        if !arr.is_empty() && arr.iter().all(|v| v.is_number()) {
            return Some(arr.iter().filter_map(|v| v.as_f64()).collect());
        }

        let mut keys: Vec<&str> = column.into_iter().collect();
        keys.extend(["close", "adj_close", "value"]);
        for key in keys {
            let data: Vec<f64> = arr
                .iter()
                .filter_map(|obj| obj.get(key).and_then(|v| v.as_f64()))
                .collect();
            if !data.is_empty() {
                return Some(data);
            }
        }
    }

    if let Some(obj) = json.as_object() {
        for key in ["data", "result", "values"] {
            if let Some(inner) = obj.get(key) {
                if let Some(data) = extract_series(inner, column) {
                    return Some(data);
                }
            }
        }
    }

    None
}

/// Load data from file, picking the format by extension.
pub fn load_data(path: &Path, column: Option<&str>) -> Result<Vec<f64>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_csv_data(path, column),
        "json" => load_json_data(path, column),
        _ => load_csv_data(path, column).or_else(|_| load_json_data(path, column)),
    }
}
