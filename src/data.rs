use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::io::Read;

use crate::error::ChartError;

/// The raw automobile table: one header per column, rows kept as strings
/// so that empty or non-numeric cells survive loading and can be handled
/// by an explicit aggregation policy later.
#[derive(Debug, Clone)]
pub struct AutoData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl AutoData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read the dataset from any CSV source (file, stdin).
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.context("Failed to read CSV record")?;
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }

        if rows.is_empty() {
            return Err(anyhow!("CSV input must contain at least one data row"));
        }

        Ok(Self { headers, rows })
    }

    /// Create AutoData from a JSON array of objects.
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        if array.is_empty() {
            return Err(anyhow!("Input data array is empty"));
        }

        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;

        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::new();
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::new();
            for header in &headers {
                let val_str = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => "".to_string(),
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", header)),
                };
                row.push(val_str);
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Index of a column, matched case-insensitively.
    pub fn column_index(&self, name: &str) -> Result<usize, ChartError> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| ChartError::schema(name))
    }

    /// Headers of every column whose cells are numeric wherever non-empty,
    /// excluding the given category column. These become the radar spokes.
    pub fn numeric_columns(&self, category_key: &str) -> Result<Vec<String>, ChartError> {
        let cat_idx = self.column_index(category_key)?;
        let mut columns = Vec::new();
        for (idx, header) in self.headers.iter().enumerate() {
            if idx == cat_idx {
                continue;
            }
            let numeric = self.rows.iter().all(|row| {
                row.get(idx)
                    .map(|cell| cell.is_empty() || cell.parse::<f64>().is_ok())
                    .unwrap_or(false)
            });
            if numeric {
                columns.push(header.clone());
            }
        }
        Ok(columns)
    }
}

/// Parse one cell as a numeric value. Empty and malformed cells map to
/// None so the caller can apply the exclusion policy.
pub fn numeric_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok()
}

/// Distinct values of the category column, alphabetically sorted. This is
/// the canonical ordering every aggregated series is aligned to.
pub fn category_names(data: &AutoData, category_key: &str) -> Result<Vec<String>, ChartError> {
    let idx = data.column_index(category_key)?;
    let mut names: Vec<String> = data
        .rows
        .iter()
        .filter_map(|row| row.get(idx).cloned())
        .collect();
    names.sort();
    names.dedup();
    Ok(names)
}

/// 0-based ids for the sorted category labels: id `i` is the `i`-th label.
pub fn category_ids(data: &AutoData, category_key: &str) -> Result<Vec<usize>, ChartError> {
    let names = category_names(data, category_key)?;
    Ok((0..names.len()).collect())
}
