use std::collections::HashMap;

use crate::data::{category_names, numeric_cell, AutoData};
use crate::error::ChartError;

/// Reduction applied over a numeric column within one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Min,
    Mean,
    Max,
}

/// Per-category reduced values for one numeric column, aligned to the
/// canonical (alphabetical) category order: `values[i]` belongs to the
/// `i`-th sorted category label.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    pub column: String,
    pub reduction: Reduction,
    pub values: Vec<f64>,
}

impl AggregatedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Group rows by the category column and reduce one numeric column.
///
/// Empty or non-numeric cells are excluded from the reduction for this
/// column only. A category whose every cell was excluded is an error:
/// there is nothing defensible to plot for it.
pub fn aggregate(
    data: &AutoData,
    category_key: &str,
    value_key: &str,
    reduction: Reduction,
) -> Result<AggregatedSeries, ChartError> {
    let cat_idx = data.column_index(category_key)?;
    let val_idx = data.column_index(value_key)?;

    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
    for row in &data.rows {
        let category = row[cat_idx].as_str();
        let entry = groups.entry(category).or_default();
        if let Some(value) = numeric_cell(&row[val_idx]) {
            entry.push(value);
        }
    }

    let names = category_names(data, category_key)?;
    let mut values = Vec::with_capacity(names.len());
    for name in &names {
        let samples = groups
            .get(name.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ChartError::AggregationPolicy {
                column: value_key.to_string(),
                category: name.clone(),
            })?;
        values.push(reduce(samples, reduction));
    }

    Ok(AggregatedSeries {
        column: value_key.to_string(),
        reduction,
        values,
    })
}

/// Reduce several columns at once. All returned series share the same
/// category ordering, keyed by column name in the requested order.
pub fn aggregate_many(
    data: &AutoData,
    category_key: &str,
    value_keys: &[String],
    reduction: Reduction,
) -> Result<Vec<AggregatedSeries>, ChartError> {
    value_keys
        .iter()
        .map(|key| aggregate(data, category_key, key, reduction))
        .collect()
}

fn reduce(samples: &[f64], reduction: Reduction) -> f64 {
    match reduction {
        Reduction::Min => samples.iter().cloned().fold(f64::INFINITY, f64::min),
        Reduction::Max => samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        Reduction::Mean => samples.iter().sum::<f64>() / samples.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AutoData;

    fn make_data(rows: Vec<Vec<&str>>) -> AutoData {
        AutoData::new(
            vec!["make".to_string(), "price".to_string(), "losses".to_string()],
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn sample_data() -> AutoData {
        make_data(vec![
            vec!["alfa", "10", "1"],
            vec!["alfa", "30", "3"],
            vec!["bmw", "20", "2"],
        ])
    }

    #[test]
    fn test_aggregate_mean_scenario() {
        let data = sample_data();
        let mean = aggregate(&data, "make", "price", Reduction::Mean).unwrap();
        assert_eq!(mean.values, vec![20.0, 20.0]);
    }

    #[test]
    fn test_aggregate_min_max_scenario() {
        let data = sample_data();
        let min = aggregate(&data, "make", "price", Reduction::Min).unwrap();
        let max = aggregate(&data, "make", "price", Reduction::Max).unwrap();
        assert_eq!(min.values, vec![10.0, 20.0]);
        assert_eq!(max.values, vec![30.0, 20.0]);
    }

    #[test]
    fn test_aggregate_ordering_matches_category_names() {
        // Rows arrive bmw-first; series must still come out alfa-first.
        let data = make_data(vec![vec!["bmw", "20", "2"], vec!["alfa", "10", "1"]]);
        let names = category_names(&data, "make").unwrap();
        let series = aggregate(&data, "make", "price", Reduction::Mean).unwrap();
        assert_eq!(names, vec!["alfa", "bmw"]);
        assert_eq!(series.len(), names.len());
        assert_eq!(series.values, vec![10.0, 20.0]);
    }

    #[test]
    fn test_min_mean_max_invariant() {
        let data = sample_data();
        let min = aggregate(&data, "make", "price", Reduction::Min).unwrap();
        let mean = aggregate(&data, "make", "price", Reduction::Mean).unwrap();
        let max = aggregate(&data, "make", "price", Reduction::Max).unwrap();
        for i in 0..min.len() {
            assert!(min.values[i] <= mean.values[i]);
            assert!(mean.values[i] <= max.values[i]);
        }
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let data = sample_data();
        let first = aggregate(&data, "make", "price", Reduction::Mean).unwrap();
        let second = aggregate(&data, "make", "price", Reduction::Mean).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_cell_excluded_from_reduction() {
        let data = make_data(vec![
            vec!["alfa", "10", "1"],
            vec!["alfa", "", "3"],
            vec!["bmw", "20", "2"],
        ]);
        let mean = aggregate(&data, "make", "price", Reduction::Mean).unwrap();
        // The empty alfa price is skipped; only the valid row counts.
        assert_eq!(mean.values, vec![10.0, 20.0]);
        // The same row still participates in other columns.
        let losses = aggregate(&data, "make", "losses", Reduction::Max).unwrap();
        assert_eq!(losses.values, vec![3.0, 2.0]);
    }

    #[test]
    fn test_all_cells_missing_is_policy_error() {
        let data = make_data(vec![vec!["alfa", "", "1"], vec!["bmw", "20", "2"]]);
        let result = aggregate(&data, "make", "price", Reduction::Mean);
        assert!(matches!(
            result,
            Err(ChartError::AggregationPolicy { .. })
        ));
    }

    #[test]
    fn test_unknown_column_is_schema_error() {
        let data = sample_data();
        let result = aggregate(&data, "make", "horsepower", Reduction::Mean);
        assert!(matches!(result, Err(ChartError::Schema { .. })));
    }

    #[test]
    fn test_aggregate_many_shares_ordering() {
        let data = sample_data();
        let keys = vec!["price".to_string(), "losses".to_string()];
        let series = aggregate_many(&data, "make", &keys, Reduction::Min).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].column, "price");
        assert_eq!(series[1].column, "losses");
        assert_eq!(series[0].len(), series[1].len());
    }
}
