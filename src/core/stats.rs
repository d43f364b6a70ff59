use crate::core::frame::Frame;
use crate::utils::error::Result;
use std::collections::HashMap;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (N-1 denominator). `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Linearly interpolated quantile over an ascending-sorted slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[derive(Debug, Clone)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

pub fn numeric_summary(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Some(NumericSummary {
        count: values.len(),
        mean: mean(values)?,
        std: sample_std(values),
        min: sorted[0],
        q25: quantile(&sorted, 0.25)?,
        median: quantile(&sorted, 0.5)?,
        q75: quantile(&sorted, 0.75)?,
        max: sorted[sorted.len() - 1],
    })
}

#[derive(Debug, Clone)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    pub top: String,
    pub freq: usize,
}

/// Count/unique/top/freq over the non-missing cells of a column. Ties on
/// frequency resolve to the smallest value.
pub fn categorical_summary(values: &[String]) -> Option<CategoricalSummary> {
    if values.is_empty() {
        return None;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *counts.entry(v.as_str()).or_insert(0) += 1;
    }
    let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    Some(CategoricalSummary {
        count: values.len(),
        unique: entries.len(),
        top: entries[0].0.to_string(),
        freq: entries[0].1,
    })
}

/// Occurrence counts of distinct complete rows. Rows with any missing cell
/// are dropped. Sorted by count descending, ties by row value ascending.
pub fn row_value_counts(frame: &Frame) -> Vec<(Vec<String>, usize)> {
    let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
    'rows: for row in 0..frame.n_rows() {
        let mut key = Vec::with_capacity(frame.n_cols());
        for column in frame.columns() {
            match column.display_cell(row) {
                Some(cell) => key.push(cell),
                None => continue 'rows,
            }
        }
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut out: Vec<(Vec<String>, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Per-group mean of `value_name`, grouped by the display value of
/// `key_name`. Keys sort numerically when every key parses as a number,
/// lexically otherwise. Rows missing either cell are skipped.
pub fn group_means(frame: &Frame, key_name: &str, value_name: &str) -> Result<Vec<(String, f64)>> {
    let key_col = frame.column(key_name)?;
    let value_col = frame.column(value_name)?;
    // Surface the non-numeric error before grouping starts.
    value_col.numeric_values()?;

    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
    for row in 0..frame.n_rows() {
        let (Some(key), Some(value)) = (key_col.display_cell(row), value_col.numeric_cell(row))
        else {
            continue;
        };
        let entry = sums.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    let mut groups: Vec<(String, f64)> = sums
        .into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect();

    let all_numeric = groups.iter().all(|(k, _)| k.parse::<f64>().is_ok());
    if all_numeric {
        groups.sort_by(|a, b| {
            let ka: f64 = a.0.parse().unwrap_or(f64::NAN);
            let kb: f64 = b.0.parse().unwrap_or(f64::NAN);
            ka.total_cmp(&kb)
        });
    } else {
        groups.sort_by(|a, b| a.0.cmp(&b.0));
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame::Frame;
    use crate::utils::error::StatsError;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_sample_std_uses_n_minus_one() {
        // Known value: std of [2,4,4,4,5,5,7,9] with ddof=1 is sqrt(32/7).
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = sample_std(&values).unwrap();
        assert!((std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_std(&[5.0]), None);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_numeric_summary() {
        let summary = numeric_summary(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 2.5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        assert_eq!(summary.median, 2.5);
        assert!(numeric_summary(&[]).is_none());
    }

    #[test]
    fn test_categorical_summary_picks_most_frequent() {
        let values: Vec<String> = ["b", "a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let summary = categorical_summary(&values).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.unique, 3);
        assert_eq!(summary.top, "b");
        assert_eq!(summary.freq, 2);
    }

    #[test]
    fn test_row_value_counts_orders_by_count() {
        let f = Frame::from_csv_bytes(b"a,b\nx,1\ny,2\nx,1\nz,\n").unwrap();
        let counts = row_value_counts(&f);
        // The row with a missing cell is dropped.
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0], (vec!["x".to_string(), "1".to_string()], 2));
        assert_eq!(counts[1], (vec!["y".to_string(), "2".to_string()], 1));
    }

    #[test]
    fn test_group_means() {
        let f = Frame::from_csv_bytes(b"team,score\nred,10\nblue,20\nred,30\n").unwrap();
        let groups = group_means(&f, "team", "score").unwrap();
        assert_eq!(groups, vec![("blue".to_string(), 20.0), ("red".to_string(), 20.0)]);
    }

    #[test]
    fn test_group_means_numeric_keys_sort_numerically() {
        let f = Frame::from_csv_bytes(b"k,v\n10,1\n2,2\n10,3\n").unwrap();
        let groups = group_means(&f, "k", "v").unwrap();
        assert_eq!(groups[0].0, "2");
        assert_eq!(groups[1].0, "10");
    }

    #[test]
    fn test_group_means_requires_numeric_value_column() {
        let f = Frame::from_csv_bytes(b"k,v\na,x\nb,y\n").unwrap();
        assert!(matches!(
            group_means(&f, "k", "v"),
            Err(StatsError::NonNumericColumn { .. })
        ));
    }
}
