use crate::core::frame::{Column, Frame};
use crate::core::stats;
use crate::domain::model::{ChartJob, ChartKind, ColumnInfo, Computation, Computed, Outcome};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::plot;
use crate::utils::error::Result;
use chrono::Local;

const NO_VARIABLE: &str = "No variable informed.";
const NEED_TWO_VARIABLES: &str = "Need two variables (separated by comma).";

/// The one pipeline this tool has: read the CSV through storage, dispatch on
/// the computation name, print text or hand a chart to the render stage.
pub struct AnalysisPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> AnalysisPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn variables(&self) -> &str {
        self.config.variables().unwrap_or("")
    }

    /// `x,y` split on the first commas, verbatim (no trimming).
    fn pair(&self) -> Option<(&str, &str)> {
        let vars = self.variables();
        if vars.is_empty() || !vars.contains(',') {
            return None;
        }
        let parts: Vec<&str> = vars.split(',').collect();
        Some((parts[0], parts[1]))
    }

    fn single_stat(
        &self,
        frame: &Frame,
        label: &str,
        stat: fn(&[f64]) -> Option<f64>,
    ) -> Result<Computed> {
        let var = self.variables();
        let mut lines = vec![format!("Computation: {} on variable: {}", label, var)];
        if var.is_empty() {
            lines.push(NO_VARIABLE.to_string());
            return Ok(Computed::text(lines));
        }
        let values = frame.column(var)?.numeric_values()?;
        lines.push(fmt_opt(stat(&values)));
        Ok(Computed::text(lines))
    }

    fn all_columns_stat(
        &self,
        frame: &Frame,
        header: &str,
        stat: fn(&[f64]) -> Option<f64>,
    ) -> Result<Computed> {
        let mut lines = vec![header.to_string()];
        let numeric: Vec<&Column> = frame.columns().iter().filter(|c| c.is_numeric()).collect();
        let width = numeric.iter().map(|c| c.name().len()).max().unwrap_or(0);
        for column in numeric {
            let values = column.numeric_values()?;
            lines.push(format!(
                "{:<width$}  {}",
                column.name(),
                fmt_opt(stat(&values))
            ));
        }
        Ok(Computed::text(lines))
    }

    fn info(&self, frame: &Frame) -> Computed {
        let mut lines = vec![
            "Computation: Info".to_string(),
            format!("{} rows x {} columns", frame.n_rows(), frame.n_cols()),
        ];

        let name_width = frame
            .columns()
            .iter()
            .map(|c| c.name().len())
            .max()
            .unwrap_or(0)
            .max("Column".len());
        let count_width = "Non-Null Count".len();
        lines.push(format!(
            " #   {:<name_width$}  {:<count_width$}  Dtype",
            "Column", "Non-Null Count"
        ));
        for (idx, column) in frame.columns().iter().enumerate() {
            lines.push(format!(
                "{:>2}   {:<name_width$}  {:<count_width$}  {}",
                idx,
                column.name(),
                format!("{} non-null", column.non_null_count()),
                column.dtype()
            ));
        }

        let mut tally: Vec<(&str, usize)> = Vec::new();
        for column in frame.columns() {
            let dtype = column.dtype().as_str();
            match tally.iter_mut().find(|(name, _)| *name == dtype) {
                Some((_, count)) => *count += 1,
                None => tally.push((dtype, 1)),
            }
        }
        tally.sort_by(|a, b| a.0.cmp(b.0));
        let tally: Vec<String> = tally
            .iter()
            .map(|(name, count)| format!("{}({})", name, count))
            .collect();
        lines.push(format!("dtypes: {}", tally.join(", ")));

        let bytes: usize = frame.columns().iter().map(|c| c.mem_size()).sum();
        if bytes >= 1024 {
            lines.push(format!("memory usage: {:.1} KB", bytes as f64 / 1024.0));
        } else {
            lines.push(format!("memory usage: {} bytes", bytes));
        }
        Computed::text(lines)
    }

    fn describe(&self, frame: &Frame) -> Result<Computed> {
        let has_numeric = frame.columns().iter().any(|c| c.is_numeric());
        let has_categorical = frame.columns().iter().any(|c| !c.is_numeric());

        let mut header = vec!["column".to_string(), "count".to_string()];
        if has_numeric {
            for stat in ["mean", "std", "min", "25%", "50%", "75%", "max"] {
                header.push(stat.to_string());
            }
        }
        if has_categorical {
            for stat in ["unique", "top", "freq"] {
                header.push(stat.to_string());
            }
        }

        let mut rows: Vec<Vec<String>> = vec![header];
        for column in frame.columns() {
            let mut row = vec![column.name().to_string(), column.non_null_count().to_string()];
            if has_numeric {
                if column.is_numeric() {
                    match stats::numeric_summary(&column.numeric_values()?) {
                        Some(s) => {
                            row.push(fmt_float(s.mean));
                            row.push(fmt_opt(s.std));
                            row.push(fmt_float(s.min));
                            row.push(fmt_float(s.q25));
                            row.push(fmt_float(s.median));
                            row.push(fmt_float(s.q75));
                            row.push(fmt_float(s.max));
                        }
                        None => row.extend(std::iter::repeat("NaN".to_string()).take(7)),
                    }
                } else {
                    row.extend(std::iter::repeat("NaN".to_string()).take(7));
                }
            }
            if has_categorical {
                if column.is_numeric() {
                    row.extend(std::iter::repeat("NaN".to_string()).take(3));
                } else {
                    let cells: Vec<String> =
                        (0..frame.n_rows()).filter_map(|r| column.display_cell(r)).collect();
                    match stats::categorical_summary(&cells) {
                        Some(s) => {
                            row.push(s.unique.to_string());
                            row.push(s.top);
                            row.push(s.freq.to_string());
                        }
                        None => row.extend(std::iter::repeat("NaN".to_string()).take(3)),
                    }
                }
            }
            rows.push(row);
        }

        let n_cells = rows[0].len();
        let widths: Vec<usize> = (0..n_cells)
            .map(|i| rows.iter().map(|r| r[i].len()).max().unwrap_or(0))
            .collect();

        let mut lines = vec!["Computation: Describe".to_string()];
        for row in rows {
            let mut cells = Vec::with_capacity(row.len());
            for (i, cell) in row.iter().enumerate() {
                if i == 0 {
                    cells.push(format!("{:<width$}", cell, width = widths[i]));
                } else {
                    cells.push(format!("{:>width$}", cell, width = widths[i]));
                }
            }
            lines.push(cells.join("  ").trim_end().to_string());
        }
        Ok(Computed::text(lines))
    }

    fn value_counts(&self, frame: &Frame) -> Computed {
        let mut lines = vec!["Computation: Value Counts".to_string()];
        let counts = stats::row_value_counts(frame);
        let rendered: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(key, count)| (format!("({})", key.join(", ")), count))
            .collect();
        let width = rendered.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, count) in rendered {
            lines.push(format!("{:<width$}  {}", key, count));
        }
        Computed::text(lines)
    }

    fn missing_values(&self, frame: &Frame) -> Computed {
        let mut lines = vec!["Computation: Missing Values".to_string()];
        let width = frame
            .columns()
            .iter()
            .map(|c| c.name().len())
            .max()
            .unwrap_or(0);
        for column in frame.columns() {
            lines.push(format!("{:<width$}  {}", column.name(), column.null_count()));
        }
        Computed::text(lines)
    }

    fn columns_json(&self, frame: &Frame) -> Result<Computed> {
        let infos: Vec<ColumnInfo> = frame
            .columns()
            .iter()
            .map(|c| ColumnInfo {
                name: c.name().to_string(),
                dtype: c.dtype().as_str().to_string(),
            })
            .collect();
        Ok(Computed::text(vec![serde_json::to_string(&infos)?]))
    }

    fn histogram(&self, frame: &Frame) -> Result<Computed> {
        let var = self.variables();
        let mut lines = vec![format!("Computation: Histogram plot on variable: {}", var)];
        if var.is_empty() {
            lines.push(NO_VARIABLE.to_string());
            return Ok(Computed::text(lines));
        }
        let values = frame.column(var)?.numeric_values()?;
        let chart = ChartJob {
            kind: ChartKind::Histogram {
                values,
                variable: var.to_string(),
            },
            file_stem: plot_stem(Computation::HistogramPlot, var),
        };
        Ok(Computed {
            lines,
            chart: Some(chart),
        })
    }

    fn scatter(&self, frame: &Frame) -> Result<Computed> {
        let vars = self.variables();
        let mut lines = vec![format!("Computation: Scatter plot on variables: {}", vars)];
        let Some((x, y)) = self.pair() else {
            lines.push(NEED_TWO_VARIABLES.to_string());
            return Ok(Computed::text(lines));
        };
        let points = paired_points(frame, x, y)?;
        let chart = ChartJob {
            kind: ChartKind::Scatter {
                points,
                x: x.to_string(),
                y: y.to_string(),
            },
            file_stem: plot_stem(Computation::ScatterPlot, vars),
        };
        Ok(Computed {
            lines,
            chart: Some(chart),
        })
    }

    fn groupby_average(&self, frame: &Frame) -> Result<Computed> {
        let vars = self.variables();
        let mut lines = vec![format!(
            "Computation: Average grouped by on variables: {}",
            vars
        )];
        let Some((x, y)) = self.pair() else {
            lines.push(NEED_TWO_VARIABLES.to_string());
            return Ok(Computed::text(lines));
        };
        let groups = stats::group_means(frame, x, y)?;
        let width = groups.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, mean) in &groups {
            lines.push(format!("{:<width$}  {}", key, fmt_float(*mean)));
        }
        let chart = ChartJob {
            kind: ChartKind::GroupedBar {
                groups,
                x: x.to_string(),
                y: y.to_string(),
            },
            file_stem: plot_stem(Computation::GroupbyAveragePlot, vars),
        };
        Ok(Computed {
            lines,
            chart: Some(chart),
        })
    }

    fn two_variables(&self, frame: &Frame) -> Result<Computed> {
        let vars = self.variables();
        let mut lines = vec![format!(
            "Computation: Two variables plot on variables: {}",
            vars
        )];
        let Some((x, y)) = self.pair() else {
            lines.push(NEED_TWO_VARIABLES.to_string());
            return Ok(Computed::text(lines));
        };
        let points = paired_points(frame, x, y)?;
        let chart = ChartJob {
            kind: ChartKind::Line {
                points,
                x: x.to_string(),
                y: y.to_string(),
            },
            file_stem: plot_stem(Computation::TwoVariablesPlot, vars),
        };
        Ok(Computed {
            lines,
            chart: Some(chart),
        })
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for AnalysisPipeline<S, C> {
    fn extract(&self) -> Result<Frame> {
        tracing::debug!("Reading CSV file: {}", self.config.csv_file());
        let bytes = self.storage.read_file(self.config.csv_file())?;
        Frame::from_csv_bytes(&bytes)
    }

    fn compute(&self, frame: &Frame) -> Result<Computed> {
        match self.config.computation() {
            Computation::Mean => self.single_stat(frame, "Mean", stats::mean),
            Computation::Std => self.single_stat(frame, "Standard deviation", stats::sample_std),
            Computation::MeanAll => {
                self.all_columns_stat(frame, "Computation: Mean on all variables", stats::mean)
            }
            Computation::StdAll => self.all_columns_stat(
                frame,
                "Computation: Standard deviation on all variables",
                stats::sample_std,
            ),
            Computation::Info => Ok(self.info(frame)),
            Computation::TotalRows => Ok(Computed::text(vec![frame.n_rows().to_string()])),
            Computation::Columns => self.columns_json(frame),
            Computation::Describe => self.describe(frame),
            Computation::ValueCounts => Ok(self.value_counts(frame)),
            Computation::MissingValues => Ok(self.missing_values(frame)),
            Computation::HistogramPlot => self.histogram(frame),
            Computation::ScatterPlot => self.scatter(frame),
            Computation::GroupbyAveragePlot => self.groupby_average(frame),
            Computation::TwoVariablesPlot => self.two_variables(frame),
        }
    }

    fn render(&self, chart: Option<ChartJob>) -> Result<Outcome> {
        let Some(job) = chart else {
            return Ok(Outcome::Text);
        };
        tracing::debug!("Rendering chart: {}", job.file_stem);
        let png = plot::render(&job.kind)?;
        let filename = format!(
            "{}_{}.png",
            job.file_stem,
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = format!(
            "{}/{}",
            self.config.plot_dir().trim_end_matches('/'),
            filename
        );
        self.storage.write_file(&path, &png)?;
        tracing::debug!("Chart written to {}", path);
        Ok(Outcome::Plot { filename })
    }
}

/// `<computation>_<vars>` with commas and spaces flattened to underscores.
fn plot_stem(computation: Computation, vars: &str) -> String {
    format!(
        "{}_{}",
        computation.name(),
        vars.replace(',', "_").replace(' ', "_")
    )
}

/// Row-order (x, y) pairs; rows missing either cell are skipped. Errors if
/// either column is not numeric.
fn paired_points(frame: &Frame, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
    let x_col = frame.column(x)?;
    let y_col = frame.column(y)?;
    x_col.numeric_values()?;
    y_col.numeric_values()?;
    Ok((0..frame.n_rows())
        .filter_map(|row| Some((x_col.numeric_cell(row)?, y_col.numeric_cell(row)?)))
        .collect())
}

fn fmt_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_finite() && v == v.trunc() && v.abs() < 1e15 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(fmt_float).unwrap_or_else(|| "NaN".to_string())
}
