use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column dtype inferred while loading the CSV. The wire spellings follow
/// the usual dataframe vocabulary so downstream consumers of the `columns`
/// output see familiar names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Int64,
    Float64,
    Bool,
    Str,
}

impl DType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::Str => "object",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the `columns` computation output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub dtype: String,
}

/// The named computation selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Computation {
    Mean,
    MeanAll,
    Std,
    StdAll,
    Info,
    TotalRows,
    Columns,
    Describe,
    ValueCounts,
    MissingValues,
    HistogramPlot,
    ScatterPlot,
    GroupbyAveragePlot,
    TwoVariablesPlot,
}

impl Computation {
    pub fn name(&self) -> &'static str {
        match self {
            Computation::Mean => "mean",
            Computation::MeanAll => "mean_all",
            Computation::Std => "std",
            Computation::StdAll => "std_all",
            Computation::Info => "info",
            Computation::TotalRows => "total_rows",
            Computation::Columns => "columns",
            Computation::Describe => "describe",
            Computation::ValueCounts => "value_counts",
            Computation::MissingValues => "missing_values",
            Computation::HistogramPlot => "histogram_plot",
            Computation::ScatterPlot => "scatter_plot",
            Computation::GroupbyAveragePlot => "groupby_average_plot",
            Computation::TwoVariablesPlot => "two_variables_plot",
        }
    }

    /// Computations that operate on a single named column.
    pub fn needs_variable(&self) -> bool {
        matches!(
            self,
            Computation::Mean | Computation::Std | Computation::HistogramPlot
        )
    }

    /// Computations that need an `x,y` column pair.
    pub fn needs_pair(&self) -> bool {
        matches!(
            self,
            Computation::ScatterPlot
                | Computation::GroupbyAveragePlot
                | Computation::TwoVariablesPlot
        )
    }

    pub fn is_plot(&self) -> bool {
        matches!(
            self,
            Computation::HistogramPlot
                | Computation::ScatterPlot
                | Computation::GroupbyAveragePlot
                | Computation::TwoVariablesPlot
        )
    }
}

impl fmt::Display for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A chart ready to be rasterized.
#[derive(Debug, Clone)]
pub enum ChartKind {
    Histogram {
        values: Vec<f64>,
        variable: String,
    },
    Scatter {
        points: Vec<(f64, f64)>,
        x: String,
        y: String,
    },
    GroupedBar {
        groups: Vec<(String, f64)>,
        x: String,
        y: String,
    },
    Line {
        points: Vec<(f64, f64)>,
        x: String,
        y: String,
    },
}

/// A chart plus the filename stem it will be saved under (the render stage
/// appends the timestamp and extension).
#[derive(Debug, Clone)]
pub struct ChartJob {
    pub kind: ChartKind,
    pub file_stem: String,
}

/// Output of the compute stage: report lines for stdout and, for the plot
/// computations, the chart left to render.
#[derive(Debug, Clone, Default)]
pub struct Computed {
    pub lines: Vec<String>,
    pub chart: Option<ChartJob>,
}

impl Computed {
    pub fn text(lines: Vec<String>) -> Self {
        Self { lines, chart: None }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Text,
    Plot { filename: String },
}
