use crate::domain::model::DType;
use crate::utils::error::{Result, StatsError};

/// Cell markers treated as missing, in addition to empty/whitespace cells.
const MISSING_MARKERS: [&str; 6] = ["NA", "N/A", "NaN", "nan", "null", "NULL"];

fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed)
}

#[derive(Debug, Clone)]
enum ColumnData {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Bool(Vec<Option<bool>>),
    Str(Vec<Option<String>>),
}

/// One typed column of the loaded table.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    fn from_raw(name: String, raw: Vec<Option<String>>) -> Self {
        let data = infer_column_data(raw);
        Self { name, data }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> DType {
        match self.data {
            ColumnData::Int(_) => DType::Int64,
            ColumnData::Float(_) => DType::Float64,
            ColumnData::Bool(_) => DType::Bool,
            ColumnData::Str(_) => DType::Str,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match &self.data {
            ColumnData::Int(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Float(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Bool(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Str(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    pub fn non_null_count(&self) -> usize {
        self.len() - self.null_count()
    }

    pub fn is_numeric(&self) -> bool {
        self.dtype().is_numeric()
    }

    /// Cell as f64, `None` when missing or when the column is not numeric.
    pub fn numeric_cell(&self, row: usize) -> Option<f64> {
        match &self.data {
            ColumnData::Int(v) => v.get(row).copied().flatten().map(|n| n as f64),
            ColumnData::Float(v) => v.get(row).copied().flatten(),
            ColumnData::Bool(_) | ColumnData::Str(_) => None,
        }
    }

    /// All non-missing values as f64. Errors for non-numeric columns.
    pub fn numeric_values(&self) -> Result<Vec<f64>> {
        match &self.data {
            ColumnData::Int(v) => Ok(v.iter().flatten().map(|n| *n as f64).collect()),
            ColumnData::Float(v) => Ok(v.iter().flatten().copied().collect()),
            ColumnData::Bool(_) | ColumnData::Str(_) => Err(StatsError::NonNumericColumn {
                name: self.name.clone(),
            }),
        }
    }

    /// Cell rendered for display / grouping, `None` when missing.
    pub fn display_cell(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Int(v) => v.get(row).copied().flatten().map(|n| n.to_string()),
            ColumnData::Float(v) => v.get(row).copied().flatten().map(|f| f.to_string()),
            ColumnData::Bool(v) => v.get(row).copied().flatten().map(|b| b.to_string()),
            ColumnData::Str(v) => v.get(row).cloned().flatten(),
        }
    }

    /// Approximate in-memory size of the column payload.
    pub fn mem_size(&self) -> usize {
        match &self.data {
            ColumnData::Int(v) => v.len() * std::mem::size_of::<Option<i64>>(),
            ColumnData::Float(v) => v.len() * std::mem::size_of::<Option<f64>>(),
            ColumnData::Bool(v) => v.len() * std::mem::size_of::<Option<bool>>(),
            ColumnData::Str(v) => v
                .iter()
                .map(|c| {
                    std::mem::size_of::<Option<String>>()
                        + c.as_ref().map(|s| s.len()).unwrap_or(0)
                })
                .sum(),
        }
    }
}

fn parse_ints(raw: &[Option<String>]) -> Option<Vec<Option<i64>>> {
    let mut out = Vec::with_capacity(raw.len());
    for cell in raw {
        match cell {
            None => out.push(None),
            Some(s) => match s.trim().parse::<i64>() {
                Ok(v) => out.push(Some(v)),
                Err(_) => return None,
            },
        }
    }
    Some(out)
}

fn parse_floats(raw: &[Option<String>]) -> Option<Vec<Option<f64>>> {
    let mut out = Vec::with_capacity(raw.len());
    for cell in raw {
        match cell {
            None => out.push(None),
            Some(s) => match s.trim().parse::<f64>() {
                Ok(v) => out.push(Some(v)),
                Err(_) => return None,
            },
        }
    }
    Some(out)
}

fn parse_bools(raw: &[Option<String>]) -> Option<Vec<Option<bool>>> {
    let mut out = Vec::with_capacity(raw.len());
    for cell in raw {
        match cell {
            None => out.push(None),
            Some(s) => {
                let t = s.trim();
                if t.eq_ignore_ascii_case("true") {
                    out.push(Some(true));
                } else if t.eq_ignore_ascii_case("false") {
                    out.push(Some(false));
                } else {
                    return None;
                }
            }
        }
    }
    Some(out)
}

fn infer_column_data(raw: Vec<Option<String>>) -> ColumnData {
    if raw.iter().all(|c| c.is_none()) {
        // A column of nothing but missing cells types as float64, like the
        // dataframe libraries this tool is drop-in for. Zero rows stay object.
        return if raw.is_empty() {
            ColumnData::Str(Vec::new())
        } else {
            ColumnData::Float(vec![None; raw.len()])
        };
    }

    if let Some(ints) = parse_ints(&raw) {
        return ColumnData::Int(ints);
    }
    if let Some(floats) = parse_floats(&raw) {
        return ColumnData::Float(floats);
    }
    if let Some(bools) = parse_bools(&raw) {
        return ColumnData::Bool(bools);
    }
    ColumnData::Str(raw)
}

/// The in-memory table for one run: header-named, dtype-inferred columns.
#[derive(Debug, Clone)]
pub struct Frame {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Frame {
    /// Parse CSV bytes (first record is the header). Ragged rows are an
    /// error; strict reading, no recovery.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut raw_columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        let mut n_rows = 0;
        for record in reader.records() {
            let record = record?;
            for (idx, cell) in record.iter().enumerate() {
                let value = if is_missing(cell) {
                    None
                } else {
                    Some(cell.to_string())
                };
                raw_columns[idx].push(value);
            }
            n_rows += 1;
        }

        let columns = headers
            .into_iter()
            .zip(raw_columns)
            .map(|(name, raw)| Column::from_raw(name, raw))
            .collect();

        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| StatsError::ColumnNotFound {
                name: name.to_string(),
            })
    }
}
