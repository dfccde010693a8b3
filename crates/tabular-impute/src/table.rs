//! Table helpers: input coercion, missing-value normalization and dtype
//! categories.
//!
//! Blocks accept anything convertible into a [`TableInput`] and always work
//! on a `DataFrame`. Row-major numeric input is laid out the way a
//! list-of-lists is read into a table: one column per position, named
//! `"0"`, `"1"`, …, with short rows padded with missing cells.
//!
//! A cell is missing when it is null. Float NaN is normalized to null during
//! coercion so it counts as missing too.

use crate::error::{Result, ResultExt};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for imputation purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    ) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Input Coercion
// =============================================================================

/// Input accepted by a block's `run`.
#[derive(Debug, Clone)]
pub enum TableInput {
    /// An existing table.
    Frame(DataFrame),
    /// A single column; becomes a one-column table.
    Series(Series),
    /// Row-major values; `None` and NaN are missing.
    Rows(Vec<Vec<Option<f64>>>),
}

impl TableInput {
    /// Coerce the input into a table with NaN normalized to null.
    pub fn into_frame(self) -> Result<DataFrame> {
        let df = match self {
            TableInput::Frame(df) => df,
            TableInput::Series(series) => series.into_frame(),
            TableInput::Rows(rows) => rows_to_frame(&rows)?,
        };
        normalize_missing(df)
    }
}

impl From<DataFrame> for TableInput {
    fn from(df: DataFrame) -> Self {
        TableInput::Frame(df)
    }
}

impl From<&DataFrame> for TableInput {
    fn from(df: &DataFrame) -> Self {
        TableInput::Frame(df.clone())
    }
}

impl From<Series> for TableInput {
    fn from(series: Series) -> Self {
        TableInput::Series(series)
    }
}

impl From<Vec<Vec<Option<f64>>>> for TableInput {
    fn from(rows: Vec<Vec<Option<f64>>>) -> Self {
        TableInput::Rows(rows)
    }
}

impl From<Vec<Vec<f64>>> for TableInput {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        TableInput::Rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        )
    }
}

/// Lay out row-major values as columns named by position.
fn rows_to_frame(rows: &[Vec<Option<f64>>]) -> Result<DataFrame> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);

    let columns: Vec<Column> = (0..width)
        .map(|j| {
            let values: Vec<Option<f64>> = rows
                .iter()
                .map(|row| row.get(j).copied().flatten())
                .collect();
            Column::new(j.to_string().into(), values)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Replace NaN with null in every float column.
pub fn normalize_missing(df: DataFrame) -> Result<DataFrame> {
    let exprs: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter(|column| matches!(column.dtype(), DataType::Float32 | DataType::Float64))
        .map(|column| col(column.name().clone()).fill_nan(lit(NULL)))
        .collect();

    if exprs.is_empty() {
        return Ok(df);
    }

    df.lazy()
        .with_columns(exprs)
        .collect()
        .context("Failed to normalize NaN to missing")
}

// =============================================================================
// Missing Values
// =============================================================================

/// Total number of missing cells in the table.
pub fn missing_count(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|col| col.null_count()).sum()
}

// =============================================================================
// Tests
// =============================================================================
