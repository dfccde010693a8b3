//! Statistics used as fill values.
//!
//! [`Statistic`] is a closed set. Names are parsed once, when an imputer is
//! configured, so an unknown method is rejected before any table is seen.
//!
//! Statistics are polars aggregation expressions, so the same statistic runs
//! over a whole column or, inside a window, over each group. Missing values
//! are ignored; a statistic over no values is null.

use crate::error::ImputeError;
use crate::table::DtypeCategory;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A per-column statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Statistic {
    /// Arithmetic mean
    #[default]
    Mean,
    /// Middle value; the average of the two middle values for even counts
    Median,
    /// Most frequent value; ties resolve to the smallest candidate
    Mode,
    /// Sum of values
    Sum,
    /// Smallest value
    Min,
    /// Largest value
    Max,
    /// Sample standard deviation (ddof = 1)
    Std,
    /// Sample variance (ddof = 1)
    Var,
}

impl Statistic {
    /// All supported statistics.
    pub const ALL: [Statistic; 8] = [
        Statistic::Mean,
        Statistic::Median,
        Statistic::Mode,
        Statistic::Sum,
        Statistic::Min,
        Statistic::Max,
        Statistic::Std,
        Statistic::Var,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Std => "std",
            Self::Var => "var",
        }
    }

    /// Whether the statistic can be computed on columns of this category.
    pub fn supports(&self, category: DtypeCategory) -> bool {
        match category {
            DtypeCategory::Numeric => true,
            DtypeCategory::String | DtypeCategory::Boolean => {
                matches!(self, Self::Mode | Self::Min | Self::Max)
            }
            DtypeCategory::Datetime => {
                matches!(self, Self::Mode | Self::Min | Self::Max | Self::Median)
            }
            DtypeCategory::Other => false,
        }
    }

    /// Aggregate `values` to this statistic.
    ///
    /// `counts` holds, per row, how often the row's value occurs within its
    /// partition; only [`Statistic::Mode`] reads it. The result is null when
    /// the statistic is undefined for the present values.
    pub fn aggregate(&self, values: Expr, counts: Expr) -> Expr {
        match self {
            Self::Mean => values.mean(),
            Self::Median => values.median(),
            Self::Mode => {
                let order = SortMultipleOptions::default()
                    .with_order_descending_multi([true, false])
                    .with_nulls_last(true);
                values.clone().sort_by([counts, values], order).first()
            }
            // sum over no values is 0, not undefined
            Self::Sum => when(values.clone().count().gt(lit(0)))
                .then(values.sum())
                .otherwise(lit(NULL)),
            Self::Min => values.min(),
            Self::Max => values.max(),
            Self::Std => values.std(1),
            Self::Var => values.var(1),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Statistic {
    type Err = ImputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "mode" | "most_frequent" => Ok(Self::Mode),
            "sum" => Ok(Self::Sum),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "std" => Ok(Self::Std),
            "var" => Ok(Self::Var),
            _ => Err(ImputeError::UnknownStatistic(s.to_string())),
        }
    }
}

impl TryFrom<String> for Statistic {
    type Error = ImputeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
