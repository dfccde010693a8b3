//! Statistic imputation, optionally within groups.
//!
//! Each column with missing cells is filled with a [`Statistic`] of its own
//! present values. With a group-by key, rows are partitioned by the key's
//! values and every partition gets its own statistic. The key column itself
//! is always filled from whole-column statistics.
//!
//! Every fill is a polars expression: `fill_null` with the statistic,
//! windowed `over` the key for grouped columns. All columns are filled in one
//! `with_columns` pass over the input, so filling one column never influences
//! another.

use crate::block::{Block, BlockOutput, RunSpec};
use crate::config::{BlockConfig, StatisticImputerConfig};
use crate::error::{ImputeError, Result, ResultExt};
use crate::statistic::Statistic;
use crate::table::{DtypeCategory, TableInput, get_dtype_category, missing_count, normalize_missing};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Fills missing cells with a per-column (or per-group) statistic.
#[derive(Debug, Clone, Default)]
pub struct StatisticImputer {
    config: StatisticImputerConfig,
}

impl StatisticImputer {
    /// Create an imputer from a statistic name and an optional key column.
    ///
    /// Fails with an unsupported-operation error if `method` is not a known
    /// statistic.
    pub fn new(method: &str, groupby: Option<&str>) -> Result<Self> {
        let mut builder = StatisticImputerConfig::builder().method(method.parse()?);
        if let Some(key) = groupby {
            builder = builder.groupby(key);
        }
        Self::from_config(builder.build()?)
    }

    /// Create an imputer from a validated configuration.
    pub fn from_config(config: StatisticImputerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Rebuild an imputer from the output of [`Block::dump`].
    pub fn from_dump(dump: &serde_json::Value) -> Result<Self> {
        let config: StatisticImputerConfig = serde_json::from_value(dump.clone())?;
        Self::from_config(config)
    }

    /// The configured statistic.
    pub fn method(&self) -> Statistic {
        self.config.method
    }

    /// The configured group-by key column, if any.
    pub fn groupby(&self) -> Option<&str> {
        self.config.groupby.as_deref()
    }

    /// Fill the missing cells of `df`.
    ///
    /// Float NaN counts as missing. Columns without missing cells are returned
    /// untouched. Numeric columns that receive values become `Float64`; other
    /// columns keep their dtype. Cells whose statistic is undefined (no
    /// present values in the column or group) stay missing.
    ///
    /// # Errors
    ///
    /// Returns [`ImputeError::UnsupportedOperation`] if a column with missing
    /// cells has a dtype the statistic is not defined for. Nothing is filled
    /// in that case.
    pub fn impute(&self, df: DataFrame) -> Result<DataFrame> {
        let df = normalize_missing(df)?;
        self.check_capability(&df)?;

        let missing_before = missing_count(&df);
        if missing_before == 0 {
            debug!("No missing values, nothing to fill");
            return Ok(df);
        }

        let method = self.config.method;
        let key = self.group_key(&df);
        let partition = match key {
            Some(key) => vec![canonical(col(key), df.column(key)?.dtype())],
            None => Vec::new(),
        };

        let mut targets = Vec::new();
        let mut counts = Vec::new();
        let mut fills = Vec::new();

        for column in df.get_columns() {
            if column.null_count() == 0 {
                continue;
            }
            let name = column.name().as_str();
            let dtype = column.dtype();

            if dtype == &DataType::Null {
                warn!("Column '{}' has no values, leaving it missing", name);
                continue;
            }

            let numeric = get_dtype_category(dtype) == DtypeCategory::Numeric;
            let values = if numeric {
                col(name).cast(DataType::Float64)
            } else {
                col(name)
            };

            let groups: &[Expr] = match key {
                Some(key) if key != name => {
                    debug!("Column '{}': {} within groups of '{}'", name, method, key);
                    &partition
                }
                _ => {
                    debug!("Column '{}': {} over the whole column", name, method);
                    &[]
                }
            };

            let count_name = format!("__{}_count", name);
            if method == Statistic::Mode {
                let mut by = groups.to_vec();
                by.push(canonical(values.clone(), dtype));
                counts.push(values.clone().count().over(by).alias(count_name.as_str()));
            }

            let mut stat = method.aggregate(values.clone(), col(count_name.as_str()));
            if !groups.is_empty() {
                stat = stat.over(groups);
            }

            let mut filled = values.fill_null(stat);
            if !numeric {
                filled = filled.cast(dtype.clone());
            }
            fills.push(filled.alias(name));
            targets.push(name.to_string());
        }

        let output: Vec<Expr> = df
            .get_column_names()
            .iter()
            .map(|name| col(name.as_str()))
            .collect();

        let mut lf = df.lazy();
        if !counts.is_empty() {
            lf = lf.with_columns(counts);
        }
        let filled = lf
            .with_columns(fills)
            .select(output)
            .collect()
            .context(format!("Failed to compute {} fill values", method))?;

        for name in &targets {
            let left = filled.column(name)?.null_count();
            if left > 0 {
                warn!(
                    "Column '{}': {} is undefined without values, {} cells left missing",
                    name, method, left
                );
            }
        }

        let missing_after = missing_count(&filled);
        info!(
            "'{}' filled {} of {} missing values with {}",
            self.config.block.name,
            missing_before - missing_after,
            missing_before,
            method
        );
        Ok(filled)
    }

    /// Every column that needs filling must support the statistic.
    fn check_capability(&self, df: &DataFrame) -> Result<()> {
        for column in df.get_columns() {
            let dtype = column.dtype();
            if column.null_count() == 0 || dtype == &DataType::Null {
                continue;
            }
            if !self.config.method.supports(get_dtype_category(dtype)) {
                return Err(ImputeError::UnsupportedOperation {
                    statistic: self.config.method.to_string(),
                    column: column.name().to_string(),
                    dtype: dtype.to_string(),
                });
            }
        }
        Ok(())
    }

    /// The configured key column, if the table has it.
    fn group_key<'a>(&'a self, df: &DataFrame) -> Option<&'a str> {
        let key = self.config.groupby.as_deref()?;
        if df.get_column_names().iter().any(|name| name.as_str() == key) {
            Some(key)
        } else {
            debug!("Group-by column '{}' not in table, using whole columns", key);
            None
        }
    }
}

/// Fold -0.0 into 0.0 so equal float values share a partition.
fn canonical(expr: Expr, dtype: &DataType) -> Expr {
    if matches!(dtype, DataType::Float32 | DataType::Float64) {
        expr + lit(0.0)
    } else {
        expr
    }
}

impl Block for StatisticImputer {
    fn config(&self) -> &BlockConfig {
        &self.config.block
    }

    fn dump(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.config)?)
    }

    fn run(
        &self,
        _runspec: &RunSpec,
        x: TableInput,
        y: Option<Series>,
        id: Option<Series>,
    ) -> Result<BlockOutput> {
        let df = x.into_frame()?;
        Ok((self.impute(df)?, y, id))
    }
}

static_assertions::assert_impl_all!(StatisticImputer: Send, Sync);
