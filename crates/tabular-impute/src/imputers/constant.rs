//! Constant imputation: every missing cell gets the same value.

use crate::block::{Block, BlockOutput, RunSpec};
use crate::config::{BlockConfig, ConstantImputerConfig, FillValue};
use crate::error::{Result, ResultExt};
use crate::table::{TableInput, missing_count, normalize_missing};
use polars::prelude::*;
use tracing::{debug, info};

/// Fills all missing cells of a table with one fixed value.
#[derive(Debug, Clone, Default)]
pub struct ConstantImputer {
    config: ConstantImputerConfig,
}

impl ConstantImputer {
    /// Create an imputer that fills with `value`.
    pub fn new(value: impl Into<FillValue>) -> Self {
        Self {
            config: ConstantImputerConfig {
                value: value.into(),
                ..ConstantImputerConfig::default()
            },
        }
    }

    /// Create an imputer from a validated configuration.
    pub fn from_config(config: ConstantImputerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Rebuild an imputer from the output of [`Block::dump`].
    pub fn from_dump(dump: &serde_json::Value) -> Result<Self> {
        let config: ConstantImputerConfig = serde_json::from_value(dump.clone())?;
        Self::from_config(config)
    }

    /// The fill value.
    pub fn value(&self) -> &FillValue {
        &self.config.value
    }

    /// Fill every missing cell of `df`.
    ///
    /// Float NaN counts as missing. Columns without missing cells are returned
    /// untouched. Filled columns take the supertype of their dtype and the
    /// fill value.
    pub fn impute(&self, df: DataFrame) -> Result<DataFrame> {
        let df = normalize_missing(df)?;
        let missing = missing_count(&df);
        if missing == 0 {
            debug!("No missing values, nothing to fill");
            return Ok(df);
        }

        let exprs: Vec<Expr> = df
            .get_columns()
            .iter()
            .filter(|column| column.null_count() > 0)
            .map(|column| col(column.name().clone()).fill_null(fill_literal(&self.config.value)))
            .collect();

        debug!("Filling {} columns with {}", exprs.len(), self.config.value);
        let filled = df
            .lazy()
            .with_columns(exprs)
            .collect()
            .context(format!("Failed to fill with constant {}", self.config.value))?;

        info!(
            "'{}' filled {} missing values with constant {}",
            self.config.block.name, missing, self.config.value
        );
        Ok(filled)
    }
}

fn fill_literal(value: &FillValue) -> Expr {
    match value {
        FillValue::Bool(v) => lit(*v),
        FillValue::Int(v) => lit(*v),
        FillValue::Float(v) => lit(*v),
        FillValue::Str(v) => lit(v.clone()),
    }
}

impl Block for ConstantImputer {
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

static_assertions::assert_impl_all!(ConstantImputer: Send, Sync);
