//! Configuration types for the imputation blocks.
//!
//! Every block carries a [`BlockConfig`] (name, type, disable mask). Each
//! imputer extends it with its own fields; the base struct is flattened so a
//! dump is a single flat JSON object:
//!
//! ```json
//! {"name": "StatisticImputer-1a2b", "_type": "imputer.StatisticImputer",
//!  "disable_mask": [], "method": "median", "groupby": "1"}
//! ```
//!
//! Configurations are built with the builder pattern and validated on
//! `build()`.

use crate::block::RunMode;
use crate::statistic::Statistic;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Block type name of [`crate::ConstantImputer`].
pub const CONSTANT_IMPUTER_TYPE: &str = "imputer.ConstantImputer";

/// Block type name of [`crate::StatisticImputer`].
pub const STATISTIC_IMPUTER_TYPE: &str = "imputer.StatisticImputer";

/// Former type name of the statistic imputer, still accepted when loading.
pub const METHOD_IMPUTER_TYPE: &str = "imputer.MethodImputer";

/// A value used to fill missing cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Default for FillValue {
    fn default() -> Self {
        FillValue::Int(0)
    }
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillValue::Bool(v) => write!(f, "{}", v),
            FillValue::Int(v) => write!(f, "{}", v),
            FillValue::Float(v) => write!(f, "{}", v),
            FillValue::Str(v) => write!(f, "'{}'", v),
        }
    }
}

impl From<bool> for FillValue {
    fn from(v: bool) -> Self {
        FillValue::Bool(v)
    }
}

impl From<i32> for FillValue {
    fn from(v: i32) -> Self {
        FillValue::Int(v as i64)
    }
}

impl From<i64> for FillValue {
    fn from(v: i64) -> Self {
        FillValue::Int(v)
    }
}

impl From<f64> for FillValue {
    fn from(v: f64) -> Self {
        FillValue::Float(v)
    }
}

impl From<&str> for FillValue {
    fn from(v: &str) -> Self {
        FillValue::Str(v.to_string())
    }
}

impl From<String> for FillValue {
    fn from(v: String) -> Self {
        FillValue::Str(v)
    }
}

/// Base configuration shared by every block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Name of this block instance.
    pub name: String,

    /// Type name used to rebuild the block from a dump.
    #[serde(rename = "_type")]
    pub block_type: String,

    /// Run modes in which the block passes its input through untouched.
    #[serde(default)]
    pub disable_mask: Vec<RunMode>,
}

impl BlockConfig {
    /// Create a base config with a generated name.
    pub fn new(block_type: impl Into<String>) -> Self {
        let block_type = block_type.into();
        Self {
            name: default_block_name(&block_type),
            block_type,
            disable_mask: Vec::new(),
        }
    }

    /// Whether the block is disabled for the given run mode.
    pub fn is_disabled(&self, mode: RunMode) -> bool {
        self.disable_mask.contains(&mode)
    }

    /// Validate the base configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyName);
        }
        if self.block_type.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBlockType);
        }
        Ok(())
    }
}

/// Default instance name: last segment of the type name plus four hex digits.
fn default_block_name(block_type: &str) -> String {
    let short = block_type.rsplit('.').next().unwrap_or(block_type);
    let suffix = rand::thread_rng().gen_range(0..=u16::MAX);
    format!("{}-{:04x}", short, suffix)
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Block name must not be empty")]
    EmptyName,

    #[error("Block type must not be empty")]
    EmptyBlockType,

    #[error("Group-by column name must not be empty (use None for no grouping)")]
    EmptyGroupBy,
}

// =============================================================================
// ConstantImputer
// =============================================================================

/// Configuration of a [`crate::ConstantImputer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantImputerConfig {
    #[serde(flatten)]
    pub block: BlockConfig,

    /// Value written into every missing cell.
    /// Default: 0
    #[serde(default)]
    pub value: FillValue,
}

impl Default for ConstantImputerConfig {
    fn default() -> Self {
        Self {
            block: BlockConfig::new(CONSTANT_IMPUTER_TYPE),
            value: FillValue::default(),
        }
    }
}

impl ConstantImputerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ConstantImputerConfigBuilder {
        ConstantImputerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.block.validate()
    }
}

/// Builder for [`ConstantImputerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ConstantImputerConfigBuilder {
    name: Option<String>,
    disable_mask: Option<Vec<RunMode>>,
    value: Option<FillValue>,
}

impl ConstantImputerConfigBuilder {
    /// Set the block instance name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the run modes in which the block is skipped.
    pub fn disable_mask(mut self, modes: impl IntoIterator<Item = RunMode>) -> Self {
        self.disable_mask = Some(modes.into_iter().collect());
        self
    }

    /// Set the fill value.
    pub fn value(mut self, value: impl Into<FillValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<ConstantImputerConfig, ConfigValidationError> {
        let mut block = BlockConfig::new(CONSTANT_IMPUTER_TYPE);
        if let Some(name) = self.name {
            block.name = name;
        }
        block.disable_mask = self.disable_mask.unwrap_or_default();

        let config = ConstantImputerConfig {
            block,
            value: self.value.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// StatisticImputer
// =============================================================================

/// Configuration of a [`crate::StatisticImputer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticImputerConfig {
    #[serde(flatten)]
    pub block: BlockConfig,

    /// Statistic used as the fill value.
    /// Default: mean
    #[serde(default)]
    pub method: Statistic,

    /// Column whose values partition the rows into groups.
    /// Default: None (statistics are computed over whole columns)
    #[serde(default)]
    pub groupby: Option<String>,
}

impl Default for StatisticImputerConfig {
    fn default() -> Self {
        Self {
            block: BlockConfig::new(STATISTIC_IMPUTER_TYPE),
            method: Statistic::default(),
            groupby: None,
        }
    }
}

impl StatisticImputerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> StatisticImputerConfigBuilder {
        StatisticImputerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.block.validate()?;
        if let Some(key) = &self.groupby
            && key.is_empty()
        {
            return Err(ConfigValidationError::EmptyGroupBy);
        }
        Ok(())
    }
}

/// Builder for [`StatisticImputerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct StatisticImputerConfigBuilder {
    name: Option<String>,
    disable_mask: Option<Vec<RunMode>>,
    method: Option<Statistic>,
    groupby: Option<String>,
}

impl StatisticImputerConfigBuilder {
    /// Set the block instance name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the run modes in which the block is skipped.
    pub fn disable_mask(mut self, modes: impl IntoIterator<Item = RunMode>) -> Self {
        self.disable_mask = Some(modes.into_iter().collect());
        self
    }

    /// Set the statistic.
    pub fn method(mut self, method: Statistic) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the group-by key column.
    pub fn groupby(mut self, column: impl Into<String>) -> Self {
        self.groupby = Some(column.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<StatisticImputerConfig, ConfigValidationError> {
        let mut block = BlockConfig::new(STATISTIC_IMPUTER_TYPE);
        if let Some(name) = self.name {
            block.name = name;
        }
        block.disable_mask = self.disable_mask.unwrap_or_default();

        let config = StatisticImputerConfig {
            block,
            method: self.method.unwrap_or_default(),
            groupby: self.groupby,
        };

        config.validate()?;
        Ok(config)
    }
}
