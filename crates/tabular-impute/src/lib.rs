//! Missing-Value Imputation Blocks
//!
//! Pipeline blocks that fill missing cells of a table, built with Rust and
//! Polars.
//!
//! # Overview
//!
//! - **ConstantImputer**: Fills every missing cell with one fixed value
//! - **StatisticImputer**: Fills each column with a statistic of its present
//!   values (mean, median, mode, sum, min, max, std, var), optionally computed
//!   per group of a key column
//!
//! Both are [`Block`]s: they take a [`RunSpec`], a feature table and optional
//! labels and identifiers, and return the filled table with labels and
//! identifiers passed through. A cell is missing when it is null; float NaN
//! is treated as null.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tabular_impute::{Block, RunSpec, StatisticImputer};
//!
//! let rows = vec![
//!     vec![1.0, f64::NAN, 1.0],
//!     vec![f64::NAN, 2.0, 2.0],
//!     vec![3.0, 3.0, f64::NAN],
//! ];
//!
//! let imputer = StatisticImputer::new("mean", None)?;
//! let (filled, _, _) = imputer.run(&RunSpec::default(), rows.into(), None, None)?;
//! // column "1" is now [2.5, 2.0, 3.0]
//! ```
//!
//! # Grouped Statistics
//!
//! ```rust,ignore
//! use tabular_impute::{Statistic, StatisticImputer, StatisticImputerConfig};
//!
//! let config = StatisticImputerConfig::builder()
//!     .method(Statistic::Median)
//!     .groupby("Pclass")
//!     .build()?;
//!
//! let filled = StatisticImputer::from_config(config)?.impute(df)?;
//! ```
//!
//! # Persistence
//!
//! [`Block::dump`] serializes a block's configuration to flat JSON and
//! [`load_block`] rebuilds the block from it.

pub mod block;
pub mod config;
pub mod error;
pub mod imputers;
pub mod statistic;
pub mod table;

// Re-exports for convenient access
pub use block::{Block, BlockOutput, RunMode, RunSpec};
pub use config::{
    BlockConfig, ConfigValidationError, ConstantImputerConfig, ConstantImputerConfigBuilder,
    FillValue, StatisticImputerConfig, StatisticImputerConfigBuilder,
};
pub use error::{ImputeError, Result as ImputeResult, ResultExt};
pub use imputers::{ConstantImputer, StatisticImputer, load_block};
pub use statistic::Statistic;
pub use table::{DtypeCategory, TableInput, get_dtype_category, is_numeric_dtype};
