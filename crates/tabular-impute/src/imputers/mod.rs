//! Imputation blocks for filling missing values.
//!
//! This module provides two imputation strategies:
//! - Constant imputation (one fixed value for every missing cell)
//! - Statistic imputation (mean, median, mode, ..., optionally per group)

mod constant;
mod statistic;

pub use constant::ConstantImputer;
pub use statistic::StatisticImputer;

use crate::block::Block;
use crate::config::{CONSTANT_IMPUTER_TYPE, METHOD_IMPUTER_TYPE, STATISTIC_IMPUTER_TYPE};
use crate::error::{ImputeError, Result, ResultExt};

/// Rebuild a block from its dump, dispatching on the `_type` field.
pub fn load_block(dump: &serde_json::Value) -> Result<Box<dyn Block>> {
    let block_type = dump
        .get("_type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();

    let block: Box<dyn Block> = match block_type {
        CONSTANT_IMPUTER_TYPE => Box::new(ConstantImputer::from_dump(dump)?),
        STATISTIC_IMPUTER_TYPE | METHOD_IMPUTER_TYPE => Box::new(
            StatisticImputer::from_dump(dump)
                .context(format!("Failed to load {}", block_type))?,
        ),
        other => return Err(ImputeError::UnknownBlockType(other.to_string())),
    };
    Ok(block)
}
