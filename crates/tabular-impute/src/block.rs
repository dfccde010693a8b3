//! The block contract shared by every pipeline stage.
//!
//! A pipeline calls [`Block::invoke`] on each stage with the current
//! [`RunSpec`], a feature table, and optional labels and identifiers. The
//! stage returns the transformed table and forwards labels and identifiers
//! downstream.

use crate::config::BlockConfig;
use crate::error::Result;
use crate::table::TableInput;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Mode of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Interactive preview of intermediate results
    #[default]
    Preview,
    /// Fitting on training data
    Train,
    /// Evaluation on held-out data
    Test,
    /// Production run
    Run,
}

/// Run-scoped context handed to every block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSpec {
    pub mode: RunMode,
}

impl RunSpec {
    pub fn new(mode: RunMode) -> Self {
        Self { mode }
    }
}

/// Output of a block: features, labels, identifiers.
pub type BlockOutput = (DataFrame, Option<Series>, Option<Series>);

/// A pipeline stage.
pub trait Block: Send + Sync {
    /// Base configuration of this block.
    fn config(&self) -> &BlockConfig;

    /// Serialize the block configuration (not the data it processed).
    fn dump(&self) -> Result<serde_json::Value>;

    /// Transform `x`; `y` and `id` pass through unchanged.
    fn run(
        &self,
        runspec: &RunSpec,
        x: TableInput,
        y: Option<Series>,
        id: Option<Series>,
    ) -> Result<BlockOutput>;

    /// Pipeline entry point.
    ///
    /// Returns the coerced input unchanged when the block is disabled for the
    /// run mode, otherwise delegates to [`Block::run`].
    fn invoke(
        &self,
        runspec: &RunSpec,
        x: TableInput,
        y: Option<Series>,
        id: Option<Series>,
    ) -> Result<BlockOutput> {
        let config = self.config();
        if config.is_disabled(runspec.mode) {
            debug!(
                "Block '{}' disabled for {:?}, passing data through",
                config.name, runspec.mode
            );
            return Ok((x.into_frame()?, y, id));
        }
        self.run(runspec, x, y, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_serialization() {
        assert_eq!(serde_json::to_string(&RunMode::Train).unwrap(), "\"train\"");
        let mode: RunMode = serde_json::from_str("\"preview\"").unwrap();
        assert_eq!(mode, RunMode::Preview);
    }

    #[test]
    fn test_runspec_default_mode() {
        assert_eq!(RunSpec::default().mode, RunMode::Preview);
        assert_eq!(RunSpec::new(RunMode::Run).mode, RunMode::Run);
    }
}
