//! Shared test harness modules for the `offgrid` CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]
#![expect(
    clippy::expect_used,
    reason = "Test fixtures fail fast when the workspace cannot be prepared"
)]

use super::*;
use crate::score::{ScoreConfig, TargetGrid, config_from_layers_for_test, run_score_with};

mod helpers;
mod unit;
