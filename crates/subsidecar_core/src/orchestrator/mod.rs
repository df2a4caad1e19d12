//! Extraction orchestration.
//!
//! Ties the oracle, selector, and command layers together behind the two
//! hooks a host schedules work with: a file test (`needs_processing`) and a
//! worker stage (`build_plan` / `run`).

mod oracle;
#[cfg(test)]
mod test_support;
mod types;
mod worker;

pub use oracle::{already_extracted, existing_sidecars};
pub use types::{Context, ExecutionPlan};
pub use worker::{build_plan, needs_processing, run, TagWriteError};
