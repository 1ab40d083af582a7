//! Command execution engine for cmdrunner
//!
//! A [`CodeExecutor`] takes an opaque shell command, cleans it, optionally
//! materializes it into a scratch script, runs it under a hard timeout and
//! packages a structured [`ExecutionResult`]. Every execution is recorded in
//! the executor's own session log.

mod executor;
mod normalize;
mod outcome;
mod result;
mod script;

pub use executor::CodeExecutor;
pub use normalize::{NormalizedCommand, normalize};
pub use outcome::{ExecutionOutcome, ExecutionRequest};
pub use result::{ExecutionResult, FailureKind, NO_OUTPUT_SENTINEL, TIMEOUT_STDERR};
pub use script::ScratchArtifacts;
pub use self_test::{SelfTestCase, SelfTestOutcome, SelfTestReport, default_cases};
