//! Vector representation benchmark suite
//!
//! - `harness`: adaptive loop-doubling timer
//! - `cases`: the ordered set of named operations
//! - `runner`: drives the suite and prints the console report
//! - `report`: console line formats and the JSON report
//! - `verify`: checks each case's output before trusting its timing

pub mod cases;
pub mod harness;
pub mod report;
pub mod runner;
pub mod verify;

pub use cases::{BenchCase, Representation, Section, CASES};
pub use harness::{Measurement, TimingHarness, TimingPolicy};
pub use report::{CaseResult, SuiteReport};
pub use runner::{run_all, run_all_async, SuiteRunner};
pub use verify::{verify_cases, VerifyOutcome};
