//! Test harness for structural frame development.
//!
//! Provides a bench for solving frames by name, verifying the placed
//! assembly with oracles, and generating diagnostic reports.
//!
//! # Key Components
//!
//! - [`FrameBench`]: named frames and members over one kernel
//! - [`oracle`]: verification functions returning pass/fail verdicts
//! - [`report`]: structured text frame descriptions
//! - [`helpers`]: error type, fixture profiles, scenario inputs, bounds math
//! - [`assertions`]: assertion helpers with diagnostics

pub mod assertions;
pub mod bench;
pub mod helpers;
pub mod oracle;
pub mod report;

pub use bench::FrameBench;
pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use report::FrameReport;
