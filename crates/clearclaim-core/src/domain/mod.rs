//! Domain model: claim facts, the verdict contract, and run state.

pub mod claim;
pub mod error;
pub mod run;
pub mod verdict;

pub use claim::ClaimFacts;
pub use error::{ClaimError, Result};
pub use run::{ClaimRun, WorkflowStage};
pub use verdict::{Verdict, VerdictStatus};
