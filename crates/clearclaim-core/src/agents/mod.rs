//! Agent contracts, instruction templates, and the runner.

pub mod prompts;
pub mod roster;
pub mod runner;

pub use roster::{AgentContract, AgentKind, Roster};
pub use runner::run_agent;
