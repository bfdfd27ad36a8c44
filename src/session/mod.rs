/// Mosh parameters and execution options.
pub mod config;
/// Per-frame orchestration of a mosh run.
pub mod mosh_session;
