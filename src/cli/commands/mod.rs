//! CLI command implementations.

mod config;
mod doctor;
mod research;
mod serve;

pub use config::run_config;
pub use doctor::run_doctor;
pub use research::{run_research, View};
pub use serve::run_serve;

/// How a command finished when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Done,
    /// The user pressed Ctrl+C or closed stdin.
    Interrupted,
}

impl Completion {
    /// Process exit status. Leaving with Ctrl+C is not a failure.
    pub fn exit_code(self) -> i32 {
        match self {
            Completion::Done | Completion::Interrupted => 0,
        }
    }

    /// Whether the process must exit right away instead of returning from `main`.
    ///
    /// A blocking stdin read may still be pending after an interrupt, and it
    /// would keep the runtime from shutting down.
    pub fn exits_immediately(self) -> bool {
        self == Completion::Interrupted
    }
}
