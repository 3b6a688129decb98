//! Selection state and the table-driven command engine.
//!
//! A command is armed by the host as a `(group, index)` code. Entities are
//! added to the selection one by one while the command's table entry still
//! accepts them; once a signature is complete the command fires.

pub mod state;
pub use state::{Selected, SelectionState};

pub mod commands;
pub use commands::{command, Action, Candidate, CommandCode, CommandSpec, Origin, Signature, Slot, COMMANDS};

pub mod engine;
pub use engine::{is_available, is_ready, resolve, Resolved};

#[cfg(test)]
mod tests_commands;
