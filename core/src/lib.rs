pub mod config;
pub mod construct;
pub mod controller;
pub mod geometry;
pub mod graph;
pub mod input;
pub mod scene;
pub mod selection;

pub use config::EngineConfig;
pub use controller::{CommandError, Controller, EventOutcome};

pub fn version() -> &'static str {
    "0.1.0"
}
