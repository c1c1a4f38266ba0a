//! Everything that touches the simulation engine: launching it and reading
//! what it wrote.
pub mod output;
pub mod runner;

pub use output::EngineOutput;
pub use runner::SimcRunner;
