pub mod gif;
pub mod orchestrator;
