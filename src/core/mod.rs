pub mod domain;
pub mod orchestrator;
pub mod registry;
pub mod traits;
