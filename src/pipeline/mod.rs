pub mod price_orchestrator;

pub use price_orchestrator::*;
