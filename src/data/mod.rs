pub mod cache;
pub mod simulation_api;
pub mod types;
