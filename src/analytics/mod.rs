pub mod edge;
pub mod odds;
pub mod parlay;
pub mod scanner;
pub mod types;
