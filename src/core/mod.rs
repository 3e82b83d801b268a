pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod log;
pub mod logic;
