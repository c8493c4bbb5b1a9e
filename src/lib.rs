pub mod chart;
pub mod config;
pub mod display;
pub mod errors;
pub mod invoke;
pub mod logging;
pub mod parse;
pub mod persist;
pub mod run;
pub mod types;
