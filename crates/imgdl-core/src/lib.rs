pub mod config;
pub mod logging;

pub mod csv_sink;
pub mod extract;
pub mod fetch;
pub mod outcome;
pub mod placement;
pub mod query;
pub mod scheduler;
pub mod storage;
