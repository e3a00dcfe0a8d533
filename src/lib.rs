pub mod analyze;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod results;
pub mod scan;
pub mod store;
pub mod types;
pub mod vcs;
