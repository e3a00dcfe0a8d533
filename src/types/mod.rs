pub mod config;
pub mod repo;
pub mod report;
pub mod scoring;
