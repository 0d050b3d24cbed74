pub mod analysis;
pub mod classify;
pub mod config;
pub mod error;
pub mod ingest;
pub mod output;
pub mod report;
