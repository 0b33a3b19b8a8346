//! Command implementations

pub mod config;
pub mod dedupe;
pub mod describe;
pub mod doctor;
pub mod ingest;
pub mod sites;
