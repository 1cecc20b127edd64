pub mod aggregation;
pub mod config;
pub mod cooccurrence;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod pmi;
pub mod ranking;
