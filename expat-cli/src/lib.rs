//! Command-line front end for the relocation estimator.

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod report;
