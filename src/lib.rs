#![forbid(unsafe_code)]
//! sizetree — per-directory disk usage, reported depth-first as CSV.

pub mod cli;
pub mod logging;
pub mod report;
pub mod tree;
