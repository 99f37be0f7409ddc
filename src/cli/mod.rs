//! Command line surface: each subcommand forwards to the rate aggregator.

pub mod best_rate;
pub mod compare;
pub mod setup;
pub mod ui;
