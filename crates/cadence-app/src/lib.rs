//! Command-line front end for expanding recurrence rules.

pub mod cli;
pub mod render;
