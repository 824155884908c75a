//! coprop - which props hit together
//!
//! Given per-player game logs and a board of over lines, this library builds a
//! complete directed influence graph over the props and runs a
//! maximum-product path search from an anchor prop to rank which other props
//! are most likely to hit when the anchor does.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dot_output;
pub mod error;
pub mod hit_rate;
pub mod influence_graph;
pub mod max_influence;
pub mod observation;
pub mod path;
pub mod ranking;
pub mod report;
