// dupecheck: duplicate question detection served over HTTP.
//
// This is the library root. The binary in main.rs wires these together
// for the CLI; the integration tests drive the router directly.

pub mod checker;
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod output;
pub mod status;
pub mod web;
