// Library root
// -----------
// The binary (`main.rs`) parses flags and hands off to these modules to
// fetch a node's core configuration from the panel.
//
// Module responsibilities:
// - `params`: the parameter registry (panel URL, token, overwrite) and
//   their validators.
// - `cli`: `clap` flag schema and conversion into a validated registry.
// - `ui`: interactive prompts, the overwrite guard and the run sequence.
// - `api`: the blocking HTTP call to the panel.
// - `store`: existence check and writer for the local configuration file.
// - `error`: failure categories and their exit codes.
pub mod api;
pub mod cli;
pub mod error;
pub mod params;
pub mod store;
pub mod ui;

pub use error::ConfigureError;
