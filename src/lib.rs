// Library root
// -----------
// The binary (`main.rs`) is a thin shell over these modules.
//
// Module responsibilities:
// - `api`: builds the analysis request and talks to the Kamos endpoint.
// - `store`: reads and writes the persisted JSON document and its viewer
//   mirror.
// - `history`: merges director history into fresh results and records
//   director notes.
// - `session`: the user-level operations, reporting failures as text.
// - `ui`: console rendering and progress output.
// - `cli`, `config`, `error`, `models`: argument surface, per-run settings,
//   error types and document shapes.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod session;
pub mod store;
pub mod ui;
