// PoolWatch - lib.rs
//
// Library entry point: the dashboard state store and its collaborators,
// exposed for embedding in UI hosts and for integration testing.
//
// The command-line host lives in `main.rs` and is not part of the
// library surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
