// PoolWatch - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library, serde_json values, util.
// Must NOT depend on: ui, platform, app, or any I/O crate directly.

pub mod export;
pub mod filter;
pub mod model;
pub mod normalize;
