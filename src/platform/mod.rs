// PoolWatch - platform/mod.rs
//
// Platform abstraction layer: directories, config files, filesystem, HTTP.
// Dependencies: standard library, directories, reqwest, app collaborator traits.
// Must NOT depend on: ui.

pub mod config;
pub mod fs;
pub mod http;
