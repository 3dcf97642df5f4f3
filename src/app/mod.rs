// PoolWatch - app/mod.rs
//
// Application layer: state management, refresh orchestration, preferences.
// Dependencies: core layer, platform::fs for persistence, ui theme hook.
// Must NOT depend on: platform::http (the source arrives as a trait).

pub mod prefs;
pub mod refresh;
pub mod state;
pub mod store;
