// PoolWatch - ui/mod.rs
//
// UI layer: presentation hooks only.
// Dependencies: egui.
// Must NOT depend on: platform, direct I/O.

pub mod theme;
