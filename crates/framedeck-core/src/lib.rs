// crates/framedeck-core/src/lib.rs
//
// Pure client logic — no egui, no ureq, no threads.
// Everything here is testable without a server or a window.
//
// To add a new piece of session state or a new user action:
//   1. Extend state.rs / gallery.rs (with its transition method)
//   2. Add a ClientCommand variant in commands.rs
//   3. Handle it in framedeck-ui's app.rs

pub mod api_types;
pub mod commands;
pub mod gallery;
pub mod helpers;
pub mod state;
