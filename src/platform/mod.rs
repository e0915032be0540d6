// LogAnalyzer - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories crate, util layer,
// core::export::ReportFormat (settings value type).
// Must NOT depend on: app.

pub mod config;
pub mod fs;
