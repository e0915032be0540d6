// LogAnalyzer - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library and the platform capability traits
// (`platform::fs::FileProbe`) the analyzer is handed.
// Must NOT depend on: app.

pub mod analyzer;
pub mod config;
pub mod export;
pub mod model;
pub mod presenter;
