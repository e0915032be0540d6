// LogAnalyzer - app/mod.rs
//
// Application layer: concurrent orchestration and the end-to-end pipeline.
// Dependencies: core layer.

pub mod pipeline;
pub mod scheduler;
