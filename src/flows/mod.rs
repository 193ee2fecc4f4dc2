//! Flows module - the two tree passes and the pipeline that chains them
//!
//! Provides:
//! - rewrite: library includes to relative paths
//! - amalgamate: .cpp into same-named .hpp
//! - pipeline: rewrite, then amalgamate

pub mod amalgamate;
pub mod pipeline;
pub mod rewrite;
