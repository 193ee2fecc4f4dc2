//! Backends module - filesystem traversal
//!
//! Provides:
//! - walk: recursive file enumeration with walkdir

pub mod walk;
