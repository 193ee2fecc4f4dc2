//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Pipeline configuration
//! - Error taxonomy
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Lexical path arithmetic
//! - Text file I/O with line-ending normalization

pub mod config;
pub mod error;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
