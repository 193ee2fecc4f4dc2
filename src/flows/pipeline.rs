//! Full pipeline: rewrite includes over the whole tree, then amalgamate.
//!
//! The amalgamation pass does its own walk and relies on the rewrite pass
//! having finished, so self includes are already in relative form.

use std::path::Path;
use tracing::info;

use crate::core::config::AmalgamConfig;
use crate::core::error::Result;
use crate::core::model::{Kind, ResultSet};
use crate::flows::amalgamate::amalgamate;
use crate::flows::rewrite::rewrite_includes;

/// Run both passes in order, returning their combined results
pub fn run_pipeline(root: &Path, config: &AmalgamConfig) -> Result<ResultSet> {
    let mut results = rewrite_includes(root, config)?;
    results.extend(amalgamate(root, config)?);

    info!(
        rewritten = results.count(Kind::Rewrite),
        merged = results.count(Kind::Amalgamate),
        skipped = results.count(Kind::Skip),
        "pipeline complete"
    );
    Ok(results)
}
