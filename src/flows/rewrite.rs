//! Include rewriter
//!
//! Turns `#include "<ns>/path"` and `#include <<ns>/path>` into quote-delimited
//! includes relative to the including file. Matching is purely lexical: a
//! directive inside a comment or string literal is rewritten all the same.

use regex::{Captures, Regex};
use std::path::Path;
use tracing::{debug, info};

use crate::backends::walk::for_each_file;
use crate::core::config::AmalgamConfig;
use crate::core::error::{AmalgamError, Result};
use crate::core::model::{Meta, ResultItem, ResultSet};
use crate::core::paths::{absolutize, make_relative, relative_to, resolve};
use crate::core::util::{normalize_line_endings, read_text_file, write_text_file};

/// Matcher for include directives under one namespace
#[derive(Debug, Clone)]
pub struct IncludeRewriter {
    pattern: Regex,
    comment: String,
}

impl IncludeRewriter {
    pub fn new(config: &AmalgamConfig) -> Self {
        // The capture is greedy up to the last quote or '>' on the line.
        let pattern = Regex::new(&format!(
            r#"#include\s+["<]{}/([^\r\n]*)[">]"#,
            regex::escape(&config.namespace)
        ))
        .expect("escaped namespace forms a valid pattern");

        Self {
            pattern,
            comment: config.relative_comment(),
        }
    }

    /// Rewrite every directive in `text` for a file living in `file_dir`.
    ///
    /// `root` and `file_dir` must be absolute. Returns the new text and the
    /// number of directives rewritten.
    pub fn rewrite(&self, text: &str, root: &Path, file_dir: &Path) -> (String, usize) {
        let mut count = 0;
        let rewritten = self.pattern.replace_all(text, |caps: &Captures| {
            count += 1;
            let target = resolve(root, &caps[1]);
            let relative = relative_to(file_dir, &target);
            format!("#include \"{}\"  {}", relative, self.comment)
        });
        (rewritten.into_owned(), count)
    }
}

/// Rewrite includes in every file under `root`.
///
/// Every file is read and written back, so line endings are normalized even
/// where no directive matched. Only files with at least one rewritten
/// directive are reported.
pub fn rewrite_includes(root: &Path, config: &AmalgamConfig) -> Result<ResultSet> {
    let root = absolutize(root).map_err(|e| AmalgamError::directory(root, e))?;
    let rewriter = IncludeRewriter::new(config);
    let mut results = ResultSet::new();
    let mut visited = 0usize;

    for_each_file(&root, |path| {
        visited += 1;
        let text = read_text_file(path)?;
        let dir = path.parent().unwrap_or(&root);
        let (text, count) = rewriter.rewrite(&text, &root, dir);

        let data = if config.dry_run {
            normalize_line_endings(&text).into_bytes()
        } else {
            write_text_file(path, &text)?
        };

        if count > 0 {
            let relative = make_relative(path, &root).unwrap_or_default();
            debug!(path = %relative, directives = count, "rewrote includes");
            results.push(
                ResultItem::rewrite(relative, count).with_meta(Meta::for_bytes(&data, config.dry_run)),
            );
        }
        Ok(())
    })?;

    info!(
        root = %root.display(),
        files = visited,
        rewritten = results.len(),
        dry_run = config.dry_run,
        "include rewrite pass complete"
    );
    Ok(results)
}
