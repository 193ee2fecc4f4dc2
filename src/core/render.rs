//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown, one section per kind
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut rewrites = Vec::new();
        let mut merges = Vec::new();
        let mut skips = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Rewrite => rewrites.push(item),
                Kind::Amalgamate => merges.push(item),
                Kind::Skip => skips.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        if !rewrites.is_empty() {
            output.push_str("## Rewritten includes\n\n");
            for item in rewrites {
                self.render_item_md(&mut output, item, |item| {
                    item.data_count("directives")
                        .map(|n| format!("{} directive(s)", n))
                });
            }
            output.push('\n');
        }

        if !merges.is_empty() {
            output.push_str("## Amalgamated\n\n");
            for item in merges {
                self.render_item_md(&mut output, item, |item| {
                    let data = item.data.as_ref()?;
                    Some(format!(
                        "from `{}`, guard `{}`",
                        data.get("source")?.as_str()?,
                        data.get("guard")?.as_str()?
                    ))
                });
            }
            output.push('\n');
        }

        if !skips.is_empty() {
            output.push_str("## Skipped\n\n");
            for item in skips {
                self.render_item_md(&mut output, item, |item| {
                    item.data
                        .as_ref()?
                        .get("reason")?
                        .as_str()
                        .map(str::to_string)
                });
            }
            output.push('\n');
        }

        output
    }

    fn render_item_md<F>(&self, output: &mut String, item: &ResultItem, detail: F)
    where
        F: Fn(&ResultItem) -> Option<String>,
    {
        if let Some(path) = &item.path {
            output.push_str(&format!("- `{}`", path));
            if let Some(detail) = detail(item) {
                output.push_str(&format!(": {}", detail));
            }
            if let Some(size) = item.meta.size {
                output.push_str(&format!(" ({} bytes)", size));
            }
            if item.meta.dry_run {
                output.push_str(" _(dry run)_");
            }
            output.push('\n');
        }
    }
}
