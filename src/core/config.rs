//! Pipeline configuration
//!
//! All constants the two passes depend on. The defaults reproduce the
//! behaviour of a plain zero-argument run over a `catch2` tree.

use serde::{Deserialize, Serialize};

/// Root directory used when none is given
pub const DEFAULT_ROOT: &str = "catch2";

/// Include namespace matched by the rewriter
pub const DEFAULT_NAMESPACE: &str = "catch2";

pub const DEFAULT_SOURCE_EXT: &str = "cpp";
pub const DEFAULT_HEADER_EXT: &str = "hpp";

/// Suffix appended to the upper-cased header stem to form the include guard
pub const DEFAULT_GUARD_SUFFIX: &str = "_CPP_INCLUDED";

/// Attribution token written into every generated comment
pub const DEFAULT_TAG: &str = "amalgamate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmalgamConfig {
    pub namespace: String,
    pub source_ext: String,
    pub header_ext: String,
    pub toggle_macro: String,
    pub guard_suffix: String,
    pub tag: String,
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for AmalgamConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            source_ext: DEFAULT_SOURCE_EXT.to_string(),
            header_ext: DEFAULT_HEADER_EXT.to_string(),
            toggle_macro: default_toggle_macro(DEFAULT_NAMESPACE),
            guard_suffix: DEFAULT_GUARD_SUFFIX.to_string(),
            tag: DEFAULT_TAG.to_string(),
            dry_run: false,
        }
    }
}

impl AmalgamConfig {
    /// Config for another namespace; the toggle macro follows the namespace
    #[allow(dead_code)]
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            toggle_macro: default_toggle_macro(&namespace),
            namespace,
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Trailing comment put after a rewritten include
    pub fn relative_comment(&self) -> String {
        format!("// Adjust to relative path ({})", self.tag)
    }

    /// Trailing comment put after a disabled self include
    pub fn self_include_comment(&self) -> String {
        format!("// Disable self-include ({})", self.tag)
    }
}

/// `catch2` -> `CATCH2_IMPLEMENTATION`
pub fn default_toggle_macro(namespace: &str) -> String {
    format!("{}_IMPLEMENTATION", namespace.to_uppercase())
}
