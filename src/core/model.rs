//! Unified Result Model
//!
//! Both passes report what they did as a ResultSet before rendering.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A file whose include directives were rewritten
    Rewrite,
    /// A header that received an implementation file
    Amalgamate,
    /// An implementation file without a header, left in place
    Skip,
    Error,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Size in bytes of what was (or would be) written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// xxh3 hash of what was (or would be) written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Nothing was written to disk
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
}

impl Meta {
    pub fn for_bytes(data: &[u8], dry_run: bool) -> Self {
        Self {
            size: Some(data.len() as u64),
            hash: Some(crate::core::util::hash_bytes(data)),
            dry_run,
        }
    }
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::core::error::AmalgamError> for ItemError {
    fn from(err: &crate::core::error::AmalgamError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Kind-specific payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    fn new(kind: Kind, path: Option<String>) -> Self {
        Self {
            kind,
            path,
            data: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// A file whose directives were rewritten
    pub fn rewrite(path: impl Into<String>, directives: usize) -> Self {
        let mut item = Self::new(Kind::Rewrite, Some(path.into()));
        item.data = Some(json!({ "directives": directives }));
        item
    }

    /// A header that absorbed `source`
    pub fn amalgamate(
        header: impl Into<String>,
        source: impl Into<String>,
        guard: impl Into<String>,
        disabled_includes: usize,
    ) -> Self {
        let source: String = source.into();
        let guard: String = guard.into();
        let mut item = Self::new(Kind::Amalgamate, Some(header.into()));
        item.data = Some(json!({
            "source": source,
            "guard": guard,
            "disabled_includes": disabled_includes,
        }));
        item
    }

    /// An implementation file with no header
    pub fn skip(path: impl Into<String>, reason: &str) -> Self {
        let mut item = Self::new(Kind::Skip, Some(path.into()));
        item.data = Some(json!({ "reason": reason }));
        item
    }

    pub fn error(error: ItemError) -> Self {
        let mut item = Self::new(Kind::Error, None);
        item.errors.push(error);
        item
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Read an integer field out of `data`
    pub fn data_count(&self, key: &str) -> Option<u64> {
        self.data.as_ref()?.get(key)?.as_u64()
    }
}

/// Result set containing multiple result items, in walk order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
