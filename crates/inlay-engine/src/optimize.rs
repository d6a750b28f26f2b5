//! Optimization transform boundary
//!
//! The transform is opaque to the engine: content in, smaller content
//! out. [`SvgMinifier`] is the shipping default; hosts with heavier
//! pipelines implement [`AssetOptimizer`] themselves.

use crate::error::OptimizeError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Pure content transform applied once per asset identity
pub trait AssetOptimizer: Send + Sync {
    /// Transform `content`; `path` is available for format decisions
    fn optimize(&self, content: &str, path: &Path) -> Result<String, OptimizeError>;
}

/// Pass-through optimizer
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOptimizer;

impl AssetOptimizer for NoopOptimizer {
    fn optimize(&self, content: &str, _path: &Path) -> Result<String, OptimizeError> {
        Ok(content.to_string())
    }
}

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static INTER_TAG_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s+<").expect("valid regex"));

/// Conservative SVG minifier: strips comments and collapses whitespace
/// between tags
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgMinifier;

impl AssetOptimizer for SvgMinifier {
    fn optimize(&self, content: &str, _path: &Path) -> Result<String, OptimizeError> {
        let without_comments = COMMENT_RE.replace_all(content, "");
        let collapsed = INTER_TAG_WS_RE.replace_all(&without_comments, "><");
        Ok(collapsed.trim().to_string())
    }
}
