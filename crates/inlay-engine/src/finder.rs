//! Reference discovery
//!
//! Walks the document tree and collects every node that references an
//! SVG asset by path. Read-only; the rewriter later addresses the same
//! nodes through the collected [`NodePath`]s.

use crate::types::ReferenceSite;
use inlay_dom::{Node, NodePath};

/// Attribute naming the referenced asset
pub const TARGET_ATTR: &str = "src";

/// Recognized asset extension (matched case-insensitively)
const ASSET_EXT: &str = ".svg";

/// Collect all SVG reference sites in document order (pre-order DFS)
///
/// Uses an explicit stack so tree depth is bounded by document size, not
/// by the call stack.
#[must_use]
pub fn find_references(root: &Node) -> Vec<ReferenceSite> {
    let mut sites = Vec::new();
    let mut stack: Vec<(&Node, NodePath)> = vec![(root, NodePath::new())];

    while let Some((node, path)) = stack.pop() {
        if let Node::Element(el) = node {
            if let Some(target) = el.attr(TARGET_ATTR) {
                if is_asset_target(target) {
                    sites.push(ReferenceSite {
                        path: path.clone(),
                        target: target.to_string(),
                    });
                }
            }
            // Reverse push keeps pre-order discovery
            for (index, child) in el.children.iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(index);
                stack.push((child, child_path));
            }
        }
    }

    sites
}

fn is_asset_target(target: &str) -> bool {
    target
        .get(target.len().saturating_sub(ASSET_EXT.len())..)
        .is_some_and(|suffix| suffix.eq_ignore_ascii_case(ASSET_EXT))
}
