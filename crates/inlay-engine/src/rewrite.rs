//! Tree rewriting
//!
//! Replaces each surviving reference node with a fresh copy of its
//! asset's parsed fragment. The reference node's attributes win on
//! collision; the target attribute never survives into the inlined
//! result. A group is rewritten all-or-nothing: if its content has no
//! usable root element, every reference in the group is left untouched.

use crate::cache::CacheEntry;
use crate::finder::TARGET_ATTR;
use crate::types::{AssetId, ReferenceGroups};
use inlay_dom::{Element, FragmentParser, Node};
use std::collections::HashMap;
use std::sync::Arc;

/// Rewrite every reference in `groups` whose entry parses to a fragment
///
/// Groups iterate in discovery order; each site receives its own
/// independent copy of the fragment so downstream mutation of one
/// inlined node cannot leak into another.
pub fn rewrite_references(
    root: &mut Node,
    groups: &ReferenceGroups,
    entries: &HashMap<AssetId, Arc<CacheEntry>>,
    parser: &dyn FragmentParser,
) {
    for (id, sites) in groups {
        let Some(entry) = entries.get(id) else {
            continue;
        };

        let fragment = match parser.parse_fragment(&entry.content) {
            Ok(fragment) => fragment,
            Err(err) => {
                tracing::warn!(asset = %id, error = %err, "asset content not inlinable; leaving references untouched");
                continue;
            }
        };

        for site in sites {
            let Some(slot) = root.descend_mut(&site.path) else {
                tracing::warn!(asset = %id, path = ?site.path, "reference site vanished before rewrite");
                continue;
            };
            *slot = Node::Element(inline_node(slot, &fragment));
        }
    }
}

/// Build the replacement node for one reference site
///
/// Merged attributes start from the fragment root's and are overlaid by
/// the reference node's own, minus the target attribute. Children are a
/// deep clone of the fragment's.
fn inline_node(reference: &Node, fragment: &Element) -> Element {
    let mut attrs = fragment.attrs.clone();
    if let Node::Element(el) = reference {
        for (name, value) in &el.attrs {
            attrs.insert(name.clone(), value.clone());
        }
    }
    attrs.shift_remove(TARGET_ATTR);

    Element {
        tag: fragment.tag.clone(),
        attrs,
        children: fragment.children.clone(),
    }
}
