//! Generic document tree
//!
//! Hosts hand the engine a tree of [`Node`]s; the engine only relies on
//! tag, attribute map and children. Attribute order is preserved because
//! it is part of the serialized output.

use indexmap::IndexMap;

/// Ordered attribute map (`name -> value`)
pub type AttrMap = IndexMap<String, String>;

/// Child-index path from the tree root to one node
///
/// An empty path addresses the root itself. Paths stay valid across
/// in-place node replacement because replacement never changes sibling
/// counts.
pub type NodePath = Vec<usize>;

/// One node of a document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with tag, attributes and children
    Element(Element),
    /// Raw text content
    Text(String),
}

/// An element node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name (e.g. `img`, `svg`)
    pub tag: String,
    /// Attributes in document order
    pub attrs: AttrMap,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children
    #[inline]
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: AttrMap::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Get an attribute value by name
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

impl Node {
    /// Shorthand for a text node
    #[inline]
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// The element behind this node, if it is one
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// Child nodes (empty slice for text nodes)
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Element(el) => &el.children,
            Self::Text(_) => &[],
        }
    }

    /// Walk a [`NodePath`] down from this node
    #[must_use]
    pub fn descend(&self, path: &[usize]) -> Option<&Node> {
        let mut current = self;
        for &index in path {
            current = current.children().get(index)?;
        }
        Some(current)
    }

    /// Walk a [`NodePath`] down from this node, mutably
    #[must_use]
    pub fn descend_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut current = self;
        for &index in path {
            current = match current {
                Self::Element(el) => el.children.get_mut(index)?,
                Self::Text(_) => return None,
            };
        }
        Some(current)
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl Drop for Element {
    /// Drain descendants into a worklist so dropping a deep tree does
    /// not recurse once per nesting level
    fn drop(&mut self) {
        let mut worklist = std::mem::take(&mut self.children);
        while let Some(node) = worklist.pop() {
            if let Node::Element(mut el) = node {
                worklist.append(&mut el.children);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> Node {
        let mut leaf = Element::new("img");
        leaf.set_attr("src", "icon.svg");

        let mut inner = Element::new("div");
        inner.children.push(Node::text("hello"));
        inner.children.push(leaf.into());

        let mut root = Element::new("body");
        root.children.push(inner.into());
        root.into()
    }

    #[test]
    fn descend_empty_path_is_root() {
        let tree = sample_tree();
        let found = tree.descend(&[]).unwrap();
        assert_eq!(found.as_element().unwrap().tag, "body");
    }

    #[test]
    fn descend_reaches_nested_node() {
        let tree = sample_tree();
        let found = tree.descend(&[0, 1]).unwrap();
        assert_eq!(found.as_element().unwrap().attr("src"), Some("icon.svg"));
    }

    #[test]
    fn descend_out_of_bounds_is_none() {
        let tree = sample_tree();
        assert!(tree.descend(&[0, 5]).is_none());
        assert!(tree.descend(&[3]).is_none());
    }

    #[test]
    fn descend_through_text_is_none() {
        let tree = sample_tree();
        // [0, 0] is a text node; it has no children.
        assert!(tree.descend(&[0, 0, 0]).is_none());
    }

    #[test]
    fn descend_mut_allows_replacement() {
        let mut tree = sample_tree();
        let slot = tree.descend_mut(&[0, 1]).unwrap();
        *slot = Node::Element(Element::new("svg"));

        let replaced = tree.descend(&[0, 1]).unwrap();
        assert_eq!(replaced.as_element().unwrap().tag, "svg");
        // Sibling untouched
        assert_eq!(tree.descend(&[0, 0]).unwrap(), &Node::text("hello"));
    }

    #[test]
    fn deeply_nested_tree_drops_without_blowing_the_stack() {
        let mut tree: Node = Element::new("span").into();
        for _ in 0..100_000 {
            let mut wrapper = Element::new("div");
            wrapper.children.push(tree);
            tree = wrapper.into();
        }
        drop(tree);
    }

    #[test]
    fn attr_order_is_preserved() {
        let mut el = Element::new("svg");
        el.set_attr("viewBox", "0 0 10 10");
        el.set_attr("alt", "icon");
        el.set_attr("width", "10");

        let names: Vec<&str> = el.attrs.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["viewBox", "alt", "width"]);
    }
}
