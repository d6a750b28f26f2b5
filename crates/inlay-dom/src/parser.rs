//! Fragment parsing boundary
//!
//! Raw asset content crosses into the tree world here. The engine only
//! needs the root element's tag and attributes for merging; inner markup
//! is preserved verbatim as a single text child rather than re-modeled,
//! so the parser stays a thin boundary instead of a full XML tree
//! builder.

use crate::node::{AttrMap, Element, Node};
use once_cell::sync::Lazy;
use regex::Regex;

/// Errors when parsing raw asset content into a fragment
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FragmentError {
    /// No recognizable root element in the content
    #[error("asset content has no root element")]
    RootElementNotFound,

    /// Root element found but the fragment around it is broken
    #[error("malformed fragment: {0}")]
    Malformed(String),
}

/// Parser trait for converting raw asset content into tree fragments
///
/// Implement this to plug a different markup parser into the engine.
pub trait FragmentParser: Send + Sync {
    /// Parse content into a fragment rooted at its first element
    fn parse_fragment(&self, content: &str) -> Result<Element, FragmentError>;
}

static ROOT_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<\s*([A-Za-z][A-Za-z0-9:_-]*)((?:[^>"']|"[^"]*"|'[^']*')*?)(/?)>"#)
        .expect("valid regex")
});
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][A-Za-z0-9_:.-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+)))?"#)
        .expect("valid regex")
});

/// Root-element parser for SVG (and SVG-shaped XML) content
///
/// Extracts the first element's tag and attribute list, keeps everything
/// between the open and close tag as one text child, and skips XML
/// prologs, doctypes and comments that precede the root.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgFragmentParser;

impl FragmentParser for SvgFragmentParser {
    fn parse_fragment(&self, content: &str) -> Result<Element, FragmentError> {
        let stripped = skip_prelude(content);

        let caps = ROOT_OPEN_RE
            .captures(stripped)
            .ok_or(FragmentError::RootElementNotFound)?;
        let open = caps.get(0).ok_or(FragmentError::RootElementNotFound)?;
        let tag = caps[1].to_string();
        let attrs = parse_attrs(caps.get(2).map_or("", |m| m.as_str()));
        let self_closing = !caps[3].is_empty();

        let mut root = Element {
            tag: tag.clone(),
            attrs,
            children: Vec::new(),
        };

        if !self_closing {
            let close = find_closing_tag(stripped, &tag, open.end()).ok_or_else(|| {
                FragmentError::Malformed(format!("missing closing tag for <{tag}>"))
            })?;
            let inner = &stripped[open.end()..close];
            if !inner.trim().is_empty() {
                root.children.push(Node::Text(inner.to_string()));
            }
        }

        Ok(root)
    }
}

/// Skip leading whitespace, comments, XML prologs and doctypes so the
/// root scan cannot match markup inside them; everything after the
/// prelude (including comments inside the root) stays verbatim
fn skip_prelude(content: &str) -> &str {
    let mut rest = content.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("<!--") {
            let Some(end) = after.find("-->") else {
                return "";
            };
            rest = after[end + 3..].trim_start();
        } else if let Some(after) = rest.strip_prefix("<?") {
            let Some(end) = after.find("?>") else {
                return "";
            };
            rest = after[end + 2..].trim_start();
        } else if rest.starts_with("<!") {
            let Some(end) = rest.find('>') else {
                return "";
            };
            rest = rest[end + 1..].trim_start();
        } else {
            return rest;
        }
    }
}

fn parse_attrs(raw: &str) -> AttrMap {
    let mut attrs = AttrMap::new();
    for caps in ATTR_RE.captures_iter(raw) {
        let name = caps[1].to_string();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or(String::new(), |m| m.as_str().to_string());
        attrs.insert(name, value);
    }
    attrs
}

/// Rightmost `</tag>` at or after `from`; the root closes last in a
/// well-formed fragment even when same-named elements nest inside
fn find_closing_tag(haystack: &str, tag: &str, from: usize) -> Option<usize> {
    let needle = format!("</{tag}");
    for (pos, _) in haystack.rmatch_indices(&needle) {
        if pos < from {
            break;
        }
        let rest = haystack[pos + needle.len()..].trim_start();
        if rest.starts_with('>') {
            return Some(pos);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_basic_svg() {
        let parser = SvgFragmentParser;
        let root = parser
            .parse_fragment(r#"<svg viewBox="0 0 10 10"><path d="M0 0"/></svg>"#)
            .unwrap();

        assert_eq!(root.tag, "svg");
        assert_eq!(root.attr("viewBox"), Some("0 0 10 10"));
        assert_eq!(root.children, vec![Node::text(r#"<path d="M0 0"/>"#)]);
    }

    #[test]
    fn parses_single_quoted_and_bare_attrs() {
        let parser = SvgFragmentParser;
        let root = parser
            .parse_fragment("<svg width='10' height=20 hidden></svg>")
            .unwrap();

        assert_eq!(root.attr("width"), Some("10"));
        assert_eq!(root.attr("height"), Some("20"));
        assert_eq!(root.attr("hidden"), Some(""));
        assert!(root.children.is_empty());
    }

    #[test]
    fn parses_self_closing_root() {
        let parser = SvgFragmentParser;
        let root = parser.parse_fragment(r#"<svg viewBox="0 0 1 1"/>"#).unwrap();
        assert_eq!(root.tag, "svg");
        assert!(root.children.is_empty());
    }

    #[test]
    fn skips_prolog_doctype_and_comments() {
        let parser = SvgFragmentParser;
        let content = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"svg11.dtd\">\n",
            "<!-- exported, contains <svg> in a comment -->\n",
            "<svg id=\"real\"><g/></svg>",
        );

        let root = parser.parse_fragment(content).unwrap();
        assert_eq!(root.tag, "svg");
        assert_eq!(root.attr("id"), Some("real"));
    }

    #[test]
    fn nested_same_tag_closes_at_outermost() {
        let parser = SvgFragmentParser;
        let root = parser
            .parse_fragment("<svg><svg class=\"inner\"></svg></svg>")
            .unwrap();
        assert_eq!(
            root.children,
            vec![Node::text("<svg class=\"inner\"></svg>")]
        );
    }

    #[test]
    fn no_root_element_is_an_error() {
        let parser = SvgFragmentParser;
        assert_eq!(
            parser.parse_fragment("just some text"),
            Err(FragmentError::RootElementNotFound)
        );
        assert_eq!(
            parser.parse_fragment("<!-- only a comment -->"),
            Err(FragmentError::RootElementNotFound)
        );
        assert_eq!(
            parser.parse_fragment(""),
            Err(FragmentError::RootElementNotFound)
        );
    }

    #[test]
    fn missing_close_tag_is_malformed() {
        let parser = SvgFragmentParser;
        let err = parser.parse_fragment("<svg><g></g>").unwrap_err();
        assert!(matches!(err, FragmentError::Malformed(_)));
    }

    #[test]
    fn attr_values_may_contain_angle_brackets_when_quoted() {
        let parser = SvgFragmentParser;
        let root = parser
            .parse_fragment(r#"<svg data-label="a > b"></svg>"#)
            .unwrap();
        assert_eq!(root.attr("data-label"), Some("a > b"));
    }
}
