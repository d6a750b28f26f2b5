//! Inlay document tree model
//!
//! The minimal "node with children" shape the inlining engine operates
//! over, plus the fragment-parser boundary through which raw asset
//! content becomes tree fragments.
//!
//! # Core Types
//!
//! - [`Node`] / [`Element`]: the generic document tree
//! - [`NodePath`]: stable child-index addressing into a tree
//! - [`FragmentParser`]: boundary trait for parsing raw asset content
//! - [`SvgFragmentParser`]: the shipping root-element parser

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod node;
pub mod parser;

pub use node::{AttrMap, Element, Node, NodePath};
pub use parser::{FragmentError, FragmentParser, SvgFragmentParser};
