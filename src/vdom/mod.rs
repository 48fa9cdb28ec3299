//! Styled markup tree ("virtual DOM").
//!
//! - [`OutputNode`] - element with ordered style/attribute bags and cached geometry
//! - [`Child`] - nested element or literal markup
//! - [`NodePath`] - read-only ancestor chain handed to rewrite rules

pub mod node;
pub mod path;

pub use node::{Attributes, BoxMetrics, Child, OutputNode, Style, Tag};
pub use path::NodePath;
