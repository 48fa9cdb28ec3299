//! Output tree element produced by the builder and consumed by the serializer.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Ordered `property -> value` style declarations.
pub type Style = IndexMap<String, String>;
/// Ordered `name -> value` attributes.
pub type Attributes = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Div,
    Span,
    Img,
    /// Emits only its children; the wrapper tag is elided.
    Fragment,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::Span => "span",
            Tag::Img => "img",
            Tag::Fragment => "",
        }
    }

    /// Void elements have no closing tag and no content.
    pub fn is_void(&self) -> bool {
        matches!(self, Tag::Img)
    }
}

/// Resolved layout rectangle relative to the effective parent.
///
/// `xr`/`yb` are infinite when the parent extent is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxMetrics {
    pub xl: f64,
    pub xr: f64,
    pub yt: f64,
    pub yb: f64,
    pub w: f64,
    pub h: f64,
}

/// A child of an output node: either a nested element or literal markup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Child {
    Node(OutputNode),
    Text(String),
}

impl Child {
    pub fn as_node(&self) -> Option<&OutputNode> {
        match self {
            Child::Node(node) => Some(node),
            Child::Text(_) => None,
        }
    }
}

impl From<OutputNode> for Child {
    fn from(node: OutputNode) -> Self {
        Child::Node(node)
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputNode {
    pub tag: Tag,
    pub classes: IndexSet<String>,
    pub style: Style,
    pub attributes: Attributes,
    pub children: Vec<Child>,
    #[serde(rename = "box", skip_serializing_if = "Option::is_none")]
    pub box_metrics: Option<BoxMetrics>,
}

impl Default for OutputNode {
    fn default() -> Self {
        Self::new(Tag::Div)
    }
}

impl OutputNode {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            classes: IndexSet::new(),
            style: Style::new(),
            attributes: Attributes::new(),
            children: Vec::new(),
            box_metrics: None,
        }
    }

    pub fn with_text(tag: Tag, text: impl Into<String>) -> Self {
        let mut node = Self::new(tag);
        node.children.push(Child::Text(text.into()));
        node
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// `data-name` mirrored from the source node.
    pub fn name(&self) -> Option<&str> {
        self.attr("data-name")
    }

    /// `data-type` mirrored from the source node.
    pub fn node_type(&self) -> Option<&str> {
        self.attr("data-type")
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn set_style(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.style.insert(property.into(), value.into());
    }

    /// Removes a declaration while keeping the order of the remaining ones.
    pub fn remove_style(&mut self, property: &str) -> Option<String> {
        self.style.shift_remove(property)
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        self.classes.insert(class.into());
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = &OutputNode> {
        self.children.iter().filter_map(Child::as_node)
    }

    pub fn find_child_by_name(&self, name: &str) -> Option<&OutputNode> {
        self.child_nodes().find(|child| child.name() == Some(name))
    }

    /// Drops all positioning declarations.
    pub fn reset_position(&mut self) {
        for property in ["position", "left", "right", "top", "bottom"] {
            self.remove_style(property);
        }
    }

    /// Makes the node flow inside its parent instead of being pinned.
    pub fn fill_parent(&mut self) {
        self.reset_position();
        self.remove_style("width");
        self.remove_style("height");
        self.set_style("position", "relative");
    }

    pub fn is_hidden(&self) -> bool {
        self.style.get("display").map(String::as_str) == Some("none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positioned() -> OutputNode {
        let mut node = OutputNode::new(Tag::Div);
        node.set_style("position", "absolute");
        node.set_style("left", "10px");
        node.set_style("width", "50px");
        node.set_style("top", "5px");
        node.set_style("background-color", "rgba(0,0,0,1)");
        node
    }

    #[test]
    fn reset_position_keeps_sizes_and_order() {
        let mut node = positioned();
        node.reset_position();

        let keys: Vec<&str> = node.style.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["width", "background-color"]);
    }

    #[test]
    fn fill_parent_switches_to_relative() {
        let mut node = positioned();
        node.fill_parent();

        assert_eq!(node.style.get("position").map(String::as_str), Some("relative"));
        assert!(node.style.get("width").is_none());
        assert!(node.style.get("left").is_none());
    }

    #[test]
    fn find_child_by_name_skips_text_children() {
        let mut parent = OutputNode::new(Tag::Div);
        parent.children.push(Child::from("Content"));
        let mut content = OutputNode::new(Tag::Div);
        content.set_attr("data-name", "Content");
        parent.children.push(Child::from(content));

        let found = parent.find_child_by_name("Content").expect("content child");
        assert_eq!(found.name(), Some("Content"));
        assert!(parent.find_child_by_name("Missing").is_none());
    }

    #[test]
    fn img_is_void_and_fragment_has_no_name() {
        assert!(Tag::Img.is_void());
        assert!(!Tag::Div.is_void());
        assert_eq!(Tag::Fragment.as_str(), "");
    }
}
