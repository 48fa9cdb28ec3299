//! Ancestor chain threaded through serialization.

use super::node::OutputNode;

/// Cons-list of ancestors, innermost first.
///
/// A path is built on the stack while the serializer descends, so output
/// nodes never hold a back-reference to their parent. The ancestors' own
/// children are being serialized at the time a rule runs and are not visible
/// through the path.
#[derive(Debug, Clone, Copy)]
pub struct NodePath<'a> {
    pub node: &'a OutputNode,
    pub parent: Option<&'a NodePath<'a>>,
}

impl<'a> NodePath<'a> {
    pub fn root(node: &'a OutputNode) -> Self {
        Self { node, parent: None }
    }

    pub fn child(&'a self, node: &'a OutputNode) -> NodePath<'a> {
        NodePath {
            node,
            parent: Some(self),
        }
    }

    /// Ancestors from the innermost outwards.
    pub fn ancestors(&'a self) -> Ancestors<'a> {
        Ancestors { next: Some(self) }
    }

    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Nearest ancestor with the given `data-name`.
    pub fn find_named(&'a self, name: &str) -> Option<&'a OutputNode> {
        self.ancestors().find(|node| node.name() == Some(name))
    }
}

pub struct Ancestors<'a> {
    next: Option<&'a NodePath<'a>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a OutputNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent;
        Some(current.node)
    }
}
