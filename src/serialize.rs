//! Markup serialization with pluggable, path-aware rewrite rules.
//!
//! Traversal is pre-order. Before a child is emitted the rule (if any) is
//! called with the child, the ancestor path and the traversal continuation.
//! The rule may hand back:
//!
//! - a node (the same one, mutated, or a replacement), which is emitted and
//!   whose children are rewritten in turn;
//! - a string, which is emitted verbatim and ends descent. An empty string
//!   deletes the subtree.
//!
//! Rules never see a node twice in one pass: a node returned by the rule is
//! emitted without calling the rule on it again.

use crate::vdom::{Child, NodePath, OutputNode, Tag};

pub trait RewriteRule {
    fn rewrite(&self, child: Child, path: Option<&NodePath<'_>>, cont: &Continuation<'_>) -> Child;
}

impl<F> RewriteRule for F
where
    F: Fn(Child, Option<&NodePath<'_>>, &Continuation<'_>) -> Child,
{
    fn rewrite(&self, child: Child, path: Option<&NodePath<'_>>, cont: &Continuation<'_>) -> Child {
        self(child, path, cont)
    }
}

/// Pins a closure to the rule signature so its argument types are inferred.
pub fn rule_fn<F>(f: F) -> F
where
    F: Fn(Child, Option<&NodePath<'_>>, &Continuation<'_>) -> Child,
{
    f
}

/// The traversal itself, handed to rules so they can serialize arbitrary
/// subtrees (for example a template node once inside a loop construct).
#[derive(Clone, Copy)]
pub struct Continuation<'r> {
    rule: Option<&'r dyn RewriteRule>,
}

impl<'r> Continuation<'r> {
    pub fn new(rule: Option<&'r dyn RewriteRule>) -> Self {
        Self { rule }
    }

    /// Same traversal driven by a different rule.
    pub fn with_rule<'s>(&self, rule: &'s dyn RewriteRule) -> Continuation<'s> {
        Continuation { rule: Some(rule) }
    }

    /// Serialize `child` as if it sat below `path`; the rule runs on it first.
    pub fn serialize(&self, child: Child, path: Option<&NodePath<'_>>) -> String {
        let mut out = String::new();
        self.serialize_into(child, path, &mut out);
        out
    }

    /// Emit `node` itself without consulting the rule; its descendants are
    /// still rewritten.
    pub fn emit(&self, node: OutputNode, path: Option<&NodePath<'_>>) -> String {
        let mut out = String::new();
        self.emit_into(node, path, &mut out);
        out
    }

    fn serialize_into(&self, child: Child, path: Option<&NodePath<'_>>, out: &mut String) {
        let child = match self.rule {
            Some(rule) => rule.rewrite(child, path, self),
            None => child,
        };
        match child {
            Child::Text(text) => out.push_str(&text),
            Child::Node(node) => self.emit_into(node, path, out),
        }
    }

    fn emit_into(&self, mut node: OutputNode, path: Option<&NodePath<'_>>, out: &mut String) {
        let children = std::mem::take(&mut node.children);

        if node.tag != Tag::Fragment {
            open_tag(&node, out);
            if node.tag.is_void() {
                return;
            }
        }

        let here = NodePath {
            node: &node,
            parent: path,
        };
        for child in children {
            self.serialize_into(child, Some(&here), out);
        }

        if node.tag != Tag::Fragment {
            out.push_str("</");
            out.push_str(node.tag.as_str());
            out.push('>');
        }
    }
}

/// Serialize a whole tree. The rule is applied to the root as well.
pub fn serialize(node: &OutputNode, rule: Option<&dyn RewriteRule>) -> String {
    serialize_node(Child::Node(node.clone()), None, rule)
}

/// Serialize one child below an explicit ancestor path.
pub fn serialize_node(
    child: Child,
    path: Option<&NodePath<'_>>,
    rule: Option<&dyn RewriteRule>,
) -> String {
    Continuation::new(rule).serialize(child, path)
}

fn open_tag(node: &OutputNode, out: &mut String) {
    out.push('<');
    out.push_str(node.tag.as_str());
    for (name, value) in &node.attributes {
        push_attribute(out, name, value);
    }
    if !node.classes.is_empty() {
        let classes: Vec<&str> = node.classes.iter().map(String::as_str).collect();
        push_attribute(out, "class", &classes.join(" "));
    }
    if !node.style.is_empty() {
        let declarations: Vec<String> = node
            .style
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect();
        push_attribute(out, "style", &declarations.join(";"));
    }
    out.push('>');
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}
