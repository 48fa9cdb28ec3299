//! Reusable rewrite rules and their composition.
//!
//! Page-specific rule sets are ordinary [`RewriteRule`] implementations keyed
//! on `data-name` / `data-type`; the rules here cover the generic cases and
//! can be assembled from configuration with [`from_config`].

use crate::config::RulesConfig;
use crate::serialize::{Continuation, RewriteRule};
use crate::vdom::{Child, NodePath, Tag};

/// Applies rules in order, feeding each the previous rule's result.
#[derive(Default)]
pub struct Chain {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: impl RewriteRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn push(&mut self, rule: impl RewriteRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RewriteRule for Chain {
    fn rewrite(&self, child: Child, path: Option<&NodePath<'_>>, cont: &Continuation<'_>) -> Child {
        self.rules
            .iter()
            .fold(child, |current, rule| rule.rewrite(current, path, cont))
    }
}

/// Elides the wrapper tag of nodes with the given `data-type`. Hidden nodes
/// keep their wrapper so `display: none` still applies to the subtree.
pub struct UnwrapType {
    node_type: String,
}

impl UnwrapType {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
        }
    }
}

impl RewriteRule for UnwrapType {
    fn rewrite(&self, child: Child, _path: Option<&NodePath<'_>>, _cont: &Continuation<'_>) -> Child {
        match child {
            Child::Node(mut node)
                if node.tag == Tag::Div
                    && !node.is_hidden()
                    && node.node_type() == Some(self.node_type.as_str()) =>
            {
                node.tag = Tag::Fragment;
                Child::Node(node)
            }
            other => other,
        }
    }
}

/// Deletes nodes (and their subtrees) whose `data-name` is listed.
pub struct DropNamed {
    names: Vec<String>,
}

impl DropNamed {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl RewriteRule for DropNamed {
    fn rewrite(&self, child: Child, _path: Option<&NodePath<'_>>, _cont: &Continuation<'_>) -> Child {
        match &child {
            Child::Node(node)
                if node
                    .name()
                    .is_some_and(|name| self.names.iter().any(|n| n == name)) =>
            {
                Child::Text(String::new())
            }
            _ => child,
        }
    }
}

/// Deletes nodes hidden with `display: none`.
pub struct DropHidden;

impl RewriteRule for DropHidden {
    fn rewrite(&self, child: Child, _path: Option<&NodePath<'_>>, _cont: &Continuation<'_>) -> Child {
        match &child {
            Child::Node(node) if node.is_hidden() => Child::Text(String::new()),
            _ => child,
        }
    }
}

/// Prepends a prefix (often a template expression) to every image `src`.
pub struct PrefixImageSrc {
    prefix: String,
}

impl PrefixImageSrc {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl RewriteRule for PrefixImageSrc {
    fn rewrite(&self, child: Child, _path: Option<&NodePath<'_>>, _cont: &Continuation<'_>) -> Child {
        match child {
            Child::Node(mut node) if node.tag == Tag::Img => {
                let src = node.attr("src").unwrap_or_default();
                let prefixed = format!("{}{}", self.prefix, src);
                node.set_attr("src", prefixed);
                Child::Node(node)
            }
            other => other,
        }
    }
}

/// Renders a named node once, wrapped in templating loop markers.
///
/// The node is emitted through the continuation, so its descendants are
/// still rewritten by the surrounding rule set.
pub struct WrapLoop {
    name: String,
    open: String,
    close: String,
}

impl WrapLoop {
    pub fn new(name: impl Into<String>, open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: open.into(),
            close: close.into(),
        }
    }
}

impl RewriteRule for WrapLoop {
    fn rewrite(&self, child: Child, path: Option<&NodePath<'_>>, cont: &Continuation<'_>) -> Child {
        match child {
            Child::Node(node) if node.name() == Some(self.name.as_str()) => {
                let body = cont.emit(node, path);
                Child::Text(format!("{}{}{}", self.open, body, self.close))
            }
            other => other,
        }
    }
}

/// Assemble the configured generic rule set.
///
/// Order: hidden and named deletions first, then loops, unwrapping and image
/// prefixes.
pub fn from_config(config: &RulesConfig) -> Chain {
    let mut chain = Chain::new();
    if config.drop_hidden {
        chain.push(DropHidden);
    }
    if !config.drop_names.is_empty() {
        chain.push(DropNamed::new(config.drop_names.iter().cloned()));
    }
    for wrap in &config.loops {
        chain.push(WrapLoop::new(&wrap.name, &wrap.open, &wrap.close));
    }
    for node_type in &config.unwrap_types {
        chain.push(UnwrapType::new(node_type));
    }
    if let Some(prefix) = &config.image_src_prefix {
        chain.push(PrefixImageSrc::new(prefix));
    }
    chain
}
