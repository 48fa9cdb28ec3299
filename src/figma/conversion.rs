//! Figma node tree building and mapping to the output tree.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::vdom::{Child, OutputNode, Tag};

use super::api_types::{ComponentMap, ImageFormat, NodeType, VisualNode};
use super::style::{
    box_shadow, escape_text, rectangle_fill, text_color, text_runs, to_css_color, type_style,
};
use super::transform::{resolve_box, Frame};

/// Resolved image URL per node id (or, for library components, component name).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageUrlMap(HashMap<String, String>);

impl ImageUrlMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, url: impl Into<String>) {
        self.0.insert(key.into(), url.into());
    }

    /// Merge another map in; existing keys are overwritten.
    pub fn merge(&mut self, other: ImageUrlMap) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for ImageUrlMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Ids of nodes flagged for export, bucketed by their first export format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageIds {
    pub jpg: Vec<String>,
    pub png: Vec<String>,
    pub svg: Vec<String>,
}

impl ImageIds {
    pub fn bucket(&self, format: ImageFormat) -> &[String] {
        match format {
            ImageFormat::Jpg => &self.jpg,
            ImageFormat::Png => &self.png,
            ImageFormat::Svg => &self.svg,
        }
    }

    fn push(&mut self, format: ImageFormat, id: String) {
        match format {
            ImageFormat::Jpg => self.jpg.push(id),
            ImageFormat::Png => self.png.push(id),
            ImageFormat::Svg => self.svg.push(id),
        }
    }

    pub fn len(&self) -> usize {
        self.jpg.len() + self.png.len() + self.svg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collect the ids of every icon reachable through container nodes.
pub fn collect_image_ids(root: &VisualNode) -> ImageIds {
    let mut ids = ImageIds::default();
    collect_into(root, &mut ids);
    ids
}

fn collect_into(node: &VisualNode, acc: &mut ImageIds) {
    // Vector shapes never render, so their exports are never fetched.
    if node.node_type.is_vector_shape() {
        return;
    }
    if let Some(children) = node.sub_tree() {
        for child in children {
            collect_into(child, acc);
        }
    } else if let Some(settings) = node.icon() {
        match settings[0].format.image_format() {
            Some(format) => acc.push(format, node.id.clone()),
            None => debug!(
                "skipping export of {} ({}): {:?} is not fetchable",
                node.id, node.name, settings[0].format
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Look up component-name images before the node's own export.
    pub prefer_component_images: bool,
}

/// Build the output tree for a document root.
pub fn build_output_tree(
    root: &VisualNode,
    components: &ComponentMap,
    images: &ImageUrlMap,
    options: &BuildOptions,
) -> Option<OutputNode> {
    TreeBuilder {
        components,
        images,
        options,
    }
    .build(root, &Frame::unbounded())
}

/// Element id derived from a Figma node id (`1:2` becomes `figma-1-2`).
pub fn dom_id(node_id: &str) -> String {
    let sanitized: String = node_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("figma-{sanitized}")
}

struct TreeBuilder<'a> {
    components: &'a ComponentMap,
    images: &'a ImageUrlMap,
    options: &'a BuildOptions,
}

impl<'a> TreeBuilder<'a> {
    fn build(&self, node: &VisualNode, parent: &Frame) -> Option<OutputNode> {
        if node.node_type.is_vector_shape() {
            return None;
        }

        let image_url = self.image_url(node);
        if matches!(node.node_type, NodeType::Vector | NodeType::Slice) && image_url.is_none() {
            return None;
        }

        let mut out = OutputNode::new(Tag::Div);
        out.set_attr("id", dom_id(&node.id));
        out.set_attr("data-name", node.name.as_str());
        out.set_attr("data-type", node.node_type.as_str());

        match node.node_type {
            NodeType::Component => out.set_attr("data-component", node.id.as_str()),
            NodeType::Instance => {
                if let Some(component_id) = node.instance() {
                    out.set_attr("data-component-id", component_id);
                    if let Some(component) = self.components.get(component_id) {
                        out.set_attr("data-component-name", component.name.as_str());
                    }
                }
            }
            _ => {}
        }
        if node.node_type.is_frame_like() && node.preserve_ratio == Some(true) {
            out.add_class("preserveRatio");
        }

        let child_frame = match resolve_box(node, parent) {
            Some(resolved) => {
                out.set_style("position", "absolute");
                for (property, value) in resolved.declarations {
                    out.set_style(property, value);
                }
                out.box_metrics = Some(resolved.metrics);
                resolved.child_frame
            }
            None => {
                out.set_style("position", "relative");
                *parent
            }
        };

        if let Some(color) = node.background_color() {
            out.set_style("background-color", to_css_color(color));
        }
        if let Some(rect) = node.rectangle() {
            let (width, height) = node
                .absolute_bounding_box
                .map(|bb| (bb.width, bb.height))
                .unwrap_or((f64::INFINITY, f64::INFINITY));
            for (property, value) in rectangle_fill(&rect, width, height) {
                out.set_style(property, value);
            }
        }

        if let Some(url) = image_url {
            out.tag = Tag::Img;
            out.set_attr("src", url);
        } else if let Some(text) = node.text() {
            if let Some(base) = text.style {
                for (property, value) in type_style(base) {
                    out.set_style(property, value);
                }
            }
            if let Some(color) = text_color(&text) {
                out.set_style("color", color);
            }
            if text.overrides.is_empty() {
                out.children.push(Child::Text(escape_text(text.characters)));
            } else {
                for run in text_runs(&text) {
                    let mut span = OutputNode::with_text(Tag::Span, escape_text(&run.text));
                    if let Some(style) = run.style {
                        for (property, value) in type_style(style) {
                            span.set_style(property, value);
                        }
                    }
                    out.children.push(Child::Node(span));
                }
            }
        } else {
            if node.icon().is_some() {
                warn!(
                    "no image URL resolved for exported node {} ({}); rendering as container",
                    node.id, node.name
                );
            }
            if let Some(children) = node.children.as_deref() {
                out.children = self
                    .ordered(children)
                    .into_iter()
                    .filter_map(|child| self.build(child, &child_frame))
                    .map(Child::Node)
                    .collect();
            }
        }

        if let Some(shadow) = node.effects().and_then(box_shadow) {
            out.set_style("box-shadow", shadow);
        }
        if node.is_hidden() {
            out.set_style("display", "none");
        }

        Some(out)
    }

    fn image_url(&self, node: &VisualNode) -> Option<&'a str> {
        let own = self.images.get(&node.id);
        let (by_component_id, by_component_name) = match node.instance() {
            Some(component_id) => (
                self.images.get(component_id),
                self.components
                    .get(component_id)
                    .and_then(|component| self.images.get(&component.name)),
            ),
            None => (None, None),
        };

        if self.options.prefer_component_images {
            by_component_name.or(by_component_id).or(own)
        } else {
            own.or(by_component_id).or(by_component_name)
        }
    }

    /// Reverse document order, then stable sort top-to-bottom, left-to-right.
    fn ordered<'n>(&self, children: &'n [VisualNode]) -> Vec<&'n VisualNode> {
        let key = |node: &VisualNode| {
            node.absolute_bounding_box
                .map(|bb| (bb.y, bb.x))
                .unwrap_or((f64::NEG_INFINITY, f64::NEG_INFINITY))
        };
        let mut ordered: Vec<&VisualNode> = children.iter().rev().collect();
        ordered.sort_by(|a, b| {
            let (ay, ax) = key(a);
            let (by, bx) = key(b);
            ay.total_cmp(&by).then(ax.total_cmp(&bx))
        });
        ordered
    }
}
