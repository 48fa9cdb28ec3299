//! Figma API response types for parsing JSON from the Figma REST API.
//!
//! A [`VisualNode`] is one flat record tagged by [`NodeType`]. The API attaches
//! fields by capability rather than by type (a FRAME has children, a bounding
//! box, a background color and effects at the same time), so every capability
//! is an `Option` and is reached through an accessor that returns `None` when
//! the node does not carry it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supported image export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormat {
    Jpg,
    Png,
    Svg,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Jpg, ImageFormat::Png, ImageFormat::Svg];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// A Figma file response from the files endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_modified: Option<String>,
    pub document: VisualNode,
    #[serde(default)]
    pub components: ComponentMap,
}

/// Library component metadata referenced by INSTANCE nodes.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ComponentRef {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

pub type ComponentMap = HashMap<String, ComponentRef>;

/// Format named by an export setting. Only jpg/png/svg can be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFormat {
    Jpg,
    Png,
    Svg,
    Pdf,
    #[serde(other)]
    Unsupported,
}

impl ExportFormat {
    pub fn image_format(&self) -> Option<ImageFormat> {
        match self {
            ExportFormat::Jpg => Some(ImageFormat::Jpg),
            ExportFormat::Png => Some(ImageFormat::Png),
            ExportFormat::Svg => Some(ImageFormat::Svg),
            ExportFormat::Pdf | ExportFormat::Unsupported => None,
        }
    }
}

/// Node `type` as sent by the API. Types this crate has no special handling
/// for keep their raw name in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Vector,
    BooleanOperation,
    Star,
    Line,
    Ellipse,
    RegularPolygon,
    Rectangle,
    Text,
    Slice,
    Component,
    Instance,
    Other(String),
}

impl From<String> for NodeType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "DOCUMENT" => NodeType::Document,
            "CANVAS" => NodeType::Canvas,
            "FRAME" => NodeType::Frame,
            "GROUP" => NodeType::Group,
            "VECTOR" => NodeType::Vector,
            "BOOLEAN_OPERATION" => NodeType::BooleanOperation,
            "STAR" => NodeType::Star,
            "LINE" => NodeType::Line,
            "ELLIPSE" => NodeType::Ellipse,
            "REGULAR_POLYGON" => NodeType::RegularPolygon,
            "RECTANGLE" => NodeType::Rectangle,
            "TEXT" => NodeType::Text,
            "SLICE" => NodeType::Slice,
            "COMPONENT" => NodeType::Component,
            "INSTANCE" => NodeType::Instance,
            _ => NodeType::Other(raw),
        }
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl NodeType {
    /// Name as it appears in the `type` field of the API payload.
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Document => "DOCUMENT",
            NodeType::Canvas => "CANVAS",
            NodeType::Frame => "FRAME",
            NodeType::Group => "GROUP",
            NodeType::Vector => "VECTOR",
            NodeType::BooleanOperation => "BOOLEAN_OPERATION",
            NodeType::Star => "STAR",
            NodeType::Line => "LINE",
            NodeType::Ellipse => "ELLIPSE",
            NodeType::RegularPolygon => "REGULAR_POLYGON",
            NodeType::Rectangle => "RECTANGLE",
            NodeType::Text => "TEXT",
            NodeType::Slice => "SLICE",
            NodeType::Component => "COMPONENT",
            NodeType::Instance => "INSTANCE",
            NodeType::Other(raw) => raw.as_str(),
        }
    }

    /// Shapes that only make sense as rendered vector paths.
    pub fn is_vector_shape(&self) -> bool {
        matches!(
            self,
            NodeType::BooleanOperation
                | NodeType::Star
                | NodeType::Line
                | NodeType::Ellipse
                | NodeType::RegularPolygon
        )
    }

    pub fn is_frame_like(&self) -> bool {
        matches!(
            self,
            NodeType::Frame | NodeType::Group | NodeType::Component | NodeType::Instance
        )
    }
}

/// Raw Figma node data from the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<VisualNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_bounding_box: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<LayoutConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<Effect>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_settings: Option<Vec<ExportSetting>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_ratio: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<Vec<Paint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TypeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_style_overrides: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_override_table: Option<HashMap<u32, TypeStyle>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
}

/// Bounding box coordinates from Figma.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalConstraint {
    #[default]
    Left,
    Right,
    Center,
    LeftRight,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerticalConstraint {
    #[default]
    Top,
    Bottom,
    Center,
    TopBottom,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct LayoutConstraint {
    #[serde(default)]
    pub horizontal: HorizontalConstraint,
    #[serde(default)]
    pub vertical: VerticalConstraint,
}

/// RGBA color from Figma (0.0-1.0 range).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    InnerShadow,
    DropShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub offset: Vector2,
    #[serde(default)]
    pub blend_mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSetting {
    #[serde(default)]
    pub suffix: String,
    pub format: ExportFormat,
}

/// Paint/fill data from Figma.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: String,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignHorizontal {
    Left,
    Right,
    Center,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignVertical {
    Top,
    Center,
    Bottom,
}

/// Typography style from Figma.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub font_weight: Option<f64>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub text_align_horizontal: Option<TextAlignHorizontal>,
    #[serde(default)]
    pub text_align_vertical: Option<TextAlignVertical>,
    #[serde(default)]
    pub letter_spacing: Option<f64>,
    #[serde(default)]
    pub line_height_px: Option<f64>,
}

/// Geometry of a node that carries both a bounding box and constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxBounded {
    pub rect: Rect,
    pub constraints: LayoutConstraint,
}

/// Rectangle-specific paint attributes.
#[derive(Debug, Clone, Copy)]
pub struct RectangleProps<'a> {
    pub fills: &'a [Paint],
    pub corner_radius: Option<f64>,
    pub stroke_weight: Option<f64>,
}

/// Text-specific attributes.
#[derive(Debug, Clone, Copy)]
pub struct TextProps<'a> {
    pub characters: &'a str,
    pub style: Option<&'a TypeStyle>,
    pub overrides: &'a [u32],
    pub override_table: Option<&'a HashMap<u32, TypeStyle>>,
    pub fills: &'a [Paint],
}

impl VisualNode {
    /// Container nodes. Icons are rendered as images, never recursed into.
    pub fn sub_tree(&self) -> Option<&[VisualNode]> {
        if self.icon().is_some() {
            return None;
        }
        self.children.as_deref()
    }

    pub fn box_bounded(&self) -> Option<BoxBounded> {
        self.absolute_bounding_box.map(|rect| BoxBounded {
            rect,
            constraints: self.constraints.unwrap_or_default(),
        })
    }

    pub fn background_color(&self) -> Option<&Color> {
        self.background_color.as_ref()
    }

    pub fn effects(&self) -> Option<&[Effect]> {
        self.effects.as_deref()
    }

    /// Export settings of a node flagged for image export (non-empty only).
    pub fn icon(&self) -> Option<&[ExportSetting]> {
        self.export_settings
            .as_deref()
            .filter(|settings| !settings.is_empty())
    }

    pub fn rectangle(&self) -> Option<RectangleProps<'_>> {
        if self.node_type != NodeType::Rectangle {
            return None;
        }
        Some(RectangleProps {
            fills: self.fills.as_deref().unwrap_or_default(),
            corner_radius: self.corner_radius,
            stroke_weight: self.stroke_weight,
        })
    }

    pub fn text(&self) -> Option<TextProps<'_>> {
        let characters = self.characters.as_deref()?;
        Some(TextProps {
            characters,
            style: self.style.as_ref(),
            overrides: self
                .character_style_overrides
                .as_deref()
                .unwrap_or_default(),
            override_table: self.style_override_table.as_ref(),
            fills: self.fills.as_deref().unwrap_or_default(),
        })
    }

    /// Referenced component id of an INSTANCE node.
    pub fn instance(&self) -> Option<&str> {
        if self.node_type != NodeType::Instance {
            return None;
        }
        self.component_id.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.visible == Some(false)
    }

    /// Node with only the common fields set; used as a starting point for
    /// programmatic construction.
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: None,
            node_type,
            children: None,
            absolute_bounding_box: None,
            constraints: None,
            background_color: None,
            effects: None,
            export_settings: None,
            preserve_ratio: None,
            fills: None,
            corner_radius: None,
            stroke_weight: None,
            characters: None,
            style: None,
            character_style_overrides: None,
            style_override_table: None,
            component_id: None,
        }
    }
}

/// Response from the images export endpoint.
///
/// Entries are `null` when Figma could not render the node.
#[derive(Debug, Deserialize)]
pub struct FigmaImageExport {
    #[serde(default)]
    pub err: Option<String>,
    #[serde(default)]
    pub images: HashMap<String, Option<String>>,
}
