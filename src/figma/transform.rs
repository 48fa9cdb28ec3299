//! Layout resolution: absolute Figma rectangles to constraint-driven CSS edges.

use super::api_types::{
    HorizontalConstraint, NodeType, Rect, VerticalConstraint, VisualNode,
};
use super::style::{format_number, px, Declarations};
use crate::vdom::BoxMetrics;

/// Absolute rectangle children are positioned against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    /// Zero-origin frame with no extent, used at the document root.
    pub fn unbounded() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: f64::INFINITY,
            height: f64::INFINITY,
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl From<Rect> for Frame {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Outcome of resolving one node against its parent frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBox {
    pub declarations: Declarations,
    pub metrics: BoxMetrics,
    /// Frame for the node's children.
    pub child_frame: Frame,
}

/// Which edges an axis pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisMode {
    Near,
    Far,
    Both,
    Center,
    Scale,
}

impl From<HorizontalConstraint> for AxisMode {
    fn from(constraint: HorizontalConstraint) -> Self {
        match constraint {
            HorizontalConstraint::Left => AxisMode::Near,
            HorizontalConstraint::Right => AxisMode::Far,
            HorizontalConstraint::LeftRight => AxisMode::Both,
            HorizontalConstraint::Center => AxisMode::Center,
            HorizontalConstraint::Scale => AxisMode::Scale,
        }
    }
}

impl From<VerticalConstraint> for AxisMode {
    fn from(constraint: VerticalConstraint) -> Self {
        match constraint {
            VerticalConstraint::Top => AxisMode::Near,
            VerticalConstraint::Bottom => AxisMode::Far,
            VerticalConstraint::TopBottom => AxisMode::Both,
            VerticalConstraint::Center => AxisMode::Center,
            VerticalConstraint::Scale => AxisMode::Scale,
        }
    }
}

struct AxisNames {
    near: &'static str,
    far: &'static str,
    size: &'static str,
}

const HORIZONTAL: AxisNames = AxisNames {
    near: "left",
    far: "right",
    size: "width",
};

const VERTICAL: AxisNames = AxisNames {
    near: "top",
    far: "bottom",
    size: "height",
};

/// Position of a node along one axis, relative to the parent.
struct AxisSpan {
    near: f64,
    far: f64,
    size: f64,
    extent: f64,
}

fn percent(value: f64, extent: f64) -> String {
    format!("{}%", format_number((value * 100.0 / extent).ceil()))
}

fn resolve_axis(mode: AxisMode, span: &AxisSpan, names: &AxisNames, out: &mut Declarations) {
    let bounded = span.far.is_finite();
    match mode {
        AxisMode::Near => {
            out.push((names.near, px(span.near)));
            out.push((names.size, px(span.size)));
        }
        AxisMode::Far if bounded => {
            out.push((names.far, px(span.far)));
            out.push((names.size, px(span.size)));
        }
        AxisMode::Both if bounded => {
            out.push((names.near, px(span.near)));
            out.push((names.far, px(span.far)));
        }
        AxisMode::Center => {
            let offset = format!("calc(50% - {})", px((span.size / 2.0).ceil()));
            out.push((names.near, offset.clone()));
            out.push((names.far, offset));
        }
        AxisMode::Scale if bounded && span.extent > 0.0 => {
            out.push((names.near, percent(span.near, span.extent)));
            out.push((names.far, percent(span.far, span.extent)));
            out.push((names.size, percent(span.size, span.extent)));
        }
        // Far edges against an unbounded parent degrade to near edge + size.
        AxisMode::Far | AxisMode::Both | AxisMode::Scale => {
            out.push((names.near, px(span.near)));
            out.push((names.size, px(span.size)));
        }
    }
}

/// Resolve the CSS box of `node` inside `parent`.
///
/// Returns `None` for nodes without a bounding box; their children keep using
/// the parent frame. GROUP nodes are layout no-ops: they stretch over the
/// parent with zero offsets and hand the parent frame down unchanged.
pub fn resolve_box(node: &VisualNode, parent: &Frame) -> Option<ResolvedBox> {
    let bounded = node.box_bounded()?;

    if node.node_type == NodeType::Group {
        let declarations = vec![
            ("left", px(0.0)),
            ("right", px(0.0)),
            ("top", px(0.0)),
            ("bottom", px(0.0)),
        ];
        return Some(ResolvedBox {
            declarations,
            metrics: BoxMetrics {
                xl: 0.0,
                xr: 0.0,
                yt: 0.0,
                yb: 0.0,
                w: parent.width,
                h: parent.height,
            },
            child_frame: *parent,
        });
    }

    let rect = bounded.rect;
    let xl = rect.x - parent.x;
    let yt = rect.y - parent.y;
    let w = rect.width;
    let h = rect.height;
    let xr = parent.width - (xl + w);
    let yb = parent.height - (yt + h);

    let mut declarations = Declarations::new();
    resolve_axis(
        bounded.constraints.horizontal.into(),
        &AxisSpan {
            near: xl,
            far: xr,
            size: w,
            extent: parent.width,
        },
        &HORIZONTAL,
        &mut declarations,
    );
    resolve_axis(
        bounded.constraints.vertical.into(),
        &AxisSpan {
            near: yt,
            far: yb,
            size: h,
            extent: parent.height,
        },
        &VERTICAL,
        &mut declarations,
    );

    Some(ResolvedBox {
        declarations,
        metrics: BoxMetrics {
            xl,
            xr,
            yt,
            yb,
            w,
            h,
        },
        child_frame: Frame::from(rect),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::api_types::LayoutConstraint;

    fn node(
        node_type: NodeType,
        rect: (f64, f64, f64, f64),
        horizontal: HorizontalConstraint,
        vertical: VerticalConstraint,
    ) -> VisualNode {
        let mut node = VisualNode::new("1:1", "Box", node_type);
        node.absolute_bounding_box = Some(Rect {
            x: rect.0,
            y: rect.1,
            width: rect.2,
            height: rect.3,
        });
        node.constraints = Some(LayoutConstraint {
            horizontal,
            vertical,
        });
        node
    }

    fn parent() -> Frame {
        Frame {
            x: 100.0,
            y: 100.0,
            width: 400.0,
            height: 300.0,
        }
    }

    fn get<'a>(resolved: &'a ResolvedBox, name: &str) -> Option<&'a str> {
        resolved
            .declarations
            .iter()
            .find(|(property, _)| *property == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn left_top_emits_offsets_and_size() {
        let n = node(
            NodeType::Rectangle,
            (120.0, 130.0, 50.0, 40.0),
            HorizontalConstraint::Left,
            VerticalConstraint::Top,
        );
        let resolved = resolve_box(&n, &parent()).expect("resolved");
        assert_eq!(get(&resolved, "left"), Some("20px"));
        assert_eq!(get(&resolved, "width"), Some("50px"));
        assert_eq!(get(&resolved, "top"), Some("30px"));
        assert_eq!(get(&resolved, "height"), Some("40px"));
        assert!(get(&resolved, "right").is_none());
        assert!(get(&resolved, "bottom").is_none());
    }

    #[test]
    fn fractional_offsets_are_emitted_exactly() {
        let n = node(
            NodeType::Rectangle,
            (110.125, 130.5, 50.005, 40.0),
            HorizontalConstraint::Left,
            VerticalConstraint::Top,
        );
        let resolved = resolve_box(&n, &parent()).expect("resolved");
        assert_eq!(get(&resolved, "left"), Some("10.125px"));
        assert_eq!(get(&resolved, "width"), Some("50.005px"));
        assert_eq!(get(&resolved, "top"), Some("30.5px"));
    }

    #[test]
    fn right_bottom_measures_from_far_edges() {
        let n = node(
            NodeType::Rectangle,
            (120.0, 130.0, 50.0, 40.0),
            HorizontalConstraint::Right,
            VerticalConstraint::Bottom,
        );
        let resolved = resolve_box(&n, &parent()).expect("resolved");
        assert_eq!(get(&resolved, "right"), Some("330px"));
        assert_eq!(get(&resolved, "width"), Some("50px"));
        assert_eq!(get(&resolved, "bottom"), Some("230px"));
        assert_eq!(get(&resolved, "height"), Some("40px"));
        assert!(get(&resolved, "left").is_none());
    }

    #[test]
    fn left_right_stretch_sums_to_parent_width() {
        let n = node(
            NodeType::Frame,
            (120.0, 120.0, 360.0, 260.0),
            HorizontalConstraint::LeftRight,
            VerticalConstraint::TopBottom,
        );
        let resolved = resolve_box(&n, &parent()).expect("resolved");
        assert_eq!(get(&resolved, "left"), Some("20px"));
        assert_eq!(get(&resolved, "right"), Some("20px"));
        assert_eq!(get(&resolved, "top"), Some("20px"));
        assert_eq!(get(&resolved, "bottom"), Some("20px"));
        assert!(get(&resolved, "width").is_none());
        assert!(get(&resolved, "height").is_none());

        let m = resolved.metrics;
        assert!((m.xl + m.w + m.xr - 400.0).abs() < 1e-9);
        assert!((m.yt + m.h + m.yb - 300.0).abs() < 1e-9);
    }

    #[test]
    fn center_uses_equal_calc_edges() {
        let n = node(
            NodeType::Rectangle,
            (200.0, 150.0, 101.0, 40.0),
            HorizontalConstraint::Center,
            VerticalConstraint::Center,
        );
        let resolved = resolve_box(&n, &parent()).expect("resolved");
        assert_eq!(get(&resolved, "left"), Some("calc(50% - 51px)"));
        assert_eq!(get(&resolved, "left"), get(&resolved, "right"));
        assert_eq!(get(&resolved, "top"), Some("calc(50% - 20px)"));
        assert_eq!(get(&resolved, "top"), get(&resolved, "bottom"));
        assert!(get(&resolved, "width").is_none());
    }

    #[test]
    fn scale_emits_percentages_with_size() {
        let n = node(
            NodeType::Rectangle,
            (200.0, 160.0, 200.0, 150.0),
            HorizontalConstraint::Scale,
            VerticalConstraint::Scale,
        );
        let resolved = resolve_box(&n, &parent()).expect("resolved");
        assert_eq!(get(&resolved, "left"), Some("25%"));
        assert_eq!(get(&resolved, "right"), Some("25%"));
        assert_eq!(get(&resolved, "width"), Some("50%"));
        assert_eq!(get(&resolved, "top"), Some("20%"));
        assert_eq!(get(&resolved, "bottom"), Some("30%"));
        assert_eq!(get(&resolved, "height"), Some("50%"));
    }

    #[test]
    fn group_inherits_parent_frame() {
        let n = node(
            NodeType::Group,
            (150.0, 150.0, 10.0, 10.0),
            HorizontalConstraint::Left,
            VerticalConstraint::Top,
        );
        let resolved = resolve_box(&n, &parent()).expect("resolved");
        assert_eq!(resolved.child_frame, parent());
        assert_eq!(get(&resolved, "left"), Some("0px"));
        assert_eq!(get(&resolved, "bottom"), Some("0px"));
        assert_eq!(resolved.metrics.w, 400.0);
    }

    #[test]
    fn unbounded_parent_never_emits_infinite_edges() {
        let n = node(
            NodeType::Frame,
            (10.0, 20.0, 300.0, 200.0),
            HorizontalConstraint::LeftRight,
            VerticalConstraint::Scale,
        );
        let resolved = resolve_box(&n, &Frame::unbounded()).expect("resolved");
        assert_eq!(get(&resolved, "left"), Some("10px"));
        assert_eq!(get(&resolved, "width"), Some("300px"));
        assert_eq!(get(&resolved, "top"), Some("20px"));
        assert_eq!(get(&resolved, "height"), Some("200px"));
        assert!(resolved
            .declarations
            .iter()
            .all(|(_, value)| !value.contains("inf")));
    }

    #[test]
    fn missing_bounding_box_resolves_to_none() {
        let n = VisualNode::new("0:1", "Page", NodeType::Canvas);
        assert!(resolve_box(&n, &parent()).is_none());
    }

    #[test]
    fn missing_constraints_default_to_left_top() {
        let mut n = VisualNode::new("2:2", "Loose", NodeType::Rectangle);
        n.absolute_bounding_box = Some(Rect {
            x: 110.0,
            y: 110.0,
            width: 5.0,
            height: 5.0,
        });
        let resolved = resolve_box(&n, &parent()).expect("resolved");
        assert_eq!(get(&resolved, "left"), Some("10px"));
        assert_eq!(get(&resolved, "top"), Some("10px"));
    }
}
