//! Visual styling derived from node attributes: colors, fills, typography,
//! rich-text runs and drop shadows.

use super::api_types::{
    Color, Effect, EffectType, Paint, RectangleProps, TextAlignHorizontal, TextAlignVertical,
    TextProps, TypeStyle,
};

/// CSS declarations in emission order.
pub type Declarations = Vec<(&'static str, String)>;

/// Format a CSS number exactly, without a trailing `.0` or a `-0`.
pub fn format_number(value: f64) -> String {
    // -0.0 + 0.0 == +0.0
    format!("{}", value + 0.0)
}

pub fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}

/// Convert a 0-1 channel color to `rgba()`.
///
/// Channels are scaled by 256, not 255, and rounded up.
pub fn to_css_color(color: &Color) -> String {
    let r = (color.r * 256.0).ceil();
    let g = (color.g * 256.0).ceil();
    let b = (color.b * 256.0).ceil();
    format!(
        "rgba({},{},{},{})",
        format_number(r),
        format_number(g),
        format_number(b),
        format_number(color.a)
    )
}

pub fn text_align(align: TextAlignHorizontal) -> &'static str {
    match align {
        TextAlignHorizontal::Left => "left",
        TextAlignHorizontal::Right => "right",
        TextAlignHorizontal::Center => "center",
        TextAlignHorizontal::Justified => "justify",
    }
}

pub fn vertical_align(align: TextAlignVertical) -> &'static str {
    match align {
        TextAlignVertical::Top => "top",
        TextAlignVertical::Center => "middle",
        TextAlignVertical::Bottom => "bottom",
    }
}

/// Font declarations for one type style. Missing fields are skipped.
pub fn type_style(style: &TypeStyle) -> Declarations {
    let mut out = Declarations::new();
    if let Some(family) = &style.font_family {
        out.push(("font-family", family.clone()));
    }
    if style.italic {
        out.push(("font-style", "italic".to_string()));
    }
    if let Some(weight) = style.font_weight {
        out.push(("font-weight", format_number(weight)));
    }
    if let Some(size) = style.font_size {
        out.push(("font-size", px(size)));
    }
    if let Some(align) = style.text_align_horizontal {
        out.push(("text-align", text_align(align).to_string()));
    }
    if let Some(align) = style.text_align_vertical {
        out.push(("vertical-align", vertical_align(align).to_string()));
    }
    if let Some(spacing) = style.letter_spacing {
        out.push(("letter-spacing", px(spacing)));
    }
    if let Some(line_height) = style.line_height_px {
        out.push(("line-height", px(line_height)));
    }
    out
}

fn first_fill_color(fills: &[Paint]) -> Option<&Color> {
    fills.first().and_then(|paint| paint.color.as_ref())
}

/// Boxes at or below this extent are drawn as a 1px line.
const LINE_THRESHOLD: f64 = 1.0;

/// Fill and corner radius of a RECTANGLE with the given size.
pub fn rectangle_fill(rect: &RectangleProps<'_>, width: f64, height: f64) -> Declarations {
    let mut out = Declarations::new();
    if let Some(color) = first_fill_color(rect.fills) {
        let color = to_css_color(color);
        if height <= LINE_THRESHOLD && width > LINE_THRESHOLD {
            out.push(("border-top", format!("1px solid {color}")));
        } else if width <= LINE_THRESHOLD {
            out.push(("border-left", format!("1px solid {color}")));
        } else {
            out.push(("background-color", color));
        }
    }
    if let Some(radius) = rect.corner_radius.filter(|radius| *radius > 0.0) {
        out.push(("border-radius", px(radius)));
    }
    out
}

/// Text `color` from the first fill.
pub fn text_color(text: &TextProps<'_>) -> Option<String> {
    first_fill_color(text.fills).map(to_css_color)
}

/// A maximal run of characters sharing one style index.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun<'a> {
    pub text: String,
    pub style_index: u32,
    pub style: Option<&'a TypeStyle>,
}

/// Split text into runs of identical style index.
///
/// Index 0 and indices missing from the override table resolve to the base
/// style. Characters past the end of the override array form an implicit
/// trailing run in the base style.
pub fn text_runs<'a>(text: &TextProps<'a>) -> Vec<TextRun<'a>> {
    let resolve = |index: u32| -> Option<&'a TypeStyle> {
        if index == 0 {
            return text.style;
        }
        text.override_table
            .and_then(|table| table.get(&index))
            .or(text.style)
    };

    if text.overrides.is_empty() {
        return vec![TextRun {
            text: text.characters.to_string(),
            style_index: 0,
            style: text.style,
        }];
    }

    let mut runs: Vec<TextRun<'a>> = Vec::new();
    for (position, ch) in text.characters.chars().enumerate() {
        let index = text.overrides.get(position).copied().unwrap_or(0);
        match runs.last_mut() {
            Some(run) if run.style_index == index => run.text.push(ch),
            _ => runs.push(TextRun {
                text: ch.to_string(),
                style_index: index,
                style: resolve(index),
            }),
        }
    }
    runs
}

/// `box-shadow` value for the visible drop shadows, if any.
pub fn box_shadow(effects: &[Effect]) -> Option<String> {
    let shadows: Vec<String> = effects
        .iter()
        .filter(|effect| effect.visible && effect.effect_type == EffectType::DropShadow)
        .map(|effect| {
            let color = effect
                .color
                .as_ref()
                .map(to_css_color)
                .unwrap_or_else(|| "rgba(0,0,0,1)".to_string());
            format!(
                "{} {} {} {}",
                px(effect.offset.x),
                px(effect.offset.y),
                px(effect.radius),
                color
            )
        })
        .collect();

    if shadows.is_empty() {
        None
    } else {
        Some(shadows.join(", "))
    }
}

/// Escape design text for use as element content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
