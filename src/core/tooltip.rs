use serde::Serialize;

/// Offset of the tooltip from the pointer, matching the page's CSS
pub const TOOLTIP_OFFSET: (f64, f64) = (10.0, -10.0);

/// One line of tooltip text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipLine {
    pub label: String,
    pub value: String,
    /// Swatch colour as `#rrggbb`
    pub color: Option<String>,
}

/// Text shown while hovering a mark
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub heading: String,
    pub lines: Vec<TooltipLine>,
}

/// Pixel region of a rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum MarkShape {
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
}

impl MarkShape {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        match *self {
            MarkShape::Rect { x, y, width, height } => {
                px >= x && px <= x + width && py >= y && py <= y + height
            }
            MarkShape::Circle { cx, cy, r } => {
                let (dx, dy) = (px - cx, py - cy);
                dx * dx + dy * dy <= r * r
            }
        }
    }
}

/// A hoverable part of a chart and what it reveals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    pub shape: MarkShape,
    pub content: TooltipContent,
    /// x of the vertical guide line shown while hovering
    pub guide_x: Option<f64>,
}

/// What the tooltip element should display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipState {
    pub visible: bool,
    pub content: Option<TooltipContent>,
    pub left: f64,
    pub top: f64,
    pub guide_x: Option<f64>,
}

impl TooltipState {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            content: None,
            left: 0.0,
            top: 0.0,
            guide_x: None,
        }
    }

    /// Tooltip for a pointer at (`x`, `y`); the first mark under the pointer wins
    pub fn hover(marks: &[Mark], x: f64, y: f64) -> Self {
        match marks.iter().find(|mark| mark.shape.contains(x, y)) {
            Some(mark) => Self {
                visible: true,
                content: Some(mark.content.clone()),
                left: x + TOOLTIP_OFFSET.0,
                top: y + TOOLTIP_OFFSET.1,
                guide_x: mark.guide_x,
            },
            None => Self::hidden(),
        }
    }
}

impl Default for TooltipState {
    fn default() -> Self {
        Self::hidden()
    }
}

/// Format a number with thousands separators and at most three fraction digits
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let text = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if negative { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}
