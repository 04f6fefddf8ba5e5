use egui::{Align2, Color32, Rect, Vec2};
use gv_core::geometry::Pixel;
use thiserror::Error;

pub const BACKGROUND: Color32 = Color32::BLACK;
pub const FOREGROUND: Color32 = Color32::WHITE;
pub const ACCENT: Color32 = Color32::from_rgb(0x38, 0x95, 0xd3);
pub const GHOST: Color32 = Color32::GRAY;
pub const ALERT: Color32 = Color32::RED;

/// Outline colour and optional fill for the next primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Style {
    pub pen: Color32,
    pub brush: Option<Color32>,
}

impl Style {
    #[must_use]
    pub const fn outline(pen: Color32) -> Self {
        Self { pen, brush: None }
    }

    #[must_use]
    pub const fn filled(color: Color32) -> Self {
        Self {
            pen: color,
            brush: Some(color),
        }
    }

    /// Painting in this style removes what was drawn before.
    pub const ERASER: Self = Self::filled(BACKGROUND);
}

impl Default for Style {
    fn default() -> Self {
        Self::filled(FOREGROUND)
    }
}

/// Raster drawing target of a canvas.
///
/// Drawing is incremental: every call paints over what is already there, and erasing is painting
/// in the background colour.
pub trait Surface {
    fn style(&self) -> Style;
    fn set_pen(&mut self, pen: Color32);
    fn set_brush(&mut self, brush: Option<Color32>);

    fn set_style(&mut self, style: Style) {
        self.set_pen(style.pen);
        self.set_brush(style.brush);
    }

    fn draw_ellipse(&mut self, center: Pixel, rx: i32, ry: i32);
    fn draw_line(&mut self, start: Pixel, end: Pixel);
    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn draw_text(&mut self, rect: Rect, align: Align2, text: &str);
    fn draw_point(&mut self, at: Pixel);

    fn size(&self) -> Vec2;
    fn resize(&mut self, size: Vec2);

    /// Number of primitives kept since the surface was last cleared.
    fn backlog(&self) -> usize {
        0
    }

    #[allow(clippy::cast_possible_truncation)]
    fn clear(&mut self) {
        let size = self.size();
        self.set_style(Style::ERASER);
        self.draw_rect(0, 0, size.x.ceil() as i32, size.y.ceil() as i32);
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown colour {0:?}")]
pub struct UnknownColor(pub String);

/// Parses a colour name or a `#rgb`, `#rrggbb` or `#rrggbbaa` hex string.
pub fn parse_color(name: &str) -> Result<Color32, UnknownColor> {
    let color = match name.to_ascii_lowercase().as_str() {
        "white" => Color32::WHITE,
        "black" => Color32::BLACK,
        "red" => Color32::RED,
        "green" => Color32::GREEN,
        "blue" => ACCENT,
        "yellow" => Color32::YELLOW,
        "orange" => Color32::ORANGE,
        "brown" => Color32::BROWN,
        "gray" | "grey" => Color32::GRAY,
        "gold" => Color32::GOLD,
        "khaki" => Color32::KHAKI,
        "magenta" => Color32::from_rgb(0xff, 0x00, 0xff),
        "purple" => Color32::from_rgb(0x80, 0x00, 0x80),
        hex => Color32::from_hex(hex).map_err(|_| UnknownColor(name.to_owned()))?,
    };
    Ok(color)
}
