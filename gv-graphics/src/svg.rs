use egui::{Align, Color32};
use svg::{
    Document, Node,
    node::element::{Circle, Ellipse, Line, Rectangle, Text},
};

use crate::{
    shape::{PEN_WIDTH, Shape, Shapes, TEXT_SIZE},
    surface::Style,
};

fn hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

fn fill(style: Style) -> String {
    style.brush.map_or_else(|| "none".to_owned(), hex)
}

impl Shape {
    pub(crate) fn to_svg(&self) -> Box<dyn Node> {
        match self {
            Self::Ellipse {
                center,
                radius,
                style,
            } => Box::new(
                Ellipse::new()
                    .set("cx", center.x)
                    .set("cy", center.y)
                    .set("rx", radius.x)
                    .set("ry", radius.y)
                    .set("fill", fill(*style))
                    .set("stroke", hex(style.pen))
                    .set("stroke-width", PEN_WIDTH),
            ),
            Self::Line { start, end, pen } => Box::new(
                Line::new()
                    .set("x1", start.x)
                    .set("y1", start.y)
                    .set("x2", end.x)
                    .set("y2", end.y)
                    .set("stroke", hex(*pen))
                    .set("stroke-width", PEN_WIDTH),
            ),
            Self::Rectangle { rect, style } => Box::new(
                Rectangle::new()
                    .set("x", rect.min.x)
                    .set("y", rect.min.y)
                    .set("width", rect.width())
                    .set("height", rect.height())
                    .set("fill", fill(*style))
                    .set("stroke", hex(style.pen))
                    .set("stroke-width", PEN_WIDTH),
            ),
            Self::Text {
                rect,
                align,
                text,
                pen,
            } => {
                let at = align.pos_in_rect(rect);
                let anchor = match align.x() {
                    Align::Min => "start",
                    Align::Center => "middle",
                    Align::Max => "end",
                };
                Box::new(
                    Text::new(text.as_str())
                        .set("x", at.x)
                        .set("y", at.y)
                        .set("font-size", rect.height() * TEXT_SIZE)
                        .set("font-family", "monospace")
                        .set("text-anchor", anchor)
                        .set("dominant-baseline", "middle")
                        .set("fill", hex(*pen)),
                )
            }
            Self::Point { at, pen } => Box::new(
                Circle::new()
                    .set("cx", at.x)
                    .set("cy", at.y)
                    .set("r", PEN_WIDTH)
                    .set("fill", hex(*pen)),
            ),
        }
    }
}

impl Shapes {
    /// Renders the recorded shapes in painting order.
    #[must_use]
    pub fn to_svg(&self) -> Document {
        self.shapes.iter().fold(
            Document::new()
                .set("width", self.size.x)
                .set("height", self.size.y)
                .set("viewBox", (0, 0, self.size.x, self.size.y)),
            |document, shape| document.add(shape.to_svg()),
        )
    }
}
