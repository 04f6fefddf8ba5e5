use egui::{
    Align2, Color32, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind, Vec2,
    emath::RectTransform, epaint::EllipseShape,
};
use gv_core::geometry::Pixel;

use crate::surface::{Style, Surface};

pub const PEN_WIDTH: f32 = 1.0;
pub const TEXT_SIZE: f32 = 0.16;

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Ellipse {
        center: Pos2,
        radius: Vec2,
        style: Style,
    },
    Line {
        start: Pos2,
        end: Pos2,
        pen: Color32,
    },
    Rectangle {
        rect: Rect,
        style: Style,
    },
    Text {
        rect: Rect,
        align: Align2,
        text: String,
        pen: Color32,
    },
    Point {
        at: Pos2,
        pen: Color32,
    },
}

/// Retained record of everything painted onto a surface, in painting order.
#[derive(Clone, Debug, Default)]
pub struct Shapes {
    pub shapes: Vec<Shape>,
    pub size: Vec2,
    style: Style,
}

#[allow(clippy::cast_precision_loss)]
fn pos(pixel: Pixel) -> Pos2 {
    Pos2::new(pixel.x as f32, pixel.y as f32)
}

impl Shapes {
    #[must_use]
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Shapes mapped into the painter's frame, ready to hand to egui.
    pub fn to_egui_shapes(&self, ui: &egui::Ui, transform: &RectTransform) -> Vec<egui::Shape> {
        self.shapes
            .iter()
            .cloned()
            .map(|shape| shape.into_egui_shape(ui, transform))
            .collect()
    }

    fn bounds(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.size)
    }
}

impl Surface for Shapes {
    fn style(&self) -> Style {
        self.style
    }

    fn set_pen(&mut self, pen: Color32) {
        self.style.pen = pen;
    }

    fn set_brush(&mut self, brush: Option<Color32>) {
        self.style.brush = brush;
    }

    fn draw_ellipse(&mut self, center: Pixel, rx: i32, ry: i32) {
        #[allow(clippy::cast_precision_loss)]
        let radius = Vec2::new(rx as f32, ry as f32);
        self.shapes.push(Shape::Ellipse {
            center: pos(center),
            radius,
            style: self.style,
        });
    }

    fn draw_line(&mut self, start: Pixel, end: Pixel) {
        self.shapes.push(Shape::Line {
            start: pos(start),
            end: pos(end),
            pen: self.style.pen,
        });
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let rect = Rect::from_min_size(
            pos(Pixel::new(x, y)),
            pos(Pixel::new(width, height)).to_vec2(),
        );
        // An opaque fill over the whole surface hides everything painted so far.
        if self.style.brush.is_some() && rect.contains_rect(self.bounds()) {
            self.shapes.clear();
        }
        self.shapes.push(Shape::Rectangle {
            rect,
            style: self.style,
        });
    }

    fn draw_text(&mut self, rect: Rect, align: Align2, text: &str) {
        self.shapes.push(Shape::Text {
            rect,
            align,
            text: text.to_owned(),
            pen: self.style.pen,
        });
    }

    fn draw_point(&mut self, at: Pixel) {
        self.shapes.push(Shape::Point {
            at: pos(at),
            pen: self.style.pen,
        });
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    fn backlog(&self) -> usize {
        self.shapes.len()
    }
}

impl Shape {
    pub(crate) fn into_egui_shape(self, ui: &egui::Ui, transform: &RectTransform) -> egui::Shape {
        let scale = transform.scale().min_elem();
        match self {
            Self::Ellipse {
                center,
                radius,
                style,
            } => egui::Shape::Ellipse(EllipseShape {
                center: transform.transform_pos(center),
                radius: radius * scale,
                fill: style.brush.unwrap_or(Color32::TRANSPARENT),
                stroke: Stroke::new(PEN_WIDTH, style.pen),
            }),
            Self::Line { start, end, pen } => egui::Shape::line_segment(
                [transform.transform_pos(start), transform.transform_pos(end)],
                Stroke::new(PEN_WIDTH, pen),
            ),
            Self::Rectangle { rect, style } => {
                let rect = transform.transform_rect(rect);
                egui::Shape::Vec(vec![
                    egui::Shape::rect_filled(
                        rect,
                        CornerRadius::ZERO,
                        style.brush.unwrap_or(Color32::TRANSPARENT),
                    ),
                    egui::Shape::rect_stroke(
                        rect,
                        CornerRadius::ZERO,
                        Stroke::new(PEN_WIDTH, style.pen),
                        StrokeKind::Inside,
                    ),
                ])
            }
            Self::Text {
                rect,
                align,
                text,
                pen,
            } => {
                let rect = transform.transform_rect(rect);
                let size = rect.height() * TEXT_SIZE;
                if size > 5.0 {
                    ui.fonts(|fonts| {
                        egui::Shape::text(
                            fonts,
                            align.pos_in_rect(&rect),
                            align,
                            text,
                            FontId::monospace(size),
                            pen,
                        )
                    })
                } else {
                    egui::Shape::Noop
                }
            }
            Self::Point { at, pen } => {
                egui::Shape::circle_filled(transform.transform_pos(at), PEN_WIDTH * scale, pen)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_with_current_style() {
        let mut shapes = Shapes::new(Vec2::new(100.0, 100.0));
        shapes.set_style(Style::outline(Color32::RED));
        shapes.draw_line(Pixel::new(0, 0), Pixel::new(10, 5));
        shapes.set_pen(Color32::GREEN);
        shapes.draw_point(Pixel::new(3, 4));

        assert_eq!(
            shapes.shapes,
            vec![
                Shape::Line {
                    start: Pos2::new(0.0, 0.0),
                    end: Pos2::new(10.0, 5.0),
                    pen: Color32::RED,
                },
                Shape::Point {
                    at: Pos2::new(3.0, 4.0),
                    pen: Color32::GREEN,
                },
            ]
        );
    }

    #[test]
    fn clear_compacts_history() {
        let mut shapes = Shapes::new(Vec2::new(100.0, 80.0));
        for i in 0..10 {
            shapes.draw_ellipse(Pixel::new(i, i), 5, 5);
        }
        shapes.clear();

        assert_eq!(shapes.backlog(), 1);
        assert_eq!(
            shapes.shapes[0],
            Shape::Rectangle {
                rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 80.0)),
                style: Style::ERASER,
            }
        );
    }

    #[test]
    fn outlined_full_rect_keeps_history() {
        let mut shapes = Shapes::new(Vec2::new(10.0, 10.0));
        shapes.draw_point(Pixel::new(1, 1));
        shapes.set_style(Style::outline(Color32::WHITE));
        shapes.draw_rect(0, 0, 10, 10);
        assert_eq!(shapes.len(), 2);
    }
}
