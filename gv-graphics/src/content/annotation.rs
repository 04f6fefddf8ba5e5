use derivative::Derivative;
use egui::Color32;
use gv_core::geometry::{Pixel, Point};

use super::ContentManager;
use crate::surface::{FOREGROUND, Style, Surface};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub start: Point,
    pub end: Point,
    pub color: Color32,
}

/// Freehand strokes drawn over the rest of the canvas.
#[derive(Clone, Debug, PartialEq, Derivative)]
#[derivative(Default)]
pub struct AnnotationContent {
    strokes: Vec<Stroke>,
    /// Colour of the strokes added next.
    #[derivative(Default(value = "FOREGROUND"))]
    color: Color32,
}

impl AnnotationContent {
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    #[must_use]
    pub const fn color(&self) -> Color32 {
        self.color
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    /// Records a stroke in the current colour and draws it.
    pub fn add_line(&mut self, surface: &mut dyn Surface, start: Pixel, end: Pixel) {
        let stroke = Stroke {
            start: start.into(),
            end: end.into(),
            color: self.color,
        };
        paint(surface, &stroke, stroke.color);
        self.strokes.push(stroke);
    }

    /// Forgets every stroke. The caller repaints.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }
}

fn paint(surface: &mut dyn Surface, stroke: &Stroke, pen: Color32) {
    surface.set_style(Style::outline(pen));
    surface.draw_line(stroke.start.floor(), stroke.end.floor());
}

impl ContentManager for AnnotationContent {
    fn draw(&self, surface: &mut dyn Surface) {
        for stroke in &self.strokes {
            paint(surface, stroke, stroke.color);
        }
    }

    fn erase(&self, surface: &mut dyn Surface) {
        for stroke in &self.strokes {
            paint(surface, stroke, Style::ERASER.pen);
        }
    }

    fn on_zoom(&mut self, factor: f64, pivot: Point) {
        for stroke in &mut self.strokes {
            stroke.start = stroke.start.scale_about(pivot, factor);
            stroke.end = stroke.end.scale_about(pivot, factor);
        }
    }

    fn on_pan(&mut self, offset: Pixel) {
        let offset = Point::from(offset);
        for stroke in &mut self.strokes {
            stroke.start = stroke.start + offset;
            stroke.end = stroke.end + offset;
        }
    }
}
