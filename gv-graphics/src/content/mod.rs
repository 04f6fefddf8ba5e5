//! Content layers of a canvas.
//!
//! Each layer owns the authoritative geometry of what it shows and knows how to paint and unpaint
//! itself. Layers never clear the surface; full repaints are orchestrated by the canvas.

use egui::Vec2;
use gv_core::geometry::{Pixel, Point};

use crate::{config::CanvasConfig, surface::Surface};

pub mod annotation;
pub mod graph;
pub mod grid;

pub use annotation::AnnotationContent;
pub use graph::{GraphContent, VertexId};
pub use grid::{Cell, GridContent};

pub trait ContentManager {
    fn draw(&self, surface: &mut dyn Surface);
    fn erase(&self, surface: &mut dyn Surface);

    /// Rescales geometry about `pivot`. The caller repaints afterwards.
    fn on_zoom(&mut self, factor: f64, pivot: Point);
    /// Translates geometry. The caller repaints afterwards.
    fn on_pan(&mut self, offset: Pixel);
    fn on_resize(&mut self, _size: Vec2) {}
}

/// All content of one canvas, painted bottom to top: grid, graph, annotations.
#[derive(Clone, Debug)]
pub struct Contents {
    pub grid: Option<GridContent>,
    pub graph: GraphContent,
    pub annotations: AnnotationContent,
}

impl Contents {
    #[must_use]
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            grid: None,
            graph: GraphContent::new(config),
            annotations: AnnotationContent::default(),
        }
    }

    pub fn managers(&self) -> impl Iterator<Item = &dyn ContentManager> {
        self.grid
            .iter()
            .map(|grid| grid as &dyn ContentManager)
            .chain([
                &self.graph as &dyn ContentManager,
                &self.annotations as &dyn ContentManager,
            ])
    }

    pub fn managers_mut(&mut self) -> impl Iterator<Item = &mut dyn ContentManager> {
        self.grid
            .iter_mut()
            .map(|grid| grid as &mut dyn ContentManager)
            .chain([
                &mut self.graph as &mut dyn ContentManager,
                &mut self.annotations as &mut dyn ContentManager,
            ])
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for manager in self.managers() {
            manager.draw(surface);
        }
    }

    /// Unpaints every layer, top to bottom.
    pub fn erase(&self, surface: &mut dyn Surface) {
        for manager in self.managers().collect::<Vec<_>>().into_iter().rev() {
            manager.erase(surface);
        }
    }

    pub fn zoom(&mut self, factor: f64, pivot: Point) {
        for manager in self.managers_mut() {
            manager.on_zoom(factor, pivot);
        }
    }

    pub fn pan(&mut self, offset: Pixel) {
        for manager in self.managers_mut() {
            manager.on_pan(offset);
        }
    }

    pub fn resize(&mut self, size: Vec2) {
        for manager in self.managers_mut() {
            manager.on_resize(size);
        }
    }
}
