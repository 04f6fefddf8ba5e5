use derivative::Derivative;
use egui::Vec2;

use crate::state::Mode;

/// Tunables shared by a canvas, its content and its interaction states.
#[derive(Clone, Debug, PartialEq, Derivative)]
#[derivative(Default)]
pub struct CanvasConfig {
    /// Vertex radius at zoom level 1.
    #[derivative(Default(value = "5.0"))]
    pub radius: f64,
    /// Zooming out never shrinks vertices below this.
    #[derivative(Default(value = "3"))]
    pub min_radius: i32,
    /// How far outside a vertex a click still hits it.
    #[derivative(Default(value = "5.0"))]
    pub hit_tolerance: f64,
    #[derivative(Default(value = "2"))]
    pub selection_halo: i32,
    /// Zoom factor of one wheel notch.
    #[derivative(Default(value = "1.1"))]
    pub zoom_base: f64,
    #[derivative(Default(value = "50.0"))]
    pub grid_spacing: f64,
    #[derivative(Default(value = "Vec2::new(800.0, 600.0)"))]
    pub size: Vec2,
    pub initial_mode: Mode,
    /// Primitives a surface may accumulate before the canvas repaints it from scratch.
    #[derivative(Default(value = "20_000"))]
    pub max_backlog: usize,
}
