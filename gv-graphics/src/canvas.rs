use derive_more::{Display, From, FromStr};
use egui::{PointerButton, Vec2};
use gv_core::geometry::{Pixel, Point};
use tracing::{debug, trace};

use crate::{
    config::CanvasConfig,
    content::{Contents, GraphContent, GridContent},
    shape::Shapes,
    state::{InteractionError, InteractionState, Mode, StateContext},
    surface::Surface,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, FromStr)]
pub struct CanvasId(pub usize);

/// One drawing area: its content, the surface it is painted on, and the active interaction mode.
#[derive(Clone, Debug)]
pub struct Canvas<S: Surface = Shapes> {
    id: CanvasId,
    surface: S,
    contents: Contents,
    state: InteractionState,
    pan_anchor: Option<Pixel>,
    config: CanvasConfig,
}

impl<S: Surface + Default> Canvas<S> {
    #[must_use]
    pub fn new(id: CanvasId, config: CanvasConfig) -> Self {
        let mut surface = S::default();
        surface.resize(config.size);
        Self::with_surface(id, config, surface)
    }
}

impl<S: Surface> Canvas<S> {
    /// A canvas painting on `surface`, in the configured initial mode.
    pub fn with_surface(id: CanvasId, config: CanvasConfig, surface: S) -> Self {
        let mut canvas = Self {
            id,
            surface,
            contents: Contents::new(&config),
            state: InteractionState::default(),
            pan_anchor: None,
            config,
        };
        canvas.redraw();
        canvas.set_mode(canvas.config.initial_mode);
        canvas
    }

    #[must_use]
    pub const fn id(&self) -> CanvasId {
        self.id
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub const fn contents(&self) -> &Contents {
        &self.contents
    }

    #[must_use]
    pub const fn graph(&self) -> &GraphContent {
        &self.contents.graph
    }

    #[must_use]
    pub const fn state(&self) -> &InteractionState {
        &self.state
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.state.mode()
    }

    #[must_use]
    pub const fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Clears the surface and paints the content and the mode's overlay.
    pub fn redraw(&mut self) {
        let mut ctx = StateContext {
            contents: &mut self.contents,
            surface: &mut self.surface,
        };
        ctx.redraw();
        self.state.redraw_overlay(&mut ctx);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        let mut ctx = StateContext {
            contents: &mut self.contents,
            surface: &mut self.surface,
        };
        let state = std::mem::take(&mut self.state);
        self.state = state.transition(mode, &mut ctx);
    }

    /// # Errors
    ///
    /// Errors of the active mode are returned; the canvas stays usable.
    pub fn on_press(&mut self, button: PointerButton, at: Pixel) -> Result<(), InteractionError> {
        let result = match button {
            PointerButton::Primary => {
                let mut ctx = StateContext {
                    contents: &mut self.contents,
                    surface: &mut self.surface,
                };
                self.state.on_press(&mut ctx, at)
            }
            PointerButton::Secondary => {
                self.pan_anchor = Some(at);
                Ok(())
            }
            _ => Ok(()),
        };
        self.compact();
        result
    }

    /// Pointer moved to `at`, with `held` pressed if any.
    ///
    /// # Errors
    ///
    /// Errors of the active mode are returned; the canvas stays usable.
    pub fn on_pointer_move(
        &mut self,
        at: Pixel,
        held: Option<PointerButton>,
    ) -> Result<(), InteractionError> {
        if held == Some(PointerButton::Secondary) {
            if let Some(previous) = self.pan_anchor.replace(at) {
                self.pan(at - previous);
            }
            return Ok(());
        }
        let mut ctx = StateContext {
            contents: &mut self.contents,
            surface: &mut self.surface,
        };
        let result = match held {
            Some(PointerButton::Primary) => self.state.on_drag(&mut ctx, at),
            Some(_) => Ok(()),
            None => self.state.on_hover(&mut ctx, at),
        };
        self.compact();
        result
    }

    /// # Errors
    ///
    /// Errors of the active mode are returned; the canvas stays usable.
    pub fn on_release(&mut self, button: PointerButton, at: Pixel) -> Result<(), InteractionError> {
        let result = match button {
            PointerButton::Primary => {
                let mut ctx = StateContext {
                    contents: &mut self.contents,
                    surface: &mut self.surface,
                };
                self.state.on_release(&mut ctx, at)
            }
            PointerButton::Secondary => {
                self.pan_anchor = None;
                Ok(())
            }
            _ => Ok(()),
        };
        self.compact();
        result
    }

    /// Zooms about `at` by one step of the zoom base per notch of `delta` (in 1/120 units).
    pub fn on_wheel(&mut self, delta: i32, at: Pixel) {
        let steps = delta / 120;
        if steps == 0 {
            return;
        }
        let factor = self.config.zoom_base.powi(steps.abs());
        let factor = if steps < 0 { factor.recip() } else { factor };
        self.zoom(factor, Point::from(at));
    }

    /// Rescales all content about `pivot` and repaints.
    pub fn zoom(&mut self, factor: f64, pivot: Point) {
        trace!(canvas = %self.id, factor, %pivot, "zoom");
        self.contents.zoom(factor, pivot);
        self.redraw();
    }

    /// Translates all content and repaints.
    pub fn pan(&mut self, offset: Pixel) {
        trace!(canvas = %self.id, %offset, "pan");
        self.contents.pan(offset);
        self.redraw();
    }

    pub fn on_resize(&mut self, size: Vec2) {
        if self.surface.size() == size {
            return;
        }
        debug!(canvas = %self.id, ?size, "resize");
        self.surface.resize(size);
        self.contents.resize(size);
        self.redraw();
    }

    /// Gives `f` the graph layer and the surface, then returns what it returns.
    pub fn with_graph<T>(&mut self, f: impl FnOnce(&mut GraphContent, &mut dyn Surface) -> T) -> T {
        let result = f(&mut self.contents.graph, &mut self.surface);
        self.compact();
        result
    }

    /// Lays out a fresh `rows` × `columns` grid, or resets the existing one, and paints it.
    pub fn draw_grid(&mut self, rows: usize, columns: usize) {
        match &mut self.contents.grid {
            Some(grid) => grid.set_rows_and_columns(rows, columns),
            None => {
                self.contents.grid = Some(GridContent::new(rows, columns, self.config.grid_spacing));
            }
        }
        self.redraw();
    }

    pub fn set_annotation_color(&mut self, color: egui::Color32) {
        self.contents.annotations.set_color(color);
    }

    /// Places the vertices on a regular grid inside the surface and repaints.
    pub fn arrange_on_grid(&mut self, margin: f64) {
        let size = self.surface.size();
        self.contents.graph.arrange_on_grid(size, margin);
        self.redraw();
    }

    /// Removes every vertex and annotation and drops the grid.
    ///
    /// # Errors
    ///
    /// Observer failures are returned once everything is removed.
    pub fn clear(&mut self) -> Result<(), InteractionError> {
        self.contents.erase(&mut self.surface);
        let mut result = Ok(());
        let vertices = self.contents.graph.graph().vertices().collect::<Vec<_>>();
        for u in vertices {
            if let Err(err) = self.contents.graph.remove_vertex(&mut self.surface, u) {
                result = result.and(Err(err.into()));
            }
        }
        self.contents.grid = None;
        self.contents.annotations.clear();
        self.redraw();
        result
    }

    /// A copy under a new id with the same content and geometry but no observers.
    #[must_use]
    pub fn duplicate(&self, id: CanvasId) -> Self
    where
        S: Clone,
    {
        let mut canvas = Self {
            id,
            surface: self.surface.clone(),
            contents: self.contents.clone(),
            state: InteractionState::new(self.mode()),
            pan_anchor: None,
            config: self.config.clone(),
        };
        canvas.redraw();
        canvas
    }

    /// Repaints from scratch once the surface holds too many primitives.
    fn compact(&mut self) {
        let backlog = self.surface.backlog();
        if backlog > self.config.max_backlog {
            trace!(canvas = %self.id, backlog, "compacting surface");
            self.redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        shape::Shape,
        surface::{BACKGROUND, Style},
    };

    fn click(canvas: &mut Canvas, x: i32, y: i32) {
        let at = Pixel::new(x, y);
        canvas.on_press(PointerButton::Primary, at).unwrap();
        canvas.on_release(PointerButton::Primary, at).unwrap();
    }

    #[rstest]
    #[case(120, 1.1)]
    #[case(240, 1.1 * 1.1)]
    #[case(-120, 1.0 / 1.1)]
    #[case(359, 1.1 * 1.1)]
    fn wheel_zooms_by_whole_notches(#[case] delta: i32, #[case] factor: f64) {
        let mut canvas = Canvas::new(CanvasId(0), CanvasConfig::default());
        click(&mut canvas, 110, 100);
        canvas.on_wheel(delta, Pixel::new(100, 100));
        let x = canvas.graph().position(0).unwrap().x;
        assert!((x - (100.0 + 10.0 * factor)).abs() < 1e-9);
    }

    #[test]
    fn small_wheel_delta_is_ignored() {
        let mut canvas = Canvas::new(CanvasId(0), CanvasConfig::default());
        click(&mut canvas, 110, 100);
        canvas.on_wheel(119, Pixel::new(100, 100));
        assert_eq!(canvas.graph().position(0), Some(Point::new(110.0, 100.0)));
    }

    #[test]
    fn secondary_drag_pans_in_any_mode() {
        let mut canvas = Canvas::new(CanvasId(0), CanvasConfig::default());
        click(&mut canvas, 10, 10);
        canvas
            .on_press(PointerButton::Secondary, Pixel::new(50, 50))
            .unwrap();
        canvas
            .on_pointer_move(Pixel::new(60, 45), Some(PointerButton::Secondary))
            .unwrap();
        canvas
            .on_release(PointerButton::Secondary, Pixel::new(60, 45))
            .unwrap();
        assert_eq!(canvas.graph().location(0), Some(Pixel::new(20, 5)));
        assert_eq!(canvas.graph().graph().vertex_count(), 1);
    }

    #[test]
    fn duplicate_is_independent() {
        let mut canvas = Canvas::new(CanvasId(0), CanvasConfig::default());
        click(&mut canvas, 10, 10);
        click(&mut canvas, 40, 10);

        let mut copy = canvas.duplicate(CanvasId(1));
        click(&mut copy, 70, 10);

        assert_eq!(copy.id(), CanvasId(1));
        assert_eq!(canvas.graph().graph().vertex_count(), 2);
        assert_eq!(copy.graph().graph().vertex_count(), 3);
        assert_eq!(copy.graph().location(1), Some(Pixel::new(40, 10)));
    }

    #[test]
    fn redraw_keeps_the_overlay() {
        let mut canvas = Canvas::new(CanvasId(0), CanvasConfig::default());
        click(&mut canvas, 10, 10);
        click(&mut canvas, 40, 10);
        canvas.set_mode(Mode::PaintEdges);
        canvas.zoom(1.5, Point::default());

        let ghost_lines = canvas
            .surface()
            .iter()
            .filter(|shape| {
                matches!(shape, crate::shape::Shape::Line { pen, .. } if *pen == crate::surface::GHOST)
            })
            .count();
        assert_eq!(ghost_lines, 1);
    }

    #[test]
    fn resize_repaints_in_place() {
        let mut canvas = Canvas::new(CanvasId(0), CanvasConfig::default());
        click(&mut canvas, 10, 10);
        click(&mut canvas, 40, 10);
        canvas
            .with_graph(|graph, surface| graph.connect(surface, &[(0, 1)]))
            .unwrap();
        let positions = [0, 1].map(|u| canvas.graph().position(u));

        canvas.on_resize(Vec2::new(400.0, 300.0));
        assert_eq!(canvas.surface().size(), Vec2::new(400.0, 300.0));
        assert_eq!([0, 1].map(|u| canvas.graph().position(u)), positions);
        // Background, the edge, then both vertices.
        assert_eq!(canvas.surface().backlog(), 4);

        canvas.on_resize(Vec2::new(400.0, 300.0));
        assert_eq!(canvas.surface().backlog(), 4);
    }

    #[test]
    fn erasing_contents_paints_background_only() {
        let mut canvas = Canvas::new(CanvasId(0), CanvasConfig::default());
        click(&mut canvas, 10, 10);
        click(&mut canvas, 40, 10);
        canvas
            .with_graph(|graph, surface| graph.connect(surface, &[(0, 1)]))
            .unwrap();
        canvas.draw_grid(1, 1);

        let mut surface = Shapes::new(canvas.surface().size());
        canvas.contents().erase(&mut surface);
        assert_eq!(surface.len(), 4);
        assert!(surface.iter().all(|shape| match shape {
            Shape::Ellipse { style, .. } | Shape::Rectangle { style, .. } => {
                *style == Style::ERASER
            }
            Shape::Line { pen, .. } => *pen == BACKGROUND,
            _ => false,
        }));
    }

    #[test]
    fn clear_empties_everything() {
        let mut canvas = Canvas::new(CanvasId(0), CanvasConfig::default());
        click(&mut canvas, 10, 10);
        canvas.draw_grid(2, 2);
        canvas.clear().unwrap();
        assert!(canvas.graph().graph().is_empty());
        assert!(canvas.contents().grid.is_none());
        assert_eq!(canvas.surface().backlog(), 1);
    }

    #[test]
    fn backlog_is_bounded() {
        let config = CanvasConfig {
            max_backlog: 10,
            ..CanvasConfig::default()
        };
        let mut canvas = Canvas::new(CanvasId(0), config);
        for i in 0..20 {
            click(&mut canvas, 10 * i, 10);
        }
        assert!(canvas.surface().backlog() <= 21);
        assert_eq!(canvas.graph().graph().vertex_count(), 20);
    }
}
