//! Pointer interaction modes of a canvas.
//!
//! Each mode is a small state machine fed with pointer events. [`InteractionState`] holds the
//! active one and resolves what happens to the content when the mode changes.

use std::{fmt, str::FromStr};

use delegate::delegate;
use gv_core::{
    GraphError,
    geometry::{Pixel, Point, Segment},
};
use indexmap::IndexSet;
use thiserror::Error;
use tracing::debug;

use crate::{
    content::{Contents, VertexId},
    surface::{ACCENT, BACKGROUND, GHOST, Style, Surface},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    PaintVertices,
    PaintEdges,
    MoveVertices,
    DeleteEdges,
    SelectVertices,
    DragView,
    EditGrid,
    Annotate,
}

impl Mode {
    pub const ALL: [Self; 8] = [
        Self::PaintVertices,
        Self::PaintEdges,
        Self::MoveVertices,
        Self::DeleteEdges,
        Self::SelectVertices,
        Self::DragView,
        Self::EditGrid,
        Self::Annotate,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PaintVertices => "paint-vertices",
            Self::PaintEdges => "paint-edges",
            Self::MoveVertices => "move-vertices",
            Self::DeleteEdges => "delete-edges",
            Self::SelectVertices => "select-vertices",
            Self::DragView => "drag-view",
            Self::EditGrid => "edit-grid",
            Self::Annotate => "annotate",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown mode {0:?}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| UnknownMode(s.to_owned()))
    }
}

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error(transparent)]
    Graph(#[from] GraphError<VertexId>),
    #[error("there is no grid to edit, use draw-grid first")]
    MissingGrid,
}

/// What an interaction state may touch: the canvas content and its surface.
pub struct StateContext<'a> {
    pub contents: &'a mut Contents,
    pub surface: &'a mut dyn Surface,
}

impl StateContext<'_> {
    /// Clears the surface and paints all content.
    pub fn redraw(&mut self) {
        self.surface.clear();
        self.contents.draw(self.surface);
    }

    pub fn pan(&mut self, offset: Pixel) {
        self.contents.pan(offset);
        self.redraw();
    }
}

pub trait Handler {
    /// # Errors
    ///
    /// Graph mutations triggered by the event may fail.
    fn on_press(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError>;
    /// Pointer moved with the primary button held.
    ///
    /// # Errors
    ///
    /// Graph mutations triggered by the event may fail.
    fn on_drag(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError>;
    /// # Errors
    ///
    /// Graph mutations triggered by the event may fail.
    fn on_release(&mut self, ctx: &mut StateContext<'_>, at: Pixel)
    -> Result<(), InteractionError>;

    /// Pointer moved with no button held.
    ///
    /// # Errors
    ///
    /// Graph mutations triggered by the event may fail.
    fn on_hover(&mut self, _ctx: &mut StateContext<'_>, _at: Pixel) -> Result<(), InteractionError> {
        Ok(())
    }

    /// Paints what the mode shows over the content. Called after every full redraw.
    fn redraw_overlay(&self, _ctx: &mut StateContext<'_>) {}
}

/// Click to place vertices.
#[derive(Clone, Debug, Default)]
pub struct PaintVertices {
    ghost: Option<Pixel>,
}

impl PaintVertices {
    fn erase_ghost(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(at) = self.ghost.take() {
            let graph = &ctx.contents.graph;
            let r = graph.radius();
            ctx.surface.set_style(Style::ERASER);
            ctx.surface.draw_ellipse(at, r, r);
            graph.redraw_near(ctx.surface, at, f64::from(r));
        }
    }
}

impl Handler for PaintVertices {
    fn on_press(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        self.erase_ghost(ctx);
        ctx.contents.graph.add_vertex_at(ctx.surface, at);
        Ok(())
    }

    fn on_drag(&mut self, _ctx: &mut StateContext<'_>, _at: Pixel) -> Result<(), InteractionError> {
        Ok(())
    }

    fn on_release(
        &mut self,
        _ctx: &mut StateContext<'_>,
        _at: Pixel,
    ) -> Result<(), InteractionError> {
        Ok(())
    }

    fn on_hover(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        self.erase_ghost(ctx);
        let graph = &ctx.contents.graph;
        if graph.vertex_at(at).is_none() {
            let r = graph.radius();
            ctx.surface.set_style(Style::filled(GHOST));
            ctx.surface.draw_ellipse(at, r, r);
            self.ghost = Some(at);
        }
        Ok(())
    }
}

/// Drag across the gap between two vertices to join them.
///
/// Candidate pairs are shown in gray. A non-empty filter restricts them to pairs inside it.
#[derive(Clone, Debug, Default)]
pub struct PaintEdges {
    anchor: Option<Pixel>,
    filter: IndexSet<VertexId>,
}

impl PaintEdges {
    #[must_use]
    pub const fn new(filter: IndexSet<VertexId>) -> Self {
        Self {
            anchor: None,
            filter,
        }
    }

    #[must_use]
    pub const fn filter(&self) -> &IndexSet<VertexId> {
        &self.filter
    }

    /// Unpaints the gray pair of every non-edge, then repaints the content it covered.
    fn erase_overlay(ctx: &mut StateContext<'_>) {
        let graph = &ctx.contents.graph;
        for (u, v) in graph.non_edges(&IndexSet::new()) {
            graph.paint_edge(ctx.surface, u, v, BACKGROUND);
        }
        ctx.contents.draw(ctx.surface);
    }
}

impl Handler for PaintEdges {
    fn on_press(&mut self, _ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        self.anchor = Some(at);
        Ok(())
    }

    fn on_drag(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        let Some(previous) = self.anchor.replace(at) else {
            return Ok(());
        };
        let graph = &mut ctx.contents.graph;
        let stroke = Segment::new(Point::from(previous), Point::from(at));
        let crossed = graph.intersecting_edges(stroke, graph.non_edges(&self.filter));
        if !crossed.is_empty() {
            debug!(?crossed, "painting edges");
            graph.connect(ctx.surface, &crossed)?;
        }
        Ok(())
    }

    fn on_release(
        &mut self,
        _ctx: &mut StateContext<'_>,
        _at: Pixel,
    ) -> Result<(), InteractionError> {
        self.anchor = None;
        Ok(())
    }

    fn redraw_overlay(&self, ctx: &mut StateContext<'_>) {
        let graph = &ctx.contents.graph;
        for (u, v) in graph.non_edges(&self.filter) {
            graph.paint_edge(ctx.surface, u, v, GHOST);
        }
        graph.draw_vertices(ctx.surface, graph.graph().vertices());
    }
}

/// Drag a vertex to move it.
#[derive(Clone, Debug, Default)]
pub struct MoveVertices {
    moving: Option<VertexId>,
}

impl Handler for MoveVertices {
    fn on_press(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        self.moving = ctx.contents.graph.vertex_at(at);
        Ok(())
    }

    fn on_drag(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        if let Some(u) = self.moving {
            ctx.contents.graph.relocate_vertex(ctx.surface, u, at);
        }
        Ok(())
    }

    fn on_release(
        &mut self,
        _ctx: &mut StateContext<'_>,
        _at: Pixel,
    ) -> Result<(), InteractionError> {
        self.moving = None;
        Ok(())
    }
}

/// Drag across edges to remove them, or click a vertex to remove it.
#[derive(Clone, Debug, Default)]
pub struct DeleteEdges {
    pressed: Option<Pixel>,
    anchor: Option<Pixel>,
}

impl Handler for DeleteEdges {
    fn on_press(&mut self, _ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        self.pressed = Some(at);
        self.anchor = Some(at);
        Ok(())
    }

    fn on_drag(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        let Some(previous) = self.anchor.replace(at) else {
            return Ok(());
        };
        let graph = &mut ctx.contents.graph;
        let stroke = Segment::new(Point::from(previous), Point::from(at));
        let crossed = graph.intersecting_edges(stroke, graph.graph().edges());
        if !crossed.is_empty() {
            debug!(?crossed, "erasing edges");
            graph.disconnect(ctx.surface, &crossed)?;
        }
        Ok(())
    }

    fn on_release(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        self.anchor = None;
        if self.pressed.take() == Some(at) {
            let graph = &mut ctx.contents.graph;
            if let Some(u) = graph.vertex_at(at) {
                debug!(vertex = u, "erasing vertex");
                graph.remove_vertex(ctx.surface, u)?;
            }
        }
        Ok(())
    }
}

/// Lasso vertices; the convex hull of the lasso picks the selection.
#[derive(Clone, Debug, Default)]
pub struct SelectVertices {
    lasso: Vec<Pixel>,
}

impl SelectVertices {
    fn paint_lasso(&self, surface: &mut dyn Surface, style: Style) {
        surface.set_style(style);
        for &at in &self.lasso {
            surface.draw_point(at);
        }
    }
}

impl Handler for SelectVertices {
    fn on_press(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        let graph = &mut ctx.contents.graph;
        graph.erase_selected_vertices(ctx.surface);
        graph.take_selection();
        self.lasso = vec![at];
        self.paint_lasso(ctx.surface, Style::outline(ACCENT));
        Ok(())
    }

    fn on_drag(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        if self.lasso.is_empty() {
            return Ok(());
        }
        self.lasso.push(at);
        ctx.surface.set_style(Style::outline(ACCENT));
        ctx.surface.draw_point(at);
        Ok(())
    }

    fn on_release(
        &mut self,
        ctx: &mut StateContext<'_>,
        _at: Pixel,
    ) -> Result<(), InteractionError> {
        if self.lasso.is_empty() {
            return Ok(());
        }
        self.paint_lasso(ctx.surface, Style::ERASER);
        ctx.contents.graph.select_in_hull(&self.lasso);
        self.lasso.clear();
        ctx.contents.draw(ctx.surface);
        ctx.contents.graph.draw_selected_vertices(ctx.surface);
        Ok(())
    }

    fn redraw_overlay(&self, ctx: &mut StateContext<'_>) {
        ctx.contents.graph.draw_selected_vertices(ctx.surface);
        self.paint_lasso(ctx.surface, Style::outline(ACCENT));
    }
}

/// Drag to move everything on the canvas.
#[derive(Clone, Debug, Default)]
pub struct DragView {
    anchor: Option<Pixel>,
}

impl Handler for DragView {
    fn on_press(&mut self, _ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        self.anchor = Some(at);
        Ok(())
    }

    fn on_drag(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        if let Some(previous) = self.anchor.replace(at) {
            ctx.pan(at - previous);
        }
        Ok(())
    }

    fn on_release(
        &mut self,
        _ctx: &mut StateContext<'_>,
        _at: Pixel,
    ) -> Result<(), InteractionError> {
        self.anchor = None;
        Ok(())
    }
}

/// Click grid cells to fill or empty them.
#[derive(Clone, Debug, Default)]
pub struct EditGrid;

impl Handler for EditGrid {
    fn on_press(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        let grid = ctx
            .contents
            .grid
            .as_mut()
            .ok_or(InteractionError::MissingGrid)?;
        if let Some(cell) = grid.cell_at(at) {
            grid.toggle(ctx.surface, cell);
        }
        Ok(())
    }

    fn on_drag(&mut self, _ctx: &mut StateContext<'_>, _at: Pixel) -> Result<(), InteractionError> {
        Ok(())
    }

    fn on_release(
        &mut self,
        _ctx: &mut StateContext<'_>,
        _at: Pixel,
    ) -> Result<(), InteractionError> {
        Ok(())
    }

    fn on_hover(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        if let Some(grid) = ctx.contents.grid.as_mut() {
            let cell = grid.cell_at(at);
            grid.hover(ctx.surface, cell);
        }
        Ok(())
    }
}

/// Freehand drawing in the annotation colour.
#[derive(Clone, Debug, Default)]
pub struct Annotate {
    anchor: Option<Pixel>,
}

impl Handler for Annotate {
    fn on_press(&mut self, _ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        self.anchor = Some(at);
        Ok(())
    }

    fn on_drag(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError> {
        if let Some(previous) = self.anchor.replace(at) {
            ctx.contents.annotations.add_line(ctx.surface, previous, at);
        }
        Ok(())
    }

    fn on_release(
        &mut self,
        _ctx: &mut StateContext<'_>,
        _at: Pixel,
    ) -> Result<(), InteractionError> {
        self.anchor = None;
        Ok(())
    }
}

/// The active mode of a canvas together with its in-progress gesture.
#[derive(Clone, Debug)]
pub enum InteractionState {
    PaintVertices(PaintVertices),
    PaintEdges(PaintEdges),
    MoveVertices(MoveVertices),
    DeleteEdges(DeleteEdges),
    SelectVertices(SelectVertices),
    DragView(DragView),
    EditGrid(EditGrid),
    Annotate(Annotate),
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

impl InteractionState {
    /// A fresh state for `mode`. Nothing is painted.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        match mode {
            Mode::PaintVertices => Self::PaintVertices(PaintVertices::default()),
            Mode::PaintEdges => Self::PaintEdges(PaintEdges::default()),
            Mode::MoveVertices => Self::MoveVertices(MoveVertices::default()),
            Mode::DeleteEdges => Self::DeleteEdges(DeleteEdges::default()),
            Mode::SelectVertices => Self::SelectVertices(SelectVertices::default()),
            Mode::DragView => Self::DragView(DragView::default()),
            Mode::EditGrid => Self::EditGrid(EditGrid),
            Mode::Annotate => Self::Annotate(Annotate::default()),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self {
            Self::PaintVertices(_) => Mode::PaintVertices,
            Self::PaintEdges(_) => Mode::PaintEdges,
            Self::MoveVertices(_) => Mode::MoveVertices,
            Self::DeleteEdges(_) => Mode::DeleteEdges,
            Self::SelectVertices(_) => Mode::SelectVertices,
            Self::DragView(_) => Mode::DragView,
            Self::EditGrid(_) => Mode::EditGrid,
            Self::Annotate(_) => Mode::Annotate,
        }
    }

    /// Switches to `to`, cleaning up what the current mode painted and carrying a lasso
    /// selection into edge painting.
    #[must_use]
    pub fn transition(self, to: Mode, ctx: &mut StateContext<'_>) -> Self {
        let from = self.mode();
        if from == to {
            return self;
        }
        debug!(%from, %to, "mode transition");

        let mut carried = IndexSet::new();
        match self {
            Self::PaintVertices(mut state) => state.erase_ghost(ctx),
            Self::PaintEdges(_) => PaintEdges::erase_overlay(ctx),
            Self::SelectVertices(_) => {
                let graph = &mut ctx.contents.graph;
                graph.erase_selected_vertices(ctx.surface);
                carried = graph.take_selection();
            }
            Self::EditGrid(_) => {
                if let Some(grid) = ctx.contents.grid.as_mut() {
                    grid.clear_hover(ctx.surface);
                }
            }
            Self::MoveVertices(_) | Self::DeleteEdges(_) | Self::DragView(_) | Self::Annotate(_) => {
            }
        }

        let next = match to {
            Mode::PaintEdges if from == Mode::SelectVertices => {
                debug!(selected = carried.len(), "restricting edge candidates");
                Self::PaintEdges(PaintEdges::new(carried))
            }
            to => Self::new(to),
        };
        next.redraw_overlay(ctx);
        next
    }

    /// The pairs edge painting may join, if that is the active mode.
    #[must_use]
    pub fn edge_filter(&self) -> Option<&IndexSet<VertexId>> {
        match self {
            Self::PaintEdges(state) => Some(state.filter()),
            _ => None,
        }
    }

    delegate! {
        to match self {
            Self::PaintVertices(state) => state,
            Self::PaintEdges(state) => state,
            Self::MoveVertices(state) => state,
            Self::DeleteEdges(state) => state,
            Self::SelectVertices(state) => state,
            Self::DragView(state) => state,
            Self::EditGrid(state) => state,
            Self::Annotate(state) => state
        } {
            /// # Errors
            ///
            /// Graph mutations triggered by the event may fail.
            pub fn on_press(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError>;
            /// # Errors
            ///
            /// Graph mutations triggered by the event may fail.
            pub fn on_drag(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError>;
            /// # Errors
            ///
            /// Graph mutations triggered by the event may fail.
            pub fn on_release(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError>;
            /// # Errors
            ///
            /// Graph mutations triggered by the event may fail.
            pub fn on_hover(&mut self, ctx: &mut StateContext<'_>, at: Pixel) -> Result<(), InteractionError>;
            pub fn redraw_overlay(&self, ctx: &mut StateContext<'_>);
        }
    }
}

#[cfg(test)]
mod tests {
    use egui::Vec2;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::{config::CanvasConfig, content::GridContent, shape::Shapes};

    struct Fixture {
        contents: Contents,
        surface: Shapes,
    }

    impl Fixture {
        fn ctx(&mut self) -> StateContext<'_> {
            StateContext {
                contents: &mut self.contents,
                surface: &mut self.surface,
            }
        }
    }

    /// Vertices 0..4 on the corners of a square, without edges.
    #[fixture]
    fn square() -> Fixture {
        let mut fixture = Fixture {
            contents: Contents::new(&CanvasConfig::default()),
            surface: Shapes::new(Vec2::new(200.0, 200.0)),
        };
        let mut state = InteractionState::new(Mode::PaintVertices);
        for (x, y) in [(20, 20), (120, 20), (120, 120), (20, 120)] {
            state.on_press(&mut fixture.ctx(), Pixel::new(x, y)).unwrap();
        }
        fixture
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>(), Ok(mode));
        }
        assert_eq!(
            "paint".parse::<Mode>(),
            Err(UnknownMode("paint".to_owned()))
        );
    }

    #[rstest]
    fn same_mode_is_a_no_op(mut square: Fixture) {
        let before = square.surface.len();
        let state = InteractionState::new(Mode::PaintEdges);
        let state = state.transition(Mode::PaintEdges, &mut square.ctx());
        assert_eq!(state.mode(), Mode::PaintEdges);
        assert_eq!(square.surface.len(), before);
    }

    #[rstest]
    fn selection_restricts_edge_candidates(mut square: Fixture) {
        let mut state = InteractionState::new(Mode::PaintEdges)
            .transition(Mode::SelectVertices, &mut square.ctx());
        let mut ctx = square.ctx();
        state.on_press(&mut ctx, Pixel::new(0, 0)).unwrap();
        for (x, y) in [(140, 0), (140, 40), (0, 40)] {
            state.on_drag(&mut ctx, Pixel::new(x, y)).unwrap();
        }
        state.on_release(&mut ctx, Pixel::new(0, 40)).unwrap();
        assert_eq!(ctx.contents.graph.selection(), &IndexSet::from([0, 1]));

        let state = state.transition(Mode::PaintEdges, &mut ctx);
        assert_eq!(state.edge_filter(), Some(&IndexSet::from([0, 1])));
        assert!(ctx.contents.graph.selection().is_empty());
        assert_eq!(
            ctx.contents.graph.non_edges(state.edge_filter().unwrap()),
            vec![(0, 1)]
        );
    }

    #[rstest]
    fn filter_is_dropped_when_coming_from_elsewhere(mut square: Fixture) {
        let mut ctx = square.ctx();
        let state = InteractionState::new(Mode::SelectVertices)
            .transition(Mode::DragView, &mut ctx)
            .transition(Mode::PaintEdges, &mut ctx);
        assert_eq!(state.edge_filter(), Some(&IndexSet::new()));
    }

    #[rstest]
    fn paint_edges_joins_crossed_pairs(mut square: Fixture) {
        let mut state =
            InteractionState::new(Mode::PaintVertices).transition(Mode::PaintEdges, &mut square.ctx());
        let mut ctx = square.ctx();
        // Across the gap between 0 and 1 and then between 1 and 2.
        state.on_press(&mut ctx, Pixel::new(70, 0)).unwrap();
        state.on_drag(&mut ctx, Pixel::new(70, 40)).unwrap();
        state.on_drag(&mut ctx, Pixel::new(140, 70)).unwrap();
        state.on_release(&mut ctx, Pixel::new(140, 70)).unwrap();

        let graph = ctx.contents.graph.graph();
        assert!(graph.contains_edge(0, 1));
        assert!(graph.contains_edge(1, 2));
        assert!(!graph.contains_edge(0, 2));
    }

    #[rstest]
    fn click_in_delete_mode_removes_the_vertex(mut square: Fixture) {
        let mut state = InteractionState::new(Mode::DeleteEdges);
        let mut ctx = square.ctx();
        state.on_press(&mut ctx, Pixel::new(122, 118)).unwrap();
        state.on_release(&mut ctx, Pixel::new(122, 118)).unwrap();
        assert!(!ctx.contents.graph.graph().contains_vertex(2));
        assert_eq!(ctx.contents.graph.graph().vertex_count(), 3);
    }

    #[rstest]
    fn ghost_follows_the_pointer(mut square: Fixture) {
        let mut state = PaintVertices::default();
        let mut ctx = square.ctx();
        state.on_hover(&mut ctx, Pixel::new(70, 70)).unwrap();
        assert_eq!(state.ghost, Some(Pixel::new(70, 70)));
        state.on_hover(&mut ctx, Pixel::new(22, 22)).unwrap();
        assert_eq!(state.ghost, None);
    }

    #[rstest]
    fn editing_needs_a_grid(mut square: Fixture) {
        let mut state = InteractionState::new(Mode::EditGrid);
        assert!(matches!(
            state.on_press(&mut square.ctx(), Pixel::new(10, 10)),
            Err(InteractionError::MissingGrid)
        ));

        square.contents.grid = Some(GridContent::new(2, 2, 50.0));
        state.on_hover(&mut square.ctx(), Pixel::new(60, 10)).unwrap();
        state.on_press(&mut square.ctx(), Pixel::new(10, 10)).unwrap();
        let state = state.transition(Mode::Annotate, &mut square.ctx());
        assert_eq!(state.mode(), Mode::Annotate);

        let grid = square.contents.grid.as_ref().unwrap();
        assert_eq!(grid.hovered(), None);
        assert_eq!(grid.cell((0, 0)), Some(crate::content::Cell::Filled));
        assert_eq!(grid.cell((0, 1)), Some(crate::content::Cell::Empty));
    }

    #[rstest]
    fn drag_view_pans_content(mut square: Fixture) {
        let mut state = InteractionState::new(Mode::DragView);
        let mut ctx = square.ctx();
        state.on_press(&mut ctx, Pixel::new(0, 0)).unwrap();
        state.on_drag(&mut ctx, Pixel::new(5, 5)).unwrap();
        state.on_drag(&mut ctx, Pixel::new(10, 0)).unwrap();
        assert_eq!(ctx.contents.graph.location(0), Some(Pixel::new(30, 20)));
    }

    #[rstest]
    fn annotate_records_strokes(mut square: Fixture) {
        let mut state = InteractionState::new(Mode::Annotate);
        let mut ctx = square.ctx();
        state.on_drag(&mut ctx, Pixel::new(5, 5)).unwrap();
        state.on_press(&mut ctx, Pixel::new(0, 0)).unwrap();
        state.on_drag(&mut ctx, Pixel::new(5, 5)).unwrap();
        state.on_drag(&mut ctx, Pixel::new(10, 0)).unwrap();
        assert_eq!(ctx.contents.annotations.strokes().len(), 2);
    }
}
