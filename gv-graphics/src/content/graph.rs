use std::mem;

use egui::{Color32, Vec2};
use gv_core::{
    GraphError, ObservableGraph,
    geometry::{Pixel, Point, Segment, convex_hull, polygon_contains},
};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use tracing::debug;

use super::ContentManager;
use crate::{
    config::CanvasConfig,
    surface::{ACCENT, BACKGROUND, FOREGROUND, Style, Surface},
};

/// Vertex key used by canvases.
pub type VertexId = usize;

pub const VERTEX: Style = Style::filled(FOREGROUND);

fn edge_key((u, v): (VertexId, VertexId)) -> (VertexId, VertexId) {
    (u.min(v), u.max(v))
}

/// The graph layer: an observable graph together with where each vertex is drawn.
///
/// Every vertex of the graph has a location and nothing else does. Locations are kept twice:
/// continuous positions that zooming works on, and their floored pixels used for drawing and hit
/// testing.
#[derive(Clone, Debug)]
pub struct GraphContent {
    graph: ObservableGraph<VertexId>,
    positions: IndexMap<VertexId, Point>,
    locations: IndexMap<VertexId, Pixel>,
    radius: f64,
    selection: IndexSet<VertexId>,
    min_radius: i32,
    hit_tolerance: f64,
    selection_halo: i32,
}

impl GraphContent {
    #[must_use]
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            graph: ObservableGraph::new(),
            positions: IndexMap::new(),
            locations: IndexMap::new(),
            radius: config.radius,
            selection: IndexSet::new(),
            min_radius: config.min_radius,
            hit_tolerance: config.hit_tolerance,
            selection_halo: config.selection_halo,
        }
    }

    #[must_use]
    pub const fn graph(&self) -> &ObservableGraph<VertexId> {
        &self.graph
    }

    /// Mutable access for registering observers. Structural changes must go through the methods
    /// of this type so that geometry stays in step.
    pub fn observers_mut(&mut self) -> &mut ObservableGraph<VertexId> {
        &mut self.graph
    }

    #[must_use]
    pub fn location(&self, u: VertexId) -> Option<Pixel> {
        self.locations.get(&u).copied()
    }

    #[must_use]
    pub fn position(&self, u: VertexId) -> Option<Point> {
        self.positions.get(&u).copied()
    }

    /// Current draw radius in pixels.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn radius(&self) -> i32 {
        (self.radius.floor() as i32).max(self.min_radius)
    }

    #[must_use]
    pub const fn selection(&self) -> &IndexSet<VertexId> {
        &self.selection
    }

    pub fn paint_vertex(&self, surface: &mut dyn Surface, u: VertexId, style: Style) {
        if let Some(at) = self.location(u) {
            let r = self.radius();
            surface.set_style(style);
            surface.draw_ellipse(at, r, r);
        }
    }

    pub fn draw_vertex(&self, surface: &mut dyn Surface, u: VertexId) {
        self.paint_vertex(surface, u, VERTEX);
    }

    pub fn erase_vertex(&self, surface: &mut dyn Surface, u: VertexId) {
        self.paint_vertex(surface, u, Style::ERASER);
    }

    pub fn draw_vertices<I>(&self, surface: &mut dyn Surface, vertices: I)
    where
        I: IntoIterator<Item = VertexId>,
    {
        for u in vertices {
            self.draw_vertex(surface, u);
        }
    }

    pub fn erase_vertices<I>(&self, surface: &mut dyn Surface, vertices: I)
    where
        I: IntoIterator<Item = VertexId>,
    {
        for u in vertices {
            self.erase_vertex(surface, u);
        }
    }

    /// Strokes the segment between two located vertices, without touching the vertices.
    pub fn paint_edge(&self, surface: &mut dyn Surface, u: VertexId, v: VertexId, pen: Color32) {
        if let (Some(start), Some(end)) = (self.location(u), self.location(v)) {
            surface.set_style(Style::outline(pen));
            surface.draw_line(start, end);
        }
    }

    pub fn draw_edge(&self, surface: &mut dyn Surface, u: VertexId, v: VertexId) {
        self.draw_edges(surface, [(u, v)]);
    }

    pub fn erase_edge(&self, surface: &mut dyn Surface, u: VertexId, v: VertexId) {
        self.erase_edges(surface, [(u, v)]);
    }

    /// Draws the edges, then their endpoints on top.
    pub fn draw_edges<I>(&self, surface: &mut dyn Surface, edges: I)
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        let endpoints = self.stroke_edges(surface, edges, FOREGROUND);
        self.draw_vertices(surface, endpoints);
    }

    /// Erases the edges, then repaints their endpoints and whatever else the erased strokes ran
    /// over.
    pub fn erase_edges<I>(&self, surface: &mut dyn Surface, edges: I)
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        let edges = edges.into_iter().collect_vec();
        let erased = edges
            .iter()
            .filter_map(|&(u, v)| Some((self.segment(u, v)?, 1.0)))
            .collect_vec();
        self.stroke_edges(surface, edges.iter().copied(), BACKGROUND);
        let gone = edges.into_iter().map(edge_key).collect::<IndexSet<_>>();
        self.repaint_under(surface, &erased, |u, v| !gone.contains(&edge_key((u, v))));
    }

    fn stroke_edges<I>(
        &self,
        surface: &mut dyn Surface,
        edges: I,
        pen: Color32,
    ) -> IndexSet<VertexId>
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        let mut endpoints = IndexSet::new();
        for (u, v) in edges {
            self.paint_edge(surface, u, v, pen);
            endpoints.extend([u, v]);
        }
        endpoints
    }

    pub fn draw_vertex_edges(&self, surface: &mut dyn Surface, u: VertexId) {
        self.draw_edges(surface, self.graph.incident_edges(u));
        self.draw_vertex(surface, u);
    }

    /// Erases `u` and its incident edges, then repaints the rest of the graph they covered.
    pub fn erase_vertex_edges(&self, surface: &mut dyn Surface, u: VertexId) {
        let Some(at) = self.position(u) else {
            return;
        };
        let mut erased = self
            .graph
            .incident_edges(u)
            .filter_map(|(a, b)| Some((self.segment(a, b)?, 1.0)))
            .collect_vec();
        erased.push((Segment::new(at, at), f64::from(self.radius()) + 1.0));
        self.stroke_edges(surface, self.graph.incident_edges(u), BACKGROUND);
        self.erase_vertex(surface, u);
        let keep = |v: VertexId| v != u;
        self.repaint_under(surface, &erased, |a, b| keep(a) && keep(b));
    }

    /// Repaints the edges `keep` accepts that an erased mark reached, then the vertices it
    /// reached. Each mark is a segment with how far its paint spread from it. A vertex `u` is kept
    /// when `keep(u, u)` holds.
    fn repaint_under<F>(&self, surface: &mut dyn Surface, erased: &[(Segment, f64)], keep: F)
    where
        F: Fn(VertexId, VertexId) -> bool,
    {
        if erased.is_empty() {
            return;
        }
        let near = |segment: Segment, margin: f64| {
            erased
                .iter()
                .any(|&(mark, reach)| mark.separation(segment) <= reach + margin)
        };
        let edges = self
            .graph
            .edges()
            .filter(|&(u, v)| keep(u, v))
            .filter(|&(u, v)| self.segment(u, v).is_some_and(|segment| near(segment, 0.0)))
            .collect_vec();
        let mut vertices = self.stroke_edges(surface, edges, FOREGROUND);
        let radius = f64::from(self.radius());
        vertices.extend(
            self.positions
                .iter()
                .filter(|&(&u, _)| keep(u, u))
                .filter(|&(_, &at)| near(Segment::new(at, at), radius))
                .map(|(&u, _)| u),
        );
        self.draw_vertices(surface, vertices);
    }

    pub fn draw_graph(&self, surface: &mut dyn Surface) {
        self.stroke_edges(surface, self.graph.edges(), FOREGROUND);
        self.draw_vertices(surface, self.graph.vertices());
    }

    pub fn erase_graph(&self, surface: &mut dyn Surface) {
        self.stroke_edges(surface, self.graph.edges(), BACKGROUND);
        self.erase_vertices(surface, self.graph.vertices());
    }

    /// Surrounds `u` with a halo in the accent colour.
    pub fn draw_selected_vertex(&self, surface: &mut dyn Surface, u: VertexId) {
        if let Some(at) = self.location(u) {
            let r = self.radius() + self.selection_halo;
            surface.set_style(Style::filled(ACCENT));
            surface.draw_ellipse(at, r, r);
            self.draw_vertex(surface, u);
        }
    }

    pub fn erase_selected_vertex(&self, surface: &mut dyn Surface, u: VertexId) {
        if let Some(at) = self.location(u) {
            let r = self.radius() + self.selection_halo;
            surface.set_style(Style::ERASER);
            surface.draw_ellipse(at, r, r);
            self.redraw_near(surface, at, f64::from(r));
        }
    }

    pub fn draw_selected_vertices(&self, surface: &mut dyn Surface) {
        for &u in &self.selection {
            self.draw_selected_vertex(surface, u);
        }
    }

    pub fn erase_selected_vertices(&self, surface: &mut dyn Surface) {
        for &u in &self.selection {
            self.erase_selected_vertex(surface, u);
        }
    }

    /// Repaints every edge and vertex that reaches within `reach` pixels of `at`.
    pub fn redraw_near(&self, surface: &mut dyn Surface, at: Pixel, reach: f64) {
        let center = Point::from(at);
        let edges = self
            .graph
            .edges()
            .filter(|&(u, v)| {
                self.segment(u, v)
                    .is_some_and(|segment| segment.distance_to(center) <= reach + 1.0)
            })
            .collect_vec();
        self.stroke_edges(surface, edges, FOREGROUND);
        let vertex_reach = reach + f64::from(self.radius()) + 1.0;
        self.draw_vertices(
            surface,
            self.locations
                .iter()
                .filter(|(_, location)| location.distance(at) <= vertex_reach)
                .map(|(&u, _)| u),
        );
    }

    /// The vertex drawn nearest to `at`, if it is within the hit radius.
    ///
    /// Equally near vertices resolve to the one inserted first.
    #[must_use]
    pub fn vertex_at(&self, at: Pixel) -> Option<VertexId> {
        let reach = f64::from(self.radius()) + self.hit_tolerance;
        self.locations
            .iter()
            .map(|(&u, location)| (u, location.distance(at)))
            .filter(|&(_, distance)| distance <= reach)
            .min_by_key(|&(_, distance)| OrderedFloat(distance))
            .map(|(u, _)| u)
    }

    fn segment(&self, u: VertexId, v: VertexId) -> Option<Segment> {
        Some(Segment::new(self.position(u)?, self.position(v)?))
    }

    /// The candidate pairs whose segments `stroke` crosses, in candidate order.
    pub fn intersecting_edges<I>(&self, stroke: Segment, candidates: I) -> Vec<(VertexId, VertexId)>
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        candidates
            .into_iter()
            .filter(|&(u, v)| {
                self.segment(u, v)
                    .is_some_and(|segment| stroke.crosses(segment))
            })
            .collect()
    }

    /// Vertex pairs that are not edges, restricted to `filter` unless it is empty.
    #[must_use]
    pub fn non_edges(&self, filter: &IndexSet<VertexId>) -> Vec<(VertexId, VertexId)> {
        self.graph
            .vertices()
            .filter(|u| filter.is_empty() || filter.contains(u))
            .tuple_combinations()
            .filter(|&(u, v)| !self.graph.contains_edge(u, v))
            .collect()
    }

    /// Smallest key above every key in use.
    #[must_use]
    pub fn next_vertex(&self) -> VertexId {
        self.graph.vertices().max().map_or(0, |u| u + 1)
    }

    pub fn add_vertex_at(&mut self, surface: &mut dyn Surface, at: Pixel) -> VertexId {
        let u = self.next_vertex();
        self.graph.add_vertex(u);
        self.set_vertex_location(u, Point::from(at));
        debug!(vertex = u, %at, "placed vertex");
        self.draw_vertex(surface, u);
        u
    }

    pub fn set_vertex_location(&mut self, u: VertexId, at: Point) {
        self.positions.insert(u, at);
        self.locations.insert(u, at.floor());
    }

    /// Moves `u` to `at` and repaints it with its edges.
    pub fn relocate_vertex(&mut self, surface: &mut dyn Surface, u: VertexId, at: Pixel) {
        if !self.graph.contains_vertex(u) {
            return;
        }
        self.erase_vertex_edges(surface, u);
        self.set_vertex_location(u, Point::from(at));
        self.draw_vertex_edges(surface, u);
    }

    /// Removes `u` from the graph, its geometry and the selection. Returns `false` if there was
    /// no such vertex.
    ///
    /// # Errors
    ///
    /// Observer failures are returned after the vertex is gone.
    pub fn remove_vertex(
        &mut self,
        surface: &mut dyn Surface,
        u: VertexId,
    ) -> Result<bool, GraphError<VertexId>> {
        if !self.graph.contains_vertex(u) {
            return Ok(false);
        }
        if self.selection.contains(&u) {
            self.erase_selected_vertex(surface, u);
        }
        self.erase_vertex_edges(surface, u);
        self.selection.shift_remove(&u);
        self.positions.shift_remove(&u);
        self.locations.shift_remove(&u);
        self.graph.remove_vertex(u)?;
        Ok(true)
    }

    /// Adds the edges to the graph and draws them.
    ///
    /// # Errors
    ///
    /// Observer failures are returned after the edges are added and drawn.
    pub fn connect(
        &mut self,
        surface: &mut dyn Surface,
        edges: &[(VertexId, VertexId)],
    ) -> Result<(), GraphError<VertexId>> {
        let result = self.graph.add_edges_from(edges.iter().copied());
        let added = edges
            .iter()
            .copied()
            .filter(|&(u, v)| self.graph.contains_edge(u, v))
            .collect_vec();
        self.draw_edges(surface, added);
        result
    }

    /// Removes the edges from the graph and erases them.
    ///
    /// # Errors
    ///
    /// A missing edge aborts the whole batch; observer failures are returned after the edges are
    /// removed and erased.
    pub fn disconnect(
        &mut self,
        surface: &mut dyn Surface,
        edges: &[(VertexId, VertexId)],
    ) -> Result<(), GraphError<VertexId>> {
        let result = self.graph.remove_edges_from(edges.iter().copied());
        let removed = edges
            .iter()
            .copied()
            .filter(|&(u, v)| !self.graph.contains_edge(u, v))
            .collect_vec();
        self.erase_edges(surface, removed);
        result
    }

    /// Selects every vertex whose position lies in the convex hull of `lasso`.
    pub fn select_in_hull(&mut self, lasso: &[Pixel]) -> usize {
        let points = lasso.iter().copied().map(Point::from).collect_vec();
        let hull = convex_hull(&points);
        self.selection = self
            .positions
            .iter()
            .filter(|(_, position)| polygon_contains(&hull, **position))
            .map(|(&u, _)| u)
            .collect();
        debug!(selected = self.selection.len(), "lasso selection");
        self.selection.len()
    }

    pub fn select<I>(&mut self, vertices: I)
    where
        I: IntoIterator<Item = VertexId>,
    {
        self.selection = vertices
            .into_iter()
            .filter(|&u| self.graph.contains_vertex(u))
            .collect();
    }

    pub fn take_selection(&mut self) -> IndexSet<VertexId> {
        mem::take(&mut self.selection)
    }

    /// Paints a path's edges and vertices in `color`.
    pub fn draw_path(&self, surface: &mut dyn Surface, path: &[VertexId], color: Color32) {
        for (&u, &v) in path.iter().tuple_windows() {
            self.paint_edge(surface, u, v, color);
        }
        for &u in path {
            self.paint_vertex(surface, u, Style::filled(color));
        }
    }

    /// Restores a path drawn with [`Self::draw_path`] to the normal colours.
    pub fn restore_path(&self, surface: &mut dyn Surface, path: &[VertexId]) {
        self.draw_edges(
            surface,
            path.iter()
                .copied()
                .tuple_windows()
                .filter(|&(u, v)| self.graph.contains_edge(u, v)),
        );
        self.draw_vertices(surface, path.iter().copied());
    }

    /// Places the vertices row by row on a square grid inside `size`, `margin` pixels from its
    /// border.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn arrange_on_grid(&mut self, size: Vec2, margin: f64) {
        let count = self.graph.vertex_count();
        if count == 0 {
            return;
        }
        let columns = (count as f64).sqrt().ceil() as usize;
        let rows = count.div_ceil(columns);
        let step = |extent: f32, cells: usize| {
            (f64::from(extent) - 2.0 * margin).max(0.0) / (cells.max(2) - 1) as f64
        };
        let (dx, dy) = (step(size.x, columns), step(size.y, rows));
        let vertices = self.graph.vertices().collect_vec();
        for (i, u) in vertices.into_iter().enumerate() {
            let at = Point::new(
                margin + (i % columns) as f64 * dx,
                margin + (i / columns) as f64 * dy,
            );
            self.set_vertex_location(u, at);
        }
        debug!(count, columns, rows, "arranged vertices on a grid");
    }
}

impl ContentManager for GraphContent {
    fn draw(&self, surface: &mut dyn Surface) {
        self.draw_graph(surface);
    }

    fn erase(&self, surface: &mut dyn Surface) {
        self.erase_graph(surface);
    }

    fn on_zoom(&mut self, factor: f64, pivot: Point) {
        for (u, position) in &mut self.positions {
            *position = position.scale_about(pivot, factor);
            self.locations[u] = position.floor();
        }
        self.radius *= factor;
    }

    fn on_pan(&mut self, offset: Pixel) {
        for (u, location) in &mut self.locations {
            *location = *location + offset;
            self.positions[u] = self.positions[u] + Point::from(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use egui::Pos2;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::shape::{Shape, Shapes};

    struct Fixture {
        content: GraphContent,
        surface: Shapes,
    }

    /// A triangle of vertices 0, 1, 2 at (10, 10), (50, 50), (90, 10), without edges.
    #[fixture]
    fn triangle() -> Fixture {
        let mut surface = Shapes::new(Vec2::new(200.0, 200.0));
        let mut content = GraphContent::new(&CanvasConfig::default());
        for (x, y) in [(10, 10), (50, 50), (90, 10)] {
            content.add_vertex_at(&mut surface, Pixel::new(x, y));
        }
        Fixture { content, surface }
    }

    /// Vertices 0 and 1 across, 2 and 3 down, joined so that the two edges cross at (100, 100).
    fn cross() -> Fixture {
        let mut surface = Shapes::new(Vec2::new(300.0, 300.0));
        let mut content = GraphContent::new(&CanvasConfig::default());
        for (x, y) in [(10, 100), (190, 100), (100, 10), (100, 190)] {
            content.add_vertex_at(&mut surface, Pixel::new(x, y));
        }
        content.connect(&mut surface, &[(0, 1), (2, 3)]).unwrap();
        surface.shapes.clear();
        Fixture { content, surface }
    }

    fn line_index(
        surface: &Shapes,
        (x1, y1): (f32, f32),
        (x2, y2): (f32, f32),
        colour: Color32,
    ) -> Option<usize> {
        surface.iter().position(|shape| {
            matches!(
                shape,
                Shape::Line { start, end, pen }
                    if *pen == colour && *start == Pos2::new(x1, y1) && *end == Pos2::new(x2, y2)
            )
        })
    }

    #[test]
    fn erasing_an_edge_repaints_what_it_crossed() {
        let Fixture {
            content,
            mut surface,
        } = cross();
        content.erase_edge(&mut surface, 0, 1);

        let erased = line_index(&surface, (10.0, 100.0), (190.0, 100.0), BACKGROUND);
        let repaired = line_index(&surface, (100.0, 10.0), (100.0, 190.0), FOREGROUND);
        assert_eq!(erased, Some(0));
        assert_eq!(repaired, Some(1));
        assert_eq!(
            line_index(&surface, (10.0, 100.0), (190.0, 100.0), FOREGROUND),
            None
        );
    }

    #[test]
    fn moving_a_vertex_repaints_what_its_edges_covered() {
        let Fixture {
            mut content,
            mut surface,
        } = cross();
        content.relocate_vertex(&mut surface, 0, Pixel::new(10, 250));

        let erased = line_index(&surface, (10.0, 100.0), (190.0, 100.0), BACKGROUND);
        let repaired = line_index(&surface, (100.0, 10.0), (100.0, 190.0), FOREGROUND);
        let moved = line_index(&surface, (10.0, 250.0), (190.0, 100.0), FOREGROUND);
        assert!(erased.is_some());
        assert!(repaired > erased);
        assert!(moved > repaired);
    }

    #[test]
    fn keys_count_up_from_zero() {
        let mut surface = Shapes::default();
        let mut content = GraphContent::new(&CanvasConfig::default());
        assert_eq!(content.next_vertex(), 0);
        content.add_vertex_at(&mut surface, Pixel::new(0, 0));
        content.add_vertex_at(&mut surface, Pixel::new(20, 0));
        content.remove_vertex(&mut surface, 0).unwrap();
        assert_eq!(content.next_vertex(), 2);
    }

    #[rstest]
    #[case(Pixel::new(10, 10), Some(0))]
    #[case(Pixel::new(20, 10), Some(0))]
    #[case(Pixel::new(21, 10), None)]
    #[case(Pixel::new(57, 57), Some(1))]
    #[case(Pixel::new(50, 30), None)]
    fn hit_testing(triangle: Fixture, #[case] at: Pixel, #[case] expected: Option<VertexId>) {
        assert_eq!(triangle.content.vertex_at(at), expected);
    }

    #[test]
    fn hit_ties_go_to_the_older_vertex() {
        let mut surface = Shapes::default();
        let mut content = GraphContent::new(&CanvasConfig::default());
        content.add_vertex_at(&mut surface, Pixel::new(0, 0));
        content.add_vertex_at(&mut surface, Pixel::new(8, 0));
        assert_eq!(content.vertex_at(Pixel::new(4, 0)), Some(0));
        assert_eq!(content.vertex_at(Pixel::new(5, 0)), Some(1));
    }

    #[rstest]
    fn non_edges_respect_filter(mut triangle: Fixture) {
        let Fixture { content, surface } = &mut triangle;
        content.connect(surface, &[(0, 1)]).unwrap();

        assert_eq!(content.non_edges(&IndexSet::new()), vec![(0, 2), (1, 2)]);
        assert_eq!(content.non_edges(&IndexSet::from([2, 0])), vec![(0, 2)]);
    }

    #[rstest]
    fn stroke_along_the_base_picks_the_base(triangle: Fixture) {
        let stroke = Segment::new(Point::new(10.0, 10.0), Point::new(90.0, 10.0));
        let candidates = triangle.content.non_edges(&IndexSet::new());
        assert_eq!(
            triangle.content.intersecting_edges(stroke, candidates),
            vec![(0, 2)]
        );
    }

    #[rstest]
    fn zoom_round_trip_restores_positions(mut triangle: Fixture) {
        let before = triangle.content.positions.clone();
        let pivot = Point::new(33.0, 71.0);

        triangle.content.on_zoom(1.1, pivot);
        assert_eq!(triangle.content.radius(), 5);
        triangle.content.on_zoom(1.0 / 1.1, pivot);

        for (u, position) in &before {
            assert!(triangle.content.positions[u].distance(*position) < 1e-9);
        }
    }

    #[rstest]
    fn radius_has_a_floor(mut triangle: Fixture) {
        triangle.content.on_zoom(0.5, Point::default());
        assert_eq!(triangle.content.radius(), 3);
        triangle.content.on_zoom(8.0, Point::default());
        assert_eq!(triangle.content.radius(), 20);
    }

    #[rstest]
    fn pan_moves_both_maps(mut triangle: Fixture) {
        triangle.content.on_pan(Pixel::new(5, -3));
        assert_eq!(triangle.content.location(1), Some(Pixel::new(55, 47)));
        assert_eq!(triangle.content.position(1), Some(Point::new(55.0, 47.0)));
    }

    #[rstest]
    fn removing_a_vertex_drops_everything_about_it(mut triangle: Fixture) {
        let Fixture { content, surface } = &mut triangle;
        let removed = Rc::new(RefCell::new(Vec::new()));
        let log = removed.clone();
        content.observers_mut().register_edge_removed_callback(move |u, v| {
            log.borrow_mut().push((u, v));
            Ok(())
        });
        content.connect(surface, &[(0, 1), (1, 2)]).unwrap();
        content.select([1, 2]);

        assert!(content.remove_vertex(surface, 1).unwrap());
        assert!(!content.remove_vertex(surface, 1).unwrap());

        assert_eq!(content.location(1), None);
        assert_eq!(content.position(1), None);
        assert_eq!(content.selection(), &IndexSet::from([2]));
        assert_eq!(*removed.borrow(), vec![(1, 0), (1, 2)]);
    }

    #[rstest]
    fn lasso_selects_enclosed_vertices(mut triangle: Fixture) {
        let lasso = [
            Pixel::new(0, 0),
            Pixel::new(60, 0),
            Pixel::new(60, 60),
            Pixel::new(0, 60),
        ];
        assert_eq!(triangle.content.select_in_hull(&lasso), 2);
        assert_eq!(triangle.content.selection(), &IndexSet::from([0, 1]));
    }

    #[rstest]
    fn grid_layout_fills_rows(mut triangle: Fixture) {
        triangle.content.arrange_on_grid(Vec2::new(140.0, 140.0), 20.0);
        insta::assert_compact_debug_snapshot!(
            triangle.content.locations,
            @"{0: Pixel { x: 20, y: 20 }, 1: Pixel { x: 120, y: 20 }, 2: Pixel { x: 20, y: 120 }}"
        );
    }

    #[rstest]
    fn draw_path_uses_the_colour(triangle: Fixture) {
        let Fixture {
            content,
            mut surface,
        } = triangle;
        surface.shapes.clear();
        content.draw_path(&mut surface, &[0, 2], Color32::RED);
        assert!(matches!(
            surface.shapes[0],
            Shape::Line { pen, .. } if pen == Color32::RED
        ));
        assert_eq!(surface.len(), 3);
    }
}
