use std::{cell::RefCell, collections::HashSet, rc::Rc, time::Duration};

use derivative::Derivative;
use gv_core::algorithms::AlgorithmError;
use petgraph::visit::Bfs;
use tracing::{debug, trace};
use web_time::Instant;

use crate::{
    canvas::Canvas,
    content::VertexId,
    surface::{ACCENT, Style, Surface},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Running,
    Finished,
}

/// Breadth-first search played out on a canvas, one vertex per step.
///
/// The vertex being expanded and the edges scanned from it are painted in the accent colour;
/// the previous step is restored before the next one is painted. Neighbour scans are observed
/// through a traversal callback on the canvas graph.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct TraversalAnimation {
    source: VertexId,
    #[derivative(Debug = "ignore")]
    bfs: Bfs<VertexId, HashSet<VertexId>>,
    scanned: Rc<RefCell<Vec<VertexId>>>,
    visited: Vec<VertexId>,
    current: Option<VertexId>,
    edges: Vec<(VertexId, VertexId)>,
    step: Duration,
    last_step: Option<Instant>,
}

impl TraversalAnimation {
    /// Prepares a search from `source`. Nothing is painted until the first step.
    ///
    /// # Errors
    ///
    /// Fails if `source` is not a vertex of the canvas graph.
    pub fn start<S: Surface>(
        canvas: &Canvas<S>,
        source: VertexId,
        step: Duration,
    ) -> Result<Self, AlgorithmError<VertexId>> {
        let graph = canvas.graph().graph();
        if !graph.contains_vertex(source) {
            return Err(AlgorithmError::SourceNotFound(source));
        }
        let scanned = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&scanned);
        graph.register_node_traversal_callback(move |u| {
            log.borrow_mut().push(u);
            Ok(())
        });
        debug!(canvas = %canvas.id(), source, "starting bfs animation");
        Ok(Self {
            source,
            bfs: Bfs::new(graph, source),
            scanned,
            visited: Vec::new(),
            current: None,
            edges: Vec::new(),
            step,
            last_step: None,
        })
    }

    #[must_use]
    pub const fn source(&self) -> VertexId {
        self.source
    }

    /// Vertices expanded so far, in order.
    #[must_use]
    pub fn visited(&self) -> &[VertexId] {
        &self.visited
    }

    /// Steps once if the step interval has passed since the last step.
    ///
    /// # Errors
    ///
    /// See [`Self::step`].
    pub fn tick<S: Surface>(
        &mut self,
        canvas: &mut Canvas<S>,
        now: Instant,
    ) -> Result<Progress, AlgorithmError<VertexId>> {
        if self
            .last_step
            .is_some_and(|last| now.duration_since(last) < self.step)
        {
            return Ok(Progress::Running);
        }
        self.last_step = Some(now);
        self.step(canvas)
    }

    /// Expands the next vertex and paints it with the edges it was reached through.
    ///
    /// # Errors
    ///
    /// A failing traversal observer ends the animation with its error.
    pub fn step<S: Surface>(
        &mut self,
        canvas: &mut Canvas<S>,
    ) -> Result<Progress, AlgorithmError<VertexId>> {
        self.restore(canvas);
        // Other walks of the graph between steps log into the same list.
        self.scanned.borrow_mut().clear();
        let next = self.bfs.next(canvas.graph().graph());
        if let Some(fault) = canvas.graph().graph().take_traversal_fault() {
            self.finish(canvas);
            return Err(fault.into());
        }
        let Some(u) = next else {
            self.finish(canvas);
            return Ok(Progress::Finished);
        };

        let scanned = std::mem::take(&mut *self.scanned.borrow_mut());
        let graph = canvas.graph().graph();
        self.edges = scanned
            .into_iter()
            .filter(|&v| v != u && graph.contains_edge(u, v))
            .map(|v| (u, v))
            .collect();
        self.current = Some(u);
        self.visited.push(u);
        trace!(vertex = u, scanned = self.edges.len(), "bfs step");

        let edges = &self.edges;
        canvas.with_graph(|graph, surface| {
            for &(u, v) in edges {
                graph.paint_edge(surface, u, v, ACCENT);
            }
            graph.paint_vertex(surface, u, Style::filled(ACCENT));
        });
        Ok(Progress::Running)
    }

    /// Stops the search and restores the canvas.
    pub fn cancel<S: Surface>(mut self, canvas: &mut Canvas<S>) {
        debug!(source = self.source, visited = self.visited.len(), "bfs cancelled");
        self.restore(canvas);
        self.finish(canvas);
    }

    fn restore<S: Surface>(&mut self, canvas: &mut Canvas<S>) {
        let edges = std::mem::take(&mut self.edges);
        let current = self.current.take();
        canvas.with_graph(|graph, surface| {
            for (u, v) in edges {
                if graph.graph().contains_edge(u, v) {
                    graph.draw_edge(surface, u, v);
                }
            }
            if let Some(u) = current {
                graph.draw_vertex(surface, u);
            }
        });
    }

    fn finish<S: Surface>(&mut self, canvas: &Canvas<S>) {
        canvas.graph().graph().clear_node_traversal_callbacks();
        self.bfs.stack.clear();
        debug!(source = self.source, visited = self.visited.len(), "bfs finished");
    }
}

#[cfg(test)]
mod tests {
    use egui::PointerButton;
    use gv_core::{algorithms::shortest_path, geometry::Pixel};

    use super::*;
    use crate::{
        canvas::CanvasId,
        config::CanvasConfig,
        shape::{Shape, Shapes},
    };

    /// A path 0 - 1 - 2 with a pendant 3 on 0.
    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(CanvasId(0), CanvasConfig::default());
        for x in [10, 50, 90, 130] {
            let at = Pixel::new(x, 10);
            canvas.on_press(PointerButton::Primary, at).unwrap();
            canvas.on_release(PointerButton::Primary, at).unwrap();
        }
        canvas
            .with_graph(|graph, surface| graph.connect(surface, &[(0, 1), (1, 2), (0, 3)]))
            .unwrap();
        canvas
    }

    fn accents(canvas: &Canvas<Shapes>) -> usize {
        canvas
            .surface()
            .iter()
            .filter(|shape| match shape {
                Shape::Line { pen, .. } => *pen == ACCENT,
                Shape::Ellipse { style, .. } => style.pen == ACCENT,
                _ => false,
            })
            .count()
    }

    #[test]
    fn steps_follow_breadth_first_order() {
        let mut canvas = canvas();
        let mut animation = TraversalAnimation::start(&canvas, 0, Duration::ZERO).unwrap();
        assert_eq!(canvas.graph().graph().node_traversal_callback_count(), 1);

        let mut steps = 0;
        while animation.step(&mut canvas).unwrap() == Progress::Running {
            steps += 1;
        }
        assert_eq!(steps, 4);
        assert_eq!(animation.visited(), &[0, 1, 3, 2]);
        assert_eq!(canvas.graph().graph().node_traversal_callback_count(), 0);
    }

    #[test]
    fn current_step_is_highlighted() {
        let mut canvas = canvas();
        let mut animation = TraversalAnimation::start(&canvas, 0, Duration::ZERO).unwrap();
        animation.step(&mut canvas).unwrap();
        assert_eq!(animation.edges, vec![(0, 1), (0, 3)]);
        let painted = accents(&canvas);
        assert_eq!(painted, 3);

        animation.cancel(&mut canvas);
        assert_eq!(canvas.graph().graph().node_traversal_callback_count(), 0);
        canvas.redraw();
        assert_eq!(accents(&canvas), 0);
    }

    #[test]
    fn walks_between_steps_are_not_painted() {
        let mut canvas = canvas();
        let mut animation = TraversalAnimation::start(&canvas, 0, Duration::ZERO).unwrap();
        let path = shortest_path(canvas.graph().graph(), 0, 2).unwrap();
        assert_eq!(path, vec![0, 1, 2]);

        animation.step(&mut canvas).unwrap();
        assert_eq!(animation.edges, vec![(0, 1), (0, 3)]);
        assert_eq!(accents(&canvas), 3);

        shortest_path(canvas.graph().graph(), 3, 2).unwrap();
        animation.step(&mut canvas).unwrap();
        assert_eq!(animation.current, Some(1));
        assert_eq!(animation.edges, vec![(1, 0), (1, 2)]);
    }

    #[test]
    fn ticks_wait_for_the_interval() {
        let mut canvas = canvas();
        let mut animation =
            TraversalAnimation::start(&canvas, 0, Duration::from_millis(100)).unwrap();
        let start = Instant::now();
        animation.tick(&mut canvas, start).unwrap();
        animation.tick(&mut canvas, start + Duration::from_millis(50)).unwrap();
        assert_eq!(animation.visited(), &[0]);
        animation.tick(&mut canvas, start + Duration::from_millis(150)).unwrap();
        assert_eq!(animation.visited(), &[0, 1]);
    }

    #[test]
    fn missing_source_is_rejected() {
        let canvas = canvas();
        assert_eq!(
            TraversalAnimation::start(&canvas, 7, Duration::ZERO).unwrap_err(),
            AlgorithmError::SourceNotFound(7)
        );
        assert_eq!(canvas.graph().graph().node_traversal_callback_count(), 0);
    }
}
