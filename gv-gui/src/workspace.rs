//! All canvases of a window and the state shared between them.

use std::{cell::Cell, rc::Rc, time::Duration};

use derivative::Derivative;
use egui::Color32;
use gv_core::{
    algorithms::{AlgorithmError, shortest_path},
    stretch::{DEFAULT_BAD_PAIR_THRESHOLD, StretchError, StretchReport, tree_cover_stretch},
};
use gv_graphics::{
    Canvas, CanvasConfig, CanvasId, VertexId,
    animation::{Progress, TraversalAnimation},
};
use indexmap::IndexMap;
use tracing::{debug, warn};
use web_time::Instant;

/// Distortion of the other canvases' graphs, as covers of the first canvas's graph.
#[derive(Derivative)]
#[derivative(Debug, Default)]
pub struct StretchTracker {
    #[derivative(Default(value = "DEFAULT_BAD_PAIR_THRESHOLD"))]
    threshold: f64,
    /// Recompute whenever an edge changes, once measured.
    tracking: bool,
    /// Set by the edge observers of every canvas.
    dirty: Rc<Cell<bool>>,
    report: Option<StretchReport<VertexId>>,
    next_bad_pair: usize,
}

impl StretchTracker {
    #[must_use]
    pub const fn report(&self) -> Option<&StretchReport<VertexId>> {
        self.report.as_ref()
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    fn watch(&self, canvas: &mut Canvas) {
        let added = Rc::clone(&self.dirty);
        let removed = Rc::clone(&self.dirty);
        canvas.with_graph(|graph, _| {
            let observers = graph.observers_mut();
            observers.register_edge_added_callback(move |_, _| {
                added.set(true);
                Ok(())
            });
            observers.register_edge_removed_callback(move |_, _| {
                removed.set(true);
                Ok(())
            });
        });
    }
}

/// The canvases of one window, which one is active, and what runs across them.
#[derive(Debug)]
pub struct Workspace {
    canvases: IndexMap<CanvasId, Canvas>,
    active: Option<CanvasId>,
    config: CanvasConfig,
    /// Interval between two BFS animation steps.
    pub step: Duration,
    animation: Option<(CanvasId, TraversalAnimation)>,
    stretch: StretchTracker,
    /// Paths currently painted over their canvases.
    highlighted: Vec<(CanvasId, Vec<VertexId>)>,
}

impl Workspace {
    /// A workspace with a single, active canvas.
    #[must_use]
    pub fn new(config: CanvasConfig, step: Duration) -> Self {
        let mut workspace = Self {
            canvases: IndexMap::new(),
            active: None,
            config,
            step,
            animation: None,
            stretch: StretchTracker::default(),
            highlighted: Vec::new(),
        };
        workspace.new_canvas();
        workspace
    }

    #[must_use]
    pub const fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn canvases(&self) -> impl Iterator<Item = &Canvas> {
        self.canvases.values()
    }

    #[must_use]
    pub fn canvas(&self, id: CanvasId) -> Option<&Canvas> {
        self.canvases.get(&id)
    }

    pub fn canvas_mut(&mut self, id: CanvasId) -> Option<&mut Canvas> {
        self.canvases.get_mut(&id)
    }

    #[must_use]
    pub const fn active_id(&self) -> Option<CanvasId> {
        self.active
    }

    #[must_use]
    pub fn active(&self) -> Option<&Canvas> {
        self.canvases.get(&self.active?)
    }

    pub fn active_mut(&mut self) -> Option<&mut Canvas> {
        let id = self.active?;
        self.canvases.get_mut(&id)
    }

    #[must_use]
    pub const fn stretch(&self) -> &StretchTracker {
        &self.stretch
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    fn next_id(&self) -> CanvasId {
        self.canvases
            .keys()
            .max()
            .map_or(CanvasId(0), |id| CanvasId(id.0 + 1))
    }

    fn insert(&mut self, mut canvas: Canvas) -> CanvasId {
        let id = canvas.id();
        self.stretch.watch(&mut canvas);
        self.canvases.insert(id, canvas);
        self.active = Some(id);
        self.stretch.dirty.set(true);
        debug!(canvas = %id, count = self.canvases.len(), "added canvas");
        id
    }

    /// Adds an empty canvas and makes it active.
    pub fn new_canvas(&mut self) -> CanvasId {
        let canvas = Canvas::new(self.next_id(), self.config.clone());
        self.insert(canvas)
    }

    /// Copies canvas `id` into a new active canvas. Returns `None` if there is no such canvas.
    pub fn duplicate(&mut self, id: CanvasId) -> Option<CanvasId> {
        let copy = self.canvases.get(&id)?.duplicate(self.next_id());
        Some(self.insert(copy))
    }

    /// Returns `false` if there is no canvas `id`.
    pub fn set_active(&mut self, id: CanvasId) -> bool {
        if self.canvases.contains_key(&id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    /// Starts animating a breadth-first search on canvas `id`, cancelling any running one.
    ///
    /// # Errors
    ///
    /// Fails if `source` is not a vertex of the canvas.
    pub fn start_bfs(
        &mut self,
        id: CanvasId,
        source: VertexId,
    ) -> Result<(), AlgorithmError<VertexId>> {
        self.cancel_bfs();
        let Some(canvas) = self.canvases.get(&id) else {
            return Ok(());
        };
        let animation = TraversalAnimation::start(canvas, source, self.step)?;
        self.animation = Some((id, animation));
        Ok(())
    }

    /// Returns `false` if no search was running.
    pub fn cancel_bfs(&mut self) -> bool {
        let Some((id, animation)) = self.animation.take() else {
            return false;
        };
        if let Some(canvas) = self.canvases.get_mut(&id) {
            animation.cancel(canvas);
        }
        true
    }

    /// Advances the running search if its step interval has passed.
    ///
    /// # Errors
    ///
    /// A failing step ends the search.
    pub fn tick(&mut self, now: Instant) -> Result<(), AlgorithmError<VertexId>> {
        let Some((id, mut animation)) = self.animation.take() else {
            return Ok(());
        };
        let Some(canvas) = self.canvases.get_mut(&id) else {
            return Ok(());
        };
        if animation.tick(canvas, now)? == Progress::Running {
            self.animation = Some((id, animation));
        }
        Ok(())
    }

    /// Restores every highlighted path to the normal colours.
    pub fn clear_highlight(&mut self) {
        for (id, path) in self.highlighted.drain(..) {
            if let Some(canvas) = self.canvases.get_mut(&id) {
                canvas.with_graph(|graph, surface| graph.restore_path(surface, &path));
            }
        }
    }

    /// Paints a shortest path from `source` to `target` on canvas `id`.
    ///
    /// # Errors
    ///
    /// Fails if either vertex is missing or they are not connected.
    pub fn highlight_path(
        &mut self,
        id: CanvasId,
        source: VertexId,
        target: VertexId,
        color: Color32,
    ) -> Result<Vec<VertexId>, AlgorithmError<VertexId>> {
        let Some(canvas) = self.canvases.get_mut(&id) else {
            return Ok(Vec::new());
        };
        let path = shortest_path(canvas.graph().graph(), source, target)?;
        canvas.with_graph(|graph, surface| graph.draw_path(surface, &path, color));
        self.highlighted.push((id, path.clone()));
        Ok(path)
    }

    /// Measures the stretch of the covers against the base canvas and keeps it up to date from
    /// then on.
    ///
    /// # Errors
    ///
    /// Fails if there is no cover canvas.
    pub fn measure_stretch(
        &mut self,
        threshold: f64,
    ) -> Result<&StretchReport<VertexId>, StretchError<VertexId>> {
        self.stretch.threshold = threshold;
        self.stretch.tracking = true;
        self.stretch.next_bad_pair = 0;
        self.stretch.dirty.set(false);
        let mut graphs = self.canvases.values().map(|canvas| canvas.graph().graph());
        let base = graphs.next().ok_or(StretchError::NoCovers)?;
        let covers = graphs.collect::<Vec<_>>();
        let report = tree_cover_stretch(base, &covers, threshold)?;
        Ok(self.stretch.report.insert(report))
    }

    /// The next pair stretched beyond the threshold, cycling through them.
    pub fn next_bad_pair(&mut self) -> Option<(VertexId, VertexId)> {
        let report = self.stretch.report.as_ref()?;
        if report.bad_pairs.is_empty() {
            return None;
        }
        let pair = report.bad_pairs[self.stretch.next_bad_pair % report.bad_pairs.len()];
        self.stretch.next_bad_pair += 1;
        Some((pair.source, pair.target))
    }

    /// Re-measures the stretch if it is tracked and some edge changed since the last time.
    /// Called once per handled event.
    pub fn refresh(&mut self) {
        if !self.stretch.tracking || !self.stretch.dirty.replace(false) {
            return;
        }
        let threshold = self.stretch.threshold;
        let next = self.stretch.next_bad_pair;
        match self.measure_stretch(threshold) {
            Ok(report) => debug!(distortion = report.distortion, "stretch updated"),
            Err(err) => {
                warn!(%err, "stretch is no longer measurable");
                self.stretch.tracking = false;
                self.stretch.report = None;
            }
        }
        self.stretch.next_bad_pair = next;
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(CanvasConfig::default(), Duration::from_millis(500))
    }
}
