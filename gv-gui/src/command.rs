//! The command bar language.
//!
//! A command line is split on whitespace and parsed by clap into a [`Command`], which is then
//! run against the [`Workspace`].

use std::{fs, path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use egui::Color32;
use gv_core::{
    GraphError,
    algorithms::AlgorithmError,
    stretch::{DEFAULT_BAD_PAIR_THRESHOLD, StretchError},
};
use gv_graphics::{
    Canvas, CanvasId, InteractionError, Mode, VertexId,
    surface::{ACCENT, ALERT, parse_color},
};
use thiserror::Error;
use tracing::debug;

use crate::workspace::Workspace;

/// Margin kept free around a grid layout.
const LAYOUT_MARGIN: f64 = 20.0;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid argument: {0}")]
    BadArgument(String),
    #[error("prerequisites not met: {0}")]
    Prerequisites(String),
    #[error(transparent)]
    Graph(#[from] GraphError<VertexId>),
    #[error(transparent)]
    Algorithm(#[from] AlgorithmError<VertexId>),
    #[error(transparent)]
    Stretch(#[from] StretchError<VertexId>),
    #[error(transparent)]
    Interaction(#[from] InteractionError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_help_subcommand = true)]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, PartialEq, Subcommand)]
pub enum Command {
    /// Click to place vertices
    DrawVertices,
    /// Drag between vertices to join them
    DrawEdges,
    /// Drag vertices around
    MoveVertices,
    /// Drag across edges to remove them, click a vertex to remove it
    EraseGraph,
    /// Lasso vertices to restrict edge drawing to them
    SelectVertices,
    /// Drag to move the view
    DragView,
    /// Lay out a grid of cells and edit it
    DrawGrid { rows: usize, columns: usize },
    /// Click grid cells to fill them
    EditGrid,
    /// Draw freehand over the canvas
    Annotate,
    /// Colour of new annotations
    SetColor {
        #[arg(value_parser = parse_color)]
        color: Color32,
    },
    /// Animate a breadth-first search
    RunBfs {
        /// Start vertex, the oldest vertex by default
        #[arg(long)]
        source: Option<VertexId>,
        /// Milliseconds between two steps
        #[arg(long)]
        step_ms: Option<u64>,
    },
    /// Stop the running search
    Cancel,
    /// Highlight a shortest path
    ShortestPath { source: VertexId, target: VertexId },
    /// Measure how much the other canvases stretch the first one
    CalcStretch {
        #[arg(long, default_value_t = DEFAULT_BAD_PAIR_THRESHOLD)]
        threshold: f64,
    },
    /// Highlight the next pair stretched beyond the threshold
    NextBadPair,
    /// Save the active canvas as an SVG file
    ExportSvg { path: PathBuf },
    /// Place the vertices on a regular grid
    LayoutGrid,
    /// Remove everything from the active canvas
    Clear,
    /// Open an empty canvas
    NewCanvas,
    /// Copy a canvas, the active one by default
    Duplicate { id: Option<usize> },
    /// Switch to another canvas
    SetActive { id: usize },
}

impl Command {
    /// # Errors
    ///
    /// Fails with [`CommandError::BadArgument`] on anything clap rejects.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        CommandLine::try_parse_from(line.split_whitespace())
            .map(|line| line.command)
            .map_err(|err| CommandError::BadArgument(err.render().to_string().trim().to_owned()))
    }

    /// The interaction mode this command switches to, if it only does that.
    #[must_use]
    pub const fn mode(&self) -> Option<Mode> {
        match self {
            Self::DrawVertices => Some(Mode::PaintVertices),
            Self::DrawEdges => Some(Mode::PaintEdges),
            Self::MoveVertices => Some(Mode::MoveVertices),
            Self::EraseGraph => Some(Mode::DeleteEdges),
            Self::SelectVertices => Some(Mode::SelectVertices),
            Self::DragView => Some(Mode::DragView),
            Self::Annotate => Some(Mode::Annotate),
            _ => None,
        }
    }

    /// Runs the command. Returns a message worth showing, if any.
    ///
    /// # Errors
    ///
    /// Unmet preconditions and unknown canvases are reported before anything changes; graph and
    /// algorithm failures are passed through.
    pub fn run(self, workspace: &mut Workspace) -> Result<Option<String>, CommandError> {
        debug!(command = ?self, "running command");
        if let Some(mode) = self.mode() {
            active(workspace)?.set_mode(mode);
            return Ok(None);
        }

        match self {
            Self::DrawGrid { rows, columns } => {
                if rows == 0 || columns == 0 {
                    return Err(CommandError::BadArgument(
                        "a grid needs at least one row and one column".to_owned(),
                    ));
                }
                let canvas = active(workspace)?;
                canvas.draw_grid(rows, columns);
                canvas.set_mode(Mode::EditGrid);
            }
            Self::EditGrid => {
                let canvas = active(workspace)?;
                if canvas.contents().grid.is_none() {
                    return Err(CommandError::Prerequisites(
                        "there is no grid to edit, use draw-grid first".to_owned(),
                    ));
                }
                canvas.set_mode(Mode::EditGrid);
            }
            Self::SetColor { color } => active(workspace)?.set_annotation_color(color),
            Self::RunBfs { source, step_ms } => {
                let canvas = active(workspace)?;
                let graph = canvas.graph().graph();
                let source = match source {
                    Some(source) if graph.contains_vertex(source) => source,
                    Some(source) => {
                        return Err(CommandError::Prerequisites(format!(
                            "vertex {source} is not on the canvas"
                        )));
                    }
                    None => graph.vertices().next().ok_or_else(|| {
                        CommandError::Prerequisites("the canvas has no vertices".to_owned())
                    })?,
                };
                let id = canvas.id();
                if let Some(step_ms) = step_ms {
                    workspace.step = Duration::from_millis(step_ms);
                }
                workspace.start_bfs(id, source)?;
            }
            Self::Cancel => {
                workspace.cancel_bfs();
                workspace.clear_highlight();
            }
            Self::ShortestPath { source, target } => {
                let canvas = active(workspace)?;
                for u in [source, target] {
                    if !canvas.graph().graph().contains_vertex(u) {
                        return Err(CommandError::Prerequisites(format!(
                            "vertex {u} is not on the canvas"
                        )));
                    }
                }
                let id = canvas.id();
                workspace.clear_highlight();
                let path = workspace.highlight_path(id, source, target, ACCENT)?;
                return Ok(Some(format!(
                    "path of length {}",
                    path.len().saturating_sub(1)
                )));
            }
            Self::CalcStretch { threshold } => {
                if workspace.canvases().count() < 2 {
                    return Err(CommandError::Prerequisites(
                        "stretch needs a base canvas and at least one cover canvas".to_owned(),
                    ));
                }
                let report = workspace.measure_stretch(threshold)?;
                return Ok(Some(format!(
                    "distortion {:.3}, {} bad pairs",
                    report.distortion,
                    report.bad_pairs.len()
                )));
            }
            Self::NextBadPair => {
                if workspace.stretch().report().is_none() {
                    return Err(CommandError::Prerequisites(
                        "no stretch measured, use calc-stretch first".to_owned(),
                    ));
                }
                workspace.clear_highlight();
                let Some((source, target)) = workspace.next_bad_pair() else {
                    return Ok(Some("no bad pairs".to_owned()));
                };
                let ids = workspace.canvases().map(|canvas| canvas.id()).collect::<Vec<_>>();
                for id in ids {
                    match workspace.highlight_path(id, source, target, ALERT) {
                        // Covers need not contain the pair or connect it.
                        Ok(_)
                        | Err(
                            AlgorithmError::NoPath(..)
                            | AlgorithmError::SourceNotFound(_)
                            | AlgorithmError::TargetNotFound(_),
                        ) => {}
                        Err(err) => return Err(err.into()),
                    }
                }
                return Ok(Some(format!("bad pair ({source}, {target})")));
            }
            Self::ExportSvg { path } => {
                let document = active(workspace)?.surface().to_svg();
                fs::write(&path, document.to_string())?;
                return Ok(Some(format!("saved {}", path.display())));
            }
            Self::LayoutGrid => active(workspace)?.arrange_on_grid(LAYOUT_MARGIN),
            Self::Clear => {
                workspace.cancel_bfs();
                workspace.clear_highlight();
                active(workspace)?.clear()?;
            }
            Self::NewCanvas => {
                workspace.new_canvas();
            }
            Self::Duplicate { id } => {
                let id = match id {
                    Some(id) => CanvasId(id),
                    None => active(workspace)?.id(),
                };
                workspace
                    .duplicate(id)
                    .ok_or_else(|| CommandError::BadArgument(format!("no canvas {id}")))?;
            }
            Self::SetActive { id } => {
                if !workspace.set_active(CanvasId(id)) {
                    return Err(CommandError::BadArgument(format!("no canvas {id}")));
                }
            }
            Self::DrawVertices
            | Self::DrawEdges
            | Self::MoveVertices
            | Self::EraseGraph
            | Self::SelectVertices
            | Self::DragView
            | Self::Annotate => {}
        }
        Ok(None)
    }
}

fn active(workspace: &mut Workspace) -> Result<&mut Canvas, CommandError> {
    workspace
        .active_mut()
        .ok_or_else(|| CommandError::Prerequisites("there is no active canvas".to_owned()))
}
