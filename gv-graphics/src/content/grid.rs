use egui::{Align2, Color32, Pos2, Rect, Vec2};
use gv_core::geometry::{Pixel, Point};
use itertools::Itertools;
use tracing::debug;

use super::ContentManager;
use crate::surface::{BACKGROUND, FOREGROUND, GHOST, Style, Surface};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Filled,
    /// Empty, but under the pointer.
    Hover,
}

impl Cell {
    const fn style(self) -> Style {
        match self {
            Self::Empty => Style {
                pen: FOREGROUND,
                brush: Some(BACKGROUND),
            },
            Self::Filled => Style::filled(FOREGROUND),
            Self::Hover => Style {
                pen: FOREGROUND,
                brush: Some(GHOST),
            },
        }
    }

    const fn label(self) -> Color32 {
        match self {
            Self::Filled => BACKGROUND,
            Self::Empty | Self::Hover => FOREGROUND,
        }
    }
}

/// A rectangular grid of cells that can be filled in by clicking.
#[derive(Clone, Debug, PartialEq)]
pub struct GridContent {
    rows: usize,
    columns: usize,
    spacing: f64,
    offset: Point,
    cells: Vec<Cell>,
    hover: Option<(usize, usize)>,
}

impl GridContent {
    #[must_use]
    pub fn new(rows: usize, columns: usize, spacing: f64) -> Self {
        Self {
            rows,
            columns,
            spacing,
            offset: Point::default(),
            cells: vec![Cell::Empty; rows * columns],
            hover: None,
        }
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn spacing(&self) -> f64 {
        self.spacing
    }

    #[must_use]
    pub const fn offset(&self) -> Point {
        self.offset
    }

    /// Resizes the grid; every cell becomes empty.
    pub fn set_rows_and_columns(&mut self, rows: usize, columns: usize) {
        self.rows = rows;
        self.columns = columns;
        self.cells = vec![Cell::Empty; rows * columns];
        self.hover = None;
        debug!(rows, columns, "reset grid");
    }

    #[must_use]
    pub fn cell(&self, (i, j): (usize, usize)) -> Option<Cell> {
        (i < self.rows && j < self.columns).then(|| self.cells[i * self.columns + j])
    }

    fn cell_mut(&mut self, (i, j): (usize, usize)) -> Option<&mut Cell> {
        if i < self.rows && j < self.columns {
            Some(&mut self.cells[i * self.columns + j])
        } else {
            None
        }
    }

    /// Row and column of the cell containing `at`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn cell_at(&self, at: Pixel) -> Option<(usize, usize)> {
        let at = Point::from(at) - self.offset;
        let i = (at.y / self.spacing).floor();
        let j = (at.x / self.spacing).floor();
        if i < 0.0 || j < 0.0 {
            return None;
        }
        let cell = (i as usize, j as usize);
        self.cell(cell).map(|_| cell)
    }

    #[allow(clippy::cast_precision_loss)]
    fn corner(&self, (i, j): (usize, usize)) -> Pixel {
        Point::new(
            self.offset.x + j as f64 * self.spacing,
            self.offset.y + i as f64 * self.spacing,
        )
        .floor()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn side(&self) -> i32 {
        self.spacing.floor() as i32
    }

    /// Paints one cell in the style of its state, with its `(i, j)` label.
    pub fn draw_cell(&self, surface: &mut dyn Surface, cell: (usize, usize)) {
        let Some(state) = self.cell(cell) else {
            return;
        };
        let corner = self.corner(cell);
        let side = self.side();
        surface.set_style(state.style());
        surface.draw_rect(corner.x, corner.y, side, side);
        #[allow(clippy::cast_precision_loss)]
        let rect = Rect::from_min_size(
            Pos2::new(corner.x as f32, corner.y as f32),
            Vec2::splat(side as f32),
        );
        surface.set_pen(state.label());
        surface.draw_text(rect, Align2::CENTER_CENTER, &format!("({}, {})", cell.0, cell.1));
    }

    /// Flips a cell between filled and empty.
    pub fn toggle(&mut self, surface: &mut dyn Surface, cell: (usize, usize)) {
        let Some(state) = self.cell_mut(cell) else {
            return;
        };
        *state = match state {
            Cell::Filled => Cell::Empty,
            Cell::Empty | Cell::Hover => Cell::Filled,
        };
        if self.hover == Some(cell) {
            self.hover = None;
        }
        self.draw_cell(surface, cell);
    }

    /// Moves the hover mark to `cell`. Only empty cells show it.
    pub fn hover(&mut self, surface: &mut dyn Surface, cell: Option<(usize, usize)>) {
        if self.hover == cell {
            return;
        }
        self.clear_hover(surface);
        let Some(cell) = cell else {
            return;
        };
        if let Some(state @ Cell::Empty) = self.cell_mut(cell) {
            *state = Cell::Hover;
            self.draw_cell(surface, cell);
        }
        self.hover = Some(cell);
    }

    pub fn clear_hover(&mut self, surface: &mut dyn Surface) {
        let Some(cell) = self.hover.take() else {
            return;
        };
        if let Some(state @ Cell::Hover) = self.cell_mut(cell) {
            *state = Cell::Empty;
            self.draw_cell(surface, cell);
        }
    }

    #[must_use]
    pub const fn hovered(&self) -> Option<(usize, usize)> {
        self.hover
    }
}

impl ContentManager for GridContent {
    fn draw(&self, surface: &mut dyn Surface) {
        for cell in (0..self.rows).cartesian_product(0..self.columns) {
            self.draw_cell(surface, cell);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn erase(&self, surface: &mut dyn Surface) {
        let corner = self.offset.floor();
        let side = self.side();
        surface.set_style(Style::ERASER);
        surface.draw_rect(
            corner.x,
            corner.y,
            side * self.columns as i32 + 1,
            side * self.rows as i32 + 1,
        );
    }

    fn on_zoom(&mut self, factor: f64, pivot: Point) {
        self.offset = self.offset.scale_about(pivot, factor);
        self.spacing *= factor;
    }

    fn on_pan(&mut self, offset: Pixel) {
        self.offset = self.offset + Point::from(offset);
    }
}
