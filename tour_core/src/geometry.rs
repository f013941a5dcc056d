//! Grid rectangles in cell coordinates.
//!
//! A [`Position`] spans `[start, end)` on both axes, the same lines a CSS
//! `grid-area: start_row / start_column / end_row / end_column` would use.
//! Rows and columns are 1-based. Width and height are derived from the
//! corners and are recomputed whenever a corner moves.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::form::{BlockForm, Field};
use crate::mapper::CanvasLayout;
use crate::scene::{Element, Scene};
use crate::{BlockId, Result};

/// Fixed number of canvas columns.
pub const GRID_COLUMNS: i32 = 4;

/// Rightmost grid line a block may touch. Blocks span columns 1..=4.
pub const MAX_END_COLUMN: i32 = GRID_COLUMNS + 1;

/// Deepest row the editor addresses, and the tallest a block may be.
pub const MAX_ROW: i32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    start_row: i32,
    start_column: i32,
    end_row: i32,
    end_column: i32,
    width: i32,
    height: i32,
}

impl Position {
    /// Build from two corners. The corners are taken as given; see
    /// [`Position::normalized`] for inverted input.
    pub fn from_corners(start_row: i32, start_column: i32, end_row: i32, end_column: i32) -> Self {
        let mut pos = Self {
            start_row,
            start_column,
            end_row,
            end_column,
            width: 0,
            height: 0,
        };
        pos.calc_size();
        pos
    }

    /// A single unit cell.
    pub fn cell(row: i32, column: i32) -> Self {
        Self::from_corners(row, column, row.saturating_add(1), column.saturating_add(1))
    }

    /// Read the stored `row/column/width/height` fields of a block.
    pub fn from_block(form: &BlockForm, id: BlockId) -> Result<Self> {
        let fields = form.read_fields(id)?;
        let mut pos = Self::cell(fields.row, fields.column);
        pos.resize(fields.width, fields.height);
        Ok(pos)
    }

    pub fn start_row(&self) -> i32 {
        self.start_row
    }

    pub fn start_column(&self) -> i32 {
        self.start_column
    }

    pub fn end_row(&self) -> i32 {
        self.end_row
    }

    pub fn end_column(&self) -> i32 {
        self.end_column
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// `(start_row, start_column, end_row, end_column)`
    pub fn area(&self) -> (i32, i32, i32, i32) {
        (self.start_row, self.start_column, self.end_row, self.end_column)
    }

    fn calc_size(&mut self) {
        self.width = self.end_column.saturating_sub(self.start_column);
        self.height = self.end_row.saturating_sub(self.start_row);
    }

    /// Set the size; the top-left corner stays put.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        self.end_column = self.start_column.saturating_add(width);
        self.end_row = self.start_row.saturating_add(height);
    }

    /// Pull the right edge back inside the grid. Rows are never clamped,
    /// the canvas grows downward.
    pub fn clamp_to_bounds(&mut self) {
        if self.end_column > MAX_END_COLUMN {
            self.end_column = MAX_END_COLUMN;
            self.calc_size();
        }
    }

    /// Swap inverted axes and grow empty axes to one cell.
    pub fn normalized(self) -> Self {
        let (start_row, end_row) = ordered_span(self.start_row, self.end_row);
        let (start_column, end_column) = ordered_span(self.start_column, self.end_column);
        Self::from_corners(start_row, start_column, end_row, end_column)
    }

    pub fn contains_cell(&self, row: i32, column: i32) -> bool {
        (self.start_row..self.end_row).contains(&row)
            && (self.start_column..self.end_column).contains(&column)
    }

    /// Pixel rectangle this area covers on a canvas laid out as `layout`.
    pub fn pixel_rect(&self, layout: &CanvasLayout) -> Rect {
        let cell = layout.cell_size();
        let origin = layout.rect.origin();
        Rect::new(
            origin.x + f64::from(self.start_column - 1) * cell.width,
            origin.y + f64::from(self.start_row - 1) * cell.height,
            origin.x + f64::from(self.end_column - 1) * cell.width,
            origin.y + f64::from(self.end_row - 1) * cell.height,
        )
    }

    /// Project onto a scene element. Pure placement, nothing persisted.
    pub fn apply_to(&self, scene: &mut Scene, element: Element) {
        scene.place(element, *self);
    }

    /// Persist into the block's fields and place its element.
    pub fn commit_to_block(&self, id: BlockId, form: &mut BlockForm, scene: &mut Scene) -> Result<()> {
        form.set(id, Field::Row, self.start_row.to_string())?;
        form.set(id, Field::Column, self.start_column.to_string())?;
        form.set(id, Field::Width, self.width.to_string())?;
        form.set(id, Field::Height, self.height.to_string())?;
        self.apply_to(scene, Element::Block(id));

        tracing::debug!(block = id, area = ?self.area(), "committed position");
        Ok(())
    }
}

fn ordered_span(a: i32, b: i32) -> (i32, i32) {
    match a.cmp(&b) {
        std::cmp::Ordering::Less => (a, b),
        std::cmp::Ordering::Greater => (b, a),
        std::cmp::Ordering::Equal => (a, a.saturating_add(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockType;
    use proptest::prelude::*;

    #[test]
    fn single_cell_construction() {
        let pos = Position::cell(2, 3);
        assert_eq!(pos.area(), (2, 3, 3, 4));
        assert_eq!(pos.size(), (1, 1));
    }

    #[test]
    fn clamp_keeps_full_width_block() {
        let mut pos = Position::from_corners(1, 1, 3, 5);
        pos.clamp_to_bounds();
        assert_eq!(pos.end_column(), 5);
        assert_eq!(pos.width(), 4);
    }

    #[test]
    fn clamp_pulls_overhanging_block_back() {
        let mut pos = Position::from_corners(1, 4, 3, 7);
        pos.clamp_to_bounds();
        assert_eq!(pos.end_column(), 5);
        assert_eq!(pos.width(), 1);
        assert_eq!(pos.height(), 2);
    }

    #[test]
    fn resize_moves_bottom_right_only() {
        let mut pos = Position::cell(1, 1);
        pos.resize(2, 3);
        assert_eq!(pos.area(), (1, 1, 4, 3));
    }

    #[test]
    fn normalized_swaps_and_grows() {
        let pos = Position::from_corners(4, 3, 2, 3).normalized();
        assert_eq!(pos.area(), (2, 3, 4, 4));
        assert_eq!(pos.size(), (1, 2));
    }

    #[test]
    fn extreme_corners_saturate_instead_of_overflowing() {
        let pos = Position::cell(i32::MAX, 2);
        assert_eq!(pos.end_row(), i32::MAX);
        assert_eq!(pos.height(), 0);

        let mut pos = Position::cell(3, 1);
        pos.resize(1, i32::MAX);
        assert_eq!(pos.end_row(), i32::MAX);
    }

    #[test]
    fn pixel_rect_matches_layout() {
        let layout = CanvasLayout::new(Rect::new(0.0, 0.0, 400.0, 800.0), 8);
        let rect = Position::from_corners(2, 2, 4, 4).pixel_rect(&layout);
        assert_eq!(rect, Rect::new(100.0, 100.0, 300.0, 300.0));
    }

    #[test]
    fn commit_then_read_back() -> anyhow::Result<()> {
        let mut form = BlockForm::new();
        let mut scene = Scene::new();
        let id = form.create_block(BlockType::Text);

        let pos = Position::from_corners(3, 2, 5, 4);
        pos.commit_to_block(id, &mut form, &mut scene)?;

        assert_eq!(Position::from_block(&form, id)?, pos);
        assert_eq!(scene.placement(id), Some(pos));
        Ok(())
    }

    proptest! {
        #[test]
        fn size_tracks_corners(
            start_row in 1i32..50,
            start_column in 1i32..5,
            dh in 0i32..20,
            dw in 0i32..8,
        ) {
            let pos = Position::from_corners(start_row, start_column, start_row + dh, start_column + dw);
            prop_assert_eq!(pos.width(), pos.end_column() - pos.start_column());
            prop_assert_eq!(pos.height(), pos.end_row() - pos.start_row());
        }

        #[test]
        fn resize_keeps_size_consistent(w in 0i32..10, h in 0i32..10, row in 1i32..30, col in 1i32..5) {
            let mut pos = Position::cell(row, col);
            pos.resize(w, h);
            prop_assert_eq!(pos.width(), pos.end_column() - pos.start_column());
            prop_assert_eq!(pos.height(), pos.end_row() - pos.start_row());
            prop_assert_eq!((pos.start_row(), pos.start_column()), (row, col));
        }

        #[test]
        fn clamp_is_idempotent_and_row_preserving(
            start_row in 1i32..50,
            start_column in 1i32..5,
            dh in 0i32..20,
            dw in 0i32..12,
        ) {
            let original = Position::from_corners(start_row, start_column, start_row + dh, start_column + dw);
            let mut once = original;
            once.clamp_to_bounds();
            let mut twice = once;
            twice.clamp_to_bounds();

            prop_assert_eq!(once, twice);
            prop_assert_eq!(once.start_row(), original.start_row());
            prop_assert_eq!(once.end_row(), original.end_row());
            prop_assert_eq!(once.height(), original.height());
            if original.end_column() > MAX_END_COLUMN {
                prop_assert_eq!(once.end_column(), MAX_END_COLUMN);
                prop_assert_eq!(once.width(), MAX_END_COLUMN - once.start_column());
            } else {
                prop_assert_eq!(once, original);
            }
        }
    }
}
