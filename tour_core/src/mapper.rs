//! Pointer-to-cell mapping.

use kurbo::{Point, Rect, Size};

use crate::geometry::{GRID_COLUMNS, MAX_ROW, Position};

/// The canvas as the host currently lays it out: its pixel box and how many
/// row tracks it has. Rows grow with content, columns are fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    pub rect: Rect,
    pub rows: u32,
}

impl CanvasLayout {
    pub fn new(rect: Rect, rows: u32) -> Self {
        Self { rect, rows }
    }

    /// Lay out `rows` square-ish tracks of `cell` size starting at `origin`.
    pub fn from_cells(origin: Point, cell: Size, rows: u32) -> Self {
        let size = Size::new(
            cell.width * f64::from(GRID_COLUMNS),
            cell.height * f64::from(rows),
        );
        Self::new(Rect::from_origin_size(origin, size), rows)
    }

    pub fn cell_size(&self) -> Size {
        let rows = f64::from(self.rows.max(1));
        Size::new(
            self.rect.width() / f64::from(GRID_COLUMNS),
            self.rect.height() / rows,
        )
    }

    /// Whether the pointer is over the canvas.
    pub fn contains(&self, point: Point) -> bool {
        self.rect.contains(point)
    }

    /// The single cell under `point`. Indices are clamped to `1..=MAX_ROW`;
    /// the column is not pulled back onto the grid, that is the geometry's job.
    pub fn cell_at(&self, point: Point) -> Position {
        let column = track_index(point.x - self.rect.x0, self.rect.width(), GRID_COLUMNS as u32);
        let row = track_index(point.y - self.rect.y0, self.rect.height(), self.rows);
        Position::cell(row, column)
    }
}

fn track_index(offset: f64, extent: f64, tracks: u32) -> i32 {
    if tracks == 0 || extent <= 0.0 {
        return 1;
    }
    let per_track = extent / f64::from(tracks);
    ((offset / per_track).ceil().clamp(1.0, f64::from(MAX_ROW)) as i32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> CanvasLayout {
        CanvasLayout::new(Rect::new(50.0, 20.0, 450.0, 820.0), 8)
    }

    #[test]
    fn maps_pointer_to_cell() {
        let pos = layout().cell_at(Point::new(50.0 + 150.0, 20.0 + 150.0));
        assert_eq!(pos.area(), (2, 2, 3, 3));
    }

    #[test]
    fn cell_edges_belong_to_the_left_and_upper_cell() {
        let pos = layout().cell_at(Point::new(150.0, 120.0));
        assert_eq!((pos.start_row(), pos.start_column()), (1, 1));
    }

    #[test]
    fn pointer_above_or_left_clamps_to_first_cell() {
        let pos = layout().cell_at(Point::new(0.0, 0.0));
        assert_eq!((pos.start_row(), pos.start_column()), (1, 1));
    }

    #[test]
    fn pointer_past_the_right_edge_is_not_clamped() {
        let pos = layout().cell_at(Point::new(500.0, 30.0));
        assert_eq!(pos.start_column(), 5);
    }

    #[test]
    fn far_pointer_stops_at_the_deepest_row() {
        let pos = layout().cell_at(Point::new(1e12, 1e12));
        assert_eq!(pos.start_row(), MAX_ROW);
        assert_eq!(pos.start_column(), MAX_ROW);
        assert_eq!(pos.size(), (1, 1));
    }

    #[test]
    fn empty_layout_maps_to_first_cell() {
        let empty = CanvasLayout::new(Rect::new(0.0, 0.0, 0.0, 0.0), 0);
        let pos = empty.cell_at(Point::new(10.0, 10.0));
        assert_eq!(pos.area(), (1, 1, 2, 2));
    }

    #[test]
    fn rows_follow_the_current_track_count() {
        let mut grown = layout();
        grown.rows = 16;
        let pos = grown.cell_at(Point::new(60.0, 20.0 + 60.0));
        assert_eq!(pos.start_row(), 2);
    }
}
