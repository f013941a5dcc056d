//! Resize gestures, grabbed on the frame along a block's edges.

use kurbo::Point;

use crate::geometry::Position;
use crate::session::{EditorSession, Gesture, GestureOutcome, PointerEvent, ResizeState};
use crate::{BlockId, Result};

impl EditorSession {
    /// Whether `point` falls on the block's resize frame rather than strictly
    /// inside its inner area.
    pub fn in_resize_frame(&self, id: BlockId, point: Point) -> Result<bool> {
        let rect = Position::from_block(&self.tour.blocks, id)?.pixel_rect(&self.layout);
        let margin = self.tour.config.resize_margin;
        let inner = rect.x1 - margin > point.x
            && point.x > rect.x0 + margin
            && rect.y1 - margin > point.y
            && point.y > rect.y0 + margin;
        Ok(!inner)
    }

    /// Start resizing `id`. A press strictly inside the inner frame is not a
    /// resize and returns `false`.
    pub fn begin_resize(&mut self, event: PointerEvent, id: BlockId) -> Result<bool> {
        self.ensure_idle()?;
        let stored = Position::from_block(&self.tour.blocks, id)?;
        self.select(Some(id))?;
        if !event.is_primary() || !self.in_resize_frame(id, event.position)? {
            return Ok(false);
        }

        self.gesture = Some(Gesture::Resizing(ResizeState {
            id,
            original: stored.pixel_rect(&self.layout),
            candidate: stored,
        }));

        tracing::debug!(block = id, area = ?stored.area(), "resize started");
        Ok(true)
    }

    /// Rebuild from the stored position and move whichever edges the pointer
    /// has crossed: left of the original box moves the start column,
    /// anything else the end column. Rows work the same way.
    pub(crate) fn resize_move(&mut self, state: ResizeState, at: Point) -> Result<()> {
        self.scene.ghost.clear();

        let stored = Position::from_block(&self.tour.blocks, state.id)?;
        let cell = self.layout.cell_at(at);

        let (start_column, end_column) = if at.x < state.original.x0 {
            (cell.start_column(), stored.end_column())
        } else {
            (stored.start_column(), cell.end_column())
        };
        let (start_row, end_row) = if at.y < state.original.y0 {
            (cell.start_row(), stored.end_row())
        } else {
            (stored.start_row(), cell.end_row())
        };

        let mut candidate =
            Position::from_corners(start_row, start_column, end_row, end_column).normalized();
        candidate.clamp_to_bounds();
        self.scene.ghost.show(candidate);

        if let Some(Gesture::Resizing(active)) = &mut self.gesture {
            active.candidate = candidate;
        }
        Ok(())
    }

    pub(crate) fn resize_release(&mut self, state: ResizeState, at: Point) -> Result<GestureOutcome> {
        self.scene.ghost.clear();

        let outcome = if self.layout.contains(at) {
            state
                .candidate
                .commit_to_block(state.id, &mut self.tour.blocks, &mut self.scene)?;
            GestureOutcome::Resized(state.id)
        } else {
            GestureOutcome::Cancelled
        };

        self.select(Some(state.id))?;
        Ok(outcome)
    }
}
