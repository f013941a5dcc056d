//! Drag gestures: palette templates onto the canvas, placed blocks around it.

use kurbo::{Point, Rect};

use crate::geometry::Position;
use crate::scene::Element;
use crate::session::{DragSource, DragState, EditorSession, Gesture, GestureOutcome, PointerEvent};
use crate::{BlockId, BlockType, Result};

impl EditorSession {
    /// Pick up a palette template whose on-screen box is `template`.
    /// Returns `false` when the press does not start a drag.
    pub fn begin_palette_drag(
        &mut self,
        event: PointerEvent,
        block_type: BlockType,
        template: Rect,
    ) -> Result<bool> {
        self.ensure_idle()?;
        self.select(None)?;
        if !event.is_primary() {
            return Ok(false);
        }

        let grab_offset = event.position - template.origin();
        self.scene.lift(
            Element::PaletteClone(block_type),
            template.origin(),
            template.size(),
            self.tour.config.floating_z,
        );
        self.gesture = Some(Gesture::Dragging(DragState {
            source: DragSource::Palette(block_type),
            grab_offset,
        }));

        tracing::debug!(?block_type, "palette drag started");
        Ok(true)
    }

    /// Pick up a placed block. Its stored size is kept for the whole drag.
    pub fn begin_block_drag(&mut self, event: PointerEvent, id: BlockId) -> Result<bool> {
        self.ensure_idle()?;
        let position = Position::from_block(&self.tour.blocks, id)?;
        self.select(Some(id))?;
        if !event.is_primary() {
            return Ok(false);
        }

        let rect = position.pixel_rect(&self.layout);
        let grab_offset = event.position - rect.origin();
        self.scene.lift(
            Element::Block(id),
            rect.origin(),
            rect.size(),
            self.tour.config.floating_z,
        );
        self.gesture = Some(Gesture::Dragging(DragState {
            source: DragSource::Block {
                id,
                size: position.size(),
            },
            grab_offset,
        }));

        tracing::debug!(block = id, area = ?position.area(), "block drag started");
        Ok(true)
    }

    /// Where the dragged element would land with the pointer at `at`.
    fn drop_candidate(&self, source: DragSource, at: Point) -> Position {
        let mut candidate = self.layout.cell_at(at);
        if let DragSource::Block {
            size: (width, height),
            ..
        } = source
        {
            candidate.resize(width, height);
        }
        candidate.clamp_to_bounds();
        candidate
    }

    pub(crate) fn drag_move(&mut self, state: DragState, at: Point) {
        self.scene.move_floating(at - state.grab_offset);
        self.scene.ghost.clear();

        let candidate = self.drop_candidate(state.source, at);
        if self.layout.contains(at) {
            self.scene.ghost.show(candidate);
        }
    }

    pub(crate) fn drag_release(&mut self, state: DragState, at: Point) -> Result<GestureOutcome> {
        self.scene.ghost.clear();

        if !self.layout.contains(at) {
            match state.source {
                DragSource::Palette(_) => {
                    self.scene.discard_floating();
                }
                DragSource::Block { .. } => {
                    self.scene.dock();
                }
            }
            return Ok(GestureOutcome::Cancelled);
        }

        let candidate = self.drop_candidate(state.source, at);
        match state.source {
            DragSource::Palette(block_type) => {
                self.scene.discard_floating();
                let id = self.insert_block(candidate, block_type)?;
                Ok(GestureOutcome::Created(id))
            }
            DragSource::Block { id, .. } => {
                self.scene.dock();
                candidate.commit_to_block(id, &mut self.tour.blocks, &mut self.scene)?;
                self.select(Some(id))?;
                Ok(GestureOutcome::Moved(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::session::PointerButton;
    use crate::*;
    use kurbo::{Point, Rect};

    fn session() -> anyhow::Result<EditorSession> {
        let layout = CanvasLayout::new(Rect::new(100.0, 0.0, 500.0, 800.0), 8);
        Ok(EditorSession::new(Tour::new("Test"), layout)?)
    }

    fn template() -> Rect {
        Rect::new(0.0, 0.0, 80.0, 40.0)
    }

    #[test]
    fn palette_drop_outside_creates_nothing() -> anyhow::Result<()> {
        let mut s = session()?;
        s.begin_palette_drag(PointerEvent::primary(Point::new(10.0, 10.0)), BlockType::Text, template())?;
        s.pointer_move(PointerEvent::primary(Point::new(50.0, 300.0)))?;
        assert!(!s.scene.ghost.is_visible());

        let outcome = s.pointer_up(PointerEvent::primary(Point::new(50.0, 300.0)))?;
        assert_eq!(outcome, Some(GestureOutcome::Cancelled));
        assert_eq!(s.tour.blocks.block_count(), 0);
        assert!(s.scene.floating().is_none());
        assert!(s.is_idle());
        Ok(())
    }

    #[test]
    fn palette_drop_inside_creates_one_block() -> anyhow::Result<()> {
        let mut s = session()?;
        s.begin_palette_drag(PointerEvent::primary(Point::new(10.0, 10.0)), BlockType::Video, template())?;

        let at = Point::new(100.0 + 150.0, 150.0);
        s.pointer_move(PointerEvent::primary(at))?;
        assert_eq!(s.scene.ghost.marker(), Some(Position::cell(2, 2)));

        let outcome = s.pointer_up(PointerEvent::primary(at))?;
        assert_eq!(outcome, Some(GestureOutcome::Created(0)));
        assert_eq!(s.tour.blocks.block_count(), 1);

        let pos = Position::from_block(&s.tour.blocks, 0)?;
        assert_eq!((pos.start_row(), pos.start_column()), (2, 2));
        assert_eq!(s.tour.blocks.block_type(0)?, BlockType::Video);
        assert_eq!(s.selection.current(), Some(0));
        assert!(!s.scene.ghost.is_visible());
        Ok(())
    }

    #[test]
    fn floating_clone_follows_pointer_at_grab_offset() -> anyhow::Result<()> {
        let mut s = session()?;
        s.begin_palette_drag(PointerEvent::primary(Point::new(10.0, 15.0)), BlockType::Text, template())?;
        s.pointer_move(PointerEvent::primary(Point::new(60.0, 65.0)))?;

        let floating = s.scene.floating().copied();
        assert_eq!(floating.map(|f| f.origin), Some(Point::new(50.0, 50.0)));
        assert_eq!(floating.map(|f| f.z_index), Some(s.tour.config.floating_z));
        Ok(())
    }

    #[test]
    fn moving_a_block_keeps_its_size() -> anyhow::Result<()> {
        let mut s = session()?;
        let id = s.insert_block(Position::from_corners(1, 1, 3, 3), BlockType::Text)?;

        s.begin_block_drag(PointerEvent::primary(Point::new(150.0, 50.0)), id)?;
        let at = Point::new(100.0 + 150.0, 450.0);
        s.pointer_move(PointerEvent::primary(at))?;
        assert_eq!(s.scene.ghost.marker(), Some(Position::from_corners(5, 2, 7, 4)));

        let outcome = s.pointer_up(PointerEvent::primary(at))?;
        assert_eq!(outcome, Some(GestureOutcome::Moved(id)));
        assert_eq!(Position::from_block(&s.tour.blocks, id)?, Position::from_corners(5, 2, 7, 4));
        assert_eq!(s.scene.placement(id), Some(Position::from_corners(5, 2, 7, 4)));
        Ok(())
    }

    #[test]
    fn block_dropped_near_right_edge_is_clamped() -> anyhow::Result<()> {
        let mut s = session()?;
        let id = s.insert_block(Position::from_corners(1, 1, 2, 4), BlockType::Text)?;

        s.begin_block_drag(PointerEvent::primary(Point::new(150.0, 50.0)), id)?;
        let at = Point::new(100.0 + 350.0, 50.0);
        s.pointer_up(PointerEvent::primary(at))?;

        let pos = Position::from_block(&s.tour.blocks, id)?;
        assert_eq!(pos.area(), (1, 4, 2, 5));
        assert_eq!(pos.width(), 1);
        Ok(())
    }

    #[test]
    fn block_dropped_outside_keeps_old_position() -> anyhow::Result<()> {
        let mut s = session()?;
        let id = s.insert_block(Position::cell(3, 2), BlockType::Text)?;

        s.begin_block_drag(PointerEvent::primary(Point::new(250.0, 250.0)), id)?;
        assert_eq!(s.scene.docked().count(), 0);

        let outcome = s.pointer_up(PointerEvent::primary(Point::new(20.0, 20.0)))?;
        assert_eq!(outcome, Some(GestureOutcome::Cancelled));
        assert_eq!(Position::from_block(&s.tour.blocks, id)?, Position::cell(3, 2));
        assert_eq!(s.scene.placement(id), Some(Position::cell(3, 2)));
        assert_eq!(s.scene.docked().count(), 1);
        Ok(())
    }

    #[test]
    fn second_gesture_is_rejected() -> anyhow::Result<()> {
        let mut s = session()?;
        s.begin_palette_drag(PointerEvent::primary(Point::new(10.0, 10.0)), BlockType::Text, template())?;

        let again = s.begin_palette_drag(PointerEvent::primary(Point::new(10.0, 10.0)), BlockType::Link, template());
        assert_eq!(again, Err(TourError::GestureInProgress { active: "drag" }));
        Ok(())
    }

    #[test]
    fn secondary_button_selects_without_dragging() -> anyhow::Result<()> {
        let mut s = session()?;
        let a = s.insert_block(Position::cell(1, 1), BlockType::Text)?;
        s.insert_block(Position::cell(2, 1), BlockType::Text)?;

        let event = PointerEvent::new(Point::new(150.0, 50.0), PointerButton::Secondary);
        assert!(!s.begin_block_drag(event, a)?);
        assert!(s.is_idle());
        assert_eq!(s.selection.current(), Some(a));
        Ok(())
    }

    #[test]
    fn dragging_unknown_block_fails() -> anyhow::Result<()> {
        let mut s = session()?;
        let err = s.begin_block_drag(PointerEvent::primary(Point::new(150.0, 50.0)), 9);
        assert!(matches!(err, Err(TourError::InvalidBlockReference { id: 9, .. })));
        assert!(s.is_idle());
        Ok(())
    }
}
