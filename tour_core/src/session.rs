//! The editor session owns everything a gesture touches.
//!
//! ```text
//! Idle -> Dragging -> {Committed | Cancelled} -> Idle
//! Idle -> Resizing -> {Committed | Cancelled} -> Idle
//! ```
//!
//! Hosts translate their pointer input into [`PointerEvent`]s and call
//! [`EditorSession::pointer_down`], [`EditorSession::pointer_move`] and
//! [`EditorSession::pointer_up`]; palette drags start with
//! [`EditorSession::begin_palette_drag`]. At most one gesture is active.

use kurbo::{Point, Rect, Vec2};
use strum::{AsRefStr, Display, EnumString};

use crate::form::Field;
use crate::geometry::Position;
use crate::mapper::CanvasLayout;
use crate::panel::PropertyPanel;
use crate::scene::{Element, Scene};
use crate::selection::Selection;
use crate::{BlockId, BlockType, Result, Tour, TourError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn new(position: Point, button: PointerButton) -> Self {
        Self { position, button }
    }

    pub fn primary(position: Point) -> Self {
        Self::new(position, PointerButton::Primary)
    }

    pub fn is_primary(&self) -> bool {
        self.button == PointerButton::Primary
    }
}

/// Where a drag picked its element up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// A palette template; the block does not exist until it is dropped.
    Palette(BlockType),
    /// A placed block, carrying the size it keeps while moving.
    Block { id: BlockId, size: (i32, i32) },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub source: DragSource,
    /// Pointer offset from the element's top-left corner at pick-up.
    pub grab_offset: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeState {
    pub id: BlockId,
    /// The block's pixel box when the resize started.
    pub original: Rect,
    pub candidate: Position,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Dragging(DragState),
    Resizing(ResizeState),
}

impl Gesture {
    pub fn kind(&self) -> &'static str {
        match self {
            Gesture::Dragging(_) => "drag",
            Gesture::Resizing(_) => "resize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// A palette drop created this block.
    Created(BlockId),
    Moved(BlockId),
    Resized(BlockId),
    /// Released outside the canvas. Nothing was written.
    Cancelled,
}

#[derive(Debug)]
pub struct EditorSession {
    pub tour: Tour,
    pub scene: Scene,
    pub selection: Selection,
    pub panel: PropertyPanel,
    pub(crate) layout: CanvasLayout,
    pub(crate) gesture: Option<Gesture>,
}

impl EditorSession {
    /// Open a tour for editing, placing every stored block on the scene.
    pub fn new(tour: Tour, layout: CanvasLayout) -> Result<Self> {
        let mut scene = Scene::new();
        for id in tour.blocks.ids() {
            Position::from_block(&tour.blocks, id)?.apply_to(&mut scene, Element::Block(id));
        }

        Ok(Self {
            tour,
            scene,
            selection: Selection::new(),
            panel: PropertyPanel::new(),
            layout,
            gesture: None,
        })
    }

    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    /// Hosts call this whenever the canvas moves or gains rows.
    pub fn set_layout(&mut self, layout: CanvasLayout) {
        self.layout = layout;
    }

    /// Row tracks the canvas should currently show.
    pub fn rows_needed(&self) -> u32 {
        self.scene.rows_needed(self.tour.config.min_rows)
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.gesture.is_none()
    }

    pub(crate) fn ensure_idle(&self) -> Result<()> {
        match &self.gesture {
            Some(active) => Err(TourError::GestureInProgress {
                active: active.kind(),
            }),
            None => Ok(()),
        }
    }

    /// Move the selection indicator and refresh the property panel.
    pub fn select(&mut self, id: Option<BlockId>) -> Result<()> {
        let change = self.selection.select(id);
        if let Some(prev) = change.deselected() {
            tracing::debug!(block = prev, "deselected");
        }
        self.scene.set_highlight(id);
        self.panel.refresh(&self.tour.blocks, id)
    }

    /// Create a block of `block_type` at `position` and select it.
    pub fn insert_block(&mut self, position: Position, block_type: BlockType) -> Result<BlockId> {
        let id = self.tour.blocks.create_block(block_type);
        position.commit_to_block(id, &mut self.tour.blocks, &mut self.scene)?;
        self.select(Some(id))?;
        Ok(id)
    }

    /// Edit a field of the selected block through the property panel.
    pub fn edit_field(&mut self, field: Field, value: &str) -> Result<()> {
        self.panel.edit(&mut self.tour.blocks, field, value)
    }

    /// Pointer pressed on the canvas. A press on a block's edge frame starts
    /// a resize, anywhere else on the block a drag. Returns the gesture
    /// started, if any.
    pub fn pointer_down(&mut self, event: PointerEvent) -> Result<Option<&'static str>> {
        self.ensure_idle()?;
        let Some(id) = self.scene.block_at(event.position, &self.layout) else {
            return Ok(None);
        };

        let started = if self.in_resize_frame(id, event.position)? {
            self.begin_resize(event, id)?
        } else {
            self.begin_block_drag(event, id)?
        };
        if !started {
            return Ok(None);
        }
        Ok(self.gesture.map(|g| g.kind()))
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> Result<()> {
        match self.gesture {
            Some(Gesture::Dragging(state)) => {
                self.drag_move(state, event.position);
                Ok(())
            }
            Some(Gesture::Resizing(state)) => self.resize_move(state, event.position),
            None => Ok(()),
        }
    }

    /// Finish the active gesture. Returns `None` when nothing was active.
    pub fn pointer_up(&mut self, event: PointerEvent) -> Result<Option<GestureOutcome>> {
        let Some(gesture) = self.gesture.take() else {
            return Ok(None);
        };

        let outcome = match gesture {
            Gesture::Dragging(state) => self.drag_release(state, event.position),
            Gesture::Resizing(state) => self.resize_release(state, event.position),
        };
        self.scene.ghost.clear();

        match &outcome {
            Ok(done) => tracing::info!(gesture = gesture.kind(), outcome = ?done, "gesture finished"),
            Err(e) => tracing::warn!(gesture = gesture.kind(), error = %e, "gesture failed"),
        }
        outcome.map(Some)
    }
}
