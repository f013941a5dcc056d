//! Retained visual state written by the controllers and read by hosts.
//!
//! Blocks normally sit in grid flow at their placement. During a drag one
//! element floats above the canvas at an absolute pixel origin; a block that
//! floats keeps its last placement so it can drop back into flow unchanged.

use std::collections::BTreeMap;

use kurbo::{Point, Rect, Size};

use crate::geometry::Position;
use crate::ghost::Ghost;
use crate::mapper::CanvasLayout;
use crate::{BlockId, BlockType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Block(BlockId),
    /// A palette template cloned for a drag. It has no id yet.
    PaletteClone(BlockType),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Floating {
    pub element: Element,
    pub origin: Point,
    pub size: Size,
    pub z_index: i32,
}

impl Floating {
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    placements: BTreeMap<BlockId, Position>,
    floating: Option<Floating>,
    highlighted: Option<BlockId>,
    pub ghost: Ghost,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, element: Element, position: Position) {
        match element {
            Element::Block(id) => {
                self.placements.insert(id, position);
            }
            Element::PaletteClone(_) => {
                tracing::trace!("palette clones are never placed in the grid");
            }
        }
    }

    pub fn placement(&self, id: BlockId) -> Option<Position> {
        self.placements.get(&id).copied()
    }

    /// Blocks in grid flow, skipping the one currently floating.
    pub fn docked(&self) -> impl Iterator<Item = (BlockId, Position)> + '_ {
        let floating = self.floating_block();
        self.placements
            .iter()
            .filter(move |(id, _)| Some(**id) != floating)
            .map(|(id, pos)| (*id, *pos))
    }

    /// Detach an element from flow and float it at `origin`.
    pub fn lift(&mut self, element: Element, origin: Point, size: Size, z_index: i32) {
        self.floating = Some(Floating {
            element,
            origin,
            size,
            z_index,
        });
    }

    pub fn move_floating(&mut self, origin: Point) {
        if let Some(floating) = &mut self.floating {
            floating.origin = origin;
        }
    }

    pub fn floating(&self) -> Option<&Floating> {
        self.floating.as_ref()
    }

    fn floating_block(&self) -> Option<BlockId> {
        match self.floating {
            Some(Floating {
                element: Element::Block(id),
                ..
            }) => Some(id),
            _ => None,
        }
    }

    /// Return a floating block to grid flow at its placement. Its inline
    /// size goes with it. A palette clone has no placement and stays put.
    pub fn dock(&mut self) -> Option<BlockId> {
        let id = self.floating_block()?;
        self.floating = None;
        Some(id)
    }

    /// Drop a floating palette clone without creating anything. A floating
    /// block is never discarded, only docked.
    pub fn discard_floating(&mut self) -> Option<BlockType> {
        match self.floating {
            Some(Floating {
                element: Element::PaletteClone(block_type),
                ..
            }) => {
                self.floating = None;
                Some(block_type)
            }
            _ => None,
        }
    }

    pub fn set_highlight(&mut self, id: Option<BlockId>) {
        self.highlighted = id;
    }

    pub fn highlighted(&self) -> Option<BlockId> {
        self.highlighted
    }

    /// Topmost docked block under `point`.
    pub fn block_at(&self, point: Point, layout: &CanvasLayout) -> Option<BlockId> {
        self.docked()
            .filter(|(_, pos)| pos.pixel_rect(layout).contains(point))
            .map(|(id, _)| id)
            .last()
    }

    /// Rows the canvas needs to show every placement plus one free row.
    pub fn rows_needed(&self, min_rows: u32) -> u32 {
        let last = self
            .placements
            .values()
            .map(|pos| pos.end_row() - 1)
            .max()
            .unwrap_or(0);
        min_rows.max(u32::try_from(last + 1).unwrap_or(0))
    }
}
