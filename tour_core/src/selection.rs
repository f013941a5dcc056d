use crate::BlockId;

/// The single selected block, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<BlockId>,
}

/// What a call to [`Selection::select`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<BlockId>,
    pub current: Option<BlockId>,
}

impl SelectionChange {
    /// The previous block lost its selection indicator.
    pub fn deselected(&self) -> Option<BlockId> {
        self.previous.filter(|prev| Some(*prev) != self.current)
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<BlockId> {
        self.current
    }

    pub fn is_selected(&self, id: BlockId) -> bool {
        self.current == Some(id)
    }

    /// Selecting `None` clears the selection outright.
    pub fn select(&mut self, id: Option<BlockId>) -> SelectionChange {
        let previous = self.current;
        self.current = id;
        SelectionChange {
            previous,
            current: id,
        }
    }
}
