use crate::geometry::Position;

/// The one transient marker previewing where a gesture would land.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ghost {
    marker: Option<Position>,
}

impl Ghost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing marker with one at `position`.
    pub fn show(&mut self, position: Position) {
        self.clear();
        self.marker = Some(position);
    }

    pub fn clear(&mut self) {
        self.marker = None;
    }

    pub fn marker(&self) -> Option<Position> {
        self.marker
    }

    pub fn is_visible(&self) -> bool {
        self.marker.is_some()
    }
}
