use serde::{Deserialize, Serialize};

/// Width of the frame along a block's edges that starts a resize instead of
/// a drag.
pub const DEFAULT_RESIZE_MARGIN: f64 = 15.0;

/// Rows a fresh canvas shows before any content pushes it further down.
pub const DEFAULT_MIN_ROWS: u32 = 8;

/// Stacking order of a dragged element, above all canvas content.
pub const DEFAULT_FLOATING_Z: i32 = 1000;

/// Editor tuning stored alongside the tour. Missing keys fall back to the
/// defaults above, so older tour files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub resize_margin: f64,
    pub min_rows: u32,
    pub floating_z: i32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            resize_margin: DEFAULT_RESIZE_MARGIN,
            min_rows: DEFAULT_MIN_ROWS,
            floating_z: DEFAULT_FLOATING_Z,
        }
    }
}
