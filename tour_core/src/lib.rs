use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

pub mod config;
pub mod drag;
pub mod error;
pub mod form;
pub mod geometry;
pub mod ghost;
pub mod mapper;
pub mod panel;
pub mod resize;
pub mod scene;
pub mod script;
pub mod selection;
pub mod session;

pub use kurbo;

pub use config::EditorConfig;
pub use error::{Result, TourError};
pub use form::{BlockFields, BlockForm, Field};
pub use geometry::{GRID_COLUMNS, MAX_END_COLUMN, Position};
pub use ghost::Ghost;
pub use mapper::CanvasLayout;
pub use panel::PropertyPanel;
pub use scene::{Element, Floating, Scene};
pub use selection::Selection;
pub use session::{EditorSession, Gesture, GestureOutcome, PointerButton, PointerEvent};

/// Blocks are numbered in creation order, starting at 0.
pub type BlockId = u32;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// A tour is the top-level document we save/load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    pub name: String,

    #[serde(default)]
    pub config: EditorConfig,

    #[serde(default)]
    pub blocks: BlockForm,
}

impl Tour {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: EditorConfig::default(),
            blocks: BlockForm::new(),
        }
    }

    /// Save the tour to JSON.
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize tour to json")?;
        fs::write(path.as_ref(), json).context("write tour json file")?;
        Ok(())
    }

    /// Load the tour from JSON.
    pub fn load_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path.as_ref()).context("read tour json file")?;
        let tour = serde_json::from_str::<Tour>(&text).context("parse tour json")?;
        Ok(tour)
    }
}

/// What a block shows. Stored in the form as its numeric tag.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BlockType {
    Text = 0,
    Image = 1,
    Link = 2,
    Video = 3,
    Sound = 4,
    /// The tour's route map.
    MapRoute = 5,
    /// Plain text that also becomes a stop on the route map.
    MapPoint = 6,
}

impl BlockType {
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for BlockType {
    type Error = TourError;

    fn try_from(tag: u8) -> Result<Self> {
        BlockType::iter()
            .find(|t| t.tag() == tag)
            .ok_or_else(|| TourError::UnknownBlockType(tag.to_string()))
    }
}

/// Accepts the numeric tag or the snake_case name.
impl FromStr for BlockType {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(tag) = s.parse::<u8>() {
            return BlockType::try_from(tag);
        }
        BlockType::iter()
            .find(|t| t.as_ref().eq_ignore_ascii_case(s))
            .ok_or_else(|| TourError::UnknownBlockType(s.to_string()))
    }
}

/// A fully decoded block, as the tour is stored once submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourBlock {
    pub id: BlockId,
    pub name: String,
    pub text: String,
    pub content_path: String,
    pub block_type: BlockType,
    pub show_on_map: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub position: Position,
}
