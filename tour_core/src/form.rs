//! Per-block persisted fields.
//!
//! Every block is a bag of string fields, the way the editor form keeps them
//! as `<id>:<field>` inputs until the tour is submitted. Typed accessors sit
//! on top and fail loudly instead of passing garbage along.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::geometry::{GRID_COLUMNS, MAX_ROW, Position};
use crate::{BlockId, BlockType, Result, TourBlock, TourError};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Text,
    ContentPath,
    #[strum(serialize = "type_")]
    #[serde(rename = "type_")]
    Type,
    ShowOnMap,
    Latitude,
    Longitude,
    Width,
    Column,
    Row,
    Height,
    TourId,
}

impl Field {
    /// Position fields are owned by the gesture controllers.
    pub fn is_position(self) -> bool {
        matches!(self, Field::Row | Field::Column | Field::Width | Field::Height)
    }

    pub fn is_checkbox(self) -> bool {
        self == Field::ShowOnMap
    }
}

/// The fields the gesture core reads back from a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFields {
    pub row: i32,
    pub column: i32,
    pub width: i32,
    pub height: i32,
    pub block_type: BlockType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockForm {
    blocks: BTreeMap<BlockId, BTreeMap<Field, String>>,
}

impl BlockForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.keys().copied()
    }

    /// Add a block with default fields. Its id is the current block count.
    /// Row and column stay empty until a position is committed.
    pub fn create_block(&mut self, block_type: BlockType) -> BlockId {
        let mut id = BlockId::try_from(self.blocks.len()).unwrap_or(BlockId::MAX);
        while self.blocks.contains_key(&id) {
            tracing::warn!(id, "block id already taken, skipping ahead");
            id += 1;
        }

        let fields = BTreeMap::from([
            (Field::Name, String::new()),
            (Field::Text, String::new()),
            (Field::ContentPath, String::new()),
            (Field::Type, block_type.tag().to_string()),
            (Field::ShowOnMap, String::new()),
            (Field::Latitude, "0".to_string()),
            (Field::Longitude, "0".to_string()),
            (Field::Width, "1".to_string()),
            (Field::Column, String::new()),
            (Field::Row, String::new()),
            (Field::Height, "1".to_string()),
            (Field::TourId, String::new()),
        ]);
        self.blocks.insert(id, fields);

        tracing::info!(id, ?block_type, "created block");
        id
    }

    pub fn get(&self, id: BlockId, field: Field) -> Option<&str> {
        self.blocks
            .get(&id)
            .and_then(|fields| fields.get(&field))
            .map(String::as_str)
    }

    pub fn set(&mut self, id: BlockId, field: Field, value: impl Into<String>) -> Result<()> {
        let fields = self
            .blocks
            .get_mut(&id)
            .ok_or(TourError::InvalidBlockReference { id, field })?;
        fields.insert(field, value.into());
        Ok(())
    }

    fn required(&self, id: BlockId, field: Field) -> Result<&str> {
        match self.get(id, field).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(TourError::InvalidBlockReference { id, field }),
        }
    }

    pub fn int_field(&self, id: BlockId, field: Field) -> Result<i32> {
        let raw = self.required(id, field)?;
        raw.parse().map_err(|_| TourError::MalformedFieldValue {
            id,
            field,
            value: raw.to_string(),
        })
    }

    /// Coordinates default to 0 when left blank.
    pub fn float_field(&self, id: BlockId, field: Field) -> Result<f64> {
        match self.get(id, field).map(str::trim) {
            None if !self.contains(id) => Err(TourError::InvalidBlockReference { id, field }),
            None | Some("") => Ok(0.0),
            Some(raw) => raw.parse().map_err(|_| TourError::MalformedFieldValue {
                id,
                field,
                value: raw.to_string(),
            }),
        }
    }

    pub fn checked(&self, id: BlockId, field: Field) -> bool {
        self.get(id, field).is_some_and(is_checked)
    }

    pub fn block_type(&self, id: BlockId) -> Result<BlockType> {
        let raw = self.required(id, Field::Type)?;
        BlockType::from_str(raw)
    }

    fn bounded_field(&self, id: BlockId, field: Field, range: RangeInclusive<i32>) -> Result<i32> {
        let value = self.int_field(id, field)?;
        if !range.contains(&value) {
            return Err(TourError::MalformedFieldValue {
                id,
                field,
                value: value.to_string(),
            });
        }
        Ok(value)
    }

    /// Position fields must lie on the grid: columns and widths within the
    /// four columns, rows and heights within `1..=MAX_ROW`.
    pub fn read_fields(&self, id: BlockId) -> Result<BlockFields> {
        Ok(BlockFields {
            row: self.bounded_field(id, Field::Row, 1..=MAX_ROW)?,
            column: self.bounded_field(id, Field::Column, 1..=GRID_COLUMNS)?,
            width: self.bounded_field(id, Field::Width, 1..=GRID_COLUMNS)?,
            height: self.bounded_field(id, Field::Height, 1..=MAX_ROW)?,
            block_type: self.block_type(id)?,
        })
    }

    pub fn write_position(&mut self, id: BlockId, position: &Position) -> Result<()> {
        self.set(id, Field::Row, position.start_row().to_string())?;
        self.set(id, Field::Column, position.start_column().to_string())?;
        self.set(id, Field::Width, position.width().to_string())?;
        self.set(id, Field::Height, position.height().to_string())?;
        Ok(())
    }

    /// Decode every block into a typed record.
    pub fn blocks(&self) -> Result<Vec<TourBlock>> {
        self.ids()
            .map(|id| {
                Ok(TourBlock {
                    id,
                    name: self.get(id, Field::Name).unwrap_or_default().to_string(),
                    text: self.get(id, Field::Text).unwrap_or_default().to_string(),
                    content_path: self
                        .get(id, Field::ContentPath)
                        .unwrap_or_default()
                        .to_string(),
                    block_type: self.block_type(id)?,
                    show_on_map: self.checked(id, Field::ShowOnMap),
                    latitude: self.float_field(id, Field::Latitude)?,
                    longitude: self.float_field(id, Field::Longitude)?,
                    position: Position::from_block(self, id)?,
                })
            })
            .collect()
    }

    /// Last occupied row of the tour, 0 when empty.
    pub fn canvas_height(&self) -> Result<i32> {
        let mut max_row = 0;
        for id in self.ids() {
            let fields = self.read_fields(id)?;
            max_row = max_row.max(fields.row + fields.height);
        }
        Ok((max_row - 1).max(0))
    }

    /// Split flat `<id>:<field>` pairs into blocks. Pairs without a colon are
    /// tour-level fields and come back separately. A checkbox that is present
    /// at all counts as checked.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<(Self, BTreeMap<String, String>)>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::new();
        let mut tour = BTreeMap::new();

        for (key, value) in pairs {
            let key = key.as_ref();
            let Some((id, field)) = key.split_once(':') else {
                tour.insert(key.to_string(), value.into());
                continue;
            };

            let id: BlockId = id
                .trim()
                .parse()
                .map_err(|_| TourError::UnknownField(key.to_string()))?;
            let field = Field::from_str(field.trim())
                .map_err(|_| TourError::UnknownField(key.to_string()))?;

            let value = if field.is_checkbox() {
                "true".to_string()
            } else {
                value.into()
            };
            form.blocks.entry(id).or_default().insert(field, value);
        }

        for fields in form.blocks.values_mut() {
            fields.entry(Field::ShowOnMap).or_default();
        }

        Ok((form, tour))
    }

    /// Flat `<id>:<field>` pairs. Unchecked checkboxes are left out.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for (id, fields) in &self.blocks {
            for (field, value) in fields {
                if field.is_checkbox() && !is_checked(value) {
                    continue;
                }
                out.push((format!("{id}:{field}"), value.clone()));
            }
        }
        out
    }
}

fn is_checked(value: &str) -> bool {
    !matches!(value.trim(), "" | "0" | "off" | "false")
}
