//! The property panel: a mirror of the selected block's editable fields.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::form::{BlockForm, Field};
use crate::{BlockId, BlockType, Result, TourError};

/// Fields the panel shows, in display order.
pub const PANEL_FIELDS: [Field; 7] = [
    Field::Type,
    Field::Name,
    Field::Text,
    Field::ContentPath,
    Field::ShowOnMap,
    Field::Latitude,
    Field::Longitude,
];

/// Which inputs a block of `block_type` may edit.
pub fn permissions(block_type: BlockType, show_on_map: bool) -> BTreeSet<Field> {
    let mut enabled = BTreeSet::from([Field::Type, Field::ShowOnMap]);
    match block_type {
        BlockType::Text | BlockType::MapPoint => {
            enabled.extend([Field::Name, Field::Text]);
        }
        BlockType::Image | BlockType::Video | BlockType::Sound => {
            enabled.insert(Field::ContentPath);
        }
        BlockType::Link => {
            enabled.insert(Field::Text);
        }
        BlockType::MapRoute => {
            enabled.remove(&Field::ShowOnMap);
        }
    }
    if show_on_map && enabled.contains(&Field::ShowOnMap) {
        enabled.extend([Field::Latitude, Field::Longitude]);
    }
    enabled
}

#[derive(Debug, Clone, Default)]
pub struct PropertyPanel {
    block: Option<BlockId>,
    values: BTreeMap<Field, String>,
    enabled: BTreeSet<Field>,
}

impl PropertyPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(&self) -> Option<BlockId> {
        self.block
    }

    pub fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    pub fn is_enabled(&self, field: Field) -> bool {
        self.enabled.contains(&field)
    }

    /// Re-read the block's fields and recompute which inputs are enabled.
    /// With nothing selected every input is disabled.
    pub fn refresh(&mut self, form: &BlockForm, block: Option<BlockId>) -> Result<()> {
        self.block = block;
        self.values.clear();
        self.enabled.clear();

        let Some(id) = block else {
            return Ok(());
        };

        for field in PANEL_FIELDS {
            let value = form.get(id, field).unwrap_or_default();
            self.values.insert(field, value.to_string());
        }
        let block_type = form.block_type(id)?;
        self.enabled = permissions(block_type, form.checked(id, Field::ShowOnMap));
        Ok(())
    }

    /// Write one input back into the selected block.
    pub fn edit(&mut self, form: &mut BlockForm, field: Field, value: &str) -> Result<()> {
        let id = self.block.ok_or(TourError::NothingSelected)?;
        if field.is_position() || !self.is_enabled(field) {
            return Err(TourError::FieldDisabled { field });
        }

        match field {
            Field::Type => {
                let block_type = BlockType::from_str(value)?;
                form.set(id, Field::Type, block_type.tag().to_string())?;
                for cleared in [Field::Name, Field::Text, Field::ContentPath] {
                    form.set(id, cleared, "")?;
                }
                tracing::debug!(block = id, ?block_type, "block type changed, content cleared");
            }
            Field::ShowOnMap => {
                let checked = !matches!(value.trim(), "" | "0" | "off" | "false");
                form.set(id, Field::ShowOnMap, checked.to_string())?;
            }
            _ => form.set(id, field, value)?,
        }

        self.refresh(form, Some(id))
    }
}
