use thiserror::Error;

use crate::BlockId;
use crate::form::Field;

pub type Result<T> = std::result::Result<T, TourError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TourError {
    #[error("block {id} does not exist or is missing its '{field}' field")]
    InvalidBlockReference { id: BlockId, field: Field },

    #[error("block {id} field '{field}' holds '{value}', which is not a valid value")]
    MalformedFieldValue {
        id: BlockId,
        field: Field,
        value: String,
    },

    #[error("unknown block type '{0}'")]
    UnknownBlockType(String),

    #[error("unknown block field '{0}'")]
    UnknownField(String),

    #[error("field '{field}' is disabled for the selected block")]
    FieldDisabled { field: Field },

    #[error("no block is selected")]
    NothingSelected,

    #[error("a {active} gesture is already in progress")]
    GestureInProgress { active: &'static str },
}
