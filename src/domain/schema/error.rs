//! Schema construction errors.

use thiserror::Error;

use crate::domain::foundation::FieldId;

/// Errors raised while validating a raw form definition.
///
/// All of these are fatal at load time: a schema that fails construction
/// is surfaced to the operator and never partially used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Form definition could not be parsed: {0}")]
    Parse(String),

    #[error("Form has no fields")]
    NoFields,

    #[error("Field id '{0}' appears more than once")]
    DuplicateFieldId(FieldId),

    #[error("Tab order {tab_order} is shared by fields '{first}' and '{second}'")]
    DuplicateTabOrder {
        tab_order: u32,
        first: FieldId,
        second: FieldId,
    },

    #[error("Field '{0}' has no tab order")]
    MissingTabOrder(FieldId),

    #[error("Select field '{0}' has an empty option list")]
    EmptyOptionSet(FieldId),

    #[error("Field '{field}' declares group rule '{rule}' which is not supported")]
    UnknownGroupRule { field: FieldId, rule: String },
}
