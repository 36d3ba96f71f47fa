//! Schema Model - immutable representation of a form and its fields.
//!
//! A [`FormSchema`] is parsed from the raw definition produced by the
//! document-extraction stage, validated once, and then shared read-only
//! across any number of concurrent sessions.

mod error;
mod field;
mod form;

pub use error::SchemaError;
pub use field::{Field, FieldGroup, FieldType, GroupRule};
pub use form::{
    FormSchema, RawAccessibility, RawFieldDefinition, RawFormDefinition, RawGrouping,
};
