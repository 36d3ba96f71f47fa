//! Field value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::FieldId;

/// The kind of value a field holds.
///
/// Raw definitions use HTML-ish type names (`radio`, `dropdown`, `tel`,
/// `textarea`, ...); those collapse onto this enum during schema
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text.
    Text,
    /// A calendar date, normalized to ISO `YYYY-MM-DD`.
    Date,
    /// A numeric value, normalized to digits.
    Number,
    /// An email address.
    Email,
    /// A phone number, normalized to `(XXX) XXX-XXXX`.
    Phone,
    /// Exactly one entry from the option list.
    SingleSelect,
    /// Zero or more entries from the option list.
    MultiSelect,
}

impl FieldType {
    /// Maps a raw definition type name onto a field type.
    ///
    /// Unknown names fall back to `Text`, matching how the original
    /// interview loop treated untyped fields.
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "date" => FieldType::Date,
            "number" => FieldType::Number,
            "email" => FieldType::Email,
            "tel" | "phone" => FieldType::Phone,
            "radio" | "dropdown" | "select" | "single-select" => FieldType::SingleSelect,
            "checkbox" | "multi-select" => FieldType::MultiSelect,
            _ => FieldType::Text,
        }
    }

    /// Returns true for types that require a non-empty option list.
    pub fn is_select(&self) -> bool {
        matches!(self, FieldType::SingleSelect | FieldType::MultiSelect)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::SingleSelect => "single_select",
            FieldType::MultiSelect => "multi_select",
        };
        write!(f, "{}", s)
    }
}

/// Logical rule constraining how grouped fields may be answered together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupRule {
    /// Exactly one field in the group may hold a non-empty value.
    SelectOne,
}

/// Grouping metadata attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroup {
    /// Key shared by all members of the group.
    pub key: String,
    /// Rule constraining the group's combined answers.
    pub rule: GroupRule,
}

/// One form field, validated and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    id: FieldId,
    label: String,
    field_type: FieldType,
    options: Vec<String>,
    required: bool,
    group: Option<FieldGroup>,
    hint: Option<String>,
    tab_order: u32,
}

impl Field {
    /// Creates a validated field. Called by schema construction only.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: FieldId,
        label: String,
        field_type: FieldType,
        options: Vec<String>,
        required: bool,
        group: Option<FieldGroup>,
        hint: Option<String>,
        tab_order: u32,
    ) -> Self {
        Self {
            id,
            label,
            field_type,
            options,
            required,
            group,
            hint,
            tab_order,
        }
    }

    /// Returns the field id.
    pub fn id(&self) -> &FieldId {
        &self.id
    }

    /// Returns the human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the field type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns the option list (empty for non-select types).
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Returns true if the field must be answered before completion.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the grouping metadata, if any.
    pub fn group(&self) -> Option<&FieldGroup> {
        self.group.as_ref()
    }

    /// Returns the accessibility hint used when building prompts.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Returns the traversal priority.
    pub fn tab_order(&self) -> u32 {
        self.tab_order
    }

    /// Finds the canonical option matching `value` case-insensitively.
    pub fn match_option(&self, value: &str) -> Option<&str> {
        let wanted = value.trim();
        self.options
            .iter()
            .find(|opt| opt.eq_ignore_ascii_case(wanted))
            .map(String::as_str)
    }
}
