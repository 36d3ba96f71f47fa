//! Form schema aggregate and raw-definition parsing.

use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::foundation::{FieldId, FormId};

use super::{Field, FieldGroup, FieldType, GroupRule, SchemaError};

/// Raw form definition as emitted by the document-extraction stage.
///
/// Mirrors the extractor's JSON: camelCase keys, per-field `grouping` and
/// `accessibility` objects. Unknown keys (bounding boxes, values) are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFormDefinition {
    #[serde(rename = "formId")]
    pub form_id: String,
    #[serde(rename = "formTitle")]
    pub form_title: String,
    #[serde(default)]
    pub fields: Vec<RawFieldDefinition>,
}

/// Raw field definition inside a [`RawFormDefinition`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawFieldDefinition {
    pub id: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub grouping: Option<RawGrouping>,
    #[serde(default)]
    pub accessibility: Option<RawAccessibility>,
}

/// Raw grouping block: a visual group key plus an optional logical rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGrouping {
    #[serde(rename = "visualGroup", default)]
    pub visual_group: Option<String>,
    #[serde(rename = "logicalRule", default)]
    pub logical_rule: Option<String>,
}

/// Raw accessibility block: screen-reader hint and tab order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAccessibility {
    #[serde(rename = "screenReaderHint", default)]
    pub screen_reader_hint: Option<String>,
    #[serde(rename = "tabOrder", default)]
    pub tab_order: Option<u32>,
}

/// Immutable, validated form schema.
///
/// # Invariants
///
/// - Field ids are unique within the form.
/// - Tab order values are unique and totally order the fields.
/// - Select fields carry a non-empty option list.
///
/// Construction is the only place these are checked; afterwards the schema
/// is read-only and safe to share across sessions without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    id: FormId,
    title: String,
    /// Fields sorted by ascending tab order.
    fields: Vec<Field>,
    index: HashMap<FieldId, usize>,
}

impl FormSchema {
    /// Builds a schema from a raw definition, enforcing all invariants.
    pub fn from_definition(raw: RawFormDefinition) -> Result<Self, SchemaError> {
        if raw.fields.is_empty() {
            return Err(SchemaError::NoFields);
        }

        let mut fields = Vec::with_capacity(raw.fields.len());
        for raw_field in raw.fields {
            fields.push(Self::build_field(raw_field)?);
        }

        fields.sort_by_key(Field::tab_order);

        let mut index = HashMap::with_capacity(fields.len());
        let mut last: Option<(&Field, u32)> = None;
        for (pos, field) in fields.iter().enumerate() {
            if index.insert(field.id().clone(), pos).is_some() {
                return Err(SchemaError::DuplicateFieldId(field.id().clone()));
            }
            if let Some((prev, prev_order)) = last {
                if prev_order == field.tab_order() {
                    return Err(SchemaError::DuplicateTabOrder {
                        tab_order: prev_order,
                        first: prev.id().clone(),
                        second: field.id().clone(),
                    });
                }
            }
            last = Some((field, field.tab_order()));
        }

        Ok(Self {
            id: FormId::new(raw.form_id),
            title: raw.form_title,
            fields,
            index,
        })
    }

    /// Parses and validates a schema from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let raw: RawFormDefinition =
            serde_json::from_str(json).map_err(|e| SchemaError::Parse(e.to_string()))?;
        Self::from_definition(raw)
    }

    fn build_field(raw: RawFieldDefinition) -> Result<Field, SchemaError> {
        let id = FieldId::new(raw.id);

        let field_type = raw
            .field_type
            .as_deref()
            .map(FieldType::from_raw)
            .unwrap_or(FieldType::Text);

        if field_type.is_select() && raw.options.is_empty() {
            return Err(SchemaError::EmptyOptionSet(id));
        }

        let (hint, tab_order) = match raw.accessibility {
            Some(acc) => (acc.screen_reader_hint, acc.tab_order),
            None => (None, None),
        };
        let tab_order = tab_order.ok_or_else(|| SchemaError::MissingTabOrder(id.clone()))?;

        let group = match raw.grouping {
            Some(grouping) => Self::build_group(&id, grouping)?,
            None => None,
        };

        Ok(Field::new(
            id,
            raw.label,
            field_type,
            raw.options,
            raw.required,
            group,
            hint,
            tab_order,
        ))
    }

    fn build_group(
        field_id: &FieldId,
        raw: RawGrouping,
    ) -> Result<Option<FieldGroup>, SchemaError> {
        // A field participates in a logical group only when a rule is set;
        // a bare visualGroup is presentation metadata.
        let Some(rule_name) = raw.logical_rule else {
            return Ok(None);
        };
        let rule = match rule_name.as_str() {
            "selectOne" => GroupRule::SelectOne,
            other => {
                return Err(SchemaError::UnknownGroupRule {
                    field: field_id.clone(),
                    rule: other.to_string(),
                })
            }
        };
        let key = raw
            .visual_group
            .unwrap_or_else(|| field_id.as_str().to_string());
        Ok(Some(FieldGroup { key, rule }))
    }

    /// Returns the form id.
    pub fn id(&self) -> &FormId {
        &self.id
    }

    /// Returns the form title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns all fields in ascending tab order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by id.
    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.index.get(id).map(|&pos| &self.fields[pos])
    }

    /// Returns the other members of `field`'s logical group, if it has one.
    pub fn group_siblings<'a>(&'a self, field: &'a Field) -> Vec<&'a Field> {
        let Some(group) = field.group() else {
            return Vec::new();
        };
        self.fields
            .iter()
            .filter(|other| {
                other.id() != field.id()
                    && other
                        .group()
                        .is_some_and(|g| g.key == group.key && g.rule == group.rule)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_json(id: &str, tab_order: u32) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "label": id,
            "type": "text",
            "required": false,
            "accessibility": { "screenReaderHint": "hint", "tabOrder": tab_order }
        })
    }

    fn schema_json(fields: Vec<serde_json::Value>) -> String {
        serde_json::json!({
            "formId": "form_001",
            "formTitle": "Medical Intake Form",
            "fields": fields
        })
        .to_string()
    }

    #[test]
    fn builds_schema_from_extractor_shaped_json() {
        let json = schema_json(vec![
            serde_json::json!({
                "id": "field_01",
                "label": "Full Name",
                "type": "text",
                "required": true,
                "boundingBox": {"x": 100, "y": 200, "width": 300, "height": 30},
                "grouping": {"visualGroup": "Personal Info", "logicalRule": null},
                "accessibility": {"screenReaderHint": "Enter your full legal name", "tabOrder": 1}
            }),
            serde_json::json!({
                "id": "field_03",
                "label": "Gender",
                "type": "radio",
                "options": ["Male", "Female", "Other"],
                "required": false,
                "grouping": {"visualGroup": "Demographics", "logicalRule": "selectOne"},
                "accessibility": {"screenReaderHint": "Select your gender", "tabOrder": 3}
            }),
        ]);

        let schema = FormSchema::from_json(&json).unwrap();
        assert_eq!(schema.id().as_str(), "form_001");
        assert_eq!(schema.title(), "Medical Intake Form");
        assert_eq!(schema.fields().len(), 2);

        let gender = schema.field(&FieldId::new("field_03")).unwrap();
        assert_eq!(gender.field_type(), FieldType::SingleSelect);
        assert_eq!(gender.group().unwrap().rule, GroupRule::SelectOne);
        assert_eq!(gender.hint(), Some("Select your gender"));
    }

    #[test]
    fn fields_are_sorted_by_tab_order() {
        let json = schema_json(vec![
            field_json("b", 2),
            field_json("c", 30),
            field_json("a", 1),
        ]);
        let schema = FormSchema::from_json(&json).unwrap();
        let ids: Vec<&str> = schema.fields().iter().map(|f| f.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn duplicate_field_id_is_rejected() {
        let json = schema_json(vec![field_json("a", 1), field_json("a", 2)]);
        assert_eq!(
            FormSchema::from_json(&json),
            Err(SchemaError::DuplicateFieldId(FieldId::new("a")))
        );
    }

    #[test]
    fn duplicate_tab_order_is_rejected() {
        let json = schema_json(vec![field_json("a", 1), field_json("b", 1)]);
        assert!(matches!(
            FormSchema::from_json(&json),
            Err(SchemaError::DuplicateTabOrder { tab_order: 1, .. })
        ));
    }

    #[test]
    fn missing_tab_order_is_rejected() {
        let json = schema_json(vec![serde_json::json!({
            "id": "a",
            "label": "A",
            "type": "text"
        })]);
        assert_eq!(
            FormSchema::from_json(&json),
            Err(SchemaError::MissingTabOrder(FieldId::new("a")))
        );
    }

    #[test]
    fn select_field_without_options_is_rejected() {
        let json = schema_json(vec![serde_json::json!({
            "id": "a",
            "label": "A",
            "type": "dropdown",
            "accessibility": {"tabOrder": 1}
        })]);
        assert_eq!(
            FormSchema::from_json(&json),
            Err(SchemaError::EmptyOptionSet(FieldId::new("a")))
        );
    }

    #[test]
    fn unknown_group_rule_is_rejected() {
        let json = schema_json(vec![serde_json::json!({
            "id": "a",
            "label": "A",
            "type": "text",
            "grouping": {"visualGroup": "G", "logicalRule": "exactlyTwo"},
            "accessibility": {"tabOrder": 1}
        })]);
        assert!(matches!(
            FormSchema::from_json(&json),
            Err(SchemaError::UnknownGroupRule { .. })
        ));
    }

    #[test]
    fn empty_form_is_rejected() {
        assert_eq!(
            FormSchema::from_json(&schema_json(vec![])),
            Err(SchemaError::NoFields)
        );
    }

    #[test]
    fn group_siblings_share_key_and_rule() {
        let member = |id: &str, order: u32| {
            serde_json::json!({
                "id": id,
                "label": id,
                "type": "radio",
                "options": ["Yes", "No"],
                "grouping": {"visualGroup": "race", "logicalRule": "selectOne"},
                "accessibility": {"tabOrder": order}
            })
        };
        let json = schema_json(vec![
            member("race_asian", 1),
            member("race_black", 2),
            field_json("notes", 3),
        ]);
        let schema = FormSchema::from_json(&json).unwrap();
        let asian = schema.field(&FieldId::new("race_asian")).unwrap();
        let siblings = schema.group_siblings(asian);
        assert_eq!(siblings.len(), 1);
        assert_eq!(siblings[0].id().as_str(), "race_black");
    }
}
