use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// A stored contact document. `contact_name` is the unique business key;
/// there is no surrogate id. Optional fields stay absent when never provided.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub contact_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Creation input: the same four fields, key required.
#[derive(Clone, Debug, Deserialize)]
pub struct NewContact {
    pub contact_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewContact {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.contact_name.trim().is_empty() {
            return Err(ModelError::Validation("contact_name must not be empty".into()));
        }
        Ok(())
    }
}

impl From<NewContact> for Contact {
    fn from(input: NewContact) -> Self {
        Contact {
            contact_name: input.contact_name,
            phone_number: input.phone_number,
            message: input.message,
            image_url: input.image_url,
        }
    }
}

/// Partial update input: `old_name` selects the record, the rest overwrite
/// field by field. A field is applied only when present and non-empty; an
/// empty string is ignored rather than clearing the stored value, matching
/// the service's long-standing update semantics.
#[derive(Clone, Debug, Deserialize)]
pub struct ContactUpdate {
    pub old_name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn provided(field: &Option<String>) -> Option<&String> {
    field.as_ref().filter(|v| !v.is_empty())
}

impl ContactUpdate {
    /// The subset of fields this update will actually overwrite.
    pub fn changes(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for (key, field) in [
            ("contact_name", &self.contact_name),
            ("phone_number", &self.phone_number),
            ("message", &self.message),
            ("image_url", &self.image_url),
        ] {
            if let Some(v) = provided(field) {
                map.insert(key.to_string(), Value::String(v.clone()));
            }
        }
        map
    }

    /// Overwrite the provided fields on `contact`, leaving the rest untouched.
    pub fn apply_to(&self, contact: &mut Contact) {
        if let Some(v) = provided(&self.contact_name) {
            contact.contact_name = v.clone();
        }
        if let Some(v) = provided(&self.phone_number) {
            contact.phone_number = Some(v.clone());
        }
        if let Some(v) = provided(&self.message) {
            contact.message = Some(v.clone());
        }
        if let Some(v) = provided(&self.image_url) {
            contact.image_url = Some(v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Contact {
        Contact {
            contact_name: "Alice".into(),
            phone_number: Some("555-1".into()),
            message: Some("hello".into()),
            image_url: None,
        }
    }

    #[test]
    fn new_contact_requires_a_name() {
        let input = NewContact {
            contact_name: "  ".into(),
            phone_number: None,
            message: None,
            image_url: None,
        };
        assert!(matches!(input.validate(), Err(ModelError::Validation(_))));
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let json = serde_json::to_value(alice()).expect("serialize");
        assert!(json.get("image_url").is_none());
        assert_eq!(json["phone_number"], "555-1");
    }

    #[test]
    fn update_applies_only_provided_fields() {
        let mut contact = alice();
        let update = ContactUpdate {
            old_name: "Alice".into(),
            contact_name: None,
            phone_number: Some("555-2".into()),
            message: None,
            image_url: None,
        };
        update.apply_to(&mut contact);
        assert_eq!(contact.phone_number.as_deref(), Some("555-2"));
        assert_eq!(contact.message.as_deref(), Some("hello"));
        assert_eq!(contact.contact_name, "Alice");
    }

    #[test]
    fn empty_string_does_not_clear_a_field() {
        let mut contact = alice();
        let update = ContactUpdate {
            old_name: "Alice".into(),
            contact_name: None,
            phone_number: Some(String::new()),
            message: None,
            image_url: None,
        };
        assert!(update.changes().is_empty());
        update.apply_to(&mut contact);
        assert_eq!(contact.phone_number.as_deref(), Some("555-1"));
    }

    #[test]
    fn changes_lists_the_applied_fields() {
        let update = ContactUpdate {
            old_name: "Alice".into(),
            contact_name: Some("Alicia".into()),
            phone_number: Some("555-9".into()),
            message: None,
            image_url: Some(String::new()),
        };
        let changes = update.changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes["contact_name"], "Alicia");
        assert_eq!(changes["phone_number"], "555-9");
    }
}
