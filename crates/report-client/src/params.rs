use report_protocol::schema::FieldSpec;
use report_protocol::FieldValue;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Current values of one form, kept in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParameters {
    entries: Vec<(&'static str, FieldValue)>,
}

impl RequestParameters {
    pub fn from_schema(fields: &[FieldSpec]) -> Self {
        Self {
            entries: fields
                .iter()
                .map(|field| (field.name, field.initial_value()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Replaces an existing entry. Returns false when the form has no such field.
    pub fn set(&mut self, name: &str, value: FieldValue) -> bool {
        match self.entries.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    /// JSON object sent as the request body.
    pub fn to_payload(&self) -> Value {
        let mut map = Map::with_capacity(self.entries.len());
        for (name, value) in self.iter() {
            let value = match value {
                FieldValue::Number(number) => Value::from(*number),
                FieldValue::Text(text) => Value::String(text.clone()),
            };
            map.insert(name.to_string(), value);
        }
        Value::Object(map)
    }
}

impl Serialize for RequestParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
