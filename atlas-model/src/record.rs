use crate::ids::ResourceId;
use crate::schema::PropertyType;
use serde::{Deserialize, Serialize};

/// A typed value written to, or read back from, one record property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Title(String),
    Text(String),
    /// ISO-8601 start date or date-time.
    Date(String),
    Select(String),
    MultiSelect(Vec<String>),
}

impl PropertyValue {
    /// The schema type this value belongs to.
    pub const fn property_type(&self) -> PropertyType {
        match self {
            Self::Title(_) => PropertyType::Title,
            Self::Text(_) => PropertyType::Text,
            Self::Date(_) => PropertyType::Date,
            Self::Select(_) => PropertyType::Select,
            Self::MultiSelect(_) => PropertyType::MultiSelect,
        }
    }

    /// Returns the scalar text of the value; `None` for multi-select.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Title(s) | Self::Text(s) | Self::Date(s) | Self::Select(s) => Some(s),
            Self::MultiSelect(_) => None,
        }
    }
}

/// An ordered set of named property values.
///
/// Setting a name that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(Vec<(String, PropertyValue)>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Properties::set`].
    #[must_use]
    pub fn with(mut self, name: &str, value: PropertyValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: PropertyValue) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Scalar text of a property, if present.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_text)
    }

    /// Applies a partial update: every property named in `update` is
    /// overwritten, everything else is kept.
    pub fn merge(&mut self, update: &Properties) {
        for (name, value) in update.iter() {
            self.set(name, value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, PropertyValue)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (name, value) in iter {
            props.set(&name, value);
        }
        props
    }
}

/// One row of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: ResourceId,
    pub collection_id: ResourceId,
    pub properties: Properties,
}

impl Record {
    /// Scalar text of a property, if present.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.properties.text(name)
    }
}
