use crate::ModelError;
use serde::{Deserialize, Serialize};

/// Ordered property layout of a collection, supplied once at creation time.
///
/// The engine never migrates an existing collection: if a collection is
/// found by name its live schema is left as is, even when it differs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub properties: Vec<PropertySpec>,
}

impl CollectionSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a property, keeping declaration order.
    #[must_use]
    pub fn with(mut self, property: PropertySpec) -> Self {
        self.properties.push(property);
        self
    }

    /// Looks up a property by exact name.
    pub fn get(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The property holding each record's title.
    pub fn title_property(&self) -> Option<&PropertySpec> {
        self.properties
            .iter()
            .find(|p| p.property_type == PropertyType::Title)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Checks the schema can be created: exactly one title property and no
    /// repeated names.
    pub fn validate(&self) -> Result<(), ModelError> {
        let titles = self
            .properties
            .iter()
            .filter(|p| p.property_type == PropertyType::Title)
            .count();
        if titles != 1 {
            return Err(ModelError::InvalidSchema(format!(
                "expected exactly one title property, found {titles}"
            )));
        }

        for (i, property) in self.properties.iter().enumerate() {
            if property.name.trim().is_empty() {
                return Err(ModelError::InvalidSchema("empty property name".into()));
            }
            if self.properties[..i].iter().any(|p| p.name == property.name) {
                return Err(ModelError::InvalidSchema(format!(
                    "duplicate property: {}",
                    property.name
                )));
            }
        }
        Ok(())
    }
}

/// One named property of a collection schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySpec {
    pub name: String,
    pub property_type: PropertyType,
    /// Allowed options. Only meaningful for select and multi-select.
    /// `None` lets the store create options on demand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

impl PropertySpec {
    fn simple(name: &str, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            options: None,
        }
    }

    /// Shorthand for the title property.
    pub fn title(name: &str) -> Self {
        Self::simple(name, PropertyType::Title)
    }

    /// Shorthand for a date property.
    pub fn date(name: &str) -> Self {
        Self::simple(name, PropertyType::Date)
    }

    /// Shorthand for a plain text property.
    pub fn text(name: &str) -> Self {
        Self::simple(name, PropertyType::Text)
    }

    /// Shorthand for a single-select property with fixed options.
    pub fn select(name: &str, options: Vec<SelectOption>) -> Self {
        Self {
            name: name.into(),
            property_type: PropertyType::Select,
            options: Some(options),
        }
    }

    /// Shorthand for a multi-select property whose options are created on demand.
    pub fn multi_select(name: &str) -> Self {
        Self::simple(name, PropertyType::MultiSelect)
    }
}

/// The data type of a collection property.
///
/// Select options live on [`PropertySpec`] rather than inside this enum so
/// the serialized form stays flat: `{"property_type": "select", "options": [...]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Title,
    Date,
    Text,
    Select,
    MultiSelect,
}

/// A selectable option with an optional display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SelectColor>,
}

impl SelectOption {
    pub fn new(name: &str, color: SelectColor) -> Self {
        Self {
            name: name.into(),
            color: Some(color),
        }
    }

    /// An option left to the store's default color.
    pub fn plain(name: &str) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }
}

/// Option colors understood by the workspace store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectColor {
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
}

impl SelectColor {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Gray => "gray",
            Self::Brown => "brown",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Red => "red",
        }
    }
}
