//! Notion JSON encoding and decoding.
//!
//! Only the subset of the Notion object model the engine needs is handled:
//! titles, plain text, dates, selects and multi-selects. Everything else in
//! a response is ignored.

use crate::store::{Candidate, KeyFilter, Parent};
use atlas_model::{
    CollectionSchema, Properties, PropertyType, PropertyValue, Record, ResourceId, ResourceKind,
    SelectOption,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Notion caps a single rich text object at this many characters.
const MAX_TEXT_CHARS: usize = 2000;

/// A page of results from `/v1/search` or `/v1/databases/{id}/query`.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// The `object` filter value for a resource kind.
pub(crate) fn object_type(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Page => "page",
        ResourceKind::Collection => "database",
    }
}

fn property_type_key(property_type: PropertyType) -> &'static str {
    match property_type {
        PropertyType::Title => "title",
        PropertyType::Date => "date",
        PropertyType::Text => "rich_text",
        PropertyType::Select => "select",
        PropertyType::MultiSelect => "multi_select",
    }
}

/// Rich text array for `text`, split into store-sized chunks.
pub(crate) fn rich_text(text: &str) -> Value {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return json!([]);
    }
    let segments: Vec<Value> = chars
        .chunks(MAX_TEXT_CHARS)
        .map(|chunk| {
            let content: String = chunk.iter().collect();
            json!({"type": "text", "text": {"content": content}})
        })
        .collect();
    Value::Array(segments)
}

/// Joins the `plain_text` of every segment; `None` if the value is not a
/// non-empty rich text array.
pub(crate) fn plain_text(value: &Value) -> Option<String> {
    let segments = value.as_array()?;
    if segments.is_empty() {
        return None;
    }
    let mut out = String::new();
    for segment in segments {
        out.push_str(segment.get("plain_text")?.as_str()?);
    }
    Some(out)
}

pub(crate) fn search_body(query: &str, kind: ResourceKind, page_size: u32) -> Value {
    json!({
        "query": query,
        "filter": {"property": "object", "value": object_type(kind)},
        "page_size": page_size,
    })
}

pub(crate) fn parent_json(parent: &Parent) -> Value {
    match parent {
        Parent::Workspace => json!({"type": "workspace", "workspace": true}),
        Parent::Page(id) => json!({"type": "page_id", "page_id": id.as_str()}),
    }
}

pub(crate) fn page_create_body(parent: &Parent, title: &str) -> Value {
    json!({
        "parent": parent_json(parent),
        "properties": {"title": {"title": rich_text(title)}},
    })
}

pub(crate) fn database_create_body(page_id: &ResourceId, title: &str, schema: &CollectionSchema) -> Value {
    json!({
        "parent": {"type": "page_id", "page_id": page_id.as_str()},
        "title": rich_text(title),
        "properties": schema_json(schema),
    })
}

fn options_json(options: Option<&Vec<SelectOption>>) -> Value {
    let options: Vec<Value> = options
        .map(|opts| {
            opts.iter()
                .map(|o| match o.color {
                    Some(color) => json!({"name": o.name, "color": color.as_str()}),
                    None => json!({"name": o.name}),
                })
                .collect()
        })
        .unwrap_or_default();
    json!({"options": options})
}

/// Database property configuration for a schema.
pub(crate) fn schema_json(schema: &CollectionSchema) -> Value {
    let mut properties = Map::new();
    for property in &schema.properties {
        let key = property_type_key(property.property_type);
        let config = match property.property_type {
            PropertyType::Select | PropertyType::MultiSelect => options_json(property.options.as_ref()),
            _ => json!({}),
        };
        properties.insert(
            property.name.clone(),
            json!({"name": property.name, "type": key, key: config}),
        );
    }
    Value::Object(properties)
}

fn value_json(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Title(s) => json!({"title": rich_text(s)}),
        PropertyValue::Text(s) => json!({"rich_text": rich_text(s)}),
        PropertyValue::Date(s) => json!({"date": {"start": s}}),
        PropertyValue::Select(s) => json!({"select": {"name": s}}),
        PropertyValue::MultiSelect(names) => {
            let names: Vec<Value> = names.iter().map(|n| json!({"name": n})).collect();
            json!({"multi_select": names})
        }
    }
}

/// Page property values for a record write.
pub(crate) fn properties_json(props: &Properties) -> Value {
    let mut map = Map::new();
    for (name, value) in props.iter() {
        map.insert(name.to_string(), value_json(value));
    }
    Value::Object(map)
}

pub(crate) fn record_create_body(collection_id: &ResourceId, props: &Properties) -> Value {
    json!({
        "parent": {"type": "database_id", "database_id": collection_id.as_str()},
        "properties": properties_json(props),
    })
}

pub(crate) fn query_body(filter: &KeyFilter, page_size: u32) -> Value {
    let key = property_type_key(filter.property_type);
    json!({
        "filter": {"property": filter.property, key: {"equals": filter.equals}},
        "page_size": page_size,
    })
}

fn parent_id(value: &Value) -> Option<ResourceId> {
    let parent = value.get("parent")?;
    let key = parent.get("type")?.as_str()?;
    if key == "workspace" {
        return None;
    }
    parent.get(key)?.as_str().map(ResourceId::from)
}

/// Title as displayed: `properties.title` for pages, `title` for databases.
pub(crate) fn resource_title(value: &Value, kind: ResourceKind) -> Option<String> {
    match kind {
        ResourceKind::Page => plain_text(value.get("properties")?.get("title")?.get("title")?),
        ResourceKind::Collection => plain_text(value.get("title")?),
    }
}

/// Decodes a search result. Entries without an id, or archived ones, are
/// dropped; an unreadable title is kept as `None`.
pub(crate) fn decode_candidate(value: &Value, kind: ResourceKind) -> Option<Candidate> {
    let id = value.get("id")?.as_str()?;
    let archived = value.get("archived").and_then(Value::as_bool).unwrap_or(false)
        || value.get("in_trash").and_then(Value::as_bool).unwrap_or(false);
    if archived {
        return None;
    }
    Some(Candidate {
        id: ResourceId::from(id),
        kind,
        title: resource_title(value, kind),
        parent_id: parent_id(value),
    })
}

fn decode_value(property: &Value) -> Option<PropertyValue> {
    let key = property.get("type")?.as_str()?;
    let inner = property.get(key)?;
    match key {
        "title" => Some(PropertyValue::Title(plain_text(inner).unwrap_or_default())),
        "rich_text" => Some(PropertyValue::Text(plain_text(inner).unwrap_or_default())),
        "date" => inner
            .get("start")
            .and_then(Value::as_str)
            .map(|s| PropertyValue::Date(s.to_string())),
        "select" => inner
            .get("name")
            .and_then(Value::as_str)
            .map(|s| PropertyValue::Select(s.to_string())),
        "multi_select" => {
            let names = inner
                .as_array()?
                .iter()
                .filter_map(|o| o.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            Some(PropertyValue::MultiSelect(names))
        }
        _ => None,
    }
}

/// Decodes a database row. `collection_hint` is used when the row does not
/// name its database (e.g. a trimmed update response).
pub(crate) fn decode_record(value: &Value, collection_hint: Option<&ResourceId>) -> Option<Record> {
    let id = value.get("id")?.as_str()?;
    let collection_id = value
        .get("parent")
        .and_then(|p| p.get("database_id"))
        .and_then(Value::as_str)
        .map(ResourceId::from)
        .or_else(|| collection_hint.cloned())?;

    let properties = value
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .filter_map(|(name, prop)| decode_value(prop).map(|v| (name.clone(), v)))
                .collect()
        })
        .unwrap_or_default();

    Some(Record {
        id: ResourceId::from(id),
        collection_id,
        properties,
    })
}
