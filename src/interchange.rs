//! JSON interchange at the parser boundary.
//!
//! The CMISQL parser lives outside this crate; predicate trees, candidate
//! documents, and property schemas cross the process boundary as JSON. A
//! tree node is `{"kind": "EQ", "text": "...", "children": [...]}` with
//! `text` and `children` omitted when empty. An unrecognized kind name is
//! an error here, the boundary counterpart of the walkers' unknown-kind
//! fatality.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::Value as Json;

use crate::ast::{AstNode, NodeKind};
use crate::matcher::Document;
use crate::types::{DataType, PropertyDef, StaticResolver};
use crate::value::Value;

/// Errors from malformed interchange JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum InterchangeError {
    /// A tree node must be a JSON object
    NotAnObject,
    /// A tree node must carry a string `kind`
    MissingKind,
    /// Kind name outside the fixed enumeration
    UnknownKind(String),
    /// `children` must be an array
    BadChildren,
    /// Malformed schema entry
    BadSchema(String),
    /// Malformed candidate document
    BadDocument(String),
}

impl std::fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterchangeError::NotAnObject => write!(f, "Tree node must be a JSON object"),
            InterchangeError::MissingKind => write!(f, "Tree node is missing its 'kind'"),
            InterchangeError::UnknownKind(name) => write!(f, "Unknown node kind: {}", name),
            InterchangeError::BadChildren => write!(f, "'children' must be an array"),
            InterchangeError::BadSchema(msg) => write!(f, "Invalid schema: {}", msg),
            InterchangeError::BadDocument(msg) => write!(f, "Invalid document: {}", msg),
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Reads a predicate tree from its JSON form.
pub fn node_from_json(json: &Json) -> Result<AstNode, InterchangeError> {
    let obj = json.as_object().ok_or(InterchangeError::NotAnObject)?;
    let kind_name = obj
        .get("kind")
        .and_then(Json::as_str)
        .ok_or(InterchangeError::MissingKind)?;
    let kind = NodeKind::from_name(kind_name)
        .ok_or_else(|| InterchangeError::UnknownKind(kind_name.to_string()))?;
    let text = obj
        .get("text")
        .and_then(Json::as_str)
        .unwrap_or("")
        .to_string();
    let mut children = Vec::new();
    if let Some(raw) = obj.get("children") {
        let array = raw.as_array().ok_or(InterchangeError::BadChildren)?;
        for child in array {
            children.push(node_from_json(child)?);
        }
    }
    Ok(AstNode {
        kind,
        text,
        children,
    })
}

/// Writes a predicate tree to its JSON form.
pub fn node_to_json(node: &AstNode) -> Json {
    let mut obj = serde_json::Map::new();
    obj.insert("kind".to_string(), Json::String(node.kind.name().to_string()));
    if !node.text.is_empty() {
        obj.insert("text".to_string(), Json::String(node.text.clone()));
    }
    if !node.children.is_empty() {
        obj.insert(
            "children".to_string(),
            Json::Array(node.children.iter().map(node_to_json).collect()),
        );
    }
    Json::Object(obj)
}

/// Renders a decoded value as JSON.
///
/// Decimals become JSON numbers (approximate, per the literal contract:
/// exact for integers, approximate for decimals), timestamps RFC-3339
/// strings, lists arrays in order.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Boolean(b) => Json::Bool(*b),
        Value::Integer(n) => Json::from(*n),
        Value::Decimal(d) => match d.to_f64().and_then(serde_json::Number::from_f64) {
            Some(n) => Json::Number(n),
            None => Json::String(d.to_string()),
        },
        Value::String(s) => Json::String(s.clone()),
        Value::Timestamp(dt) => Json::String(dt.to_rfc3339()),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
    }
}

/// Loads a [`StaticResolver`] from a schema document: an array of
/// `{"id", "queryName", "dataType", "multiValued"}` entries, where
/// `queryName` defaults to `id` and `multiValued` to false.
pub fn resolver_from_json(json: &Json) -> Result<StaticResolver, InterchangeError> {
    let entries = json
        .as_array()
        .ok_or_else(|| InterchangeError::BadSchema("expected an array".to_string()))?;
    let mut resolver = StaticResolver::new();
    for entry in entries {
        let obj = entry
            .as_object()
            .ok_or_else(|| InterchangeError::BadSchema("entry must be an object".to_string()))?;
        let id = obj
            .get("id")
            .and_then(Json::as_str)
            .ok_or_else(|| InterchangeError::BadSchema("entry is missing 'id'".to_string()))?;
        let query_name = obj
            .get("queryName")
            .and_then(Json::as_str)
            .unwrap_or(id);
        let data_type_name = obj
            .get("dataType")
            .and_then(Json::as_str)
            .ok_or_else(|| InterchangeError::BadSchema(format!("{}: missing 'dataType'", id)))?;
        let data_type = DataType::from_name(data_type_name).ok_or_else(|| {
            InterchangeError::BadSchema(format!("{}: unknown data type '{}'", id, data_type_name))
        })?;
        let multi_valued = obj
            .get("multiValued")
            .and_then(Json::as_bool)
            .unwrap_or(false);
        resolver.insert(PropertyDef {
            id: id.to_string(),
            query_name: query_name.to_string(),
            data_type,
            multi_valued,
        });
    }
    Ok(resolver)
}

/// Reads a candidate document for the matcher.
///
/// Two forms are accepted: a flat object, where every field is a property,
/// or an envelope `{"properties": {...}, "content": "...", "parentId":
/// "...", "ancestorIds": [...]}` when folder scoping or full-text content
/// is needed.
pub fn document_from_json(json: &Json) -> Result<Document, InterchangeError> {
    let obj = json
        .as_object()
        .ok_or_else(|| InterchangeError::BadDocument("expected an object".to_string()))?;

    let (properties, envelope) = match obj.get("properties").and_then(Json::as_object) {
        Some(props) => (props, true),
        None => (obj, false),
    };
    let mut doc = Document::new();
    for (name, raw) in properties {
        doc = doc.with_property(name, property_value(name, raw)?);
    }

    if envelope {
        if let Some(content) = obj.get("content").and_then(Json::as_str) {
            doc = doc.with_content(content);
        }
        if let Some(parent) = obj.get("parentId").and_then(Json::as_str) {
            doc = doc.with_parent(parent);
        }
        if let Some(ancestors) = obj.get("ancestorIds").and_then(Json::as_array) {
            let ids = ancestors
                .iter()
                .map(|id| {
                    id.as_str().map(str::to_string).ok_or_else(|| {
                        InterchangeError::BadDocument("ancestorIds must be strings".to_string())
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            doc = doc.with_ancestors(ids);
        }
    }
    Ok(doc)
}

fn property_value(name: &str, json: &Json) -> Result<Value, InterchangeError> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Boolean(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Integer(i))
            } else {
                n.as_f64()
                    .and_then(Decimal::from_f64)
                    .map(Value::Decimal)
                    .ok_or_else(|| {
                        InterchangeError::BadDocument(format!("{}: unrepresentable number", name))
                    })
            }
        }
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(property_value(name, item)?);
            }
            Ok(Value::List(values))
        }
        Json::Object(_) => Err(InterchangeError::BadDocument(format!(
            "{}: nested objects are not property values",
            name
        ))),
    }
}
