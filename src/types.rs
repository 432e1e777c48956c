//! Property/type-model boundary.
//!
//! Resolving a column reference to a concrete property definition belongs
//! to the repository's type system, not to the walker. Backends that need
//! it take an explicit [`TypeResolver`] handle rather than an ambient
//! global registry, which keeps walks testable in isolation.

use std::collections::HashMap;

/// CMIS property data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Boolean,
    DateTime,
    Decimal,
    Html,
    Id,
    Integer,
    String,
    Uri,
}

impl DataType {
    /// Lowercase wire name (`"string"`, `"datetime"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::DateTime => "datetime",
            DataType::Decimal => "decimal",
            DataType::Html => "html",
            DataType::Id => "id",
            DataType::Integer => "integer",
            DataType::String => "string",
            DataType::Uri => "uri",
        }
    }

    /// Look up a data type by its wire name.
    pub fn from_name(name: &str) -> Option<DataType> {
        match name {
            "boolean" => Some(DataType::Boolean),
            "datetime" => Some(DataType::DateTime),
            "decimal" => Some(DataType::Decimal),
            "html" => Some(DataType::Html),
            "id" => Some(DataType::Id),
            "integer" => Some(DataType::Integer),
            "string" => Some(DataType::String),
            "uri" => Some(DataType::Uri),
            _ => None,
        }
    }
}

/// A resolved property definition.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    /// Repository-internal property id
    pub id: String,
    /// Name the property goes by in queries
    pub query_name: String,
    pub data_type: DataType,
    pub multi_valued: bool,
}

/// Resolves column query names to property definitions.
///
/// Returning `None` is the "not found" signal; what to do about it is the
/// backend's decision (the renderer treats it as fatal).
pub trait TypeResolver {
    fn resolve(&self, query_name: &str) -> Option<&PropertyDef>;
}

/// Map-backed resolver for embedders, tests, and the CLI.
#[derive(Debug, Default)]
pub struct StaticResolver {
    defs: HashMap<String, PropertyDef>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition under its query name.
    pub fn insert(&mut self, def: PropertyDef) {
        self.defs.insert(def.query_name.clone(), def);
    }
}

impl TypeResolver for StaticResolver {
    fn resolve(&self, query_name: &str) -> Option<&PropertyDef> {
        self.defs.get(query_name)
    }
}

#[test]
fn test_static_resolver_lookup() {
    let mut resolver = StaticResolver::new();
    resolver.insert(PropertyDef {
        id: "cmis:name".to_string(),
        query_name: "cmis:name".to_string(),
        data_type: DataType::String,
        multi_valued: false,
    });
    assert!(resolver.resolve("cmis:name").is_some());
    assert!(resolver.resolve("cmis:objectId").is_none());
}

#[test]
fn test_data_type_names() {
    assert_eq!(DataType::from_name("datetime"), Some(DataType::DateTime));
    assert_eq!(DataType::DateTime.name(), "datetime");
    assert_eq!(DataType::from_name("blob"), None);
}
