//! Validate and translate predicate trees

use super::CliError;
use crate::ast::AstNode;
use crate::interchange::{node_from_json, resolver_from_json};
use crate::render::{self, SqlRenderer};
use crate::validate::validate_predicate;

/// Parses a predicate tree from JSON text and validates its shape.
pub fn load_predicate(tree_json: &str) -> Result<AstNode, CliError> {
    let json: serde_json::Value = serde_json::from_str(tree_json)?;
    let node = node_from_json(&json)?;
    validate_predicate(&node)?;
    Ok(node)
}

/// Checks that the input is a well-formed predicate tree.
pub fn execute_check(tree_json: &str) -> Result<(), CliError> {
    load_predicate(tree_json).map(|_| ())
}

/// Renders a predicate tree as canonical CMISQL text, resolving columns
/// against a schema when one is given.
pub fn execute_render(tree_json: &str, schema_json: Option<&str>) -> Result<String, CliError> {
    let node = load_predicate(tree_json)?;
    match schema_json {
        Some(schema) => {
            let json: serde_json::Value = serde_json::from_str(schema)?;
            let resolver = resolver_from_json(&json)?;
            Ok(SqlRenderer::with_resolver(&resolver).render(&node)?)
        }
        None => Ok(render::render(&node)?),
    }
}
