//! In-memory evaluation backend.
//!
//! [`Matcher`] overrides the walker hooks to evaluate a predicate tree to a
//! real boolean against one candidate object, supplied through the
//! [`PropertySource`] trait. This is the backend a repository uses when
//! scanning objects that no index has pre-filtered.
//!
//! Semantics are two-valued: a comparison involving an unset property
//! (`Null`) is false, and `NOT` negates plainly. `AND`/`OR` short-circuit,
//! so a subtree skipped by the left operand is never walked.

use std::cmp::Ordering;
use std::collections::HashMap;

use regex::Regex;
use rust_decimal::Decimal;

use crate::ast::AstNode;
use crate::value::Value;
use crate::walker::{walk_expr, walk_predicate, ExpressionWalker, PredicateWalker, WalkError};

/// A candidate object the matcher evaluates against.
///
/// Only `property` is required; the content and folder accessors default to
/// "absent", which makes `CONTAINS`, `IN_FOLDER` and `IN_TREE` evaluate to
/// no-match.
pub trait PropertySource {
    /// Value of a property by query name, `None` when unset.
    fn property(&self, name: &str) -> Option<Value>;

    /// Full-text content of the object, if any.
    fn content(&self) -> Option<&str> {
        None
    }

    /// Id of the directly containing folder.
    fn parent_id(&self) -> Option<&str> {
        None
    }

    /// Whether the object lives anywhere under the given folder.
    fn in_tree_of(&self, _folder_id: &str) -> bool {
        false
    }
}

/// Map-backed [`PropertySource`] for embedders, tests, and the CLI.
#[derive(Debug, Clone, Default)]
pub struct Document {
    properties: HashMap<String, Value>,
    content: Option<String>,
    parent: Option<String>,
    ancestors: Vec<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Attaches full-text content for `CONTAINS`.
    pub fn with_content(mut self, text: impl Into<String>) -> Self {
        self.content = Some(text.into());
        self
    }

    /// Sets the directly containing folder for `IN_FOLDER`.
    pub fn with_parent(mut self, folder_id: impl Into<String>) -> Self {
        self.parent = Some(folder_id.into());
        self
    }

    /// Sets the ancestor folder chain for `IN_TREE` (nearest first; the
    /// parent folder is implied and need not be repeated).
    pub fn with_ancestors(mut self, folder_ids: Vec<String>) -> Self {
        self.ancestors = folder_ids;
        self
    }
}

impl PropertySource for Document {
    fn property(&self, name: &str) -> Option<Value> {
        self.properties.get(name).cloned()
    }

    fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    fn in_tree_of(&self, folder_id: &str) -> bool {
        self.parent.as_deref() == Some(folder_id)
            || self.ancestors.iter().any(|id| id == folder_id)
    }
}

/// Predicate evaluator over a single [`PropertySource`].
///
/// Holds no state beyond the source reference, so one matcher can evaluate
/// many trees and repeated walks of the same tree yield the same decision.
pub struct Matcher<'a> {
    source: &'a dyn PropertySource,
}

impl<'a> Matcher<'a> {
    pub fn new(source: &'a dyn PropertySource) -> Self {
        Matcher { source }
    }

    /// Evaluates a predicate tree against the source object.
    pub fn matches(&mut self, predicate: &AstNode) -> Result<bool, WalkError> {
        walk_predicate(self, predicate)
    }

    fn operand(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        walk_expr(self, node)
    }
}

impl ExpressionWalker for Matcher<'_> {
    fn walk_col(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        Ok(self.source.property(&node.text).unwrap_or(Value::Null))
    }
}

impl PredicateWalker for Matcher<'_> {
    fn walk_not(&mut self, _op: &AstNode, child: &AstNode) -> Result<bool, WalkError> {
        Ok(!walk_predicate(self, child)?)
    }

    fn walk_and(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        if !walk_predicate(self, left)? {
            return Ok(false);
        }
        walk_predicate(self, right)
    }

    fn walk_or(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        if walk_predicate(self, left)? {
            return Ok(true);
        }
        walk_predicate(self, right)
    }

    fn walk_equals(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        let l = self.operand(left)?;
        let r = self.operand(right)?;
        Ok(compare_eq(&l, &r) == Some(true))
    }

    fn walk_not_equals(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        let l = self.operand(left)?;
        let r = self.operand(right)?;
        Ok(compare_eq(&l, &r) == Some(false))
    }

    fn walk_greater_than(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        let l = self.operand(left)?;
        let r = self.operand(right)?;
        Ok(compare_order(&l, &r).is_some_and(Ordering::is_gt))
    }

    fn walk_greater_or_equals(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        let l = self.operand(left)?;
        let r = self.operand(right)?;
        Ok(compare_order(&l, &r).is_some_and(Ordering::is_ge))
    }

    fn walk_less_than(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        let l = self.operand(left)?;
        let r = self.operand(right)?;
        Ok(compare_order(&l, &r).is_some_and(Ordering::is_lt))
    }

    fn walk_less_or_equals(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        let l = self.operand(left)?;
        let r = self.operand(right)?;
        Ok(compare_order(&l, &r).is_some_and(Ordering::is_le))
    }

    fn walk_in(&mut self, _op: &AstNode, col: &AstNode, list: &AstNode) -> Result<bool, WalkError> {
        let value = self.operand(col)?;
        let list = self.operand(list)?;
        if value.is_null() {
            return Ok(false);
        }
        Ok(list_contains(&value, &list))
    }

    fn walk_not_in(&mut self, _op: &AstNode, col: &AstNode, list: &AstNode) -> Result<bool, WalkError> {
        let value = self.operand(col)?;
        let list = self.operand(list)?;
        if value.is_null() {
            return Ok(false);
        }
        Ok(!list_contains(&value, &list))
    }

    fn walk_in_any(&mut self, _op: &AstNode, col: &AstNode, list: &AstNode) -> Result<bool, WalkError> {
        let values = self.operand(col)?;
        let list = self.operand(list)?;
        match values.as_list() {
            Some(items) => Ok(items.iter().any(|v| list_contains(v, &list))),
            None => Ok(false),
        }
    }

    fn walk_not_in_any(&mut self, _op: &AstNode, col: &AstNode, list: &AstNode) -> Result<bool, WalkError> {
        let values = self.operand(col)?;
        let list = self.operand(list)?;
        match values.as_list() {
            Some(items) => Ok(!items.iter().any(|v| list_contains(v, &list))),
            None => Ok(false),
        }
    }

    fn walk_eq_any(&mut self, _op: &AstNode, literal: &AstNode, col: &AstNode) -> Result<bool, WalkError> {
        // Literal resolves first; the quantified column binds on the right.
        let needle = self.operand(literal)?;
        let values = self.operand(col)?;
        match &values {
            Value::List(items) => Ok(items.iter().any(|v| compare_eq(&needle, v) == Some(true))),
            Value::Null => Ok(false),
            single => Ok(compare_eq(&needle, single) == Some(true)),
        }
    }

    fn walk_is_null(&mut self, _op: &AstNode, col: &AstNode) -> Result<bool, WalkError> {
        // An empty multi-valued property counts as not set.
        Ok(match self.operand(col)? {
            Value::Null => true,
            Value::List(items) => items.is_empty(),
            _ => false,
        })
    }

    fn walk_is_not_null(&mut self, _op: &AstNode, col: &AstNode) -> Result<bool, WalkError> {
        Ok(match self.operand(col)? {
            Value::Null => false,
            Value::List(items) => !items.is_empty(),
            _ => true,
        })
    }

    fn walk_like(&mut self, _op: &AstNode, col: &AstNode, pattern: &AstNode) -> Result<bool, WalkError> {
        let value = self.operand(col)?;
        let pattern = self.operand(pattern)?;
        let Some(pattern) = pattern.as_str() else {
            return Err(WalkError::Unsupported(
                "LIKE pattern must be a string literal".to_string(),
            ));
        };
        match value.as_str() {
            Some(s) => Ok(like_regex(pattern)?.is_match(s)),
            None => Ok(false),
        }
    }

    fn walk_not_like(&mut self, _op: &AstNode, col: &AstNode, pattern: &AstNode) -> Result<bool, WalkError> {
        let value = self.operand(col)?;
        let pattern = self.operand(pattern)?;
        let Some(pattern) = pattern.as_str() else {
            return Err(WalkError::Unsupported(
                "LIKE pattern must be a string literal".to_string(),
            ));
        };
        match value.as_str() {
            Some(s) => Ok(!like_regex(pattern)?.is_match(s)),
            None => Ok(false),
        }
    }

    fn walk_contains(
        &mut self,
        _op: &AstNode,
        qualifier: Option<&AstNode>,
        query: &AstNode,
    ) -> Result<bool, WalkError> {
        if let Some(qual) = qualifier {
            self.operand(qual)?;
        }
        let query = self.operand(query)?;
        let Some(query) = query.as_str() else {
            return Err(WalkError::Unsupported(
                "CONTAINS query must be a string literal".to_string(),
            ));
        };
        match self.source.content() {
            Some(content) => Ok(contains_match(content, query)),
            None => {
                log::debug!("CONTAINS evaluated against an object without content text");
                Ok(false)
            }
        }
    }

    fn walk_in_folder(
        &mut self,
        _op: &AstNode,
        qualifier: Option<&AstNode>,
        folder: &AstNode,
    ) -> Result<bool, WalkError> {
        if let Some(qual) = qualifier {
            self.operand(qual)?;
        }
        let folder = self.operand(folder)?;
        let Some(folder_id) = folder.as_str() else {
            return Err(WalkError::Unsupported(
                "IN_FOLDER takes a folder-id string".to_string(),
            ));
        };
        Ok(self.source.parent_id() == Some(folder_id))
    }

    fn walk_in_tree(
        &mut self,
        _op: &AstNode,
        qualifier: Option<&AstNode>,
        folder: &AstNode,
    ) -> Result<bool, WalkError> {
        if let Some(qual) = qualifier {
            self.operand(qual)?;
        }
        let folder = self.operand(folder)?;
        let Some(folder_id) = folder.as_str() else {
            return Err(WalkError::Unsupported(
                "IN_TREE takes a folder-id string".to_string(),
            ));
        };
        Ok(self.source.in_tree_of(folder_id))
    }
}

/// Ordering across values, coercing integer against decimal. `None` when
/// the pair is incomparable (including anything involving `Null`).
fn compare_order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Integer(a), Value::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
        (Value::Decimal(a), Value::Integer(b)) => Some(a.cmp(&Decimal::from(*b))),
        (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare_eq(left: &Value, right: &Value) -> Option<bool> {
    compare_order(left, right).map(Ordering::is_eq)
}

fn list_contains(needle: &Value, list: &Value) -> bool {
    match list.as_list() {
        Some(items) => items.iter().any(|v| compare_eq(needle, v) == Some(true)),
        None => compare_eq(needle, list) == Some(true),
    }
}

/// Translates a SQL `LIKE` pattern into an anchored regex: `%` matches any
/// run, `_` any single character, and a backslash escapes the next
/// character literally.
fn like_regex(pattern: &str) -> Result<Regex, WalkError> {
    let mut re = String::with_capacity(pattern.len() + 2);
    re.push('^');
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => re.push_str(&regex::escape(&escaped.to_string())),
                None => {
                    return Err(WalkError::Unsupported(
                        "LIKE pattern ends with a dangling escape".to_string(),
                    ))
                }
            },
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re)
        .map_err(|_| WalkError::Unsupported(format!("LIKE pattern '{}'", pattern)))
}

/// All-terms full-text match, case-insensitive; a `-term` must be absent.
fn contains_match(content: &str, query: &str) -> bool {
    let haystack = content.to_lowercase();
    for term in query.split_whitespace() {
        if let Some(excluded) = term.strip_prefix('-') {
            if !excluded.is_empty() && haystack.contains(&excluded.to_lowercase()) {
                return false;
            }
        } else if !haystack.contains(&term.to_lowercase()) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_regex_translation() {
        assert!(like_regex("a%").unwrap().is_match("abc"));
        assert!(like_regex("a_c").unwrap().is_match("abc"));
        assert!(!like_regex("a_c").unwrap().is_match("abbc"));
        assert!(like_regex("100\\%").unwrap().is_match("100%"));
        assert!(!like_regex("100\\%").unwrap().is_match("100x"));
        assert!(like_regex("a.b").unwrap().is_match("a.b"));
        assert!(!like_regex("a.b").unwrap().is_match("axb"));
        assert!(like_regex("\\").is_err());
    }

    #[test]
    fn test_contains_terms() {
        assert!(contains_match("The quick brown fox", "quick fox"));
        assert!(!contains_match("The quick brown fox", "quick wolf"));
        assert!(contains_match("The quick brown fox", "QUICK"));
        assert!(!contains_match("The quick brown fox", "quick -brown"));
        assert!(contains_match("The quick fox", "quick -brown"));
    }

    #[test]
    fn test_numeric_coercion() {
        let int = Value::Integer(4);
        let dec = Value::Decimal("4.0".parse().unwrap());
        assert_eq!(compare_eq(&int, &dec), Some(true));
        assert_eq!(
            compare_order(&Value::Integer(4), &Value::Decimal("4.5".parse().unwrap())),
            Some(Ordering::Less)
        );
        assert_eq!(compare_order(&Value::Null, &Value::Integer(1)), None);
        assert_eq!(
            compare_order(&Value::String("a".into()), &Value::Integer(1)),
            None
        );
    }
}
