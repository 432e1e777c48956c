//! Query-text translation backend.
//!
//! [`SqlRenderer`] walks a predicate tree and produces the canonical CMISQL
//! text of the clause: normalized spacing and keywords, re-escaped string
//! literals, RFC-3339 timestamps, and explicit parentheses around boolean
//! grouping. Repositories that push filtering down to another engine use
//! this as the starting point for their own translation.

use crate::ast::AstNode;
use crate::types::TypeResolver;
use crate::value::Value;
use crate::walker::{walk_expr, walk_predicate, ExpressionWalker, PredicateWalker, WalkError};

/// Renders a predicate tree to canonical text with no column resolution.
pub fn render(node: &AstNode) -> Result<String, WalkError> {
    SqlRenderer::new().render(node)
}

/// Walker that accumulates the rendered clause.
///
/// With an attached [`TypeResolver`], column references are rewritten to
/// their canonical query names and unknown columns are fatal; without one,
/// column text passes through untouched.
pub struct SqlRenderer<'a> {
    out: String,
    resolver: Option<&'a dyn TypeResolver>,
}

impl<'a> SqlRenderer<'a> {
    pub fn new() -> Self {
        SqlRenderer {
            out: String::new(),
            resolver: None,
        }
    }

    pub fn with_resolver(resolver: &'a dyn TypeResolver) -> Self {
        SqlRenderer {
            out: String::new(),
            resolver: Some(resolver),
        }
    }

    /// Walks the tree and returns the rendered clause.
    pub fn render(mut self, node: &AstNode) -> Result<String, WalkError> {
        walk_predicate(&mut self, node)?;
        Ok(self.out)
    }

    fn binary(&mut self, op: &str, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, left)?;
        self.out.push(' ');
        self.out.push_str(op);
        self.out.push(' ');
        walk_expr(self, right)?;
        Ok(false)
    }

    fn scoped(
        &mut self,
        keyword: &str,
        qualifier: Option<&AstNode>,
        param: &AstNode,
    ) -> Result<bool, WalkError> {
        self.out.push_str(keyword);
        self.out.push('(');
        if let Some(qual) = qualifier {
            // Correlation name, not a column: rendered verbatim.
            self.out.push_str(&qual.text);
            self.out.push_str(", ");
        }
        walk_expr(self, param)?;
        self.out.push(')');
        Ok(false)
    }
}

impl Default for SqlRenderer<'_> {
    fn default() -> Self {
        SqlRenderer::new()
    }
}

impl ExpressionWalker for SqlRenderer<'_> {
    fn walk_boolean(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        let value = Value::decode_boolean(&node.text)?;
        self.out.push_str(match value {
            Value::Boolean(true) => "TRUE",
            _ => "FALSE",
        });
        Ok(value)
    }

    fn walk_number(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        let value = Value::decode_number(&node.text)?;
        match &value {
            Value::Integer(n) => self.out.push_str(&n.to_string()),
            Value::Decimal(d) => self.out.push_str(&d.to_string()),
            _ => unreachable!("decode_number yields integer or decimal"),
        }
        Ok(value)
    }

    fn walk_string(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        let value = Value::decode_string(&node.text)?;
        if let Value::String(s) = &value {
            self.out.push('\'');
            self.out.push_str(&s.replace('\'', "''"));
            self.out.push('\'');
        }
        Ok(value)
    }

    fn walk_timestamp(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        let value = Value::decode_timestamp(&node.text)?;
        if let Value::Timestamp(dt) = &value {
            self.out.push_str("TIMESTAMP '");
            self.out.push_str(&dt.to_rfc3339());
            self.out.push('\'');
        }
        Ok(value)
    }

    fn walk_list(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        self.out.push('(');
        let mut items = Vec::with_capacity(node.children.len());
        for (i, child) in node.children.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            items.push(walk_expr(self, child)?);
        }
        self.out.push(')');
        Ok(Value::List(items))
    }

    fn walk_col(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        match self.resolver {
            Some(resolver) => match resolver.resolve(&node.text) {
                Some(def) => self.out.push_str(&def.query_name),
                None => return Err(WalkError::UnknownColumn(node.text.clone())),
            },
            None => self.out.push_str(&node.text),
        }
        Ok(Value::Null)
    }
}

impl PredicateWalker for SqlRenderer<'_> {
    fn walk_not(&mut self, _op: &AstNode, child: &AstNode) -> Result<bool, WalkError> {
        self.out.push_str("NOT (");
        walk_predicate(self, child)?;
        self.out.push(')');
        Ok(false)
    }

    fn walk_and(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        self.out.push('(');
        walk_predicate(self, left)?;
        self.out.push_str(" AND ");
        walk_predicate(self, right)?;
        self.out.push(')');
        Ok(false)
    }

    fn walk_or(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        self.out.push('(');
        walk_predicate(self, left)?;
        self.out.push_str(" OR ");
        walk_predicate(self, right)?;
        self.out.push(')');
        Ok(false)
    }

    fn walk_equals(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        self.binary("=", left, right)
    }

    fn walk_not_equals(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        self.binary("<>", left, right)
    }

    fn walk_greater_than(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        self.binary(">", left, right)
    }

    fn walk_greater_or_equals(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        self.binary(">=", left, right)
    }

    fn walk_less_than(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        self.binary("<", left, right)
    }

    fn walk_less_or_equals(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        self.binary("<=", left, right)
    }

    fn walk_in(&mut self, _op: &AstNode, col: &AstNode, list: &AstNode) -> Result<bool, WalkError> {
        self.binary("IN", col, list)
    }

    fn walk_not_in(&mut self, _op: &AstNode, col: &AstNode, list: &AstNode) -> Result<bool, WalkError> {
        self.binary("NOT IN", col, list)
    }

    fn walk_in_any(&mut self, _op: &AstNode, col: &AstNode, list: &AstNode) -> Result<bool, WalkError> {
        self.out.push_str("ANY ");
        self.binary("IN", col, list)
    }

    fn walk_not_in_any(&mut self, _op: &AstNode, col: &AstNode, list: &AstNode) -> Result<bool, WalkError> {
        self.out.push_str("ANY ");
        self.binary("NOT IN", col, list)
    }

    fn walk_eq_any(&mut self, _op: &AstNode, literal: &AstNode, col: &AstNode) -> Result<bool, WalkError> {
        // Quantified-any keeps its reversed operand order in the text too.
        self.binary("= ANY", literal, col)
    }

    fn walk_is_null(&mut self, _op: &AstNode, col: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, col)?;
        self.out.push_str(" IS NULL");
        Ok(false)
    }

    fn walk_is_not_null(&mut self, _op: &AstNode, col: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, col)?;
        self.out.push_str(" IS NOT NULL");
        Ok(false)
    }

    fn walk_like(&mut self, _op: &AstNode, col: &AstNode, pattern: &AstNode) -> Result<bool, WalkError> {
        self.binary("LIKE", col, pattern)
    }

    fn walk_not_like(&mut self, _op: &AstNode, col: &AstNode, pattern: &AstNode) -> Result<bool, WalkError> {
        self.binary("NOT LIKE", col, pattern)
    }

    fn walk_contains(
        &mut self,
        _op: &AstNode,
        qualifier: Option<&AstNode>,
        query: &AstNode,
    ) -> Result<bool, WalkError> {
        self.scoped("CONTAINS", qualifier, query)
    }

    fn walk_in_folder(
        &mut self,
        _op: &AstNode,
        qualifier: Option<&AstNode>,
        folder: &AstNode,
    ) -> Result<bool, WalkError> {
        self.scoped("IN_FOLDER", qualifier, folder)
    }

    fn walk_in_tree(
        &mut self,
        _op: &AstNode,
        qualifier: Option<&AstNode>,
        folder: &AstNode,
    ) -> Result<bool, WalkError> {
        self.scoped("IN_TREE", qualifier, folder)
    }
}
