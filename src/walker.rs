//! Predicate and expression walkers.
//!
//! The walkers are the extension seam of the crate: dispatch on
//! [`NodeKind`] is closed (the free functions [`walk_predicate`] and
//! [`walk_expr`] own it, with exhaustive matches), while every per-kind
//! hook is replaceable. A backend implements [`PredicateWalker`] and
//! overrides the hooks it cares about; hooks it leaves alone keep the
//! default behavior: pure left-to-right traversal with no semantic
//! effect, returning `Ok(false)` ("no decision") for predicates and the
//! decoded literal (or `Value::Null` for column references) for
//! expressions.
//!
//! The walkers hold no state of their own: all state lives in the backend,
//! so one backend instance can walk many trees and distinct evaluations
//! can run on separate threads without sharing.
//!
//! The dispatchers never short-circuit. A backend implementing `AND`/`OR`
//! semantics decides for itself whether to skip a child by not calling
//! [`walk_predicate`] on it; the dispatcher only guarantees that children
//! it does visit are visited in textual order.

use crate::ast::{AstNode, NodeKind};
use crate::value::{DecodeError, Value};

/// Errors raised while walking a predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum WalkError {
    /// A non-predicate kind reached the predicate dispatcher
    UnknownPredicate { kind: NodeKind, text: String },
    /// A non-expression kind reached the expression dispatcher
    UnknownExpression { kind: NodeKind, text: String },
    /// A column reference the backend's resolver does not know
    UnknownColumn(String),
    /// A literal payload failed to decode
    Decode(DecodeError),
    /// A construct the backend does not support
    Unsupported(String),
}

impl std::fmt::Display for WalkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalkError::UnknownPredicate { kind, text } => {
                write!(f, "Unknown predicate node: {} ({})", kind, text)
            }
            WalkError::UnknownExpression { kind, text } => {
                write!(f, "Unknown expression node: {} ({})", kind, text)
            }
            WalkError::UnknownColumn(name) => write!(f, "Unknown column: {}", name),
            WalkError::Decode(e) => write!(f, "Literal decode error: {}", e),
            WalkError::Unsupported(what) => write!(f, "Unsupported construct: {}", what),
        }
    }
}

impl std::error::Error for WalkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WalkError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for WalkError {
    fn from(e: DecodeError) -> Self {
        WalkError::Decode(e)
    }
}

/// Hook set for expression nodes.
///
/// Base hooks decode literals through [`Value`], preserve list order, and
/// resolve column references to `Value::Null` (resolving a column to a
/// concrete property needs the external type model, so it is a pure
/// extension point).
pub trait ExpressionWalker {
    /// `BOOL_LIT` leaf.
    fn walk_boolean(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        Ok(Value::decode_boolean(&node.text)?)
    }

    /// `NUM_LIT` leaf.
    fn walk_number(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        Ok(Value::decode_number(&node.text)?)
    }

    /// `STRING_LIT` leaf.
    fn walk_string(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        Ok(Value::decode_string(&node.text)?)
    }

    /// `TIME_LIT` leaf.
    fn walk_timestamp(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        Ok(Value::decode_timestamp(&node.text)?)
    }

    /// `IN_LIST` node: children decode in order, order is preserved.
    fn walk_list(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        let mut items = Vec::with_capacity(node.children.len());
        for child in &node.children {
            items.push(walk_expr(self, child)?);
        }
        Ok(Value::List(items))
    }

    /// `COL` leaf. The base implementation knows no type model and
    /// returns `Value::Null`.
    fn walk_col(&mut self, _node: &AstNode) -> Result<Value, WalkError> {
        Ok(Value::Null)
    }

    /// Any kind outside the expression family. Override to support syntax
    /// extensions; the default is fatal.
    fn walk_other_expr(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        Err(WalkError::UnknownExpression {
            kind: node.kind,
            text: node.text.clone(),
        })
    }
}

/// Hook set for predicate nodes.
///
/// Each hook receives the operator node plus its already-identified
/// children, not yet recursively evaluated; the hook controls whether and
/// how children are visited. Base hooks traverse children strictly
/// left-to-right and return `Ok(false)`, meaning "no authoritative
/// decision, traversal only".
pub trait PredicateWalker: ExpressionWalker {
    fn walk_not(&mut self, _op: &AstNode, child: &AstNode) -> Result<bool, WalkError> {
        walk_predicate(self, child)?;
        Ok(false)
    }

    fn walk_and(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        walk_predicate(self, left)?;
        walk_predicate(self, right)?;
        Ok(false)
    }

    fn walk_or(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        walk_predicate(self, left)?;
        walk_predicate(self, right)?;
        Ok(false)
    }

    fn walk_equals(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, left)?;
        walk_expr(self, right)?;
        Ok(false)
    }

    fn walk_not_equals(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, left)?;
        walk_expr(self, right)?;
        Ok(false)
    }

    fn walk_greater_than(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, left)?;
        walk_expr(self, right)?;
        Ok(false)
    }

    fn walk_greater_or_equals(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, left)?;
        walk_expr(self, right)?;
        Ok(false)
    }

    fn walk_less_than(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, left)?;
        walk_expr(self, right)?;
        Ok(false)
    }

    fn walk_less_or_equals(&mut self, _op: &AstNode, left: &AstNode, right: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, left)?;
        walk_expr(self, right)?;
        Ok(false)
    }

    fn walk_in(&mut self, _op: &AstNode, col: &AstNode, list: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, col)?;
        walk_expr(self, list)?;
        Ok(false)
    }

    fn walk_not_in(&mut self, _op: &AstNode, col: &AstNode, list: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, col)?;
        walk_expr(self, list)?;
        Ok(false)
    }

    fn walk_in_any(&mut self, _op: &AstNode, col: &AstNode, list: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, col)?;
        walk_expr(self, list)?;
        Ok(false)
    }

    fn walk_not_in_any(&mut self, _op: &AstNode, col: &AstNode, list: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, col)?;
        walk_expr(self, list)?;
        Ok(false)
    }

    /// `literal = ANY col`. The operand order is reversed relative to every
    /// other binary predicate: the quantified column binds on the right,
    /// and the literal is resolved first.
    fn walk_eq_any(&mut self, _op: &AstNode, literal: &AstNode, col: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, literal)?;
        walk_expr(self, col)?;
        Ok(false)
    }

    fn walk_is_null(&mut self, _op: &AstNode, col: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, col)?;
        Ok(false)
    }

    fn walk_is_not_null(&mut self, _op: &AstNode, col: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, col)?;
        Ok(false)
    }

    fn walk_like(&mut self, _op: &AstNode, col: &AstNode, pattern: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, col)?;
        walk_expr(self, pattern)?;
        Ok(false)
    }

    fn walk_not_like(&mut self, _op: &AstNode, col: &AstNode, pattern: &AstNode) -> Result<bool, WalkError> {
        walk_expr(self, col)?;
        walk_expr(self, pattern)?;
        Ok(false)
    }

    /// `CONTAINS([qualifier,] query)`. The qualifier is present only in
    /// multi-type queries and is resolved only when present.
    fn walk_contains(
        &mut self,
        _op: &AstNode,
        qualifier: Option<&AstNode>,
        query: &AstNode,
    ) -> Result<bool, WalkError> {
        if let Some(qual) = qualifier {
            walk_expr(self, qual)?;
        }
        walk_expr(self, query)?;
        Ok(false)
    }

    /// `IN_FOLDER([qualifier,] folder-id)`.
    fn walk_in_folder(
        &mut self,
        _op: &AstNode,
        qualifier: Option<&AstNode>,
        folder: &AstNode,
    ) -> Result<bool, WalkError> {
        if let Some(qual) = qualifier {
            walk_expr(self, qual)?;
        }
        walk_expr(self, folder)?;
        Ok(false)
    }

    /// `IN_TREE([qualifier,] folder-id)`.
    fn walk_in_tree(
        &mut self,
        _op: &AstNode,
        qualifier: Option<&AstNode>,
        folder: &AstNode,
    ) -> Result<bool, WalkError> {
        if let Some(qual) = qualifier {
            walk_expr(self, qual)?;
        }
        walk_expr(self, folder)?;
        Ok(false)
    }

    /// Any kind outside the predicate family. Override to support syntax
    /// extensions; the default is fatal.
    fn walk_other_predicate(&mut self, node: &AstNode) -> Result<bool, WalkError> {
        Err(WalkError::UnknownPredicate {
            kind: node.kind,
            text: node.text.clone(),
        })
    }
}

/// Dispatches a predicate node to its hook.
///
/// This is the closed half of the design: dispatch is exhaustive over
/// [`NodeKind`] and is never overridden. Children are identified
/// positionally (arity is a trusted precondition) and handed to the hook
/// unevaluated, in textual order. The one-or-two-child repository
/// predicates pass `None` for the qualifier when only the parameter is
/// present.
pub fn walk_predicate<W: PredicateWalker + ?Sized>(
    walker: &mut W,
    node: &AstNode,
) -> Result<bool, WalkError> {
    match node.kind {
        NodeKind::Not => walker.walk_not(node, node.child(0)),
        NodeKind::And => walker.walk_and(node, node.child(0), node.child(1)),
        NodeKind::Or => walker.walk_or(node, node.child(0), node.child(1)),
        NodeKind::Eq => walker.walk_equals(node, node.child(0), node.child(1)),
        NodeKind::Neq => walker.walk_not_equals(node, node.child(0), node.child(1)),
        NodeKind::Gt => walker.walk_greater_than(node, node.child(0), node.child(1)),
        NodeKind::GtEq => walker.walk_greater_or_equals(node, node.child(0), node.child(1)),
        NodeKind::Lt => walker.walk_less_than(node, node.child(0), node.child(1)),
        NodeKind::LtEq => walker.walk_less_or_equals(node, node.child(0), node.child(1)),
        NodeKind::In => walker.walk_in(node, node.child(0), node.child(1)),
        NodeKind::NotIn => walker.walk_not_in(node, node.child(0), node.child(1)),
        NodeKind::InAny => walker.walk_in_any(node, node.child(0), node.child(1)),
        NodeKind::NotInAny => walker.walk_not_in_any(node, node.child(0), node.child(1)),
        NodeKind::EqAny => walker.walk_eq_any(node, node.child(0), node.child(1)),
        NodeKind::IsNull => walker.walk_is_null(node, node.child(0)),
        NodeKind::IsNotNull => walker.walk_is_not_null(node, node.child(0)),
        NodeKind::Like => walker.walk_like(node, node.child(0), node.child(1)),
        NodeKind::NotLike => walker.walk_not_like(node, node.child(0), node.child(1)),
        NodeKind::Contains => {
            if node.child_count() == 1 {
                walker.walk_contains(node, None, node.child(0))
            } else {
                walker.walk_contains(node, Some(node.child(0)), node.child(1))
            }
        }
        NodeKind::InFolder => {
            if node.child_count() == 1 {
                walker.walk_in_folder(node, None, node.child(0))
            } else {
                walker.walk_in_folder(node, Some(node.child(0)), node.child(1))
            }
        }
        NodeKind::InTree => {
            if node.child_count() == 1 {
                walker.walk_in_tree(node, None, node.child(0))
            } else {
                walker.walk_in_tree(node, Some(node.child(0)), node.child(1))
            }
        }
        NodeKind::BoolLit
        | NodeKind::NumLit
        | NodeKind::StringLit
        | NodeKind::TimeLit
        | NodeKind::InList
        | NodeKind::Col => walker.walk_other_predicate(node),
    }
}

/// Dispatches an expression node to its hook.
///
/// Same discipline as [`walk_predicate`]: exhaustive, closed, never
/// overridden.
pub fn walk_expr<W: ExpressionWalker + ?Sized>(
    walker: &mut W,
    node: &AstNode,
) -> Result<Value, WalkError> {
    match node.kind {
        NodeKind::BoolLit => walker.walk_boolean(node),
        NodeKind::NumLit => walker.walk_number(node),
        NodeKind::StringLit => walker.walk_string(node),
        NodeKind::TimeLit => walker.walk_timestamp(node),
        NodeKind::InList => walker.walk_list(node),
        NodeKind::Col => walker.walk_col(node),
        NodeKind::Not
        | NodeKind::And
        | NodeKind::Or
        | NodeKind::Eq
        | NodeKind::Neq
        | NodeKind::Gt
        | NodeKind::GtEq
        | NodeKind::Lt
        | NodeKind::LtEq
        | NodeKind::In
        | NodeKind::NotIn
        | NodeKind::InAny
        | NodeKind::NotInAny
        | NodeKind::EqAny
        | NodeKind::IsNull
        | NodeKind::IsNotNull
        | NodeKind::Like
        | NodeKind::NotLike
        | NodeKind::Contains
        | NodeKind::InFolder
        | NodeKind::InTree => walker.walk_other_expr(node),
    }
}
