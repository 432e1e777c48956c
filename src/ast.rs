//! # CMIS Query Language - Predicate Trees
//!
//! This module defines the tree representation of a parsed CMISQL `WHERE`
//! clause. Trees are produced outside this crate (by a CMISQL parser or via
//! the JSON interchange) and consumed by the walkers in [`crate::walker`].
//!
//! ## Node families
//!
//! Every node carries a [`NodeKind`] discriminant. Kinds split into two
//! disjoint families:
//!
//! - **Predicate kinds** evaluate to a boolean filtering decision
//!   (`AND`, `EQ`, `LIKE`, `IN_FOLDER`, ...)
//! - **Expression kinds** evaluate to a value consumed by a predicate
//!   (literals, literal lists, column references)
//!
//! ## Shape
//!
//! Arity is kind-dependent and fixed: boolean connectives and comparisons
//! take exactly two children, `NOT` and the null tests exactly one, the
//! repository predicates (`CONTAINS`, `IN_FOLDER`, `IN_TREE`) one or two
//! (the optional leading child is a correlation-name qualifier used in
//! multi-type queries), and `IN_LIST` any number. The walkers trust these
//! shapes and index children positionally; [`crate::validate`] checks them
//! once where a tree enters the process.
//!
//! ```
//! use cmisql::ast::{AstNode, NodeKind};
//!
//! // cmis:name = 'Document'
//! let predicate = AstNode::branch(NodeKind::Eq, vec![
//!     AstNode::leaf(NodeKind::Col, "cmis:name"),
//!     AstNode::leaf(NodeKind::StringLit, "'Document'"),
//! ]);
//! assert_eq!(predicate.child(0).kind, NodeKind::Col);
//! ```
pub mod kinds;
pub mod node;

pub use kinds::NodeKind;
pub use node::AstNode;
