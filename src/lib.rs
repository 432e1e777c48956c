pub mod ast;
pub mod interchange;
pub mod matcher;
pub mod render;
pub mod types;
pub mod validate;
pub mod value;
pub mod walker;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{AstNode, NodeKind};
pub use interchange::InterchangeError;
pub use matcher::{Document, Matcher, PropertySource};
pub use render::SqlRenderer;
pub use types::{DataType, PropertyDef, StaticResolver, TypeResolver};
pub use validate::{validate_predicate, ShapeError};
pub use value::{DecodeError, Value};
pub use walker::{walk_expr, walk_predicate, ExpressionWalker, PredicateWalker, WalkError};
