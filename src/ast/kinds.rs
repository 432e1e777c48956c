use std::fmt;

/// Syntactic kind of a predicate-tree node.
///
/// The enumeration is closed: the CMISQL grammar is fixed, and both walkers
/// dispatch with exhaustive matches so that a kind added here without a
/// corresponding hook arm is a compile error, not a runtime surprise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Boolean connectives
    /// Logical negation (`NOT`), one predicate child
    Not,
    /// Logical conjunction (`AND`), two predicate children
    And,
    /// Logical disjunction (`OR`), two predicate children
    Or,

    // Comparisons
    /// Equal (`=`)
    Eq,
    /// Not equal (`<>`)
    Neq,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    GtEq,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    LtEq,

    // Set membership
    /// `IN (list)`
    In,
    /// `NOT IN (list)`
    NotIn,
    /// `ANY col IN (list)` over a multi-valued column
    InAny,
    /// `ANY col NOT IN (list)` over a multi-valued column
    NotInAny,
    /// `literal = ANY col`; note the reversed operand order: the
    /// quantified column sits on the right
    EqAny,

    // Null tests
    /// `IS NULL`, one column child
    IsNull,
    /// `IS NOT NULL`, one column child
    IsNotNull,

    // Pattern matching
    /// `LIKE`, column and pattern children
    Like,
    /// `NOT LIKE`, column and pattern children
    NotLike,

    // Repository predicates (optional leading qualifier child)
    /// Full-text search (`CONTAINS`)
    Contains,
    /// Direct-children folder scope (`IN_FOLDER`)
    InFolder,
    /// Subtree folder scope (`IN_TREE`)
    InTree,

    // Expressions
    /// Boolean literal (`TRUE`/`FALSE`)
    BoolLit,
    /// Numeric literal, integer or decimal
    NumLit,
    /// Single-quoted string literal
    StringLit,
    /// `TIMESTAMP '...'` literal
    TimeLit,
    /// Ordered literal list, any number of children
    InList,
    /// Column reference; the node text is the query name
    Col,
}

impl NodeKind {
    /// All kinds, in declaration order. Used by the interchange to map
    /// kind names without maintaining a second list.
    pub const ALL: [NodeKind; 27] = [
        NodeKind::Not,
        NodeKind::And,
        NodeKind::Or,
        NodeKind::Eq,
        NodeKind::Neq,
        NodeKind::Gt,
        NodeKind::GtEq,
        NodeKind::Lt,
        NodeKind::LtEq,
        NodeKind::In,
        NodeKind::NotIn,
        NodeKind::InAny,
        NodeKind::NotInAny,
        NodeKind::EqAny,
        NodeKind::IsNull,
        NodeKind::IsNotNull,
        NodeKind::Like,
        NodeKind::NotLike,
        NodeKind::Contains,
        NodeKind::InFolder,
        NodeKind::InTree,
        NodeKind::BoolLit,
        NodeKind::NumLit,
        NodeKind::StringLit,
        NodeKind::TimeLit,
        NodeKind::InList,
        NodeKind::Col,
    ];

    /// Canonical name, as used by parsers and the JSON interchange.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Not => "NOT",
            NodeKind::And => "AND",
            NodeKind::Or => "OR",
            NodeKind::Eq => "EQ",
            NodeKind::Neq => "NEQ",
            NodeKind::Gt => "GT",
            NodeKind::GtEq => "GTEQ",
            NodeKind::Lt => "LT",
            NodeKind::LtEq => "LTEQ",
            NodeKind::In => "IN",
            NodeKind::NotIn => "NOT_IN",
            NodeKind::InAny => "IN_ANY",
            NodeKind::NotInAny => "NOT_IN_ANY",
            NodeKind::EqAny => "EQ_ANY",
            NodeKind::IsNull => "IS_NULL",
            NodeKind::IsNotNull => "IS_NOT_NULL",
            NodeKind::Like => "LIKE",
            NodeKind::NotLike => "NOT_LIKE",
            NodeKind::Contains => "CONTAINS",
            NodeKind::InFolder => "IN_FOLDER",
            NodeKind::InTree => "IN_TREE",
            NodeKind::BoolLit => "BOOL_LIT",
            NodeKind::NumLit => "NUM_LIT",
            NodeKind::StringLit => "STRING_LIT",
            NodeKind::TimeLit => "TIME_LIT",
            NodeKind::InList => "IN_LIST",
            NodeKind::Col => "COL",
        }
    }

    /// Look up a kind by its canonical name.
    pub fn from_name(name: &str) -> Option<NodeKind> {
        NodeKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Whether this kind evaluates to a boolean filtering decision.
    pub fn is_predicate(self) -> bool {
        !self.is_expression()
    }

    /// Whether this kind evaluates to a value consumed by a predicate.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            NodeKind::BoolLit
                | NodeKind::NumLit
                | NodeKind::StringLit
                | NodeKind::TimeLit
                | NodeKind::InList
                | NodeKind::Col
        )
    }

    /// Permitted child-count range for this kind.
    ///
    /// The upper bound is `usize::MAX` for the variadic `IN_LIST`.
    pub fn arity(self) -> (usize, usize) {
        match self {
            NodeKind::Not | NodeKind::IsNull | NodeKind::IsNotNull => (1, 1),
            NodeKind::And
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
            | NodeKind::Like
            | NodeKind::NotLike => (2, 2),
            NodeKind::Contains | NodeKind::InFolder | NodeKind::InTree => (1, 2),
            NodeKind::InList => (0, usize::MAX),
            NodeKind::BoolLit
            | NodeKind::NumLit
            | NodeKind::StringLit
            | NodeKind::TimeLit
            | NodeKind::Col => (0, 0),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[test]
fn test_name_round_trip() {
    for kind in NodeKind::ALL {
        assert_eq!(NodeKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(NodeKind::from_name("BETWEEN"), None);
}

#[test]
fn test_families_are_disjoint() {
    for kind in NodeKind::ALL {
        assert_ne!(kind.is_predicate(), kind.is_expression());
    }
}
