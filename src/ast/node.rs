use crate::ast::NodeKind;

/// One node of a parsed predicate tree.
///
/// Nodes own their children; a tree is acyclic by construction and has no
/// sharing. Leaf literal and column nodes carry their raw lexical payload in
/// `text` (the string literal *including* its quotes, the full
/// `TIMESTAMP '...'` form, the column query name); `text` is empty and
/// ignored for composite nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    /// Syntactic kind, fixed per node
    pub kind: NodeKind,

    /// Raw lexical payload for leaf nodes, empty otherwise
    pub text: String,

    /// Ordered children, owned by this node
    pub children: Vec<AstNode>,
}

impl AstNode {
    /// Creates a leaf node carrying a lexical payload.
    pub fn leaf(kind: NodeKind, text: impl Into<String>) -> Self {
        AstNode {
            kind,
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Creates a composite node from its ordered children.
    pub fn branch(kind: NodeKind, children: Vec<AstNode>) -> Self {
        AstNode {
            kind,
            text: String::new(),
            children,
        }
    }

    /// Positional child access.
    ///
    /// Arity is a trusted precondition (checked once by
    /// [`crate::validate::validate_predicate`] where a tree is constructed),
    /// so this panics on an index past the end rather than degrading to an
    /// `Option`.
    pub fn child(&self, index: usize) -> &AstNode {
        &self.children[index]
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

#[test]
fn test_leaf_and_branch_construction() {
    let node = AstNode::branch(
        NodeKind::And,
        vec![
            AstNode::branch(
                NodeKind::Eq,
                vec![
                    AstNode::leaf(NodeKind::Col, "cmis:name"),
                    AstNode::leaf(NodeKind::StringLit, "'a'"),
                ],
            ),
            AstNode::branch(NodeKind::IsNull, vec![AstNode::leaf(NodeKind::Col, "x")]),
        ],
    );
    assert_eq!(node.child_count(), 2);
    assert_eq!(node.child(0).child(0).text, "cmis:name");
    assert!(node.text.is_empty());
}
