use cmisql::{
    ast::{AstNode, NodeKind},
    value::Value,
    walker::{walk_expr, walk_predicate, ExpressionWalker, PredicateWalker, WalkError},
};

fn col(name: &str) -> AstNode {
    AstNode::leaf(NodeKind::Col, name)
}

fn num(text: &str) -> AstNode {
    AstNode::leaf(NodeKind::NumLit, text)
}

fn string(text: &str) -> AstNode {
    AstNode::leaf(NodeKind::StringLit, text)
}

fn eq(left: AstNode, right: AstNode) -> AstNode {
    AstNode::branch(NodeKind::Eq, vec![left, right])
}

fn and(left: AstNode, right: AstNode) -> AstNode {
    AstNode::branch(NodeKind::And, vec![left, right])
}

/// Backend that keeps every default hook: pure traversal, no decisions.
struct TraversalOnly;

impl ExpressionWalker for TraversalOnly {}
impl PredicateWalker for TraversalOnly {}

/// Backend recording the order in which leaf expressions are resolved.
#[derive(Default)]
struct Recorder {
    visited: Vec<String>,
}

impl ExpressionWalker for Recorder {
    fn walk_col(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        self.visited.push(format!("col:{}", node.text));
        Ok(Value::Null)
    }

    fn walk_string(&mut self, node: &AstNode) -> Result<Value, WalkError> {
        self.visited.push(format!("lit:{}", node.text));
        Ok(Value::decode_string(&node.text)?)
    }
}

impl PredicateWalker for Recorder {}

#[test]
fn test_default_hooks_make_no_decision() {
    let tree = and(eq(col("a"), num("1")), eq(col("b"), num("2")));
    let result = walk_predicate(&mut TraversalOnly, &tree).unwrap();
    assert!(!result);
}

#[test]
fn test_traversal_is_left_to_right() {
    let tree = and(eq(col("a"), col("b")), eq(col("c"), col("d")));
    let mut recorder = Recorder::default();
    walk_predicate(&mut recorder, &tree).unwrap();
    assert_eq!(recorder.visited, vec!["col:a", "col:b", "col:c", "col:d"]);
}

#[test]
fn test_comparison_children_resolve_in_order() {
    let tree = AstNode::branch(NodeKind::Lt, vec![col("x"), string("'y'")]);
    let mut recorder = Recorder::default();
    walk_predicate(&mut recorder, &tree).unwrap();
    assert_eq!(recorder.visited, vec!["col:x", "lit:'y'"]);
}

#[test]
fn test_list_order_preserved() {
    let list = AstNode::branch(
        NodeKind::InList,
        vec![num("1"), num("2"), num("3")],
    );
    let value = walk_expr(&mut TraversalOnly, &list).unwrap();
    assert_eq!(
        value,
        Value::List(vec![
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3)
        ])
    );
}

#[test]
fn test_default_literal_hooks_decode() {
    let mut walker = TraversalOnly;
    assert_eq!(
        walk_expr(&mut walker, &AstNode::leaf(NodeKind::BoolLit, "TRUE")).unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(
        walk_expr(&mut walker, &num("4.2")).unwrap(),
        Value::Decimal("4.2".parse().unwrap())
    );
    assert_eq!(
        walk_expr(&mut walker, &string("'it''s'")).unwrap(),
        Value::String("it's".to_string())
    );
    assert_eq!(walk_expr(&mut walker, &col("cmis:name")).unwrap(), Value::Null);
}

#[test]
fn test_expression_kind_is_unknown_to_predicate_walker() {
    let err = walk_predicate(&mut TraversalOnly, &num("1")).unwrap_err();
    assert!(matches!(err, WalkError::UnknownPredicate { kind: NodeKind::NumLit, .. }));
}

#[test]
fn test_predicate_kind_is_unknown_to_expression_walker() {
    let tree = eq(col("a"), num("1"));
    let err = walk_expr(&mut TraversalOnly, &tree).unwrap_err();
    assert!(matches!(err, WalkError::UnknownExpression { kind: NodeKind::Eq, .. }));
}

#[test]
fn test_unknown_hook_is_overridable() {
    // Backend that tolerates expression nodes in predicate position.
    struct Lenient;
    impl ExpressionWalker for Lenient {}
    impl PredicateWalker for Lenient {
        fn walk_other_predicate(&mut self, _node: &AstNode) -> Result<bool, WalkError> {
            Ok(true)
        }
    }
    assert!(walk_predicate(&mut Lenient, &num("1")).unwrap());
}

#[test]
fn test_decode_failure_propagates() {
    let tree = eq(col("a"), num("4.2.3"));
    let err = walk_predicate(&mut TraversalOnly, &tree).unwrap_err();
    assert!(matches!(err, WalkError::Decode(_)));
}

#[test]
fn test_eq_any_operand_order() {
    #[derive(Default)]
    struct QuantifierProbe {
        received: Option<(NodeKind, NodeKind)>,
    }
    impl ExpressionWalker for QuantifierProbe {}
    impl PredicateWalker for QuantifierProbe {
        fn walk_eq_any(
            &mut self,
            _op: &AstNode,
            literal: &AstNode,
            col: &AstNode,
        ) -> Result<bool, WalkError> {
            self.received = Some((literal.kind, col.kind));
            Ok(false)
        }
    }

    let tree = AstNode::branch(NodeKind::EqAny, vec![string("'x'"), col("tags")]);
    let mut probe = QuantifierProbe::default();
    walk_predicate(&mut probe, &tree).unwrap();
    // Left is the literal, right the quantified column - reversed relative
    // to every other binary predicate.
    assert_eq!(probe.received, Some((NodeKind::StringLit, NodeKind::Col)));
}

#[test]
fn test_eq_any_resolves_literal_before_column() {
    let tree = AstNode::branch(NodeKind::EqAny, vec![string("'x'"), col("tags")]);
    let mut recorder = Recorder::default();
    walk_predicate(&mut recorder, &tree).unwrap();
    assert_eq!(recorder.visited, vec!["lit:'x'", "col:tags"]);
}

#[test]
fn test_optional_qualifier_absent_and_present() {
    #[derive(Default)]
    struct ScopeProbe {
        qualifiers: Vec<Option<String>>,
    }
    impl ExpressionWalker for ScopeProbe {}
    impl PredicateWalker for ScopeProbe {
        fn walk_contains(
            &mut self,
            _op: &AstNode,
            qualifier: Option<&AstNode>,
            _query: &AstNode,
        ) -> Result<bool, WalkError> {
            self.qualifiers.push(qualifier.map(|q| q.text.clone()));
            Ok(false)
        }
        fn walk_in_folder(
            &mut self,
            _op: &AstNode,
            qualifier: Option<&AstNode>,
            _folder: &AstNode,
        ) -> Result<bool, WalkError> {
            self.qualifiers.push(qualifier.map(|q| q.text.clone()));
            Ok(false)
        }
    }

    let mut probe = ScopeProbe::default();
    let bare = AstNode::branch(NodeKind::Contains, vec![string("'foo'")]);
    let qualified = AstNode::branch(NodeKind::Contains, vec![col("d"), string("'foo'")]);
    let folder = AstNode::branch(NodeKind::InFolder, vec![col("f"), string("'f1'")]);
    walk_predicate(&mut probe, &bare).unwrap();
    walk_predicate(&mut probe, &qualified).unwrap();
    walk_predicate(&mut probe, &folder).unwrap();
    assert_eq!(
        probe.qualifiers,
        vec![None, Some("d".to_string()), Some("f".to_string())]
    );
}

#[test]
fn test_qualifier_resolved_only_when_present() {
    let mut recorder = Recorder::default();
    let bare = AstNode::branch(NodeKind::InTree, vec![string("'f1'")]);
    walk_predicate(&mut recorder, &bare).unwrap();
    assert_eq!(recorder.visited, vec!["lit:'f1'"]);

    recorder.visited.clear();
    let qualified = AstNode::branch(NodeKind::InTree, vec![col("d"), string("'f1'")]);
    walk_predicate(&mut recorder, &qualified).unwrap();
    assert_eq!(recorder.visited, vec!["col:d", "lit:'f1'"]);
}

#[test]
fn test_walks_are_idempotent() {
    let tree = and(eq(col("a"), col("b")), eq(col("c"), col("d")));
    let mut recorder = Recorder::default();

    walk_predicate(&mut recorder, &tree).unwrap();
    let first = recorder.visited.clone();
    recorder.visited.clear();
    walk_predicate(&mut recorder, &tree).unwrap();
    assert_eq!(first, recorder.visited);
}
