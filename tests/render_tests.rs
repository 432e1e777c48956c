use cmisql::{
    ast::{AstNode, NodeKind},
    render::{render, SqlRenderer},
    types::{DataType, PropertyDef, StaticResolver},
    walker::WalkError,
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

fn binary(kind: NodeKind, left: AstNode, right: AstNode) -> AstNode {
    AstNode::branch(kind, vec![left, right])
}

#[test]
fn test_simple_comparison() {
    let tree = binary(NodeKind::Eq, col("cmis:name"), string("'Document'"));
    assert_eq!(render(&tree).unwrap(), "cmis:name = 'Document'");
}

#[test]
fn test_comparison_operators() {
    assert_eq!(
        render(&binary(NodeKind::Neq, col("a"), num("1"))).unwrap(),
        "a <> 1"
    );
    assert_eq!(
        render(&binary(NodeKind::GtEq, col("a"), num("1"))).unwrap(),
        "a >= 1"
    );
    assert_eq!(
        render(&binary(NodeKind::Lt, col("a"), num("1"))).unwrap(),
        "a < 1"
    );
}

#[test]
fn test_string_re_escaping() {
    let tree = binary(NodeKind::Eq, col("title"), string("'it''s'"));
    assert_eq!(render(&tree).unwrap(), "title = 'it''s'");
}

#[test]
fn test_number_normalization() {
    assert_eq!(
        render(&binary(NodeKind::Eq, col("n"), num("+42"))).unwrap(),
        "n = 42"
    );
    assert_eq!(
        render(&binary(NodeKind::Eq, col("n"), num("4e2"))).unwrap(),
        "n = 400"
    );
    assert_eq!(
        render(&binary(NodeKind::Eq, col("n"), num("4.2"))).unwrap(),
        "n = 4.2"
    );
}

#[test]
fn test_timestamp_normalization() {
    let tree = binary(
        NodeKind::Gt,
        col("cmis:creationDate"),
        AstNode::leaf(NodeKind::TimeLit, "TIMESTAMP '2024-06-01T12:00:00Z'"),
    );
    assert_eq!(
        render(&tree).unwrap(),
        "cmis:creationDate > TIMESTAMP '2024-06-01T12:00:00+00:00'"
    );
}

#[test]
fn test_boolean_grouping() {
    let tree = AstNode::branch(
        NodeKind::Or,
        vec![
            AstNode::branch(
                NodeKind::And,
                vec![
                    binary(NodeKind::Eq, col("a"), num("1")),
                    binary(NodeKind::Eq, col("b"), num("2")),
                ],
            ),
            AstNode::branch(
                NodeKind::Not,
                vec![AstNode::branch(NodeKind::IsNull, vec![col("c")])],
            ),
        ],
    );
    assert_eq!(
        render(&tree).unwrap(),
        "((a = 1 AND b = 2) OR NOT (c IS NULL))"
    );
}

#[test]
fn test_membership_and_null_forms() {
    let list = AstNode::branch(NodeKind::InList, vec![string("'a'"), string("'b'")]);
    assert_eq!(
        render(&binary(NodeKind::In, col("status"), list.clone())).unwrap(),
        "status IN ('a', 'b')"
    );
    assert_eq!(
        render(&binary(NodeKind::NotIn, col("status"), list)).unwrap(),
        "status NOT IN ('a', 'b')"
    );
    assert_eq!(
        render(&AstNode::branch(NodeKind::IsNotNull, vec![col("status")])).unwrap(),
        "status IS NOT NULL"
    );
}

#[test]
fn test_quantifier_forms() {
    let list = AstNode::branch(NodeKind::InList, vec![string("'x'")]);
    assert_eq!(
        render(&binary(NodeKind::InAny, col("tags"), list.clone())).unwrap(),
        "ANY tags IN ('x')"
    );
    assert_eq!(
        render(&binary(NodeKind::NotInAny, col("tags"), list)).unwrap(),
        "ANY tags NOT IN ('x')"
    );
    // Reversed operand order survives translation.
    assert_eq!(
        render(&binary(NodeKind::EqAny, string("'x'"), col("tags"))).unwrap(),
        "'x' = ANY tags"
    );
}

#[test]
fn test_like_forms() {
    assert_eq!(
        render(&binary(NodeKind::Like, col("cmis:name"), string("'doc-%'"))).unwrap(),
        "cmis:name LIKE 'doc-%'"
    );
    assert_eq!(
        render(&binary(NodeKind::NotLike, col("cmis:name"), string("'doc-%'"))).unwrap(),
        "cmis:name NOT LIKE 'doc-%'"
    );
}

#[test]
fn test_repository_predicates() {
    let contains = AstNode::branch(NodeKind::Contains, vec![string("'foo bar'")]);
    assert_eq!(render(&contains).unwrap(), "CONTAINS('foo bar')");

    let qualified = AstNode::branch(NodeKind::Contains, vec![col("d"), string("'foo'")]);
    assert_eq!(render(&qualified).unwrap(), "CONTAINS(d, 'foo')");

    let in_folder = AstNode::branch(NodeKind::InFolder, vec![string("'f1'")]);
    assert_eq!(render(&in_folder).unwrap(), "IN_FOLDER('f1')");

    let in_tree = AstNode::branch(NodeKind::InTree, vec![col("d"), string("'f1'")]);
    assert_eq!(render(&in_tree).unwrap(), "IN_TREE(d, 'f1')");
}

#[test]
fn test_resolver_rewrites_columns() {
    let mut resolver = StaticResolver::new();
    resolver.insert(PropertyDef {
        id: "cmis:name".to_string(),
        query_name: "name".to_string(),
        data_type: DataType::String,
        multi_valued: false,
    });

    let tree = binary(NodeKind::Eq, col("name"), string("'x'"));
    let rendered = SqlRenderer::with_resolver(&resolver).render(&tree).unwrap();
    assert_eq!(rendered, "name = 'x'");

    let unknown = binary(NodeKind::Eq, col("nonexistent"), string("'x'"));
    let err = SqlRenderer::with_resolver(&resolver).render(&unknown).unwrap_err();
    assert_eq!(err, WalkError::UnknownColumn("nonexistent".to_string()));
}

#[test]
fn test_render_rejects_malformed_literals() {
    let tree = binary(NodeKind::Eq, col("a"), string("no quotes"));
    assert!(matches!(render(&tree).unwrap_err(), WalkError::Decode(_)));
}
