use cmisql::{
    ast::{AstNode, NodeKind},
    interchange::{
        document_from_json, node_from_json, node_to_json, resolver_from_json, value_to_json,
        InterchangeError,
    },
    matcher::Matcher,
    types::TypeResolver,
    validate::{validate_predicate, ShapeError},
    value::Value,
};

fn parse(json: &str) -> serde_json::Value {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_tree_round_trip() {
    let json = parse(
        r#"{
            "kind": "AND",
            "children": [
                {"kind": "GT", "children": [
                    {"kind": "COL", "text": "size"},
                    {"kind": "NUM_LIT", "text": "100"}
                ]},
                {"kind": "CONTAINS", "children": [
                    {"kind": "STRING_LIT", "text": "'finance'"}
                ]}
            ]
        }"#,
    );
    let node = node_from_json(&json).unwrap();
    assert_eq!(node.kind, NodeKind::And);
    assert_eq!(node.child(0).child(1).text, "100");
    assert!(validate_predicate(&node).is_ok());

    let back = node_to_json(&node);
    assert_eq!(node_from_json(&back).unwrap(), node);
}

#[test]
fn test_unknown_kind_name_is_rejected() {
    let json = parse(r#"{"kind": "BETWEEN", "children": []}"#);
    assert_eq!(
        node_from_json(&json),
        Err(InterchangeError::UnknownKind("BETWEEN".to_string()))
    );
}

#[test]
fn test_malformed_nodes_are_rejected() {
    assert_eq!(node_from_json(&parse("[1, 2]")), Err(InterchangeError::NotAnObject));
    assert_eq!(
        node_from_json(&parse(r#"{"text": "x"}"#)),
        Err(InterchangeError::MissingKind)
    );
    assert_eq!(
        node_from_json(&parse(r#"{"kind": "AND", "children": 7}"#)),
        Err(InterchangeError::BadChildren)
    );
}

#[test]
fn test_validation_catches_malformed_shapes() {
    let lopsided = parse(
        r#"{"kind": "AND", "children": [
            {"kind": "IS_NULL", "children": [{"kind": "COL", "text": "a"}]}
        ]}"#,
    );
    let node = node_from_json(&lopsided).unwrap();
    assert_eq!(
        validate_predicate(&node),
        Err(ShapeError::Arity {
            kind: NodeKind::And,
            min: 2,
            max: 2,
            found: 1
        })
    );
}

#[test]
fn test_value_to_json_forms() {
    assert_eq!(value_to_json(&Value::Integer(42)), parse("42"));
    assert_eq!(value_to_json(&Value::Boolean(false)), parse("false"));
    assert_eq!(value_to_json(&Value::Null), serde_json::Value::Null);
    assert_eq!(
        value_to_json(&Value::Decimal("4.5".parse().unwrap())),
        parse("4.5")
    );
    assert_eq!(
        value_to_json(&Value::decode_timestamp("TIMESTAMP '2024-06-01T12:00:00Z'").unwrap()),
        parse("\"2024-06-01T12:00:00+00:00\"")
    );
    assert_eq!(
        value_to_json(&Value::List(vec![Value::Integer(1), Value::Integer(2)])),
        parse("[1,2]")
    );
}

#[test]
fn test_envelope_document_drives_repository_predicates() {
    let doc = document_from_json(&parse(
        r#"{
            "properties": {"cmis:name": "report.pdf", "tags": ["finance", "q3"]},
            "content": "Quarterly finance report",
            "parentId": "folder-3",
            "ancestorIds": ["folder-1"]
        }"#,
    ))
    .unwrap();

    let tree = AstNode::branch(
        NodeKind::And,
        vec![
            AstNode::branch(
                NodeKind::Contains,
                vec![AstNode::leaf(NodeKind::StringLit, "'finance'")],
            ),
            AstNode::branch(
                NodeKind::InTree,
                vec![AstNode::leaf(NodeKind::StringLit, "'folder-1'")],
            ),
        ],
    );
    assert!(Matcher::new(&doc).matches(&tree).unwrap());
}

#[test]
fn test_schema_loading() {
    let resolver = resolver_from_json(&parse(
        r#"[
            {"id": "cmis:name", "dataType": "string"},
            {"id": "cmis:creationDate", "queryName": "created", "dataType": "datetime"},
            {"id": "tags", "dataType": "string", "multiValued": true}
        ]"#,
    ))
    .unwrap();

    assert_eq!(resolver.resolve("cmis:name").unwrap().id, "cmis:name");
    let created = resolver.resolve("created").unwrap();
    assert_eq!(created.id, "cmis:creationDate");
    assert!(resolver.resolve("tags").unwrap().multi_valued);
    assert!(resolver.resolve("cmis:creationDate").is_none());

    let bad = resolver_from_json(&parse(r#"[{"id": "x", "dataType": "blob"}]"#));
    assert!(matches!(bad, Err(InterchangeError::BadSchema(_))));
}

#[cfg(feature = "cli")]
#[test]
fn test_cli_filter_end_to_end() {
    use cmisql::cli::{execute_filter, execute_render, FilterOptions};

    let tree = r#"{"kind": "GT", "children": [
        {"kind": "COL", "text": "size"},
        {"kind": "NUM_LIT", "text": "100"}
    ]}"#;

    assert_eq!(execute_render(tree, None).unwrap(), "size > 100");

    let options = FilterOptions {
        tree: tree.to_string(),
        input: r#"[{"name": "a", "size": 420}, {"name": "b", "size": 7}]"#.to_string(),
    };
    let matches = execute_filter(&options).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["name"], "a");
}

#[cfg(feature = "cli")]
#[test]
fn test_cli_check_rejects_bad_trees() {
    use cmisql::cli::execute_check;

    assert!(execute_check(r#"{"kind": "AND", "children": []}"#).is_err());
    assert!(execute_check("not json at all").is_err());
    assert!(execute_check(
        r#"{"kind": "IS_NULL", "children": [{"kind": "COL", "text": "a"}]}"#
    )
    .is_ok());
}
